// Adapters layer: concrete gateways for external systems. File-backed cart
// persistence lives under src/config alongside the loader that selects it.

pub mod gateway;

pub use gateway::{HttpCheckoutGateway, SimulatedGateway};
