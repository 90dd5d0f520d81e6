pub mod cart;
pub mod checkout;
pub mod pricing;
pub mod replay;
pub mod session;

pub use crate::domain::model::{CartTotals, PriceQuote, PriceQuoteRequest};
pub use crate::domain::ports::{CartStore, CatalogSource, CheckoutGateway};
pub use crate::utils::error::Result;
