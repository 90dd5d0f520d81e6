// Domain layer: models, money arithmetic and ports. No I/O lives here.

pub mod model;
pub mod money;
pub mod ports;
