pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::gateway::{HttpCheckoutGateway, SimulatedGateway};
pub use config::{CatalogConfig, FileCartStore};
pub use core::cart::CartState;
pub use core::checkout::CheckoutWizard;
pub use core::pricing::compute_price;
pub use core::replay::{ReplayEngine, ReplayOp};
pub use core::session::CheckoutSession;
pub use domain::model::{
    BookingSubmission, CartLine, CartOp, CartRules, CartSnapshot, CartTotals, CheckoutForm,
    CheckoutStep, Coupon, CouponKind, NewCartLine, PriceCatalog, PriceQuote, PriceQuoteRequest,
    QuoteWarning, SubmissionReceipt,
};
pub use domain::money::Money;
pub use domain::ports::{CartStore, CatalogSource, CheckoutGateway};
pub use utils::error::{CheckoutError, Result};
