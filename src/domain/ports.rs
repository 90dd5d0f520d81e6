use crate::domain::model::{BookingSubmission, CartRules, CartSnapshot, PriceCatalog, SubmissionReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where a cart session is mirrored between visits (a local-storage file,
/// a backend sync call). The snapshot travels verbatim; the store never
/// interprets it.
pub trait CartStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Option<CartSnapshot>>> + Send;
    fn save(&self, snapshot: &CartSnapshot)
        -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Read access to the loaded catalog and cart parameters.
pub trait CatalogSource: Send + Sync {
    fn catalog(&self) -> &PriceCatalog;
    fn cart_rules(&self) -> &CartRules;
}

/// The booking endpoint. A submission is accepted or rejected atomically.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn submit(&self, submission: &BookingSubmission) -> Result<SubmissionReceipt>;
}
