//! Replay engine: drives a cart through a recorded operation sequence.
//! Three phases: restore the saved cart, apply the operations, persist the
//! result. Operations that cannot be resolved are skipped, never fatal.

use serde::{Deserialize, Serialize};

use crate::core::cart::CartState;
use crate::domain::model::{CartOp, CartTotals, Coupon, NewCartLine};
use crate::domain::ports::CartStore;
use crate::utils::error::Result;
use crate::utils::monitor::ReplayMonitor;

/// Operation alphabet of a replay file. Lines are addressed by product and
/// variant rather than by line id, because generated ids do not survive
/// between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ReplayOp {
    AddItem {
        #[serde(flatten)]
        line: NewCartLine,
    },
    RemoveItem {
        product_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variant_key: Option<String>,
    },
    UpdateQuantity {
        product_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variant_key: Option<String>,
        quantity: u32,
    },
    ApplyCoupon {
        #[serde(flatten)]
        coupon: Coupon,
    },
    RemoveCoupon,
    Clear,
}

pub struct ReplayEngine<S: CartStore> {
    store: Option<S>,
    monitor: ReplayMonitor,
}

impl<S: CartStore> ReplayEngine<S> {
    pub fn new(store: Option<S>) -> Self {
        Self {
            store,
            monitor: ReplayMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(store: Option<S>, monitoring_enabled: bool) -> Self {
        Self {
            store,
            monitor: ReplayMonitor::new(monitoring_enabled),
        }
    }

    /// Replays `ops` onto `cart` and returns the resulting totals.
    ///
    /// Store failures on restore or persist abort the run; everything in
    /// between goes through the cart reducer, which never fails.
    pub async fn run(&self, cart: &mut CartState, ops: Vec<ReplayOp>) -> Result<CartTotals> {
        println!("Starting cart replay...");

        if let Some(store) = &self.store {
            println!("Restoring saved cart...");
            match store.load().await? {
                Some(snapshot) => {
                    cart.restore(snapshot);
                    println!("Restored {} line(s)", cart.lines().len());
                }
                None => println!("No saved cart found, starting empty"),
            }
        }
        self.monitor.log_stats("After restore");

        println!("Applying {} operation(s)...", ops.len());
        let mut skipped = 0usize;
        for op in ops {
            match resolve(cart, op) {
                Some(op) => {
                    cart.apply(op);
                    self.monitor.record_op();
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            println!("Skipped {} operation(s) referencing unknown lines", skipped);
        }
        self.monitor.log_stats("After apply");

        if let Some(store) = &self.store {
            println!("Saving cart...");
            store.save(&cart.snapshot()).await?;
        }

        self.monitor.log_final_stats();

        Ok(cart.totals())
    }
}

/// Pins a replayed operation to a concrete line id against the cart as it
/// stands right now. `None` means the reference points at nothing.
fn resolve(cart: &CartState, op: ReplayOp) -> Option<CartOp> {
    match op {
        ReplayOp::AddItem { line } => Some(CartOp::AddItem { line }),
        ReplayOp::RemoveItem {
            product_id,
            variant_key,
        } => match cart.find_line(&product_id, variant_key.as_deref()) {
            Some(id) => Some(CartOp::RemoveItem { id }),
            None => {
                tracing::warn!("remove of unknown product '{}' skipped", product_id);
                None
            }
        },
        ReplayOp::UpdateQuantity {
            product_id,
            variant_key,
            quantity,
        } => match cart.find_line(&product_id, variant_key.as_deref()) {
            Some(id) => Some(CartOp::UpdateQuantity { id, quantity }),
            None => {
                tracing::warn!(
                    "quantity update for unknown product '{}' skipped",
                    product_id
                );
                None
            }
        },
        ReplayOp::ApplyCoupon { coupon } => Some(CartOp::ApplyCoupon { coupon }),
        ReplayOp::RemoveCoupon => Some(CartOp::RemoveCoupon),
        ReplayOp::Clear => Some(CartOp::Clear),
    }
}
