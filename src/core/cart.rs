//! Cart aggregator: an owned reducer over cart operations. Every mutation
//! recomputes the derived totals, so readers always observe a consistent
//! cart.

use std::collections::BTreeSet;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::model::{
    CartLine, CartOp, CartRules, CartSnapshot, CartTotals, Coupon, CouponKind, LineId, NewCartLine,
};
use crate::domain::money::Money;

/// Cart contents plus the pricing rules they are totalled under.
///
/// The state is a plain value; wrap it in a lock if it must be shared.
#[derive(Debug, Clone)]
pub struct CartState {
    lines: Vec<CartLine>,
    coupon: Option<Coupon>,
    rules: CartRules,
    totals: CartTotals,
}

impl CartState {
    pub fn new(rules: CartRules) -> Self {
        Self {
            lines: Vec::new(),
            coupon: None,
            rules,
            totals: CartTotals::default(),
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    pub fn totals(&self) -> CartTotals {
        self.totals
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Looks up a line by its product identity rather than its generated id.
    pub fn find_line(&self, product_id: &str, variant_key: Option<&str>) -> Option<LineId> {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id && line.variant_key.as_deref() == variant_key)
            .map(|line| line.id)
    }

    /// Applies a single operation and returns the id of the line an
    /// `AddItem` landed on. Operations never fail; ones that reference a
    /// missing line or carry nothing to add are ignored.
    pub fn apply(&mut self, op: CartOp) -> Option<LineId> {
        match op {
            CartOp::AddItem { line } => self.add_item(line),
            CartOp::RemoveItem { id } => {
                self.remove_item(&id);
                None
            }
            CartOp::UpdateQuantity { id, quantity } => {
                self.update_quantity(&id, quantity);
                None
            }
            CartOp::ApplyCoupon { coupon } => {
                self.apply_coupon(coupon);
                None
            }
            CartOp::RemoveCoupon => {
                self.remove_coupon();
                None
            }
            CartOp::Clear => {
                self.clear();
                None
            }
        }
    }

    /// Adds an item, merging with an existing line for the same product and
    /// variant. A merge takes the incoming line's unit price and stock as
    /// the newest product snapshot; quantity never exceeds that stock.
    /// Returns the affected line's id, or `None` when there was nothing to
    /// add.
    pub fn add_item(&mut self, line: NewCartLine) -> Option<LineId> {
        if line.quantity == 0 || line.stock == 0 {
            tracing::debug!("ignoring add of '{}' with nothing to add", line.product_id);
            return None;
        }

        let position = self
            .lines
            .iter()
            .position(|l| l.product_id == line.product_id && l.variant_key == line.variant_key);

        let id = match position {
            Some(index) => {
                let existing = &mut self.lines[index];
                let wanted = existing.quantity.saturating_add(line.quantity);
                if wanted > line.stock {
                    tracing::warn!(
                        "quantity {} above stock {} for '{}', clamping",
                        wanted,
                        line.stock,
                        line.product_id
                    );
                }
                existing.quantity = wanted.min(line.stock);
                existing.stock = line.stock;
                existing.unit_price = line.unit_price;
                existing.id
            }
            None => {
                if line.quantity > line.stock {
                    tracing::warn!(
                        "quantity {} above stock {} for '{}', clamping",
                        line.quantity,
                        line.stock,
                        line.product_id
                    );
                }
                let id = Uuid::new_v4();
                self.lines.push(CartLine {
                    id,
                    quantity: line.quantity.min(line.stock),
                    product_id: line.product_id,
                    unit_price: line.unit_price,
                    variant_key: line.variant_key,
                    vendor_id: line.vendor_id,
                    stock: line.stock,
                });
                id
            }
        };

        self.recompute_totals();
        Some(id)
    }

    pub fn remove_item(&mut self, id: &LineId) {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != *id);
        if self.lines.len() == before {
            tracing::debug!("remove of unknown line {} ignored", id);
            return;
        }
        self.recompute_totals();
    }

    /// Sets a line's quantity. Zero removes the line; anything above the
    /// line's stock is clamped down to it.
    pub fn update_quantity(&mut self, id: &LineId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(id);
            return;
        }

        let Some(line) = self.lines.iter_mut().find(|line| line.id == *id) else {
            tracing::debug!("quantity update for unknown line {} ignored", id);
            return;
        };

        if quantity > line.stock {
            tracing::warn!(
                "quantity {} above stock {} for '{}', clamping",
                quantity,
                line.stock,
                line.product_id
            );
        }
        line.quantity = quantity.min(line.stock);
        self.recompute_totals();
    }

    /// Applies a coupon, replacing any previous one.
    pub fn apply_coupon(&mut self, coupon: Coupon) {
        self.coupon = Some(coupon);
        self.recompute_totals();
    }

    pub fn remove_coupon(&mut self) {
        self.coupon = None;
        self.recompute_totals();
    }

    /// Empties the cart, coupon included.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.coupon = None;
        self.recompute_totals();
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            coupon: self.coupon.clone(),
            saved_at: Utc::now(),
        }
    }

    /// Replaces the cart contents with a previously saved snapshot. The
    /// rules stay as constructed; totals are recomputed under them.
    pub fn restore(&mut self, snapshot: CartSnapshot) {
        self.lines = snapshot.lines;
        self.coupon = snapshot.coupon;
        self.recompute_totals();
    }

    fn recompute_totals(&mut self) {
        let item_count = self.lines.iter().map(|line| line.quantity).sum();
        let subtotal: Money = self.lines.iter().map(CartLine::line_total).sum();

        let vendors: BTreeSet<&str> = self
            .lines
            .iter()
            .map(|line| line.vendor_id.as_str())
            .collect();
        let shipping_fee = self.rules.per_vendor_fee * (vendors.len() as u32);

        // tax is charged on the pre-discount subtotal
        let tax_amount = subtotal.scale(self.rules.tax_rate);

        let discount_amount = match &self.coupon {
            Some(coupon) => match coupon.kind {
                CouponKind::Percentage => {
                    subtotal.scale(coupon.value as f64 / 100.0).min(subtotal)
                }
                CouponKind::Fixed => Money::new(coupon.value).min(subtotal),
            },
            None => Money::ZERO,
        };

        self.totals = CartTotals {
            item_count,
            subtotal,
            shipping_fee,
            tax_amount,
            discount_amount,
            grand_total: (subtotal + shipping_fee + tax_amount).saturating_sub(discount_amount),
        };
    }
}
