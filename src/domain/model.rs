use crate::domain::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use uuid::Uuid;

/// Opaque cart line identifier, stable for the lifetime of a session.
pub type LineId = Uuid;

/// Price tables the pricing engine computes against. Keys are the catalog's
/// own string identifiers (e.g. "home-regular", "medium", "weekly").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceCatalog {
    #[serde(default)]
    pub base_prices: HashMap<String, Money>,
    #[serde(default)]
    pub size_multipliers: HashMap<String, f64>,
    #[serde(default)]
    pub frequency_discounts: HashMap<String, f64>,
    #[serde(default)]
    pub add_on_prices: HashMap<String, Money>,
}

/// Transient pricing input as the calculator and booking form produce it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuoteRequest {
    pub service_type: String,
    pub property_size: String,
    pub frequency: String,
    #[serde(default)]
    pub add_ons: BTreeSet<String>,
}

/// Derived price breakdown. Recomputed from scratch on every input change,
/// never persisted by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base_price: Money,
    pub size_adjusted_price: Money,
    pub add_on_total: Money,
    pub frequency_discount_amount: Money,
    pub total: Money,
    /// Catalog keys that silently fell back to a neutral default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<QuoteWarning>,
}

/// A catalog lookup that degraded to a neutral default instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuoteWarning {
    /// Property size not in the catalog; multiplier 1 was used.
    UnknownPropertySize { key: String },
    /// Frequency not in the catalog; multiplier 1 (no discount) was used.
    UnknownFrequency { key: String },
    /// Add-on not in the catalog; it contributed nothing to the total.
    UnknownAddOn { key: String },
}

impl fmt::Display for QuoteWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteWarning::UnknownPropertySize { key } => {
                write!(f, "unknown property size '{}' priced as standard", key)
            }
            QuoteWarning::UnknownFrequency { key } => {
                write!(f, "unknown frequency '{}' priced without discount", key)
            }
            QuoteWarning::UnknownAddOn { key } => {
                write!(f, "unknown add-on '{}' ignored", key)
            }
        }
    }
}

/// A product/variant entry in the cart. Uniqueness is on
/// `(product_id, variant_key)`; `id` is the session-stable handle mutating
/// operations address. `stock` rides along because quantity rules clamp
/// against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: LineId,
    pub product_id: String,
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_key: Option<String>,
    pub vendor_id: String,
    pub stock: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// Input for `add_item`; the cart assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartLine {
    pub product_id: String,
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_key: Option<String>,
    pub vendor_id: String,
    pub stock: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    Percentage,
    Fixed,
}

/// Single non-stacking discount against the cart subtotal. For
/// `Percentage` the value is the percent figure (10 = 10%); for `Fixed` it
/// is an amount in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub kind: CouponKind,
    pub value: u64,
}

/// Derived cart figures. Never edited directly; the cart recomputes them
/// after every mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub item_count: u32,
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub grand_total: Money,
}

/// Store-wide cart parameters: a flat shipping fee per distinct vendor in
/// the cart and the tax rate applied to the pre-discount subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartRules {
    pub per_vendor_fee: Money,
    pub tax_rate: f64,
}

impl Default for CartRules {
    fn default() -> Self {
        Self {
            per_vendor_fee: Money::ZERO,
            tax_rate: 0.0,
        }
    }
}

/// The cart reducer's operation alphabet, in application order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CartOp {
    AddItem {
        #[serde(flatten)]
        line: NewCartLine,
    },
    RemoveItem {
        id: LineId,
    },
    UpdateQuantity {
        id: LineId,
        quantity: u32,
    },
    ApplyCoupon {
        #[serde(flatten)]
        coupon: Coupon,
    },
    RemoveCoupon,
    Clear,
}

/// What a persistence adapter mirrors between visits: the line list
/// verbatim plus the active coupon. The core defines only this in-memory
/// shape, adapters choose the encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon: Option<Coupon>,
    pub saved_at: DateTime<Utc>,
}

/// The four linear wizard steps. `Submitted` is tracked by the wizard
/// itself, not as a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    PersonalInfo,
    ServiceDetails,
    Schedule,
    Payment,
}

impl CheckoutStep {
    pub const FIRST: CheckoutStep = CheckoutStep::PersonalInfo;
    pub const LAST: CheckoutStep = CheckoutStep::Payment;

    pub fn number(self) -> u8 {
        match self {
            CheckoutStep::PersonalInfo => 1,
            CheckoutStep::ServiceDetails => 2,
            CheckoutStep::Schedule => 3,
            CheckoutStep::Payment => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CheckoutStep::PersonalInfo => "Personal Info",
            CheckoutStep::ServiceDetails => "Service Details",
            CheckoutStep::Schedule => "Schedule & Requirements",
            CheckoutStep::Payment => "Payment & Confirmation",
        }
    }

    pub fn next(self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::PersonalInfo => Some(CheckoutStep::ServiceDetails),
            CheckoutStep::ServiceDetails => Some(CheckoutStep::Schedule),
            CheckoutStep::Schedule => Some(CheckoutStep::Payment),
            CheckoutStep::Payment => None,
        }
    }

    pub fn previous(self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::PersonalInfo => None,
            CheckoutStep::ServiceDetails => Some(CheckoutStep::PersonalInfo),
            CheckoutStep::Schedule => Some(CheckoutStep::ServiceDetails),
            CheckoutStep::Payment => Some(CheckoutStep::Schedule),
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/4)", self.title(), self.number())
    }
}

/// Everything the four steps collect. Text fields default to empty and
/// count as missing until non-blank; there is no validation engine beyond
/// presence, matching the form this replaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    // step 1
    pub full_name: String,
    pub email: String,
    pub phone: String,
    // step 2
    pub service_type: String,
    pub property_size: String,
    pub frequency: String,
    #[serde(default)]
    pub add_ons: BTreeSet<String>,
    // step 3
    pub preferred_date: String,
    pub preferred_time: String,
    pub notes: String,
    // step 4
    pub payment_method: String,
    pub terms_accepted: bool,
}

impl CheckoutForm {
    /// The pricing input the service-details step currently describes.
    pub fn service_request(&self) -> PriceQuoteRequest {
        PriceQuoteRequest {
            service_type: self.service_type.clone(),
            property_size: self.property_size.clone(),
            frequency: self.frequency.clone(),
            add_ons: self.add_ons.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInfo {
    pub preferred_date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub preferred_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// Opaque payload handed to a checkout gateway. Accepted or rejected
/// atomically; no partial submission state exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSubmission {
    pub contact: ContactInfo,
    pub service: PriceQuoteRequest,
    pub schedule: ScheduleInfo,
    pub payment_method: String,
    pub quote: PriceQuote,
}

/// What a gateway answers on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub booking_id: Uuid,
    pub confirmed_at: DateTime<Utc>,
}
