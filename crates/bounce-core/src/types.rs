//! # Domain Types
//!
//! Core domain types used throughout the checkout.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   RentalItem    │   │   ExtraItem     │   │ MixerSelection  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, name       │   │  id, name       │   │  machine_id     │       │
//! │  │  price          │   │  price          │   │  tank (1-3)     │       │
//! │  │  discounted ◄── │   │  selected       │   │  mixer_id       │       │
//! │  │  (allocator)    │   │  quantity ≥ 1   │   │  price          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Rate       │   │ PaymentMethod   │   │ PriceBreakdown  │       │
//! │  │  bps (u32)      │   │  Paypal         │   │  subtotal, tax  │       │
//! │  │  825 = 8.25%    │   │  Cash           │   │  fees, total    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All DTOs serialize with camelCase field names to match the storefront.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::{Money, BPS_SCALE};

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 825 bps = 8.25% and 300 bps = 3%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True for rates between 0% and 100% inclusive.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 <= BPS_SCALE
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Rental Item
// =============================================================================

/// One bookable rental unit (a bounce house, a water slide, ...).
///
/// `discounted_price` is owned by the discount allocator and can only be read
/// from outside the crate. A freshly selected item starts at full price until
/// the allocator runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RentalItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Money,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub(crate) discounted_price: Money,
}

impl RentalItem {
    /// Creates a rental item at full price.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        RentalItem {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
            discounted_price: price,
        }
    }

    /// Price after the multi-item discount.
    #[inline]
    pub fn discounted_price(&self) -> Money {
        self.discounted_price
    }

    /// True when the allocator gave this item a reduced price.
    #[inline]
    pub fn is_discounted(&self) -> bool {
        self.discounted_price < self.price
    }
}

// =============================================================================
// Extra Item
// =============================================================================

/// An add-on product (tables & chairs, generator, slushy machine, ...).
///
/// ## Invariants
/// - `quantity >= 1`
/// - `quantity` only moves for the configured multi-unit extra
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExtraItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Money,
    #[serde(default)]
    pub selected: bool,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Display glyph shown next to the extra.
    #[serde(default)]
    pub icon: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

impl ExtraItem {
    /// Creates an unselected extra with quantity 1.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        ExtraItem {
            id: id.into(),
            name: name.into(),
            price,
            selected: false,
            quantity: 1,
            icon: None,
        }
    }

    /// Returns the same extra marked as selected.
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

// =============================================================================
// Slushy Mixer Selection
// =============================================================================

/// A mixer flavor bound to one tank of a slushy machine extra.
///
/// At most one selection exists per `(machine_id, tank)`. A mixer with id
/// `"none"` is kept for display but never priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MixerSelection {
    pub machine_id: String,
    pub tank: u8,
    pub mixer_id: String,
    pub mixer_name: String,
    #[serde(default)]
    pub price: Money,
}

/// Mixer id meaning "no mixer in this tank".
pub const NO_MIXER_ID: &str = "none";

/// Slushy machines have three tanks.
pub const MAX_MIXER_TANKS: u8 = 3;

impl MixerSelection {
    /// True when this selection contributes to the price.
    #[inline]
    pub fn is_priced(&self) -> bool {
        self.mixer_id != NO_MIXER_ID
    }
}

// =============================================================================
// Schedule
// =============================================================================

/// Whether the customer wants a guaranteed time window.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TimePreference {
    /// Any time during the day (no surcharge).
    #[default]
    Flexible,
    /// A specific time (surcharged per leg).
    Specific,
}

// =============================================================================
// Customer
// =============================================================================

/// Contact and delivery address entered on the details step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub notes: String,
}

/// Addressable customer fields for the `SetCustomerField` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum CustomerField {
    Name,
    Email,
    Phone,
    Address,
    City,
    State,
    ZipCode,
    Notes,
}

impl CustomerInfo {
    /// Sets one field by name.
    pub fn set(&mut self, field: CustomerField, value: String) {
        let slot = match field {
            CustomerField::Name => &mut self.name,
            CustomerField::Email => &mut self.email,
            CustomerField::Phone => &mut self.phone,
            CustomerField::Address => &mut self.address,
            CustomerField::City => &mut self.city,
            CustomerField::State => &mut self.state,
            CustomerField::ZipCode => &mut self.zip_code,
            CustomerField::Notes => &mut self.notes,
        };
        *slot = value;
    }
}

// =============================================================================
// Payment
// =============================================================================

/// How the customer pays.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Electronic payment; carries the processing fee.
    #[default]
    Paypal,
    /// Pay on delivery; no processing fee, no deposit.
    Cash,
}

impl PaymentMethod {
    /// True for methods that carry a processing fee.
    #[inline]
    pub fn is_electronic(&self) -> bool {
        matches!(self, PaymentMethod::Paypal)
    }
}

/// Payment progress.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Processing,
    Paid,
    Failed,
}

/// Order progress.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Paid,
    Cancelled,
}

/// A capture record returned by the PayPal collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaypalTransaction {
    pub transaction_id: String,
    /// PayPal's order id (not ours).
    pub paypal_order_id: String,
    #[serde(default)]
    pub payer_email: Option<String>,
    #[serde(default)]
    pub amount: Money,
    pub status: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Catalog
// =============================================================================

/// Catalog classification.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Rental,
    Extra,
    Mixer,
}

/// A product as served by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub kind: ProductKind,
    #[serde(default)]
    pub price: Money,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CatalogProduct {
    /// Rental item at full price.
    pub fn to_rental_item(&self) -> RentalItem {
        RentalItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            discounted_price: self.price,
        }
    }

    /// Unselected extra with quantity 1.
    pub fn to_extra_item(&self) -> ExtraItem {
        ExtraItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            selected: false,
            quantity: 1,
            icon: self.icon.clone(),
        }
    }
}

// =============================================================================
// Price Breakdown
// =============================================================================

/// The computed price summary shown on the review step.
///
/// Produced by [`calculate_prices`](crate::pricing::calculate_prices);
/// never edited by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Rental items after discount × day multiplier.
    pub bouncer_subtotal: Money,
    /// Selected extras and mixers × day multiplier.
    pub extras_total: Money,
    pub specific_time_charge: Money,
    pub delivery_fee: Money,
    pub overnight_fee: Money,
    pub subtotal: Money,
    pub tax_amount: Money,
    pub processing_fee: Money,
    pub discount_amount: Money,
    pub total_amount: Money,
    pub deposit_amount: Money,
    pub balance_due: Money,
    pub day_multiplier: u32,
    pub rental_days: i32,
}

// =============================================================================
// Unit Tests
// =============================================================================
