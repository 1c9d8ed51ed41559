//! # bounce-core: Checkout Pricing Engine
//!
//! Pure business logic of the rental checkout: how long a rental is, which
//! item gets the multi-item discount, what every line costs, which fees and
//! taxes apply, and whether the customer may move to the next step.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Bounce Checkout Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           Storefront / bounce-checkout CLI                      │   │
//! │  │   cart JSON ──► actions ──► quote ──► submit order              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bounce-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  rental  │ │ discount │ │ pricing  │ │ checkout         │  │   │
//! │  │   │ duration │ │ allocate │ │ fees/tax │ │ reducer + steps  │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐                      │   │
//! │  │   │validation│ │  order   │ │  money   │                      │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘                      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 bounce-db (Database Layer)                      │   │
//! │  │          catalog, orders, order items, PayPal records           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent money with half-up rounding
//! - [`types`] - Rental items, extras, mixers, customer, payment records
//! - [`config`] - Pricing constants passed in by the caller
//! - [`rental`] - Day count and duration classification
//! - [`discount`] - Multi-item discount allocation
//! - [`pricing`] - Line-item aggregation and the fee/tax calculator
//! - [`checkout`] - State, actions, reducer and the `Checkout` session
//! - [`validation`] - Step rules and the field error map
//! - [`order`] - Order drafts for the order-creation collaborator
//!
//! ## Example Usage
//!
//! ```rust
//! use bounce_core::checkout::{Checkout, CheckoutAction};
//! use bounce_core::config::PricingConfig;
//! use bounce_core::money::Money;
//! use bounce_core::types::RentalItem;
//!
//! let mut checkout = Checkout::new(PricingConfig::default()).unwrap();
//! checkout
//!     .dispatch(CheckoutAction::AddRentalItem {
//!         item: RentalItem::new("castle", "Castle Combo", Money::from_dollars(100)),
//!     })
//!     .unwrap();
//!
//! // $100.00 + 8.25% tax + 3% processing on the tax-inclusive amount
//! assert_eq!(checkout.breakdown().total_amount, Money::from_cents(11150));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod config;
pub mod discount;
pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod rental;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{apply_action, Checkout, CheckoutAction, CheckoutState, CheckoutStep, StepFlow};
pub use config::{PricingConfig, ProcessingFeeBase};
pub use discount::allocate_discounts;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{LineItemKind, OrderDraft, OrderLineItem};
pub use pricing::calculate_prices;
pub use rental::{calculate_rental_days, RentalDuration};
pub use types::*;
pub use validation::{validate_step, FieldErrors};
