//! # Error Types
//!
//! Domain-specific error types for bounce-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bounce-core errors (this file)                                        │
//! │  ├── CoreError        - Reducer / configuration failures               │
//! │  └── ValidationError  - Field rule failures (step validator)           │
//! │                                                                         │
//! │  bounce-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Missing customer data, an empty cart or a pickup date before delivery are
//! expected while the wizard is being filled in. They surface as entries in
//! the step validator's [`FieldErrors`](crate::validation::FieldErrors) map,
//! never as `Err`.

use thiserror::Error;

use crate::validation::FieldErrors;

// =============================================================================
// Core Error
// =============================================================================

/// Core checkout errors.
///
/// Returned when an action references something that does not exist or
/// breaks a hard limit. The state is left untouched when one is returned.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Adding another rental item would exceed the configured maximum.
    #[error("Cart cannot have more than {max} rental items")]
    TooManyRentalItems { max: usize },

    /// Rental item is already in the cart.
    #[error("Rental item already selected: {0}")]
    DuplicateRentalItem(String),

    /// Rental item is not in the cart.
    #[error("Rental item not in cart: {0}")]
    RentalItemNotFound(String),

    /// Extra is not part of the loaded extras list.
    #[error("Extra not found: {0}")]
    ExtraNotFound(String),

    /// Quantity can only be changed on the multi-unit extra.
    #[error("Quantity of extra {0} is fixed at 1")]
    QuantityNotAdjustable(String),

    /// Slushy machines have tanks 1 through 3.
    #[error("Invalid tank number {tank}: must be between 1 and {max}")]
    InvalidTank { tank: u8, max: u8 },

    /// Mixer references a machine that is not a selected extra.
    #[error("Mixer machine {0} is not a selected extra")]
    MachineNotSelected(String),

    /// The step is not part of the configured step list.
    #[error("Step {0} is not part of this checkout flow")]
    StepNotInFlow(String),

    /// A calendar date did not have the `YYYY-MM-DD` shape.
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// A money amount could not be parsed.
    #[error("Invalid amount '{value}'")]
    InvalidMoney { value: String },

    /// Configuration is not usable.
    #[error("Invalid pricing configuration: {0}")]
    InvalidConfig(String),

    /// An order draft was requested before the wizard validated.
    #[error("Checkout is incomplete at step {step}: {errors}")]
    IncompleteCheckout { step: String, errors: FieldErrors },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field rule failures.
///
/// The `Display` text is exactly the message shown under the form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (email, phone, time of day).
    #[error("Please enter a valid {field}")]
    InvalidFormat { field: String },

    /// Value is not in the allowed set.
    #[error("{message}")]
    NotAllowed { message: String },

    /// Ordering rule between two fields.
    #[error("{later} must be after {earlier}")]
    MustBeAfter { later: String, earlier: String },

    /// Cart has neither rental items nor extras.
    #[error("Please select at least one rental item or extra")]
    EmptyCart,

    /// Terms have not been accepted.
    #[error("You must agree to the terms and conditions")]
    TermsNotAccepted,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
