//! # Checkout State Machine
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ Checkout                                                              │
//! │  ├── config: PricingConfig   (passed in, never read from globals)    │
//! │  └── state:  CheckoutState                                           │
//! │                                                                      │
//! │  dispatch(action) ──► reducer::apply_action ──► prices recomputed    │
//! │  advance()        ──► validate current step ──► errors | next step   │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The raw `NextStep` action moves unconditionally; [`Checkout::advance`] is
//! the gated forward move the UI uses.

mod action;
mod reducer;
mod state;
mod step;

pub use action::CheckoutAction;
pub use reducer::apply_action;
pub use state::CheckoutState;
pub use step::{CheckoutStep, StepFlow};

use tracing::debug;

use crate::config::PricingConfig;
use crate::error::CoreResult;
use crate::types::{PriceBreakdown, RentalItem};
use crate::validation::{validate_step, FieldErrors};

/// A checkout session bound to one pricing configuration.
#[derive(Debug, Clone)]
pub struct Checkout {
    config: PricingConfig,
    state: CheckoutState,
}

impl Checkout {
    /// Starts an empty checkout. Fails if the configuration is unusable.
    pub fn new(config: PricingConfig) -> CoreResult<Self> {
        config.validate()?;
        let state = CheckoutState::new(&config);
        Ok(Checkout { config, state })
    }

    /// Resumes from a saved state, recomputing derived fields.
    ///
    /// Rejects states the reducer could never have produced: too many or
    /// duplicate rental items, mixers on an unselected machine or a missing
    /// tank, a step outside the flow.
    pub fn from_state(config: PricingConfig, mut state: CheckoutState) -> CoreResult<Self> {
        config.validate()?;
        reducer::check_state(&state, &config)?;
        reducer::refresh_derived(&mut state, &config);
        Ok(Checkout { config, state })
    }

    /// Applies one action. On error the state is unchanged.
    pub fn dispatch(&mut self, action: CheckoutAction) -> CoreResult<()> {
        self.state = apply_action(&self.state, action, &self.config)?;
        Ok(())
    }

    /// Validates the current step without touching the state.
    pub fn validate_current(&self) -> FieldErrors {
        validate_step(self.state.current_step, &self.state, &self.config)
    }

    /// Moves forward if the current step validates.
    ///
    /// Returns `true` when the step changed (or the flow is already on its
    /// last step and valid). On failure the errors are stored in the state.
    pub fn advance(&mut self) -> CoreResult<bool> {
        let errors = self.validate_current();
        if !errors.is_empty() {
            debug!(
                step = %self.state.current_step,
                errors = errors.len(),
                "Step blocked by validation"
            );
            self.dispatch(CheckoutAction::SetErrors { errors })?;
            return Ok(false);
        }

        self.dispatch(CheckoutAction::NextStep)?;
        Ok(true)
    }

    pub fn breakdown(&self) -> &PriceBreakdown {
        &self.state.prices
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn into_state(self) -> CheckoutState {
        self.state
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn current_step(&self) -> CheckoutStep {
        self.state.current_step
    }

    /// Single-item view of the cart (the full-price item).
    pub fn primary_rental_item(&self) -> Option<&RentalItem> {
        self.state.primary_rental_item()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::money::Money;
    use crate::types::{CustomerField, ExtraItem, MixerSelection};
    use crate::validation::fields;
    use chrono::NaiveDate;

    fn checkout() -> Checkout {
        Checkout::new(PricingConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = PricingConfig {
            max_rental_items: 0,
            ..PricingConfig::default()
        };
        assert!(Checkout::new(config).is_err());
    }

    #[test]
    fn test_advance_blocked_by_validation() {
        let mut checkout = checkout();
        assert!(!checkout.advance().unwrap());
        assert_eq!(checkout.current_step(), CheckoutStep::Delivery);
        assert!(checkout.state().errors.contains(fields::DELIVERY_DATE));
    }

    #[test]
    fn test_full_walk_through() {
        let mut checkout = checkout();
        let d = NaiveDate::from_ymd_opt(2024, 6, 1);
        let p = NaiveDate::from_ymd_opt(2024, 6, 2);

        checkout.dispatch(CheckoutAction::SetDeliveryDate { date: d }).unwrap();
        checkout.dispatch(CheckoutAction::SetPickupDate { date: p }).unwrap();
        assert!(checkout.advance().unwrap());
        assert_eq!(checkout.current_step(), CheckoutStep::Details);

        for (field, value) in [
            (CustomerField::Name, "Dana Rivera"),
            (CustomerField::Email, "dana@example.com"),
            (CustomerField::Address, "123 Main St"),
            (CustomerField::City, "San Antonio"),
            (CustomerField::State, "TX"),
            (CustomerField::ZipCode, "78209"),
        ] {
            checkout
                .dispatch(CheckoutAction::SetCustomerField {
                    field,
                    value: value.to_string(),
                })
                .unwrap();
        }
        assert!(checkout.advance().unwrap());

        // extras step: empty cart blocks
        assert!(!checkout.advance().unwrap());
        assert!(checkout.state().errors.contains(fields::CART));

        checkout
            .dispatch(CheckoutAction::SetExtras {
                extras: vec![ExtraItem::new("generator", "Generator", Money::from_dollars(75))],
            })
            .unwrap();
        checkout
            .dispatch(CheckoutAction::ToggleExtra {
                id: "generator".into(),
            })
            .unwrap();
        assert!(checkout.advance().unwrap());
        assert!(checkout.state().errors.is_empty());
        assert_eq!(checkout.current_step(), CheckoutStep::Review);

        checkout.dispatch(CheckoutAction::SetTermsAgreed { agreed: true }).unwrap();
        assert!(checkout.advance().unwrap());
        assert_eq!(checkout.current_step(), CheckoutStep::Payment);

        // 75 generator + 50 overnight surcharge
        assert_eq!(checkout.breakdown().subtotal, Money::from_dollars(125));
    }

    #[test]
    fn test_from_state_recomputes() {
        let mut state = CheckoutState::default();
        state
            .rental_items
            .push(RentalItem::new("castle", "Castle", Money::from_dollars(100)));

        let checkout = Checkout::from_state(PricingConfig::default(), state).unwrap();
        assert_eq!(checkout.breakdown().subtotal, Money::from_dollars(100));
        assert_eq!(checkout.primary_rental_item().map(|i| i.id.as_str()), Some("castle"));
    }

    #[test]
    fn test_from_state_enforces_item_limit() {
        let mut state = CheckoutState::default();
        for id in ["a", "b", "c", "d"] {
            state
                .rental_items
                .push(RentalItem::new(id, id, Money::from_dollars(100)));
        }

        let err = Checkout::from_state(PricingConfig::default(), state).unwrap_err();
        assert!(matches!(err, CoreError::TooManyRentalItems { max: 3 }));
    }

    #[test]
    fn test_from_state_rejects_duplicate_items() {
        let mut state = CheckoutState::default();
        state.rental_items = vec![
            RentalItem::new("castle", "Castle", Money::from_dollars(100)),
            RentalItem::new("castle", "Castle", Money::from_dollars(100)),
        ];

        let err = Checkout::from_state(PricingConfig::default(), state).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateRentalItem(ref id) if id == "castle"));
    }

    #[test]
    fn test_from_state_rejects_orphan_mixers() {
        let mut state = CheckoutState::default();
        state.extras = vec![ExtraItem::new("slushy", "Slushy", Money::from_dollars(90))];
        state.mixers.push(MixerSelection {
            machine_id: "slushy".into(),
            tank: 1,
            mixer_id: "cherry".into(),
            mixer_name: "Cherry".into(),
            price: Money::from_dollars(20),
        });

        let err = Checkout::from_state(PricingConfig::default(), state.clone()).unwrap_err();
        assert!(matches!(err, CoreError::MachineNotSelected(_)));

        state.extras[0].selected = true;
        state.mixers[0].tank = 4;
        let err = Checkout::from_state(PricingConfig::default(), state).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTank { tank: 4, .. }));
    }

    #[test]
    fn test_from_state_rejects_step_outside_flow() {
        let state = CheckoutState {
            current_step: CheckoutStep::Selection,
            ..CheckoutState::default()
        };
        let err = Checkout::from_state(PricingConfig::default(), state).unwrap_err();
        assert!(matches!(err, CoreError::StepNotInFlow(_)));
    }
}
