//! # Cart Requests
//!
//! The JSON document `quote` and `submit` read: a whole cart at once, the
//! way the storefront's review page holds it.
//!
//! ```json
//! {
//!   "rentalItems": [{ "id": "castle-combo", "name": "Castle Combo", "price": 19995 }],
//!   "extras": [{ "id": "popcorn", "name": "Popcorn Machine", "price": 4995, "selected": true }],
//!   "deliveryDate": "2024-06-01",
//!   "pickupDate": "2024-06-02",
//!   "customer": { "name": "Dana Rivera", "email": "dana@example.com", ... },
//!   "paymentMethod": "paypal",
//!   "termsAgreed": true
//! }
//! ```
//!
//! The request is replayed through the reducer action by action, so every
//! cart rule (item limit, duplicate items, overnight extra sync, mixer
//! checks) applies exactly as it does in the wizard.

use bounce_core::rental::parse_calendar_date;
use bounce_core::{
    Checkout, CheckoutAction, CustomerField, CustomerInfo, ExtraItem, MixerSelection, Money,
    PaymentMethod, PricingConfig, RentalItem, TimePreference,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartRequest {
    pub rental_items: Vec<RentalItem>,
    pub extras: Vec<ExtraItem>,
    pub mixers: Vec<MixerSelection>,
    pub delivery_date: Option<String>,
    pub pickup_date: Option<String>,
    pub delivery_time: Option<String>,
    pub pickup_time: Option<String>,
    pub delivery_time_preference: TimePreference,
    pub pickup_time_preference: TimePreference,
    pub customer: CustomerInfo,
    pub payment_method: PaymentMethod,
    pub deposit_amount: Option<Money>,
    pub discount_amount: Option<Money>,
    pub terms_agreed: bool,
}

impl CartRequest {
    pub fn from_json(json: &str) -> CliResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The action sequence that builds this cart from an empty checkout.
    pub fn actions(&self) -> CliResult<Vec<CheckoutAction>> {
        let mut actions = Vec::new();

        for item in &self.rental_items {
            actions.push(CheckoutAction::AddRentalItem { item: item.clone() });
        }

        // extras before dates so the date actions can sync the overnight extra
        actions.push(CheckoutAction::SetExtras {
            extras: self.extras.clone(),
        });

        let delivery = parse_optional_date(self.delivery_date.as_deref())?;
        let pickup = parse_optional_date(self.pickup_date.as_deref())?;
        actions.push(CheckoutAction::SetDeliveryDate { date: delivery });
        actions.push(CheckoutAction::SetPickupDate { date: pickup });

        actions.push(CheckoutAction::SetDeliveryTimePreference {
            preference: self.delivery_time_preference,
        });
        actions.push(CheckoutAction::SetPickupTimePreference {
            preference: self.pickup_time_preference,
        });
        actions.push(CheckoutAction::SetDeliveryTime {
            time: self.delivery_time.clone(),
        });
        actions.push(CheckoutAction::SetPickupTime {
            time: self.pickup_time.clone(),
        });

        for selection in &self.mixers {
            actions.push(CheckoutAction::SelectMixer {
                selection: selection.clone(),
            });
        }

        let customer = &self.customer;
        for (field, value) in [
            (CustomerField::Name, &customer.name),
            (CustomerField::Email, &customer.email),
            (CustomerField::Phone, &customer.phone),
            (CustomerField::Address, &customer.address),
            (CustomerField::City, &customer.city),
            (CustomerField::State, &customer.state),
            (CustomerField::ZipCode, &customer.zip_code),
            (CustomerField::Notes, &customer.notes),
        ] {
            actions.push(CheckoutAction::SetCustomerField {
                field,
                value: value.clone(),
            });
        }

        actions.push(CheckoutAction::SetPaymentMethod {
            method: self.payment_method,
        });
        if let Some(amount) = self.deposit_amount {
            actions.push(CheckoutAction::SetDepositAmount { amount });
        }
        if let Some(amount) = self.discount_amount {
            actions.push(CheckoutAction::ApplyDiscount { amount });
        }
        actions.push(CheckoutAction::SetTermsAgreed {
            agreed: self.terms_agreed,
        });

        Ok(actions)
    }

    /// Builds a checkout holding this cart.
    pub fn into_checkout(self, config: PricingConfig) -> CliResult<Checkout> {
        let actions = self.actions()?;
        let mut checkout = Checkout::new(config)?;

        debug!(actions = actions.len(), "Building checkout from cart request");
        for action in actions {
            checkout.dispatch(action)?;
        }

        Ok(checkout)
    }
}

fn parse_optional_date(value: Option<&str>) -> CliResult<Option<chrono::NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_calendar_date(raw).map(Some).map_err(CliError::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounce_core::CoreError;

    const REFERENCE_CART: &str = r#"{
        "rentalItems": [{ "id": "castle", "name": "Castle Combo", "price": 10000 }],
        "extras": [
            { "id": "popcorn", "name": "Popcorn Machine", "price": 4995, "selected": true },
            { "id": "overnight", "name": "Overnight", "price": 5000 }
        ],
        "deliveryDate": "2024-06-01",
        "pickupDate": "2024-06-02",
        "customer": {
            "name": "Dana Rivera",
            "email": "dana@example.com",
            "address": "123 Main St",
            "city": "San Antonio",
            "state": "TX",
            "zipCode": "78209"
        },
        "termsAgreed": true
    }"#;

    #[test]
    fn test_reference_cart_quote() {
        let cart = CartRequest::from_json(REFERENCE_CART).unwrap();
        let checkout = cart.into_checkout(PricingConfig::default()).unwrap();
        let prices = checkout.breakdown();

        assert_eq!(prices.subtotal, Money::from_cents(19995));
        assert_eq!(prices.tax_amount, Money::from_cents(1650));
        assert_eq!(prices.processing_fee, Money::from_cents(649));
        assert_eq!(prices.total_amount, Money::from_cents(22294));

        // overnight extra was auto-selected by the date actions
        let overnight = checkout.state().extra("overnight").unwrap();
        assert!(overnight.selected);
    }

    #[test]
    fn test_cart_rules_apply() {
        let cart = CartRequest::from_json(
            r#"{ "rentalItems": [
                { "id": "a", "name": "A", "price": 100 },
                { "id": "a", "name": "A", "price": 100 }
            ] }"#,
        )
        .unwrap();

        let err = cart.into_checkout(PricingConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Core(CoreError::DuplicateRentalItem(_))));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let cart = CartRequest {
            delivery_date: Some("06/01/2024".into()),
            ..CartRequest::default()
        };
        assert!(matches!(
            cart.actions(),
            Err(CliError::Core(CoreError::InvalidDate { .. }))
        ));
    }

    #[test]
    fn test_empty_dates_are_unset() {
        let cart = CartRequest {
            delivery_date: Some("  ".into()),
            ..CartRequest::default()
        };
        let checkout = cart.into_checkout(PricingConfig::default()).unwrap();
        assert!(checkout.state().delivery_date.is_none());
    }
}
