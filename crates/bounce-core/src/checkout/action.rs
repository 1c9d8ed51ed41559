//! Actions accepted by the checkout reducer.
//!
//! Serialized as `{"type": "ADD_RENTAL_ITEM", ...fields}` so the web
//! storefront can send the same action objects it dispatches locally.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::checkout::CheckoutStep;
use crate::money::Money;
use crate::types::{
    CustomerField, ExtraItem, MixerSelection, PaymentMethod, PaypalTransaction, RentalItem,
    TimePreference,
};
use crate::validation::FieldErrors;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutAction {
    // Rental items
    AddRentalItem { item: RentalItem },
    RemoveRentalItem { id: String },
    ClearRentalItems,

    // Schedule
    SetDeliveryDate {
        #[ts(as = "Option<String>")]
        date: Option<NaiveDate>,
    },
    SetPickupDate {
        #[ts(as = "Option<String>")]
        date: Option<NaiveDate>,
    },
    SetDeliveryTime { time: Option<String> },
    SetPickupTime { time: Option<String> },
    SetDeliveryTimePreference { preference: TimePreference },
    SetPickupTimePreference { preference: TimePreference },

    // Extras and mixers
    SetExtras { extras: Vec<ExtraItem> },
    ToggleExtra { id: String },
    IncrementExtraQuantity { id: String },
    DecrementExtraQuantity { id: String },
    SelectMixer { selection: MixerSelection },
    ClearMixer {
        #[serde(rename = "machineId")]
        machine_id: String,
        tank: u8,
    },

    // Customer and payment
    SetCustomerField { field: CustomerField, value: String },
    SetPaymentMethod { method: PaymentMethod },
    SetDepositAmount { amount: Money },
    ApplyDiscount { amount: Money },
    SetTermsAgreed { agreed: bool },
    SetLoading { loading: bool },

    // Navigation
    NextStep,
    PreviousStep,
    GoToStep { step: CheckoutStep },
    SetErrors { errors: FieldErrors },
    ClearErrors,

    // Submission
    OrderSubmitted {
        #[serde(rename = "orderId")]
        order_id: String,
    },
    PaymentSucceeded { transaction: PaypalTransaction },
    PaymentFailed { message: String },
    OrderFailed { message: String },
    Reset,
}

impl CheckoutAction {
    /// Action type as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutAction::AddRentalItem { .. } => "ADD_RENTAL_ITEM",
            CheckoutAction::RemoveRentalItem { .. } => "REMOVE_RENTAL_ITEM",
            CheckoutAction::ClearRentalItems => "CLEAR_RENTAL_ITEMS",
            CheckoutAction::SetDeliveryDate { .. } => "SET_DELIVERY_DATE",
            CheckoutAction::SetPickupDate { .. } => "SET_PICKUP_DATE",
            CheckoutAction::SetDeliveryTime { .. } => "SET_DELIVERY_TIME",
            CheckoutAction::SetPickupTime { .. } => "SET_PICKUP_TIME",
            CheckoutAction::SetDeliveryTimePreference { .. } => "SET_DELIVERY_TIME_PREFERENCE",
            CheckoutAction::SetPickupTimePreference { .. } => "SET_PICKUP_TIME_PREFERENCE",
            CheckoutAction::SetExtras { .. } => "SET_EXTRAS",
            CheckoutAction::ToggleExtra { .. } => "TOGGLE_EXTRA",
            CheckoutAction::IncrementExtraQuantity { .. } => "INCREMENT_EXTRA_QUANTITY",
            CheckoutAction::DecrementExtraQuantity { .. } => "DECREMENT_EXTRA_QUANTITY",
            CheckoutAction::SelectMixer { .. } => "SELECT_MIXER",
            CheckoutAction::ClearMixer { .. } => "CLEAR_MIXER",
            CheckoutAction::SetCustomerField { .. } => "SET_CUSTOMER_FIELD",
            CheckoutAction::SetPaymentMethod { .. } => "SET_PAYMENT_METHOD",
            CheckoutAction::SetDepositAmount { .. } => "SET_DEPOSIT_AMOUNT",
            CheckoutAction::ApplyDiscount { .. } => "APPLY_DISCOUNT",
            CheckoutAction::SetTermsAgreed { .. } => "SET_TERMS_AGREED",
            CheckoutAction::SetLoading { .. } => "SET_LOADING",
            CheckoutAction::NextStep => "NEXT_STEP",
            CheckoutAction::PreviousStep => "PREVIOUS_STEP",
            CheckoutAction::GoToStep { .. } => "GO_TO_STEP",
            CheckoutAction::SetErrors { .. } => "SET_ERRORS",
            CheckoutAction::ClearErrors => "CLEAR_ERRORS",
            CheckoutAction::OrderSubmitted { .. } => "ORDER_SUBMITTED",
            CheckoutAction::PaymentSucceeded { .. } => "PAYMENT_SUCCEEDED",
            CheckoutAction::PaymentFailed { .. } => "PAYMENT_FAILED",
            CheckoutAction::OrderFailed { .. } => "ORDER_FAILED",
            CheckoutAction::Reset => "RESET",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let action: CheckoutAction = serde_json::from_str(
            r#"{"type": "SET_DELIVERY_DATE", "date": "2024-06-01"}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            CheckoutAction::SetDeliveryDate {
                date: NaiveDate::from_ymd_opt(2024, 6, 1)
            }
        );

        let action: CheckoutAction =
            serde_json::from_str(r#"{"type": "CLEAR_MIXER", "machineId": "slushy", "tank": 2}"#)
                .unwrap();
        assert_eq!(action.name(), "CLEAR_MIXER");

        let json = serde_json::to_string(&CheckoutAction::NextStep).unwrap();
        assert_eq!(json, r#"{"type":"NEXT_STEP"}"#);
    }

    #[test]
    fn test_name_matches_serialized_tag() {
        let actions = [
            CheckoutAction::ToggleExtra { id: "generator".into() },
            CheckoutAction::GoToStep { step: CheckoutStep::Review },
            CheckoutAction::Reset,
        ];
        for action in actions {
            let value = serde_json::to_value(&action).unwrap();
            assert_eq!(value["type"], action.name());
        }
    }
}
