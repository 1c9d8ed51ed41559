//! The checkout aggregate root.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::checkout::CheckoutStep;
use crate::config::PricingConfig;
use crate::money::Money;
use crate::types::{
    CustomerInfo, ExtraItem, MixerSelection, OrderStatus, PaymentMethod, PaymentStatus,
    PaypalTransaction, PriceBreakdown, RentalItem, TimePreference,
};
use crate::validation::FieldErrors;

/// Everything the wizard knows about one checkout session.
///
/// `prices` and `specific_time_charge` are derived; the reducer rewrites
/// them after every action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutState {
    pub current_step: CheckoutStep,

    // Cart
    pub rental_items: Vec<RentalItem>,
    pub extras: Vec<ExtraItem>,
    pub mixers: Vec<MixerSelection>,

    // Schedule
    #[ts(as = "Option<String>")]
    pub delivery_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub pickup_date: Option<NaiveDate>,
    pub delivery_time: Option<String>,
    pub pickup_time: Option<String>,
    pub delivery_time_preference: TimePreference,
    pub pickup_time_preference: TimePreference,
    pub specific_time_charge: Money,

    pub customer: CustomerInfo,

    // Money
    pub prices: PriceBreakdown,
    pub payment_method: PaymentMethod,
    pub deposit_amount: Money,
    pub discount_amount: Money,

    // Submission
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub paypal_transactions: Vec<PaypalTransaction>,
    pub order_id: Option<String>,
    pub payment_error: Option<String>,
    pub order_error: Option<String>,

    pub errors: FieldErrors,
    pub is_loading: bool,
    pub terms_agreed: bool,
    pub is_complete: bool,
}

impl Default for CheckoutState {
    fn default() -> Self {
        CheckoutState::new(&PricingConfig::default())
    }
}

impl CheckoutState {
    /// Empty checkout positioned on the first configured step.
    pub fn new(config: &PricingConfig) -> Self {
        CheckoutState {
            current_step: config.steps.first().unwrap_or(CheckoutStep::Delivery),
            rental_items: Vec::new(),
            extras: Vec::new(),
            mixers: Vec::new(),
            delivery_date: None,
            pickup_date: None,
            delivery_time: None,
            pickup_time: None,
            delivery_time_preference: TimePreference::Flexible,
            pickup_time_preference: TimePreference::Flexible,
            specific_time_charge: Money::zero(),
            customer: CustomerInfo::default(),
            prices: PriceBreakdown::default(),
            payment_method: PaymentMethod::default(),
            deposit_amount: Money::zero(),
            discount_amount: Money::zero(),
            payment_status: PaymentStatus::default(),
            order_status: OrderStatus::default(),
            paypal_transactions: Vec::new(),
            order_id: None,
            payment_error: None,
            order_error: None,
            errors: FieldErrors::new(),
            is_loading: false,
            terms_agreed: false,
            is_complete: false,
        }
    }

    /// The highest-priced rental item (first selected on ties).
    pub fn primary_rental_item(&self) -> Option<&RentalItem> {
        self.rental_items
            .iter()
            .reduce(|best, item| if item.price > best.price { item } else { best })
    }

    pub fn rental_item(&self, id: &str) -> Option<&RentalItem> {
        self.rental_items.iter().find(|item| item.id == id)
    }

    pub fn extra(&self, id: &str) -> Option<&ExtraItem> {
        self.extras.iter().find(|extra| extra.id == id)
    }

    pub fn selected_extras(&self) -> impl Iterator<Item = &ExtraItem> {
        self.extras.iter().filter(|extra| extra.selected)
    }
}
