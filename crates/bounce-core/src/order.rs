//! # Order Draft
//!
//! What the order-creation endpoint receives once the wizard is complete:
//! a customer block, the schedule, one line per priced thing and the price
//! breakdown.
//!
//! ## Invariant
//! The line totals always add up to `prices.subtotal`; tax, processing,
//! discount and deposit are carried only in the breakdown.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::checkout::{CheckoutState, CheckoutStep};
use crate::config::PricingConfig;
use crate::discount::apply_discounts;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{billable_quantity, calculate_prices, is_covered_by_overnight_fee};
use crate::rental::RentalDuration;
use crate::types::{CustomerInfo, PaymentMethod, PriceBreakdown, TimePreference};
use crate::validation::{first_invalid_step, validate_step};

/// What a line item bills for.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    Rental,
    Extra,
    Mixer,
    Fee,
}

/// One billed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub kind: LineItemKind,
    /// Catalog id; `None` for fees.
    pub product_id: Option<String>,
    pub description: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub day_multiplier: u32,
    pub line_total: Money,
}

impl OrderLineItem {
    fn priced(
        kind: LineItemKind,
        product_id: Option<String>,
        description: String,
        unit_price: Money,
        quantity: u32,
        day_multiplier: u32,
    ) -> Self {
        OrderLineItem {
            kind,
            product_id,
            description,
            unit_price,
            quantity,
            day_multiplier,
            line_total: unit_price * quantity * day_multiplier,
        }
    }

    fn fee(description: &str, amount: Money) -> Self {
        Self::priced(LineItemKind::Fee, None, description.to_string(), amount, 1, 1)
    }
}

/// A validated checkout, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub customer: CustomerInfo,
    #[ts(as = "String")]
    pub delivery_date: NaiveDate,
    #[ts(as = "String")]
    pub pickup_date: NaiveDate,
    pub delivery_time: Option<String>,
    pub pickup_time: Option<String>,
    pub delivery_time_preference: TimePreference,
    pub pickup_time_preference: TimePreference,
    pub items: Vec<OrderLineItem>,
    pub prices: PriceBreakdown,
    pub payment_method: PaymentMethod,
    pub notes: String,
}

impl OrderDraft {
    /// Builds a draft from a checkout whose steps up to review all validate.
    pub fn from_checkout(state: &CheckoutState, config: &PricingConfig) -> CoreResult<Self> {
        if let Some((step, errors)) = first_invalid_step(CheckoutStep::Review, state, config) {
            return Err(CoreError::IncompleteCheckout {
                step: step.to_string(),
                errors,
            });
        }

        // flows without a schedule step still need dates
        let (Some(delivery_date), Some(pickup_date)) = (state.delivery_date, state.pickup_date)
        else {
            return Err(CoreError::IncompleteCheckout {
                step: CheckoutStep::Delivery.to_string(),
                errors: validate_step(CheckoutStep::Delivery, state, config),
            });
        };

        let prices = calculate_prices(state, config);
        let items = line_items(state, config);

        Ok(OrderDraft {
            customer: state.customer.clone(),
            delivery_date,
            pickup_date,
            delivery_time: specific_only(state.delivery_time_preference, &state.delivery_time),
            pickup_time: specific_only(state.pickup_time_preference, &state.pickup_time),
            delivery_time_preference: state.delivery_time_preference,
            pickup_time_preference: state.pickup_time_preference,
            items,
            prices,
            payment_method: state.payment_method,
            notes: state.customer.notes.clone(),
        })
    }

    /// Sum of all line totals.
    pub fn lines_total(&self) -> Money {
        self.items.iter().map(|item| item.line_total).sum()
    }

    pub fn rental_days(&self) -> i32 {
        self.prices.rental_days
    }
}

fn specific_only(preference: TimePreference, time: &Option<String>) -> Option<String> {
    match preference {
        TimePreference::Specific => time.clone(),
        TimePreference::Flexible => None,
    }
}

/// One line per rental item, selected extra, priced mixer and non-zero fee.
pub fn line_items(state: &CheckoutState, config: &PricingConfig) -> Vec<OrderLineItem> {
    let duration = RentalDuration::between(state.delivery_date, state.pickup_date);
    let multiplier = duration.multiplier();
    let mut lines = Vec::new();

    let mut rentals = state.rental_items.clone();
    apply_discounts(&mut rentals, config);
    for item in rentals {
        let description = if item.is_discounted() {
            format!("{} (multi-item discount)", item.name)
        } else {
            item.name.clone()
        };
        lines.push(OrderLineItem::priced(
            LineItemKind::Rental,
            Some(item.id.clone()),
            description,
            item.discounted_price(),
            1,
            multiplier,
        ));
    }

    for extra in state.selected_extras() {
        if is_covered_by_overnight_fee(extra, duration, config) {
            continue;
        }
        lines.push(OrderLineItem::priced(
            LineItemKind::Extra,
            Some(extra.id.clone()),
            extra.name.clone(),
            extra.price,
            billable_quantity(extra, config),
            multiplier,
        ));
    }

    for mixer in state.mixers.iter().filter(|m| m.is_priced()) {
        lines.push(OrderLineItem::priced(
            LineItemKind::Mixer,
            Some(mixer.mixer_id.clone()),
            format!("{} (tank {})", mixer.mixer_name, mixer.tank),
            mixer.price,
            1,
            multiplier,
        ));
    }

    let prices = calculate_prices(state, config);
    let fees = [
        ("Delivery fee", prices.delivery_fee),
        ("Specific time surcharge", prices.specific_time_charge),
        ("Overnight fee", prices.overnight_fee),
    ];
    lines.extend(
        fees.iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(description, amount)| OrderLineItem::fee(description, *amount)),
    );

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtraItem, MixerSelection, RentalItem};

    fn complete_state() -> CheckoutState {
        let mut state = CheckoutState::default();
        state.delivery_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        state.pickup_date = NaiveDate::from_ymd_opt(2024, 6, 2);
        state.customer.name = "Dana Rivera".into();
        state.customer.email = "dana@example.com".into();
        state.customer.address = "123 Main St".into();
        state.customer.city = "San Antonio".into();
        state.customer.state = "TX".into();
        state.customer.zip_code = "78209".into();
        state.customer.notes = "Gate code 4411".into();
        state.terms_agreed = true;
        state
            .rental_items
            .push(RentalItem::new("castle", "Castle Combo", Money::from_dollars(100)));
        state.extras = vec![
            ExtraItem::new("popcorn", "Popcorn Machine", Money::from_cents(4995)).selected(),
            ExtraItem::new("overnight", "Overnight", Money::from_dollars(50)).selected(),
        ];
        state
    }

    #[test]
    fn test_overnight_draft_lines() {
        let config = PricingConfig::default();
        let draft = OrderDraft::from_checkout(&complete_state(), &config).unwrap();

        let kinds: Vec<(LineItemKind, i64)> = draft
            .items
            .iter()
            .map(|l| (l.kind, l.line_total.cents()))
            .collect();
        assert_eq!(
            kinds,
            [
                (LineItemKind::Rental, 10000),
                (LineItemKind::Extra, 4995),
                (LineItemKind::Fee, 5000),
            ]
        );
        assert_eq!(draft.lines_total(), draft.prices.subtotal);
        assert_eq!(draft.prices.total_amount, Money::from_cents(22294));
        assert_eq!(draft.notes, "Gate code 4411");
    }

    #[test]
    fn test_multi_day_lines_sum_to_subtotal() {
        let config = PricingConfig {
            delivery_fee: Money::from_dollars(20),
            ..PricingConfig::default()
        };
        let mut state = complete_state();
        state.pickup_date = NaiveDate::from_ymd_opt(2024, 6, 4);
        state
            .rental_items
            .push(RentalItem::new("slide", "Water Slide", Money::from_cents(12999)));
        state.delivery_time_preference = TimePreference::Specific;
        state.delivery_time = Some("09:00".into());
        let mut tables = ExtraItem::new("tables-chairs", "Tables & Chairs", Money::from_dollars(15)).selected();
        tables.quantity = 3;
        state.extras.push(tables);
        state.extras.push(ExtraItem::new("slushy", "Slushy", Money::from_dollars(90)).selected());
        state.mixers.push(MixerSelection {
            machine_id: "slushy".into(),
            tank: 1,
            mixer_id: "cherry".into(),
            mixer_name: "Cherry".into(),
            price: Money::from_dollars(20),
        });

        let draft = OrderDraft::from_checkout(&state, &config).unwrap();
        assert_eq!(draft.lines_total(), draft.prices.subtotal);
        assert_eq!(draft.delivery_time.as_deref(), Some("09:00"));

        let castle = &draft.items[0];
        assert_eq!(castle.description, "Castle Combo (multi-item discount)");
        assert_eq!(castle.line_total, Money::from_cents(5000 * 3));

        let overnight_lines = draft
            .items
            .iter()
            .filter(|l| l.product_id.as_deref() == Some("overnight"))
            .count();
        assert_eq!(overnight_lines, 1, "overnight extra is priced on a 3-day rental");
    }

    #[test]
    fn test_incomplete_checkout_reports_first_step() {
        let mut state = complete_state();
        state.customer.email.clear();

        let err = OrderDraft::from_checkout(&state, &PricingConfig::default()).unwrap_err();
        match err {
            CoreError::IncompleteCheckout { step, errors } => {
                assert_eq!(step, "details");
                assert!(errors.contains("email"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
