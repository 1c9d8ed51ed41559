//! # Step Validation
//!
//! Pure predicates that decide whether the wizard may move past a step.
//!
//! ## Rules per Step
//! ```text
//! ┌─────────────────────┬───────────────────────────────────────────────────┐
//! │ delivery / datetime │ dates required, times required when "specific",   │
//! │                     │ pickup after delivery                             │
//! │ details             │ name, email, address, city, state, served ZIP;    │
//! │                     │ phone optional but well-formed                    │
//! │ extras              │ at least one rental item or selected extra        │
//! │ review              │ terms accepted                                    │
//! │ selection, payment  │ nothing                                           │
//! └─────────────────────┴───────────────────────────────────────────────────┘
//! ```
//!
//! Validation never mutates state and never returns `Err`; a failing rule is
//! an entry in the returned [`FieldErrors`] map, keyed by the camelCase field
//! name the form uses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use ts_rs::TS;

use crate::checkout::{CheckoutState, CheckoutStep};
use crate::config::PricingConfig;
use crate::error::ValidationError;
use crate::types::TimePreference;

// =============================================================================
// Field Keys
// =============================================================================

/// Keys used in the error map.
pub mod fields {
    pub const DELIVERY_DATE: &str = "deliveryDate";
    pub const DELIVERY_TIME: &str = "deliveryTime";
    pub const PICKUP_DATE: &str = "pickupDate";
    pub const PICKUP_TIME: &str = "pickupTime";
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const ZIP_CODE: &str = "zipCode";
    pub const CART: &str = "cart";
    pub const TERMS: &str = "termsAgreed";
}

// =============================================================================
// Field Errors
// =============================================================================

/// Field name → user-facing message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors(BTreeMap::new())
    }

    /// Records a rule failure. The first failure per field wins.
    pub fn add(&mut self, field: &str, error: ValidationError) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| error.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

impl FromIterator<(String, String)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        FieldErrors(iter.into_iter().collect())
    }
}

// =============================================================================
// Format Rules
// =============================================================================

// Patterns are literals; a pattern that fails to compile matches nothing.
static EMAIL_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// US phone: `2105551234`, `210-555-1234`, `(210) 555-1234`, `210.555.1234`.
static PHONE_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(\+?1[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}$").ok());

static ZIP_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").ok());

/// 24-hour `HH:MM`.
static TIME_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").ok());

fn matches(pattern: &Lazy<Option<Regex>>, value: &str) -> bool {
    pattern
        .as_ref()
        .map(|re| re.is_match(value.trim()))
        .unwrap_or(false)
}

pub fn is_valid_email(email: &str) -> bool {
    matches(&EMAIL_RE, email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    matches(&PHONE_RE, phone)
}

pub fn is_valid_zip(zip: &str) -> bool {
    matches(&ZIP_RE, zip)
}

pub fn is_valid_time(time: &str) -> bool {
    matches(&TIME_RE, time)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

fn invalid(field: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
    }
}

// =============================================================================
// Step Rules
// =============================================================================

/// Validates one step against the current state.
pub fn validate_step(step: CheckoutStep, state: &CheckoutState, config: &PricingConfig) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match step {
        CheckoutStep::Delivery | CheckoutStep::Datetime => validate_schedule(state, &mut errors),
        CheckoutStep::Details => validate_details(state, config, &mut errors),
        CheckoutStep::Extras => validate_cart(state, config, &mut errors),
        CheckoutStep::Review => {
            if !state.terms_agreed {
                errors.add(fields::TERMS, ValidationError::TermsNotAccepted);
            }
        }
        CheckoutStep::Selection | CheckoutStep::Payment => {}
    }

    errors
}

/// Validates every step of the flow up to and including `through`.
///
/// Returns the first step that fails together with its errors.
pub fn first_invalid_step(
    through: CheckoutStep,
    state: &CheckoutState,
    config: &PricingConfig,
) -> Option<(CheckoutStep, FieldErrors)> {
    config
        .steps
        .steps_before(through)
        .iter()
        .copied()
        .chain(std::iter::once(through))
        .map(|step| (step, validate_step(step, state, config)))
        .find(|(_, errors)| !errors.is_empty())
}

/// Returns a time only when the leg asks for a specific, well-formed one.
fn specific_time(preference: TimePreference, time: Option<&str>) -> Option<&str> {
    match (preference, time) {
        (TimePreference::Specific, Some(t)) if is_valid_time(t) => Some(t.trim()),
        _ => None,
    }
}

fn validate_time_leg(
    errors: &mut FieldErrors,
    key: &str,
    label: &str,
    preference: TimePreference,
    time: Option<&str>,
) {
    if preference != TimePreference::Specific {
        return;
    }
    match time {
        None => errors.add(key, required(label)),
        Some(t) if is_blank(t) => errors.add(key, required(label)),
        Some(t) if !is_valid_time(t) => errors.add(key, invalid(&label.to_lowercase())),
        Some(_) => {}
    }
}

fn validate_schedule(state: &CheckoutState, errors: &mut FieldErrors) {
    if state.delivery_date.is_none() {
        errors.add(fields::DELIVERY_DATE, required("Delivery date"));
    }
    validate_time_leg(
        errors,
        fields::DELIVERY_TIME,
        "Delivery time",
        state.delivery_time_preference,
        state.delivery_time.as_deref(),
    );

    if state.pickup_date.is_none() {
        errors.add(fields::PICKUP_DATE, required("Pickup date"));
    }
    validate_time_leg(
        errors,
        fields::PICKUP_TIME,
        "Pickup time",
        state.pickup_time_preference,
        state.pickup_time.as_deref(),
    );

    let (Some(delivery), Some(pickup)) = (state.delivery_date, state.pickup_date) else {
        return;
    };

    let delivery_time = specific_time(state.delivery_time_preference, state.delivery_time.as_deref());
    let pickup_time = specific_time(state.pickup_time_preference, state.pickup_time.as_deref());

    let pickup_too_early = match (delivery_time, pickup_time) {
        // HH:MM compares correctly as text
        (Some(dt), Some(pt)) => (pickup, pt) <= (delivery, dt),
        _ => pickup < delivery,
    };
    if !pickup_too_early {
        return;
    }

    if pickup == delivery {
        errors.add(
            fields::PICKUP_TIME,
            ValidationError::MustBeAfter {
                later: "Pickup time".to_string(),
                earlier: "delivery time".to_string(),
            },
        );
    } else {
        errors.add(
            fields::PICKUP_DATE,
            ValidationError::MustBeAfter {
                later: "Pickup date".to_string(),
                earlier: "delivery date".to_string(),
            },
        );
    }
}

fn validate_details(state: &CheckoutState, config: &PricingConfig, errors: &mut FieldErrors) {
    let customer = &state.customer;

    if is_blank(&customer.name) {
        errors.add(fields::NAME, required("Name"));
    }

    if is_blank(&customer.email) {
        errors.add(fields::EMAIL, required("Email"));
    } else if !is_valid_email(&customer.email) {
        errors.add(fields::EMAIL, invalid("email address"));
    }

    if !is_blank(&customer.phone) && !is_valid_phone(&customer.phone) {
        errors.add(fields::PHONE, invalid("phone number"));
    }

    if is_blank(&customer.address) {
        errors.add(fields::ADDRESS, required("Address"));
    }
    if is_blank(&customer.city) {
        errors.add(fields::CITY, required("City"));
    }
    if is_blank(&customer.state) {
        errors.add(fields::STATE, required("State"));
    }

    let zip = customer.zip_code.trim();
    if zip.is_empty() {
        errors.add(fields::ZIP_CODE, required("ZIP code"));
    } else if !is_valid_zip(zip) {
        errors.add(fields::ZIP_CODE, invalid("ZIP code"));
    } else if !config.serves_zip(&zip[..5]) {
        errors.add(
            fields::ZIP_CODE,
            ValidationError::NotAllowed {
                message: format!("Sorry, we do not deliver to ZIP code {} yet", zip),
            },
        );
    }
}

fn validate_cart(state: &CheckoutState, config: &PricingConfig, errors: &mut FieldErrors) {
    // the auto-selected overnight extra does not make a cart on its own
    let has_extra = state
        .extras
        .iter()
        .any(|extra| extra.selected && extra.id != config.overnight_extra_id);

    if state.rental_items.is_empty() && !has_extra {
        errors.add(fields::CART, ValidationError::EmptyCart);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{ExtraItem, RentalItem};
    use chrono::NaiveDate;

    fn date(s: &str) -> Option<NaiveDate> {
        Some(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
    }

    #[test]
    fn test_field_errors_serialize_as_plain_map() {
        let errors: FieldErrors =
            serde_json::from_str(r#"{"email":"Please enter a valid email"}"#).unwrap();
        assert_eq!(errors.get(fields::EMAIL), Some("Please enter a valid email"));
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({ "email": "Please enter a valid email" })
        );
        assert!(FieldErrors::decl().starts_with("type FieldErrors = "));
    }

    fn config() -> PricingConfig {
        PricingConfig::default()
    }

    fn complete_customer(state: &mut CheckoutState) {
        state.customer.name = "Dana Rivera".into();
        state.customer.email = "dana@example.com".into();
        state.customer.phone = "(210) 555-1234".into();
        state.customer.address = "123 Main St".into();
        state.customer.city = "San Antonio".into();
        state.customer.state = "TX".into();
        state.customer.zip_code = "78209".into();
    }

    #[test]
    fn test_format_rules() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));

        assert!(is_valid_phone("2105551234"));
        assert!(is_valid_phone("210-555-1234"));
        assert!(is_valid_phone("(210) 555-1234"));
        assert!(!is_valid_phone("555-1234"));

        assert!(is_valid_zip("78209"));
        assert!(is_valid_zip("78209-1234"));
        assert!(!is_valid_zip("7820"));

        assert!(is_valid_time("09:30"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("9:30"));
    }

    #[test]
    fn test_schedule_requires_dates() {
        let state = CheckoutState::new(&config());
        let errors = validate_step(CheckoutStep::Delivery, &state, &config());
        assert_eq!(errors.get(fields::DELIVERY_DATE), Some("Delivery date is required"));
        assert_eq!(errors.get(fields::PICKUP_DATE), Some("Pickup date is required"));
        assert!(!errors.contains(fields::DELIVERY_TIME));
    }

    #[test]
    fn test_specific_time_requires_value() {
        let mut state = CheckoutState::new(&config());
        state.delivery_date = date("2024-06-01");
        state.pickup_date = date("2024-06-02");
        state.delivery_time_preference = TimePreference::Specific;
        state.pickup_time_preference = TimePreference::Specific;
        state.pickup_time = Some("noon".into());

        let errors = validate_step(CheckoutStep::Datetime, &state, &config());
        assert_eq!(errors.get(fields::DELIVERY_TIME), Some("Delivery time is required"));
        assert_eq!(errors.get(fields::PICKUP_TIME), Some("Please enter a valid pickup time"));
    }

    #[test]
    fn test_pickup_before_delivery_rejected() {
        let mut state = CheckoutState::new(&config());
        state.delivery_date = date("2024-06-03");
        state.pickup_date = date("2024-06-01");

        let errors = validate_step(CheckoutStep::Delivery, &state, &config());
        assert_eq!(
            errors.get(fields::PICKUP_DATE),
            Some("Pickup date must be after delivery date")
        );
    }

    #[test]
    fn test_same_day_with_flexible_times_allowed() {
        let mut state = CheckoutState::new(&config());
        state.delivery_date = date("2024-06-01");
        state.pickup_date = date("2024-06-01");

        assert!(validate_step(CheckoutStep::Delivery, &state, &config()).is_empty());
    }

    #[test]
    fn test_same_day_specific_times_must_be_ordered() {
        let mut state = CheckoutState::new(&config());
        state.delivery_date = date("2024-06-01");
        state.pickup_date = date("2024-06-01");
        state.delivery_time_preference = TimePreference::Specific;
        state.pickup_time_preference = TimePreference::Specific;
        state.delivery_time = Some("14:00".into());
        state.pickup_time = Some("14:00".into());

        let errors = validate_step(CheckoutStep::Delivery, &state, &config());
        assert_eq!(
            errors.get(fields::PICKUP_TIME),
            Some("Pickup time must be after delivery time")
        );

        state.pickup_time = Some("18:30".into());
        assert!(validate_step(CheckoutStep::Delivery, &state, &config()).is_empty());
    }

    #[test]
    fn test_details_rules() {
        let mut state = CheckoutState::new(&config());
        let errors = validate_step(CheckoutStep::Details, &state, &config());
        for key in [
            fields::NAME,
            fields::EMAIL,
            fields::ADDRESS,
            fields::CITY,
            fields::STATE,
            fields::ZIP_CODE,
        ] {
            assert!(errors.contains(key), "missing error for {}", key);
        }
        assert!(!errors.contains(fields::PHONE));

        complete_customer(&mut state);
        assert!(validate_step(CheckoutStep::Details, &state, &config()).is_empty());

        state.customer.email = "not-an-email".into();
        state.customer.phone = "12".into();
        let errors = validate_step(CheckoutStep::Details, &state, &config());
        assert_eq!(errors.get(fields::EMAIL), Some("Please enter a valid email address"));
        assert_eq!(errors.get(fields::PHONE), Some("Please enter a valid phone number"));
    }

    #[test]
    fn test_zip_outside_service_area() {
        let mut state = CheckoutState::new(&config());
        complete_customer(&mut state);
        state.customer.zip_code = "10001".into();

        let errors = validate_step(CheckoutStep::Details, &state, &config());
        assert!(errors.get(fields::ZIP_CODE).unwrap().contains("10001"));

        let open = PricingConfig {
            service_area_zips: Vec::new(),
            ..config()
        };
        assert!(validate_step(CheckoutStep::Details, &state, &open).is_empty());
    }

    #[test]
    fn test_empty_cart_then_one_extra_clears() {
        let mut state = CheckoutState::new(&config());
        state.extras = vec![ExtraItem::new("generator", "Generator", Money::from_dollars(75))];

        let errors = validate_step(CheckoutStep::Extras, &state, &config());
        assert_eq!(
            errors.get(fields::CART),
            Some("Please select at least one rental item or extra")
        );

        state.extras[0].selected = true;
        let errors = validate_step(CheckoutStep::Extras, &state, &config());
        assert!(!errors.contains(fields::CART));
    }

    #[test]
    fn test_rental_item_alone_satisfies_cart() {
        let mut state = CheckoutState::new(&config());
        state.rental_items.push(RentalItem::new("castle", "Castle", Money::from_dollars(100)));
        assert!(validate_step(CheckoutStep::Extras, &state, &config()).is_empty());
    }

    #[test]
    fn test_overnight_extra_alone_is_not_a_cart() {
        let mut state = CheckoutState::new(&config());
        state.extras = vec![ExtraItem::new("overnight", "Overnight", Money::from_dollars(50)).selected()];
        assert!(validate_step(CheckoutStep::Extras, &state, &config()).contains(fields::CART));
    }

    #[test]
    fn test_review_requires_terms() {
        let mut state = CheckoutState::new(&config());
        let errors = validate_step(CheckoutStep::Review, &state, &config());
        assert_eq!(
            errors.get(fields::TERMS),
            Some("You must agree to the terms and conditions")
        );

        state.terms_agreed = true;
        assert!(validate_step(CheckoutStep::Review, &state, &config()).is_empty());
        assert!(validate_step(CheckoutStep::Payment, &state, &config()).is_empty());
    }

    #[test]
    fn test_first_invalid_step_walks_flow_in_order() {
        let mut state = CheckoutState::new(&config());
        let (step, _) = first_invalid_step(CheckoutStep::Review, &state, &config()).unwrap();
        assert_eq!(step, CheckoutStep::Delivery);

        state.delivery_date = date("2024-06-01");
        state.pickup_date = date("2024-06-02");
        complete_customer(&mut state);
        let (step, errors) = first_invalid_step(CheckoutStep::Review, &state, &config()).unwrap();
        assert_eq!(step, CheckoutStep::Extras);
        assert!(errors.contains(fields::CART));
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::new();
        errors.add(fields::NAME, required("Name"));
        errors.add(fields::CART, ValidationError::EmptyCart);
        assert_eq!(
            errors.to_string(),
            "cart: Please select at least one rental item or extra; name: Name is required"
        );
    }
}
