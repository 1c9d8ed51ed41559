//! # Pricing Configuration
//!
//! Every business constant the checkout depends on, passed in explicitly.
//!
//! The business has changed these values several times (delivery fee $20 vs
//! free, specific-time fee $10 per leg vs $20 combined, processing fee on the
//! tax-inclusive vs tax-exclusive subtotal). None of them is a literal in the
//! calculator; they all come from here.
//!
//! ## File Format
//! Money is in cents and rates are in basis points:
//! ```toml
//! [pricing]
//! delivery_fee_cents = 0
//! tax_rate_bps = 825
//! processing_rate_bps = 300
//! processing_fee_base = "tax_inclusive"
//! specific_time_fee_cents = 1000
//! overnight_fee_cents = 5000
//! max_rental_items = 3
//! additional_item_bps = 5000
//! overnight_extra_id = "overnight"
//! multi_unit_extra_id = "tables-chairs"
//! service_area_zips = ["78701", "78702"]
//! steps = ["delivery", "details", "extras", "review", "payment"]
//! ```
//!
//! Loading the file and applying environment overrides is the
//! application's job; this crate only defines and validates the shape.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::checkout::StepFlow;
use crate::error::{CoreError, CoreResult};
use crate::money::{Money, BPS_SCALE};
use crate::types::Rate;

// =============================================================================
// Processing Fee Base
// =============================================================================

/// Which subtotal the processing fee percentage is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingFeeBase {
    /// `(subtotal + tax) × rate`
    #[default]
    TaxInclusive,
    /// `subtotal × rate`
    TaxExclusive,
}

// =============================================================================
// Pricing Config
// =============================================================================

/// Constants consumed by the fee calculator, reducer and validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct PricingConfig {
    /// Flat delivery fee; zero means free delivery.
    #[serde(rename = "delivery_fee_cents")]
    pub delivery_fee: Money,

    /// Sales tax.
    #[serde(rename = "tax_rate_bps")]
    pub tax_rate: Rate,

    /// Fee for electronic payment methods.
    #[serde(rename = "processing_rate_bps")]
    pub processing_rate: Rate,

    pub processing_fee_base: ProcessingFeeBase,

    /// Charged once per leg (delivery, pickup) with a specific time.
    #[serde(rename = "specific_time_fee_cents")]
    pub specific_time_fee: Money,

    /// Flat surcharge for a one-night rental.
    #[serde(rename = "overnight_fee_cents")]
    pub overnight_fee: Money,

    /// Maximum number of rental items in one order.
    pub max_rental_items: usize,

    /// Price multiplier (bps) for every rental item except the most expensive.
    pub additional_item_bps: u32,

    /// Extra auto-selected for one-night rentals (priced by the surcharge).
    pub overnight_extra_id: String,

    /// The one extra whose quantity can change.
    pub multi_unit_extra_id: String,

    /// ZIP codes we deliver to. Empty means no restriction.
    pub service_area_zips: Vec<String>,

    /// Ordered wizard steps.
    pub steps: StepFlow,
}

impl Default for PricingConfig {
    /// Current production regime: free delivery, 8.25% tax, 3% PayPal fee
    /// on the tax-inclusive subtotal, $10 per specific-time leg, $50
    /// overnight surcharge, three rental items at most.
    fn default() -> Self {
        PricingConfig {
            delivery_fee: Money::zero(),
            tax_rate: Rate::from_bps(825),
            processing_rate: Rate::from_bps(300),
            processing_fee_base: ProcessingFeeBase::TaxInclusive,
            specific_time_fee: Money::from_dollars(10),
            overnight_fee: Money::from_dollars(50),
            max_rental_items: 3,
            additional_item_bps: 5000,
            overnight_extra_id: "overnight".to_string(),
            multi_unit_extra_id: "tables-chairs".to_string(),
            service_area_zips: default_service_area(),
            steps: StepFlow::default(),
        }
    }
}

fn default_service_area() -> Vec<String> {
    [
        "78201", "78202", "78203", "78204", "78205", "78207", "78208", "78209", "78210",
        "78211", "78212", "78213", "78214", "78215", "78216", "78217", "78218", "78219",
        "78220", "78221", "78222", "78223", "78224", "78225", "78226", "78227", "78228",
        "78229", "78230", "78231", "78232", "78233", "78237", "78238", "78239", "78240",
        "78242", "78244", "78245", "78247", "78248", "78249", "78250", "78251", "78252",
        "78253", "78254", "78255", "78256", "78257", "78258", "78259", "78260", "78261",
    ]
    .iter()
    .map(|zip| zip.to_string())
    .collect()
}

impl PricingConfig {
    /// Checks the configuration for values the calculator cannot use.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.tax_rate.is_valid() {
            return Err(CoreError::InvalidConfig(format!(
                "tax_rate_bps must be at most {}, got {}",
                BPS_SCALE,
                self.tax_rate.bps()
            )));
        }

        if !self.processing_rate.is_valid() {
            return Err(CoreError::InvalidConfig(format!(
                "processing_rate_bps must be at most {}, got {}",
                BPS_SCALE,
                self.processing_rate.bps()
            )));
        }

        if self.additional_item_bps > BPS_SCALE {
            return Err(CoreError::InvalidConfig(format!(
                "additional_item_bps must be at most {}, got {}",
                BPS_SCALE, self.additional_item_bps
            )));
        }

        let fees = [
            ("delivery_fee_cents", self.delivery_fee),
            ("specific_time_fee_cents", self.specific_time_fee),
            ("overnight_fee_cents", self.overnight_fee),
        ];
        if let Some((name, _)) = fees.iter().find(|(_, fee)| fee.is_negative()) {
            return Err(CoreError::InvalidConfig(format!("{} cannot be negative", name)));
        }

        if self.max_rental_items == 0 {
            return Err(CoreError::InvalidConfig(
                "max_rental_items must be greater than 0".into(),
            ));
        }

        if self.steps.is_empty() {
            return Err(CoreError::InvalidConfig("steps cannot be empty".into()));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.steps.iter().find(|step| !seen.insert(**step)) {
            return Err(CoreError::InvalidConfig(format!(
                "step {} appears more than once",
                dup
            )));
        }

        Ok(())
    }

    /// True when `zip` is inside the delivery area.
    pub fn serves_zip(&self, zip: &str) -> bool {
        self.service_area_zips.is_empty() || self.service_area_zips.iter().any(|z| z == zip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::CheckoutStep;

    #[test]
    fn test_default_config_is_valid() {
        let config = PricingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tax_rate.bps(), 825);
        assert_eq!(config.delivery_fee, Money::zero());
        assert_eq!(config.steps.first(), Some(CheckoutStep::Delivery));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = PricingConfig::default();
        config.tax_rate = Rate::from_bps(10_001);
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.max_rental_items = 0;
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.overnight_fee = Money::from_cents(-1);
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.steps = StepFlow::new(vec![CheckoutStep::Details, CheckoutStep::Details]);
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.steps = StepFlow::new(Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PricingConfig = serde_json::from_str(
            r#"{"delivery_fee_cents": 2000, "steps": ["selection", "datetime", "details", "extras", "review"]}"#,
        )
        .unwrap();

        assert_eq!(config.delivery_fee, Money::from_dollars(20));
        assert_eq!(config.tax_rate.bps(), 825);
        assert_eq!(config.steps.len(), 5);
        assert_eq!(config.steps.first(), Some(CheckoutStep::Selection));
    }

    #[test]
    fn test_service_area() {
        let mut config = PricingConfig::default();
        config.service_area_zips = vec!["78701".to_string()];
        assert!(config.serves_zip("78701"));
        assert!(!config.serves_zip("10001"));

        config.service_area_zips.clear();
        assert!(config.serves_zip("10001"));
    }
}
