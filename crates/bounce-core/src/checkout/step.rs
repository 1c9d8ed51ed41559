//! # Checkout Steps
//!
//! The wizard's ordered step list.
//!
//! Two layouts have shipped so far and both are presets here:
//! ```text
//! classic:          delivery → details → extras → review → payment
//! selection_first:  selection → datetime → details → extras → review
//! ```
//! The list is configuration (`PricingConfig::steps`), not a hard-coded
//! sequence, so a third layout is a config change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

/// A named wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Pick rental items.
    Selection,
    /// Delivery and pickup schedule (classic layout).
    Delivery,
    /// Delivery and pickup schedule (selection-first layout).
    Datetime,
    /// Customer contact and address.
    Details,
    /// Add-ons and mixers.
    Extras,
    /// Price summary and terms.
    Review,
    /// Payment collaborator takes over.
    Payment,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Selection => "selection",
            CheckoutStep::Delivery => "delivery",
            CheckoutStep::Datetime => "datetime",
            CheckoutStep::Details => "details",
            CheckoutStep::Extras => "extras",
            CheckoutStep::Review => "review",
            CheckoutStep::Payment => "payment",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckoutStep {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "selection" => Ok(CheckoutStep::Selection),
            "delivery" => Ok(CheckoutStep::Delivery),
            "datetime" => Ok(CheckoutStep::Datetime),
            "details" => Ok(CheckoutStep::Details),
            "extras" => Ok(CheckoutStep::Extras),
            "review" => Ok(CheckoutStep::Review),
            "payment" => Ok(CheckoutStep::Payment),
            other => Err(CoreError::StepNotInFlow(other.to_string())),
        }
    }
}

/// Ordered list of steps the wizard walks through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StepFlow(Vec<CheckoutStep>);

impl StepFlow {
    pub fn new(steps: Vec<CheckoutStep>) -> Self {
        StepFlow(steps)
    }

    /// `delivery → details → extras → review → payment`
    pub fn classic() -> Self {
        StepFlow(vec![
            CheckoutStep::Delivery,
            CheckoutStep::Details,
            CheckoutStep::Extras,
            CheckoutStep::Review,
            CheckoutStep::Payment,
        ])
    }

    /// `selection → datetime → details → extras → review`
    pub fn selection_first() -> Self {
        StepFlow(vec![
            CheckoutStep::Selection,
            CheckoutStep::Datetime,
            CheckoutStep::Details,
            CheckoutStep::Extras,
            CheckoutStep::Review,
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckoutStep> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<CheckoutStep> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<CheckoutStep> {
        self.0.last().copied()
    }

    pub fn position(&self, step: CheckoutStep) -> Option<usize> {
        self.0.iter().position(|s| *s == step)
    }

    pub fn contains(&self, step: CheckoutStep) -> bool {
        self.position(step).is_some()
    }

    /// The step after `step`, or `step` itself at the end (clamped).
    pub fn next_after(&self, step: CheckoutStep) -> CheckoutStep {
        match self.position(step) {
            Some(i) => self.0.get(i + 1).copied().unwrap_or(step),
            None => step,
        }
    }

    /// The step before `step`, or `step` itself at the start (clamped).
    pub fn previous_before(&self, step: CheckoutStep) -> CheckoutStep {
        match self.position(step) {
            Some(i) if i > 0 => self.0[i - 1],
            _ => step,
        }
    }

    /// Steps strictly before `step`, in order.
    pub fn steps_before(&self, step: CheckoutStep) -> &[CheckoutStep] {
        let end = self.position(step).unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl Default for StepFlow {
    fn default() -> Self {
        StepFlow::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_parsing() {
        assert_eq!("review".parse::<CheckoutStep>().unwrap(), CheckoutStep::Review);
        assert_eq!(" Extras ".parse::<CheckoutStep>().unwrap(), CheckoutStep::Extras);
        assert!("shipping".parse::<CheckoutStep>().is_err());
    }

    #[test]
    fn test_next_and_previous_are_clamped() {
        let flow = StepFlow::classic();
        assert_eq!(flow.next_after(CheckoutStep::Delivery), CheckoutStep::Details);
        assert_eq!(flow.next_after(CheckoutStep::Payment), CheckoutStep::Payment);
        assert_eq!(flow.previous_before(CheckoutStep::Details), CheckoutStep::Delivery);
        assert_eq!(flow.previous_before(CheckoutStep::Delivery), CheckoutStep::Delivery);
    }

    #[test]
    fn test_selection_first_layout() {
        let flow = StepFlow::selection_first();
        assert_eq!(flow.first(), Some(CheckoutStep::Selection));
        assert_eq!(flow.last(), Some(CheckoutStep::Review));
        assert!(!flow.contains(CheckoutStep::Payment));
        assert_eq!(flow.next_after(CheckoutStep::Review), CheckoutStep::Review);
    }

    #[test]
    fn test_steps_before() {
        let flow = StepFlow::classic();
        assert_eq!(
            flow.steps_before(CheckoutStep::Extras),
            &[CheckoutStep::Delivery, CheckoutStep::Details]
        );
        assert!(flow.steps_before(CheckoutStep::Delivery).is_empty());
    }

    #[test]
    fn test_flow_serializes_as_list() {
        let json = serde_json::to_string(&StepFlow::selection_first()).unwrap();
        assert_eq!(json, r#"["selection","datetime","details","extras","review"]"#);
    }
}
