//! # Multi-Item Discount
//!
//! The most expensive rental item is charged in full; every other rental
//! item gets the additional-item rate (half price by default).
//!
//! ```text
//! selected in order:   $60   $100   $80
//!                        │     │     │
//! ranked by price:     $100  $80   $60      (stable: ties keep selection order)
//!                        │     │     │
//! multiplier:           1.0   0.5   0.5
//! ```
//!
//! Which item ends up discounted never depends on the order the customer
//! clicked them in. The canonical cart keeps its selection order; only the
//! `discounted_price` annotation changes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::PricingConfig;
use crate::money::BPS_SCALE;
use crate::types::RentalItem;

/// Price tier an item landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTier {
    /// Highest-priced item, charged in full.
    Full,
    /// Every other item.
    Additional,
}

impl DiscountTier {
    /// Price multiplier in basis points.
    pub fn bps(&self, config: &PricingConfig) -> u32 {
        match self {
            DiscountTier::Full => BPS_SCALE,
            DiscountTier::Additional => config.additional_item_bps,
        }
    }
}

/// Index of the item charged in full: the first item holding the highest
/// price, which is what a stable descending sort puts first.
fn full_price_index(items: &[RentalItem]) -> Option<usize> {
    items
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, &RentalItem)>, (i, item)| match best {
            Some((_, top)) if top.price >= item.price => best,
            _ => Some((i, item)),
        })
        .map(|(i, _)| i)
}

/// Returns a copy ranked by descending price with discounts applied.
///
/// ## Example
/// ```rust
/// use bounce_core::config::PricingConfig;
/// use bounce_core::discount::allocate_discounts;
/// use bounce_core::money::Money;
/// use bounce_core::types::RentalItem;
///
/// let items = vec![
///     RentalItem::new("a", "Small", Money::from_dollars(60)),
///     RentalItem::new("b", "Castle", Money::from_dollars(100)),
/// ];
/// let ranked = allocate_discounts(&items, &PricingConfig::default());
/// assert_eq!(ranked[0].id, "b");
/// assert_eq!(ranked[0].discounted_price(), Money::from_dollars(100));
/// assert_eq!(ranked[1].discounted_price(), Money::from_dollars(30));
/// ```
pub fn allocate_discounts(items: &[RentalItem], config: &PricingConfig) -> Vec<RentalItem> {
    let mut ranked = items.to_vec();
    // sort_by is stable, so equal prices keep selection order
    ranked.sort_by(|a, b| b.price.cmp(&a.price));
    apply_discounts(&mut ranked, config);
    ranked
}

/// Annotates `discounted_price` in place without reordering.
pub fn apply_discounts(items: &mut [RentalItem], config: &PricingConfig) {
    let full = full_price_index(items);

    for (i, item) in items.iter_mut().enumerate() {
        let tier = if Some(i) == full {
            DiscountTier::Full
        } else {
            DiscountTier::Additional
        };
        item.discounted_price = item.price.scale_bps(tier.bps(config));
    }
}
