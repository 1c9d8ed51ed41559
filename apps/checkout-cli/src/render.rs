//! Terminal output for breakdowns, orders and the catalog.

use bounce_core::{CatalogProduct, FieldErrors, Money, PriceBreakdown};
use bounce_db::StoredOrder;
use serde::Serialize;

use crate::error::CliResult;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Breakdown rows in review-page order. Zero fees are skipped.
pub fn breakdown_rows(prices: &PriceBreakdown) -> Vec<(String, Money)> {
    let mut rows = vec![(
        format!("Rentals ({} day{})", prices.day_multiplier, plural(prices.day_multiplier)),
        prices.bouncer_subtotal,
    )];

    let optional = [
        ("Extras", prices.extras_total),
        ("Specific time surcharge", prices.specific_time_charge),
        ("Delivery fee", prices.delivery_fee),
        ("Overnight fee", prices.overnight_fee),
    ];
    rows.extend(
        optional
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(label, amount)| (label.to_string(), amount)),
    );

    rows.push(("Subtotal".into(), prices.subtotal));
    rows.push(("Tax".into(), prices.tax_amount));
    if !prices.processing_fee.is_zero() {
        rows.push(("Processing fee".into(), prices.processing_fee));
    }
    if !prices.discount_amount.is_zero() {
        rows.push(("Discount".into(), -prices.discount_amount));
    }
    rows.push(("Total".into(), prices.total_amount));
    if !prices.deposit_amount.is_zero() {
        rows.push(("Deposit".into(), prices.deposit_amount));
        rows.push(("Balance due".into(), prices.balance_due));
    }

    rows
}

pub fn print_breakdown(prices: &PriceBreakdown) {
    for (label, amount) in breakdown_rows(prices) {
        if label == "Subtotal" || label == "Total" {
            println!("  {}", "-".repeat(36));
        }
        println!("  {:<24}{:>12}", label, amount.to_string());
    }
}

pub fn print_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        println!("  ✗ {}: {}", field, message);
    }
}

pub fn print_orders(orders: &[StoredOrder]) {
    if orders.is_empty() {
        println!("No orders.");
        return;
    }

    println!(
        "{:<20} {:<10} {:<10} {:<11} {:<24} {:>12}",
        "ORDER", "STATUS", "PAYMENT", "DELIVERY", "CUSTOMER", "TOTAL"
    );
    for order in orders {
        println!(
            "{:<20} {:<10} {:<10} {:<11} {:<24} {:>12}",
            order.order_number,
            format!("{:?}", order.status).to_lowercase(),
            format!("{:?}", order.payment_status).to_lowercase(),
            order.delivery_date.to_string(),
            truncate(&order.customer.name, 24),
            order.prices.total_amount.to_string(),
        );
    }
}

pub fn print_catalog(products: &[CatalogProduct]) {
    if products.is_empty() {
        println!("Catalog is empty. Run the seed binary to load the demo catalog.");
        return;
    }

    println!("{:<24} {:<8} {:<32} {:>10}", "ID", "KIND", "NAME", "PRICE");
    for product in products {
        println!(
            "{:<24} {:<8} {:<32} {:>10}",
            product.id,
            format!("{:?}", product.kind).to_lowercase(),
            truncate(&product.name, 32),
            product.price.to_string(),
        );
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_rows_skip_zero_fees() {
        let prices = PriceBreakdown {
            bouncer_subtotal: Money::from_dollars(100),
            subtotal: Money::from_dollars(100),
            tax_amount: Money::from_cents(825),
            total_amount: Money::from_cents(10825),
            day_multiplier: 1,
            ..PriceBreakdown::default()
        };

        let labels: Vec<String> = breakdown_rows(&prices).into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, ["Rentals (1 day)", "Subtotal", "Tax", "Total"]);
    }

    #[test]
    fn test_deposit_rows() {
        let prices = PriceBreakdown {
            day_multiplier: 2,
            total_amount: Money::from_dollars(150),
            deposit_amount: Money::from_dollars(50),
            balance_due: Money::from_dollars(100),
            discount_amount: Money::from_dollars(5),
            ..PriceBreakdown::default()
        };

        let rows = breakdown_rows(&prices);
        assert_eq!(rows[0].0, "Rentals (2 days)");
        assert!(rows.contains(&("Discount".to_string(), Money::from_dollars(-5))));
        assert_eq!(rows.last(), Some(&("Balance due".to_string(), Money::from_dollars(100))));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Castle", 10), "Castle");
        assert_eq!(truncate("Tropical Water Slide", 8), "Tropica…");
    }
}
