//! # Demo Catalog Seeder
//!
//! Populates the database with a small rental catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./bounce_dev.db
//! cargo run -p bounce-db --bin seed
//!
//! # Specify database path
//! cargo run -p bounce-db --bin seed -- --db ./data/bounce.db
//! ```
//!
//! ## Seeded Products
//! - Rental items: bounce houses, combos and water slides
//! - Extras: tables & chairs (per set), generator, slushy machine,
//!   popcorn, cotton candy and the overnight add-on
//! - Mixers: slushy flavors (the first is included with the machine)

use bounce_core::{CatalogProduct, Money, ProductKind, NO_MIXER_ID};
use bounce_db::{Database, DbConfig};
use std::env;

/// (id, name, price in cents, image)
const RENTALS: &[(&str, &str, i64, &str)] = &[
    ("castle-combo", "Castle Combo", 19995, "/images/castle-combo.jpg"),
    ("rainbow-bouncer", "Rainbow Bouncer", 12995, "/images/rainbow.jpg"),
    ("tropical-slide", "Tropical Water Slide", 24995, "/images/tropical-slide.jpg"),
    ("sports-arena", "Sports Arena", 17995, "/images/sports-arena.jpg"),
    ("toddler-town", "Toddler Town", 9995, "/images/toddler-town.jpg"),
];

/// (id, name, price in cents, icon)
const EXTRAS: &[(&str, &str, i64, &str)] = &[
    ("tables-chairs", "Tables & Chairs (per set)", 1500, "chair"),
    ("generator", "Generator", 7500, "bolt"),
    ("slushy-machine", "Slushy Machine", 9500, "snowflake"),
    ("popcorn", "Popcorn Machine", 4995, "popcorn"),
    ("cotton-candy", "Cotton Candy Machine", 4995, "candy"),
    ("overnight", "Overnight Rental", 5000, "moon"),
];

/// (id, name, price in cents)
const MIXERS: &[(&str, &str, i64)] = &[
    (NO_MIXER_ID, "No Mixer", 0),
    ("mixer-cherry", "Cherry", 1995),
    ("mixer-blue-raspberry", "Blue Raspberry", 1995),
    ("mixer-margarita", "Margarita", 2495),
    ("mixer-pina-colada", "Piña Colada", 2495),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./bounce_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bounce Checkout Demo Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./bounce_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Bounce Checkout Demo Catalog Seeder");
    println!("===================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count().await?;
    if existing > 0 {
        println!("⚠ Catalog already has {} products", existing);
        println!("  Skipping seed to avoid overwriting prices.");
        return Ok(());
    }

    let products = demo_catalog();
    let mut inserted = 0;
    for product in &products {
        if let Err(e) = db.catalog().upsert(product).await {
            eprintln!("Failed to insert {}: {}", product.id, e);
            continue;
        }
        inserted += 1;
    }

    println!("✓ Seeded {} of {} products", inserted, products.len());
    for kind in [ProductKind::Rental, ProductKind::Extra, ProductKind::Mixer] {
        let listed = db.catalog().list_by_kind(kind).await?;
        println!("  {:?}: {}", kind, listed.len());
    }

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn demo_catalog() -> Vec<CatalogProduct> {
    let rentals = RENTALS.iter().map(|(id, name, cents, image)| CatalogProduct {
        id: id.to_string(),
        name: name.to_string(),
        kind: ProductKind::Rental,
        price: Money::from_cents(*cents),
        image: Some(image.to_string()),
        icon: None,
        active: true,
    });

    let extras = EXTRAS.iter().map(|(id, name, cents, icon)| CatalogProduct {
        id: id.to_string(),
        name: name.to_string(),
        kind: ProductKind::Extra,
        price: Money::from_cents(*cents),
        image: None,
        icon: Some(icon.to_string()),
        active: true,
    });

    let mixers = MIXERS.iter().map(|(id, name, cents)| CatalogProduct {
        id: id.to_string(),
        name: name.to_string(),
        kind: ProductKind::Mixer,
        price: Money::from_cents(*cents),
        image: None,
        icon: None,
        active: true,
    });

    rentals.chain(extras).chain(mixers).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounce_core::MixerSelection;
    use std::collections::HashSet;

    #[test]
    fn test_no_mixer_product_uses_reserved_id() {
        let catalog = demo_catalog();
        let none = catalog
            .iter()
            .find(|p| p.kind == ProductKind::Mixer && p.price == Money::zero())
            .unwrap();
        assert_eq!(none.id, NO_MIXER_ID);

        let selection = MixerSelection {
            machine_id: "slushy-machine".into(),
            tank: 1,
            mixer_id: none.id.clone(),
            mixer_name: none.name.clone(),
            price: none.price,
        };
        assert!(!selection.is_priced());
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let catalog = demo_catalog();
        let ids: HashSet<&str> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
    }
}
