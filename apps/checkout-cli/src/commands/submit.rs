//! `submit`: validate a cart end to end and store it as an order.

use bounce_core::{CheckoutAction, OrderDraft, OrderStatus, PaymentMethod, PaymentStatus};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::cart::CartRequest;
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::render;

use super::{open_database, read_input};

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Cart request JSON file
    pub cart: PathBuf,
}

pub async fn run(args: SubmitArgs, config: &AppConfig, json: bool) -> CliResult<()> {
    let cart = CartRequest::from_json(&read_input(&args.cart)?)?;
    let mut checkout = cart.into_checkout(config.pricing.clone())?;

    let draft = OrderDraft::from_checkout(checkout.state(), checkout.config())?;

    let db = open_database(config).await?;
    let mut order = db.orders().insert(&draft).await?;

    // cash is settled on delivery; the booking itself is final
    if draft.payment_method == PaymentMethod::Cash {
        db.orders()
            .update_status(&order.id, OrderStatus::Confirmed, PaymentStatus::Pending)
            .await?;
        order.status = OrderStatus::Confirmed;
    }
    db.close().await;

    checkout.dispatch(CheckoutAction::OrderSubmitted {
        order_id: order.id.clone(),
    })?;
    info!(
        order_number = %order.order_number,
        step = %checkout.current_step(),
        "Checkout submitted"
    );

    if json {
        return render::print_json(&order);
    }

    println!("✓ Order {} stored ({:?})", order.order_number, order.status);
    for item in &draft.items {
        println!(
            "  {:<40} {:>3} × {:>2}d {:>12}",
            item.description,
            item.quantity,
            item.day_multiplier,
            item.line_total.to_string()
        );
    }
    render::print_breakdown(&order.prices);

    Ok(())
}
