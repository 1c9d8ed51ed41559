//! `orders`: list stored orders.

use bounce_core::rental::parse_calendar_date;
use clap::Args;

use crate::config::AppConfig;
use crate::error::CliResult;
use crate::render;

use super::open_database;

#[derive(Debug, Args)]
pub struct OrdersArgs {
    /// Only orders delivered on this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Most recent orders to show when no date is given
    #[arg(long, default_value_t = 20)]
    pub limit: i64,
}

pub async fn run(args: OrdersArgs, config: &AppConfig, json: bool) -> CliResult<()> {
    let db = open_database(config).await?;

    let orders = match args.date.as_deref() {
        Some(raw) => {
            let date = parse_calendar_date(raw)?;
            db.orders().list_for_delivery_date(date).await?
        }
        None => db.orders().list_recent(args.limit).await?,
    };

    if json {
        render::print_json(&orders)?;
    } else {
        render::print_orders(&orders);
    }

    db.close().await;
    Ok(())
}
