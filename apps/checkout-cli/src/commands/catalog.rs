//! `catalog`: list stored products.

use bounce_core::ProductKind;
use clap::{Args, ValueEnum};

use crate::config::AppConfig;
use crate::error::CliResult;
use crate::render;

use super::open_database;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindFilter {
    Rental,
    Extra,
    Mixer,
}

impl From<KindFilter> for ProductKind {
    fn from(kind: KindFilter) -> Self {
        match kind {
            KindFilter::Rental => ProductKind::Rental,
            KindFilter::Extra => ProductKind::Extra,
            KindFilter::Mixer => ProductKind::Mixer,
        }
    }
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Only active products of one kind
    #[arg(long, value_enum)]
    pub kind: Option<KindFilter>,
}

pub async fn run(args: CatalogArgs, config: &AppConfig, json: bool) -> CliResult<()> {
    let db = open_database(config).await?;

    let products = match args.kind {
        Some(kind) => db.catalog().list_by_kind(kind.into()).await?,
        None => db.catalog().list_all().await?,
    };

    if json {
        render::print_json(&products)?;
    } else {
        render::print_catalog(&products);
    }

    db.close().await;
    Ok(())
}
