use crate::adapters::wire::{DiscountRecord, ProductRecord};
use crate::domain::model::{Catalog, CheckoutSummary, DiscountRegistry};
use crate::domain::ports::{CatalogSource, DiscountSource, OrderLog};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Catalog snapshot read from a CSV export (`id,name,price,billingCycle`).
pub struct CsvCatalog {
    path: PathBuf,
}

impl CsvCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvCatalog { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for CsvCatalog {
    async fn load_catalog(&self) -> Result<Catalog> {
        tracing::debug!("📂 Reading catalog CSV: {}", self.path.display());

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut products = Vec::new();
        for record in reader.deserialize::<ProductRecord>() {
            products.push(record?.into_product());
        }

        tracing::info!(
            "📦 Catalog loaded: {} products from {}",
            products.len(),
            self.path.display()
        );
        Ok(Catalog::new(products))
    }
}

/// Discount snapshot read from a JSON export of legacy discount records.
pub struct JsonDiscounts {
    path: PathBuf,
}

impl JsonDiscounts {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonDiscounts { path: path.into() }
    }
}

#[async_trait]
impl DiscountSource for JsonDiscounts {
    async fn load_discounts(&self) -> Result<DiscountRegistry> {
        tracing::debug!("📂 Reading discount JSON: {}", self.path.display());

        let content = std::fs::read_to_string(&self.path)?;
        let records: Vec<DiscountRecord> = serde_json::from_str(&content)?;

        let mut discounts = Vec::with_capacity(records.len());
        for record in records {
            discounts.push(record.into_discount()?);
        }

        tracing::info!(
            "🏷️ Discounts loaded: {} offers from {}",
            discounts.len(),
            self.path.display()
        );
        Ok(DiscountRegistry::new(discounts))
    }
}

/// Writes each order record as `<dir>/<reference>.json`.
pub struct JsonOrderLog {
    dir: PathBuf,
}

impl JsonOrderLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonOrderLog { dir: dir.into() }
    }
}

#[async_trait]
impl OrderLog for JsonOrderLog {
    async fn record_order(&self, summary: &CheckoutSummary) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(format!("{}.json", summary.reference));
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(&path, json)?;

        tracing::info!("💾 Order record written: {}", path.display());
        Ok(())
    }
}
