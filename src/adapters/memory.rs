use crate::domain::model::{Catalog, CheckoutSummary, Discount, DiscountRegistry, Product};
use crate::domain::ports::{CatalogSource, DiscountSource, OrderLog};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Catalog served from data already in memory. Used for inline-configured
/// sources and as the test double for the catalog port.
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        InMemoryCatalog { products }
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn load_catalog(&self) -> Result<Catalog> {
        Ok(Catalog::new(self.products.clone()))
    }
}

pub struct InMemoryDiscounts {
    discounts: Vec<Discount>,
}

impl InMemoryDiscounts {
    pub fn new(discounts: Vec<Discount>) -> Self {
        InMemoryDiscounts { discounts }
    }
}

#[async_trait]
impl DiscountSource for InMemoryDiscounts {
    async fn load_discounts(&self) -> Result<DiscountRegistry> {
        Ok(DiscountRegistry::new(self.discounts.clone()))
    }
}

/// Order log that keeps records in memory for later inspection.
#[derive(Clone, Default)]
pub struct RecordingOrderLog {
    orders: Arc<Mutex<Vec<CheckoutSummary>>>,
}

impl RecordingOrderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn orders(&self) -> Vec<CheckoutSummary> {
        self.orders.lock().await.clone()
    }
}

#[async_trait]
impl OrderLog for RecordingOrderLog {
    async fn record_order(&self, summary: &CheckoutSummary) -> Result<()> {
        self.orders.lock().await.push(summary.clone());
        Ok(())
    }
}
