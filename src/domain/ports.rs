use crate::domain::model::{Catalog, CheckoutSummary, DiscountRegistry};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load_catalog(&self) -> Result<Catalog>;
}

#[async_trait]
pub trait DiscountSource: Send + Sync {
    async fn load_discounts(&self) -> Result<DiscountRegistry>;
}

#[async_trait]
pub trait OrderLog: Send + Sync {
    async fn record_order(&self, summary: &CheckoutSummary) -> Result<()>;
}
