use crate::app::checkout::build_summary;
use crate::core::aggregate::{aggregate, line_breakdown};
use crate::core::cart::Cart;
use crate::core::eligibility::applicable_discounts;
use crate::domain::model::{
    Catalog, CartAggregate, CheckoutSummary, Discount, DiscountRegistry, LineBreakdown,
    TermLength,
};
use crate::domain::ports::{CatalogSource, DiscountSource, OrderLog};
use crate::utils::error::{CartError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

/// One seller's quoting session: immutable catalog and discount snapshots
/// taken at start, plus the cart being edited. Expiry checks use the wall
/// clock at the moment of each mutation, not the snapshot time.
pub struct QuoteSession {
    catalog: Catalog,
    registry: DiscountRegistry,
    cart: Cart,
}

impl QuoteSession {
    pub fn from_snapshots(catalog: Catalog, registry: DiscountRegistry) -> Self {
        QuoteSession {
            catalog,
            registry,
            cart: Cart::new(),
        }
    }

    pub async fn start(
        catalog_source: &dyn CatalogSource,
        discount_source: &dyn DiscountSource,
    ) -> Result<Self> {
        tracing::info!("🛒 Starting quote session");

        let catalog = catalog_source.load_catalog().await?;
        let registry = discount_source.load_discounts().await?;

        tracing::info!(
            "📦 Snapshots loaded: {} products, {} discounts",
            catalog.len(),
            registry.len()
        );

        Ok(Self::from_snapshots(catalog, registry))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &DiscountRegistry {
        &self.registry
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn add_item(&mut self, product_id: &str) -> Result<Uuid> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or_else(|| CartError::ProductNotFound {
                product_id: product_id.to_string(),
            })?
            .clone();

        let item_id = self.cart.add_item(product);
        tracing::debug!("➕ Added {} as line {}", product_id, item_id);
        Ok(item_id)
    }

    pub fn remove_item(&mut self, item_id: Uuid) -> Result<()> {
        self.cart.remove_item(item_id)
    }

    pub fn set_quantity(&mut self, item_id: Uuid, quantity: u32) -> Result<()> {
        self.cart.set_quantity(item_id, quantity)
    }

    pub fn set_contract_term(&mut self, item_id: Uuid, term: Option<TermLength>) -> Result<()> {
        self.cart.set_contract_term(item_id, term, &self.registry)
    }

    pub fn attach_discount(&mut self, item_id: Uuid, discount_id: Option<&str>) -> Result<()> {
        self.cart
            .attach_discount(item_id, discount_id, &self.registry, Utc::now())
    }

    pub fn apply_code(&mut self, code: &str) -> Result<usize> {
        self.cart.apply_code(code, &self.registry, Utc::now())
    }

    pub fn apply_override(&mut self, item_id: Uuid, amount: Decimal) -> Result<()> {
        self.cart.apply_override(item_id, amount)
    }

    pub fn clear_override(&mut self, item_id: Uuid) -> Result<()> {
        self.cart.clear_override(item_id)
    }

    /// Discounts a seller may pick from for one product, as of now.
    pub fn applicable_discounts(&self, product_id: &str) -> Vec<&Discount> {
        applicable_discounts(&self.registry, product_id, Utc::now())
    }

    pub fn aggregate(&self) -> CartAggregate {
        aggregate(&self.cart, &self.registry)
    }

    pub fn line_breakdown(&self) -> Vec<LineBreakdown> {
        line_breakdown(&self.cart, &self.registry)
    }

    /// Hand the priced cart off as an order record. The cart is cleared only
    /// after the log accepts the record, so a failed handoff leaves the
    /// session intact for a retry.
    pub async fn checkout(&mut self, order_log: &dyn OrderLog) -> Result<CheckoutSummary> {
        if self.cart.is_empty() {
            return Err(CartError::CheckoutError {
                message: "cart is empty".to_string(),
            });
        }

        // 先結算並送出，成功後才清空購物車
        let summary = build_summary(&self.cart, &self.registry);
        tracing::info!(
            "🧾 Submitting order {} ({} lines, total {})",
            summary.reference,
            summary.lines.len(),
            summary.final_total
        );

        order_log.record_order(&summary).await?;
        self.cart.clear();

        tracing::info!("✅ Order {} recorded, cart cleared", summary.reference);
        Ok(summary)
    }
}
