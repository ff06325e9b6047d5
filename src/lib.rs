pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::session::QuoteSession;
pub use core::cart::Cart;
pub use core::resolver::resolve_price;
pub use domain::model::{
    BillingCycle, CartAggregate, CartItem, Catalog, CheckoutSummary, ContractEffect, Discount,
    DiscountKind, DiscountRegistry, LineBreakdown, PricingMode, Product, ProductScope, TermLength,
};
pub use domain::ports::{CatalogSource, DiscountSource, OrderLog};
pub use utils::error::{CartError, Result};
