pub mod aggregate;
pub mod cart;
pub mod eligibility;
pub mod resolver;

pub use crate::domain::model::{CartAggregate, CartItem, LineBreakdown, PricingMode, TermLength};
pub use crate::domain::ports::{CatalogSource, DiscountSource, OrderLog};
pub use crate::utils::error::Result;
