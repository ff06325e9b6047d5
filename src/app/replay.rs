use crate::adapters::files::{CsvCatalog, JsonDiscounts, JsonOrderLog};
use crate::adapters::http::{HttpCatalog, HttpDiscounts};
use crate::adapters::memory::{InMemoryCatalog, InMemoryDiscounts};
use crate::app::session::QuoteSession;
use crate::config::quote_config::{ActionConfig, QuoteConfig};
use crate::domain::model::{CartAggregate, CheckoutSummary, LineBreakdown, TermLength};
use crate::domain::ports::{CatalogSource, DiscountSource};
use crate::utils::error::{CartError, Result};
use crate::utils::validation::validate_required_field;
use uuid::Uuid;

#[derive(Debug)]
pub struct ReplayOutcome {
    pub aggregate: CartAggregate,
    pub breakdown: Vec<LineBreakdown>,
    pub order: Option<CheckoutSummary>,
}

/// Replay a quote script: load snapshots, apply the cart actions in order,
/// price the cart, and hand off the order record unless this is a dry run.
pub async fn run_script(
    config: &QuoteConfig,
    dry_run: bool,
    output_dir: Option<&str>,
) -> Result<ReplayOutcome> {
    tracing::info!("🚀 Replaying quote script: {}", config.session.name);

    let catalog_source = build_catalog_source(config)?;
    let discount_source = build_discount_source(config)?;
    let mut session =
        QuoteSession::start(catalog_source.as_ref(), discount_source.as_ref()).await?;

    tracing::info!("📋 Applying {} cart actions", config.action.len());
    for (index, action) in config.action.iter().enumerate() {
        apply_action(&mut session, index, action)?;
    }

    let aggregate = session.aggregate();
    let breakdown = session.line_breakdown();
    tracing::info!(
        "📊 Cart priced: subtotal {}, final total {}",
        aggregate.subtotal,
        aggregate.final_total
    );

    let order = if config.checkout_enabled() && !dry_run {
        let dir = match output_dir {
            Some(dir) => dir,
            None => config.order_output_dir(),
        };
        let log = JsonOrderLog::new(dir);
        Some(session.checkout(&log).await?)
    } else {
        if config.checkout_enabled() {
            tracing::info!("🔍 Dry run, skipping the order record");
        }
        None
    };

    tracing::info!("✅ Script complete");
    Ok(ReplayOutcome {
        aggregate,
        breakdown,
        order,
    })
}

fn build_catalog_source(config: &QuoteConfig) -> Result<Box<dyn CatalogSource>> {
    let source = &config.catalog;
    match source.r#type.as_str() {
        "csv" => {
            let path = validate_required_field("catalog.path", &source.path)?;
            Ok(Box::new(CsvCatalog::new(path)))
        }
        "http" => {
            let endpoint = validate_required_field("catalog.endpoint", &source.endpoint)?;
            Ok(Box::new(HttpCatalog::new(endpoint.clone())))
        }
        "inline" => {
            let records = validate_required_field("catalog.products", &source.products)?;
            let products = records.iter().cloned().map(|r| r.into_product()).collect();
            Ok(Box::new(InMemoryCatalog::new(products)))
        }
        other => Err(CartError::InvalidConfigValueError {
            field: "catalog.type".to_string(),
            value: other.to_string(),
            reason: "unsupported catalog source".to_string(),
        }),
    }
}

fn build_discount_source(config: &QuoteConfig) -> Result<Box<dyn DiscountSource>> {
    let source = &config.discounts;
    match source.r#type.as_str() {
        "json" => {
            let path = validate_required_field("discounts.path", &source.path)?;
            Ok(Box::new(JsonDiscounts::new(path)))
        }
        "http" => {
            let endpoint = validate_required_field("discounts.endpoint", &source.endpoint)?;
            Ok(Box::new(HttpDiscounts::new(endpoint.clone())))
        }
        "inline" => {
            let records = validate_required_field("discounts.discounts", &source.discounts)?;
            let discounts = records
                .iter()
                .cloned()
                .map(|r| r.into_discount())
                .collect::<Result<Vec<_>>>()?;
            Ok(Box::new(InMemoryDiscounts::new(discounts)))
        }
        other => Err(CartError::InvalidConfigValueError {
            field: "discounts.type".to_string(),
            value: other.to_string(),
            reason: "unsupported discount source".to_string(),
        }),
    }
}

fn apply_action(session: &mut QuoteSession, index: usize, action: &ActionConfig) -> Result<()> {
    let field = |name: &str| format!("action[{}].{}", index, name);
    tracing::debug!("▶ action[{}]: {}", index, action.op);

    match action.op.as_str() {
        "add" => {
            let product = validate_required_field(&field("product"), &action.product)?;
            session.add_item(product)?;
        }
        "remove" => {
            let item_id = line_item(session, index, action)?;
            session.remove_item(item_id)?;
        }
        "quantity" => {
            let item_id = line_item(session, index, action)?;
            let value = *validate_required_field(&field("value"), &action.value)?;
            session.set_quantity(item_id, value)?;
        }
        "term" => {
            let item_id = line_item(session, index, action)?;
            let term = match action.months {
                Some(months) => Some(TermLength::from_months(months).ok_or_else(|| {
                    CartError::InvalidConfigValueError {
                        field: field("months"),
                        value: months.to_string(),
                        reason: "contract term must be 6 or 12 months".to_string(),
                    }
                })?),
                None => None,
            };
            session.set_contract_term(item_id, term)?;
        }
        "attach" => {
            let item_id = line_item(session, index, action)?;
            session.attach_discount(item_id, action.discount.as_deref())?;
        }
        "code" => {
            let code = validate_required_field(&field("code"), &action.code)?;
            let touched = session.apply_code(code)?;
            tracing::debug!("🏷️ Code attached to {} items", touched);
        }
        "override" => {
            let item_id = line_item(session, index, action)?;
            let amount = *validate_required_field(&field("amount"), &action.amount)?;
            session.apply_override(item_id, amount)?;
        }
        "clear-override" => {
            let item_id = line_item(session, index, action)?;
            session.clear_override(item_id)?;
        }
        other => {
            return Err(CartError::InvalidConfigValueError {
                field: field("op"),
                value: other.to_string(),
                reason: "unknown op".to_string(),
            })
        }
    }

    Ok(())
}

// 行號以目前購物車順序 1 起算
fn line_item(session: &QuoteSession, index: usize, action: &ActionConfig) -> Result<Uuid> {
    let field = format!("action[{}].line", index);
    let line = *validate_required_field(&field, &action.line)?;

    let position = line
        .checked_sub(1)
        .ok_or_else(|| CartError::InvalidConfigValueError {
            field: field.clone(),
            value: line.to_string(),
            reason: "line numbers start at 1".to_string(),
        })?;

    session
        .cart()
        .items()
        .get(position)
        .map(|item| item.id)
        .ok_or_else(|| CartError::InvalidConfigValueError {
            field,
            value: line.to_string(),
            reason: format!("cart has only {} lines", session.cart().len()),
        })
}
