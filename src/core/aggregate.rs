use crate::core::cart::Cart;
use crate::core::resolver::resolve_price;
use crate::domain::model::{CartAggregate, CartItem, Discount, DiscountRegistry, LineBreakdown};
use rust_decimal::{Decimal, RoundingStrategy};

const DISPLAY_DECIMALS: u32 = 2;

/// The registry discount that currently governs a line, if any. Stale ids
/// (attached in an earlier session, since deleted) degrade to no discount.
pub fn resolved_discount<'a>(
    item: &CartItem,
    registry: &'a DiscountRegistry,
) -> Option<&'a Discount> {
    item.pricing
        .discount_id()
        .and_then(|discount_id| registry.discount(discount_id))
}

/// Totals are derived fresh on every call; nothing is cached and nothing
/// is rounded while accumulating.
pub fn aggregate(cart: &Cart, registry: &DiscountRegistry) -> CartAggregate {
    let mut subtotal = Decimal::ZERO;
    let mut final_total = Decimal::ZERO;

    for item in cart.items() {
        subtotal += item.item_total();
        final_total += resolve_price(item, resolved_discount(item, registry)).total;
    }

    CartAggregate {
        subtotal,
        total_discount: (subtotal - final_total).max(Decimal::ZERO),
        final_total,
    }
}

pub fn line_breakdown(cart: &Cart, registry: &DiscountRegistry) -> Vec<LineBreakdown> {
    cart.items()
        .iter()
        .map(|item| {
            let price = resolve_price(item, resolved_discount(item, registry));
            LineBreakdown {
                item_id: item.id,
                product_name: item.product.name.clone(),
                quantity: item.quantity,
                contract_term: item.pricing.term(),
                undiscounted_total: item.item_total(),
                discounted_total: price.total,
                applied_discount_name: price.discount_name,
            }
        })
        .collect()
}

/// Presentation rounding, applied only at output boundaries.
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}
