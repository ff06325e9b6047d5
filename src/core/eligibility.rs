use crate::domain::model::{Discount, DiscountKind, DiscountRegistry, TermLength};
use chrono::{DateTime, Utc};

/// Whether an offer may appear in the generic eligible-discount list for a
/// product. Contract offers never do: they are reachable only through the
/// term selector. Expiry is inclusive of the exact instant.
pub fn is_applicable(discount: &Discount, product_id: &str, as_of: DateTime<Utc>) -> bool {
    discount.scope.covers(product_id)
        && !discount.kind.is_contract()
        && !discount.is_expired(as_of)
}

pub fn applicable_discounts<'a>(
    registry: &'a DiscountRegistry,
    product_id: &str,
    as_of: DateTime<Utc>,
) -> Vec<&'a Discount> {
    registry
        .discounts()
        .iter()
        .filter(|discount| is_applicable(discount, product_id, as_of))
        .collect()
}

/// Pick the contract offer that auto-attaches when a line commits to a
/// term. A product-specific scope outranks a blanket one; among equally
/// specific candidates the larger effect wins.
pub fn select_contract_discount<'a>(
    registry: &'a DiscountRegistry,
    product_id: &str,
    term: TermLength,
) -> Option<&'a Discount> {
    registry
        .discounts()
        .iter()
        .filter_map(|discount| match &discount.kind {
            DiscountKind::Contract {
                effect,
                term: declared,
            } if *declared == Some(term) && discount.scope.covers(product_id) => {
                Some((discount, (discount.scope.is_specific(), effect.value())))
            }
            _ => None,
        })
        .max_by_key(|(_, rank)| *rank)
        .map(|(discount, _)| discount)
}
