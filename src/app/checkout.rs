use crate::core::aggregate::{aggregate, line_breakdown, round_display};
use crate::core::cart::Cart;
use crate::domain::model::{CartAggregate, CheckoutSummary, DiscountRegistry, LineBreakdown};
use chrono::Utc;
use uuid::Uuid;

/// Turn the current cart into the order record handed to the checkout
/// collaborator. This is the output boundary, so amounts get their 2 dp
/// presentation rounding here.
pub fn build_summary(cart: &Cart, registry: &DiscountRegistry) -> CheckoutSummary {
    let totals = aggregate(cart, registry);
    let lines = line_breakdown(cart, registry)
        .into_iter()
        .map(|mut line| {
            line.undiscounted_total = round_display(line.undiscounted_total);
            line.discounted_total = round_display(line.discounted_total);
            line
        })
        .collect();

    CheckoutSummary {
        reference: new_reference(),
        created_at: Utc::now(),
        lines,
        subtotal: round_display(totals.subtotal),
        total_discount: round_display(totals.total_discount),
        final_total: round_display(totals.final_total),
    }
}

pub fn render_summary(summary: &CheckoutSummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Order {} ({})",
        summary.reference,
        summary.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    for line in &summary.lines {
        lines.push(format_line(line));
    }
    lines.push(format!("Subtotal: {:.2}", summary.subtotal));
    lines.push(format!("Total discount: {:.2}", summary.total_discount));
    lines.push(format!("Total: {:.2}", summary.final_total));

    lines.join("\n")
}

/// Quote view of a cart that has not been checked out yet. Takes the raw
/// breakdown and totals and applies the display rounding itself.
pub fn render_quote(title: &str, breakdown: &[LineBreakdown], totals: &CartAggregate) -> String {
    let mut lines = vec![format!("Quote: {}", title)];

    for line in breakdown {
        let mut line = line.clone();
        line.undiscounted_total = round_display(line.undiscounted_total);
        line.discounted_total = round_display(line.discounted_total);
        lines.push(format_line(&line));
    }

    lines.push(format!("Subtotal: {:.2}", round_display(totals.subtotal)));
    lines.push(format!(
        "Total discount: {:.2}",
        round_display(totals.total_discount)
    ));
    lines.push(format!("Total: {:.2}", round_display(totals.final_total)));

    lines.join("\n")
}

fn format_line(line: &LineBreakdown) -> String {
    let term = match line.contract_term {
        Some(term) => format!(" [{}-month term]", term.months()),
        None => String::new(),
    };
    let discount = match &line.applied_discount_name {
        Some(name) => format!(" ({})", name),
        None => String::new(),
    };
    format!(
        "  {} x {}{}: {:.2} -> {:.2}{}",
        line.quantity,
        line.product_name,
        term,
        line.undiscounted_total,
        line.discounted_total,
        discount
    )
}

fn new_reference() -> String {
    let tag = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", tag[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        BillingCycle, Discount, DiscountKind, Product, ProductScope, TermLength,
    };
    use rust_decimal_macros::dec;

    fn fixture() -> (Cart, DiscountRegistry) {
        let registry = DiscountRegistry::new(vec![Discount {
            id: "quarter".to_string(),
            name: "Quarter Off".to_string(),
            code: "QUARTER".to_string(),
            kind: DiscountKind::Percentage { percent: dec!(25) },
            scope: ProductScope::All,
            expires_at: None,
        }]);

        let mut cart = Cart::new();
        let item_id = cart.add_item(Product {
            id: "pro".to_string(),
            name: "Pro Plan".to_string(),
            price: dec!(99.99),
            billing_cycle: BillingCycle::Monthly,
        });
        cart.set_quantity(item_id, 2).unwrap();
        cart.apply_code("QUARTER", &registry, Utc::now()).unwrap();

        (cart, registry)
    }

    #[test]
    fn test_build_summary_rounds_at_the_boundary() {
        let (cart, registry) = fixture();

        let summary = build_summary(&cart, &registry);

        // 199.98 * 0.75 = 149.985 -> 149.99 displayed
        assert_eq!(summary.subtotal, dec!(199.98));
        assert_eq!(summary.final_total, dec!(149.99));
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.lines[0].discounted_total, dec!(149.99));
        assert_eq!(
            summary.lines[0].applied_discount_name,
            Some("Quarter Off".to_string())
        );
    }

    #[test]
    fn test_reference_format() {
        let (cart, registry) = fixture();

        let first = build_summary(&cart, &registry);
        let second = build_summary(&cart, &registry);

        assert!(first.reference.starts_with("ORD-"));
        assert_eq!(first.reference.len(), 12);
        assert_ne!(first.reference, second.reference);
    }

    #[test]
    fn test_render_quote_pads_amounts_to_two_decimals() {
        let (cart, registry) = fixture();

        let rendered = render_quote(
            "spring-quote",
            &line_breakdown(&cart, &registry),
            &aggregate(&cart, &registry),
        );

        assert!(rendered.starts_with("Quote: spring-quote"));
        // 199.98 * 0.75 = 149.985, displayed as 149.99
        assert!(rendered.contains("2 x Pro Plan: 199.98 -> 149.99 (Quarter Off)"));
        assert!(rendered.contains("Total: 149.99"));
    }

    #[test]
    fn test_render_mentions_lines_and_totals() {
        let (mut cart, registry) = fixture();
        let basic_id = cart.add_item(Product {
            id: "basic".to_string(),
            name: "Basic Plan".to_string(),
            price: dec!(40),
            billing_cycle: BillingCycle::Monthly,
        });
        cart.set_contract_term(basic_id, Some(TermLength::Twelve), &registry)
            .unwrap();

        let summary = build_summary(&cart, &registry);
        let rendered = render_summary(&summary);

        assert!(rendered.contains(&summary.reference));
        assert!(rendered.contains("2 x Pro Plan"));
        assert!(rendered.contains("(Quarter Off)"));
        assert!(rendered.contains("1 x Basic Plan [12-month term]"));
        assert!(rendered.contains("Total discount:"));
    }
}
