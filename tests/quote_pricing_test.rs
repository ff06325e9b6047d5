use anyhow::Result;
use quote_cart::adapters::memory::{InMemoryCatalog, InMemoryDiscounts};
use quote_cart::{
    BillingCycle, ContractEffect, Discount, DiscountKind, Product, ProductScope, QuoteSession,
    TermLength,
};
use rust_decimal_macros::dec;
use std::collections::HashSet;

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(vec![
        Product {
            id: "pro".to_string(),
            name: "Pro Plan".to_string(),
            price: dec!(100),
            billing_cycle: BillingCycle::Monthly,
        },
        Product {
            id: "suite".to_string(),
            name: "Full Suite".to_string(),
            price: dec!(1200),
            billing_cycle: BillingCycle::Yearly,
        },
        Product {
            id: "basic".to_string(),
            name: "Basic Plan".to_string(),
            price: dec!(40),
            billing_cycle: BillingCycle::Monthly,
        },
    ])
}

fn discounts() -> InMemoryDiscounts {
    let suite_only: HashSet<String> = ["suite".to_string()].into_iter().collect();

    InMemoryDiscounts::new(vec![
        Discount {
            id: "spring".to_string(),
            name: "Spring Promo".to_string(),
            code: "SPRING25".to_string(),
            kind: DiscountKind::Percentage { percent: dec!(25) },
            scope: ProductScope::All,
            expires_at: None,
        },
        Discount {
            id: "loyalty-12".to_string(),
            name: "Loyalty Saver".to_string(),
            code: "LOYALTY12".to_string(),
            kind: DiscountKind::Contract {
                effect: ContractEffect::PercentOff(dec!(10)),
                term: Some(TermLength::Twelve),
            },
            scope: ProductScope::All,
            expires_at: None,
        },
        Discount {
            id: "suite-free-2".to_string(),
            name: "2 Months Free".to_string(),
            code: "FREE2".to_string(),
            kind: DiscountKind::Contract {
                effect: ContractEffect::FreeMonths(2),
                term: Some(TermLength::Twelve),
            },
            scope: ProductScope::Only(suite_only),
            expires_at: None,
        },
    ])
}

async fn session() -> Result<QuoteSession> {
    Ok(QuoteSession::start(&catalog(), &discounts()).await?)
}

/// 完整報價流程：無折扣、百分比折扣、主管改價依序生效
#[tokio::test]
async fn test_discount_precedence_through_a_session() -> Result<()> {
    let mut session = session().await?;

    let item_id = session.add_item("pro")?;
    session.set_quantity(item_id, 2)?;
    assert_eq!(session.aggregate().subtotal, dec!(200));
    assert_eq!(session.aggregate().final_total, dec!(200));
    assert_eq!(session.aggregate().total_discount, dec!(0));

    session.attach_discount(item_id, Some("spring"))?;
    assert_eq!(session.aggregate().final_total, dec!(150));
    assert_eq!(session.aggregate().total_discount, dec!(50));

    session.apply_override(item_id, dec!(30))?;
    assert_eq!(session.aggregate().final_total, dec!(170));
    assert_eq!(session.aggregate().total_discount, dec!(30));

    // 清除改價不會還原先前的折扣
    session.clear_override(item_id)?;
    assert_eq!(session.aggregate().final_total, dec!(200));

    Ok(())
}

/// 年繳產品的免月數合約：月價 = 年價/12
#[tokio::test]
async fn test_contract_term_applies_months_free_pricing() -> Result<()> {
    let mut session = session().await?;

    let item_id = session.add_item("suite")?;
    session.set_contract_term(item_id, Some(TermLength::Twelve))?;

    // 1200/12 = 100 per month, 2 free months
    assert_eq!(session.aggregate().final_total, dec!(1000));

    let breakdown = session.line_breakdown();
    assert_eq!(breakdown[0].contract_term, Some(TermLength::Twelve));
    assert_eq!(
        breakdown[0].applied_discount_name,
        Some("2 Months Free".to_string())
    );

    Ok(())
}

/// 專屬產品的合約折扣勝過全品項折扣
#[tokio::test]
async fn test_specific_contract_offer_beats_blanket_offer() -> Result<()> {
    let mut session = session().await?;

    let suite_id = session.add_item("suite")?;
    session.set_contract_term(suite_id, Some(TermLength::Twelve))?;
    let breakdown = session.line_breakdown();
    assert_eq!(
        breakdown[0].applied_discount_name,
        Some("2 Months Free".to_string())
    );

    // pro 只有全品項的 Loyalty Saver 可選
    let pro_id = session.add_item("pro")?;
    session.set_contract_term(pro_id, Some(TermLength::Twelve))?;
    let breakdown = session.line_breakdown();
    let pro_line = breakdown.iter().find(|l| l.item_id == pro_id).unwrap();
    assert_eq!(
        pro_line.applied_discount_name,
        Some("Loyalty Saver".to_string())
    );
    assert_eq!(pro_line.discounted_total, dec!(90));

    Ok(())
}

/// 取消合約期也會一併取消自動附掛的合約折扣
#[tokio::test]
async fn test_leaving_a_term_clears_the_contract_discount() -> Result<()> {
    let mut session = session().await?;

    let item_id = session.add_item("pro")?;
    session.apply_code("SPRING25")?;
    assert_eq!(session.aggregate().final_total, dec!(75));

    // 選擇合約期會取代促銷碼
    session.set_contract_term(item_id, Some(TermLength::Twelve))?;
    assert_eq!(session.aggregate().final_total, dec!(90));

    // 回到無合約：折扣全部清空，促銷碼不會自動復原
    session.set_contract_term(item_id, None)?;
    assert_eq!(session.aggregate().final_total, dec!(100));
    assert_eq!(session.aggregate().total_discount, dec!(0));

    Ok(())
}

/// 改價金額大於小計時，總額夾在零
#[tokio::test]
async fn test_override_floors_at_zero() -> Result<()> {
    let mut session = session().await?;

    let item_id = session.add_item("basic")?;
    session.apply_override(item_id, dec!(500))?;

    let totals = session.aggregate();
    assert_eq!(totals.final_total, dec!(0));
    assert_eq!(totals.total_discount, dec!(40));

    Ok(())
}

/// 可選折扣清單只列出未過期、範圍內的非合約折扣
#[tokio::test]
async fn test_applicable_discounts_listing() -> Result<()> {
    let session = session().await?;

    let for_pro = session.applicable_discounts("pro");
    assert_eq!(for_pro.len(), 1);
    assert_eq!(for_pro[0].id, "spring");

    // 合約折扣只能經由合約期選擇器取得
    let for_suite = session.applicable_discounts("suite");
    assert!(for_suite.iter().all(|d| d.id != "suite-free-2"));

    Ok(())
}
