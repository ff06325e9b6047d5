use crate::core::eligibility::{is_applicable, select_contract_discount};
use crate::domain::model::{CartItem, DiscountRegistry, PricingMode, Product, TermLength};
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{validate_override_amount, validate_quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// The in-progress order. Every mutation either succeeds completely or
/// leaves the cart exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item(&self, item_id: Uuid) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn add_item(&mut self, product: Product) -> Uuid {
        let item = CartItem::new(product);
        let item_id = item.id;
        self.items.push(item);
        item_id
    }

    pub fn remove_item(&mut self, item_id: Uuid) -> Result<()> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(CartError::ItemNotFound { item_id })?;
        self.items.remove(position);
        Ok(())
    }

    pub fn set_quantity(&mut self, item_id: Uuid, quantity: u32) -> Result<()> {
        validate_quantity(quantity)?;
        let item = self.item_mut(item_id)?;
        item.quantity = quantity;
        Ok(())
    }

    /// Commit a line to a contract term (or back to none). Committing
    /// auto-attaches the winning contract offer and displaces any promo
    /// attachment; leaving the term clears the auto-attached offer and
    /// restores nothing. An active override keeps winning the price; only
    /// the recorded term changes.
    pub fn set_contract_term(
        &mut self,
        item_id: Uuid,
        term: Option<TermLength>,
        registry: &DiscountRegistry,
    ) -> Result<()> {
        let item = self.item_mut(item_id)?;

        item.pricing = match (term, &item.pricing) {
            (Some(term), PricingMode::Overridden { amount, .. }) => PricingMode::Overridden {
                amount: *amount,
                term: Some(term),
            },
            (Some(term), _) => {
                let winner = select_contract_discount(registry, &item.product.id, term);
                PricingMode::Contracted {
                    term,
                    discount_id: winner.map(|discount| discount.id.clone()),
                }
            }
            (None, PricingMode::Overridden { amount, .. }) => PricingMode::Overridden {
                amount: *amount,
                term: None,
            },
            (None, PricingMode::Contracted { .. }) => PricingMode::NoDiscount,
            (None, other) => other.clone(),
        };

        Ok(())
    }

    /// Manual selection from the eligible-discount list. Term-committed
    /// lines reject it: their discount is governed by the term selector.
    pub fn attach_discount(
        &mut self,
        item_id: Uuid,
        discount_id: Option<&str>,
        registry: &DiscountRegistry,
        as_of: DateTime<Utc>,
    ) -> Result<()> {
        // 先查驗折扣，再動購物車
        let discount = match discount_id {
            Some(discount_id) => Some(registry.discount(discount_id).ok_or_else(|| {
                CartError::DiscountNotFound {
                    discount_id: discount_id.to_string(),
                }
            })?),
            None => None,
        };

        let item = self.item_mut(item_id)?;

        match (discount, &item.pricing) {
            // 承諾期內的行不接受手動選擇
            (Some(discount), PricingMode::Contracted { .. })
            | (Some(discount), PricingMode::Overridden { term: Some(_), .. }) => {
                return Err(CartError::DiscountNotSelectable {
                    discount_id: discount.id.clone(),
                });
            }
            (Some(discount), _) => {
                if !is_applicable(discount, &item.product.id, as_of) {
                    return Err(CartError::DiscountNotSelectable {
                        discount_id: discount.id.clone(),
                    });
                }
                item.pricing = PricingMode::Attached {
                    discount_id: discount.id.clone(),
                };
            }
            (None, PricingMode::Attached { .. }) => {
                item.pricing = PricingMode::NoDiscount;
            }
            (None, PricingMode::Contracted { term, .. }) => {
                item.pricing = PricingMode::Contracted {
                    term: *term,
                    discount_id: None,
                };
            }
            (None, _) => {}
        }

        Ok(())
    }

    /// Cart-wide promo code entry. Two phases: validate the code and
    /// collect eligible lines without touching anything, then attach to
    /// all of them. Any failure leaves every line unchanged. Re-applying
    /// the same code is idempotent, not an error.
    pub fn apply_code(
        &mut self,
        code: &str,
        registry: &DiscountRegistry,
        as_of: DateTime<Utc>,
    ) -> Result<usize> {
        let normalized = code.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(CartError::CodeEmpty);
        }

        let discount = registry
            .discount_by_code(&normalized)
            .ok_or_else(|| CartError::InvalidCode {
                code: normalized.clone(),
            })?;

        if discount.kind.is_contract() {
            return Err(CartError::NotApplicableViaCode { code: normalized });
        }

        if discount.is_expired(as_of) {
            return Err(CartError::CodeExpired { code: normalized });
        }

        // 第一階段：挑出符合資格的行（承諾期以外且商品適用），不改動狀態
        let eligible: Vec<Uuid> = self
            .items
            .iter()
            .filter(|item| {
                item.pricing.term().is_none()
                    && is_applicable(discount, &item.product.id, as_of)
            })
            .map(|item| item.id)
            .collect();

        if eligible.is_empty() {
            return Err(CartError::NoEligibleItems { code: normalized });
        }

        // 第二階段：一次套用到所有符合資格的行，並清掉主管改價
        let discount_id = discount.id.clone();
        for item in self.items.iter_mut() {
            if eligible.contains(&item.id) {
                item.pricing = PricingMode::Attached {
                    discount_id: discount_id.clone(),
                };
            }
        }

        tracing::debug!(
            "Applied code {} to {} line(s) as discount {}",
            normalized,
            eligible.len(),
            discount_id
        );

        Ok(eligible.len())
    }

    /// Manager override: a flat reduction that outranks every other
    /// mechanism. The committed term, if any, stays recorded.
    pub fn apply_override(&mut self, item_id: Uuid, amount: Decimal) -> Result<()> {
        validate_override_amount(amount)?;
        let item = self.item_mut(item_id)?;
        item.pricing = PricingMode::Overridden {
            amount,
            term: item.pricing.term(),
        };
        Ok(())
    }

    /// Clearing an override restores no prior discount: the line reverts
    /// to its bare term commitment, or to no discount at all.
    pub fn clear_override(&mut self, item_id: Uuid) -> Result<()> {
        let item = self.item_mut(item_id)?;
        if let PricingMode::Overridden { term, .. } = item.pricing {
            item.pricing = match term {
                Some(term) => PricingMode::Contracted {
                    term,
                    discount_id: None,
                },
                None => PricingMode::NoDiscount,
            };
        }
        Ok(())
    }

    fn item_mut(&mut self, item_id: Uuid) -> Result<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or(CartError::ItemNotFound { item_id })
    }
}
