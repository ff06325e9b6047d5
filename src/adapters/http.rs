use crate::adapters::wire::{DiscountRecord, ProductRecord};
use crate::domain::model::{Catalog, Discount, DiscountRegistry};
use crate::domain::ports::{CatalogSource, DiscountSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Catalog snapshot fetched from the CRM backend over HTTP.
pub struct HttpCatalog {
    client: Client,
    url: String,
}

impl HttpCatalog {
    pub fn new(url: impl Into<String>) -> Self {
        HttpCatalog {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn load_catalog(&self) -> Result<Catalog> {
        tracing::debug!("Making catalog request to: {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        tracing::debug!("Catalog response status: {}", response.status());

        let records: Vec<ProductRecord> = response.error_for_status()?.json().await?;
        let products = records
            .into_iter()
            .map(ProductRecord::into_product)
            .collect::<Vec<_>>();

        tracing::info!("📦 Catalog loaded: {} products from {}", products.len(), self.url);
        Ok(Catalog::new(products))
    }
}

pub struct HttpDiscounts {
    client: Client,
    url: String,
}

impl HttpDiscounts {
    pub fn new(url: impl Into<String>) -> Self {
        HttpDiscounts {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl DiscountSource for HttpDiscounts {
    async fn load_discounts(&self) -> Result<DiscountRegistry> {
        tracing::debug!("Making discount request to: {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        tracing::debug!("Discount response status: {}", response.status());

        let records: Vec<DiscountRecord> = response.error_for_status()?.json().await?;
        let discounts = records
            .into_iter()
            .map(DiscountRecord::into_discount)
            .collect::<Result<Vec<Discount>>>()?;

        tracing::info!(
            "🏷️ Discounts loaded: {} offers from {}",
            discounts.len(),
            self.url
        );
        Ok(DiscountRegistry::new(discounts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ContractEffect, DiscountKind, TermLength};
    use crate::utils::error::CartError;
    use httpmock::prelude::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[tokio::test]
    async fn test_http_catalog_parses_backend_payload() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(200).json_body(json!([
                {"id": "pro", "name": "Pro Plan", "price": "100", "billingCycle": "MONTHLY"},
                {"id": "suite", "name": "Full Suite", "price": "1200", "billingCycle": "YEARLY"}
            ]));
        });

        let catalog = HttpCatalog::new(server.url("/products"))
            .load_catalog()
            .await
            .unwrap();

        mock.assert();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.product("pro").unwrap().price, dec!(100));
    }

    #[tokio::test]
    async fn test_http_catalog_propagates_server_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(500);
        });

        let err = HttpCatalog::new(server.url("/products"))
            .load_catalog()
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_http_discounts_tag_contract_effects() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/discounts");
            then.status(200).json_body(json!([
                {
                    "id": "promo-free",
                    "name": "6 Months - 1 Month Free",
                    "type": "CONTRACT",
                    "value": 1,
                    "contractTerm": 6
                }
            ]));
        });

        let registry = HttpDiscounts::new(server.url("/discounts"))
            .load_discounts()
            .await
            .unwrap();

        assert_eq!(
            registry.discount("promo-free").unwrap().kind,
            DiscountKind::Contract {
                effect: ContractEffect::FreeMonths(1),
                term: Some(TermLength::Six),
            }
        );
    }

    #[tokio::test]
    async fn test_http_discounts_reject_bad_records() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/discounts");
            then.status(200).json_body(json!([
                {
                    "id": "bad",
                    "name": "Broken",
                    "type": "CONTRACT",
                    "value": 1,
                    "contractTerm": 18
                }
            ]));
        });

        let err = HttpDiscounts::new(server.url("/discounts"))
            .load_discounts()
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::InvalidConfigValueError { .. }));
    }
}
