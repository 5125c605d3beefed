//! PosHttpClient — HTTP client for the POS catalog and order APIs

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::models::{OrderLineItem, OrderSnapshot};
use std::time::Duration;

use super::{PosClient, PosError, RemoteCatalogItem, RemoteCategory};
use crate::utils::AppError;

/// Paged catalog response
#[derive(Debug, Deserialize)]
struct CatalogPage {
    items: Vec<RemoteCatalogItem>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryList {
    categories: Vec<RemoteCategory>,
}

#[derive(Debug, serde::Serialize)]
struct CreateOrderBody<'a> {
    room_number: &'a str,
    guest_name: &'a str,
}

#[derive(Debug, serde::Serialize)]
struct AppendItemsBody<'a> {
    items: &'a [OrderLineItem],
}

/// HTTP client for the POS API
pub struct PosHttpClient {
    client: Client,
    base_url: String,
}

impl PosHttpClient {
    /// Create a new client.
    ///
    /// `timeout` applies per request; every POS call is a blocking I/O
    /// boundary and must stay bounded.
    pub fn new(
        base_url: String,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let mut builder = Client::builder().timeout(timeout);

        if let Some(token) = access_token {
            let mut headers = reqwest::header::HeaderMap::new();
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| AppError::Internal(format!("Invalid POS access token: {e}")))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn transport_error(e: reqwest::Error) -> PosError {
        PosError::Unavailable(e.to_string())
    }

    /// Turn a non-success response into a `PosError::Rejected`.
    async fn rejection(response: reqwest::Response) -> PosError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        PosError::Rejected { status, message }
    }
}

#[async_trait]
impl PosClient for PosHttpClient {
    async fn list_catalog_items(&self) -> Result<Vec<RemoteCatalogItem>, PosError> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(format!("{}/catalog/items", self.base_url));
            if let Some(ref c) = cursor {
                request = request.query(&[("cursor", c.as_str())]);
            }

            let response = request.send().await.map_err(Self::transport_error)?;
            if !response.status().is_success() {
                return Err(Self::rejection(response).await);
            }

            let page: CatalogPage = response
                .json()
                .await
                .map_err(|e| PosError::Rejected {
                    status: 200,
                    message: format!("malformed catalog page: {e}"),
                })?;

            items.extend(page.items);
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(items)
    }

    async fn list_categories(&self) -> Result<Vec<RemoteCategory>, PosError> {
        let response = self
            .client
            .get(format!("{}/catalog/categories", self.base_url))
            .send()
            .await
            .map_err(Self::transport_error)?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let list: CategoryList = response.json().await.map_err(|e| PosError::Rejected {
            status: 200,
            message: format!("malformed category list: {e}"),
        })?;
        Ok(list.categories)
    }

    async fn get_order(&self, order_id: &str) -> Result<OrderSnapshot, PosError> {
        let response = self
            .client
            .get(format!("{}/orders/{order_id}", self.base_url))
            .send()
            .await
            .map_err(Self::transport_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PosError::OrderNotFound(order_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        response.json().await.map_err(|e| PosError::Rejected {
            status: 200,
            message: format!("malformed order: {e}"),
        })
    }

    async fn create_order(
        &self,
        room_number: &str,
        guest_name: &str,
    ) -> Result<OrderSnapshot, PosError> {
        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .json(&CreateOrderBody {
                room_number,
                guest_name,
            })
            .send()
            .await
            .map_err(Self::transport_error)?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        response.json().await.map_err(|e| PosError::Rejected {
            status: 200,
            message: format!("malformed order: {e}"),
        })
    }

    async fn append_line_items(
        &self,
        order_id: &str,
        items: &[OrderLineItem],
    ) -> Result<OrderSnapshot, PosError> {
        let response = self
            .client
            .post(format!("{}/orders/{order_id}/line-items", self.base_url))
            .json(&AppendItemsBody { items })
            .send()
            .await
            .map_err(Self::transport_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PosError::OrderNotFound(order_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        response.json().await.map_err(|e| PosError::Rejected {
            status: 200,
            message: format!("malformed order: {e}"),
        })
    }
}
