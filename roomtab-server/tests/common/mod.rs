//! Shared test fixtures: in-memory store + scriptable POS double.

#![allow(dead_code)]

use async_trait::async_trait;
use roomtab_server::DbService;
use roomtab_server::pos::{PosClient, PosError, RemoteCatalogItem, RemoteCategory};
use shared::models::{OrderLineItem, OrderSnapshot};
use shared::util::now_millis;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// In-memory SQLite pool with migrations applied.
pub async fn test_pool() -> SqlitePool {
    DbService::in_memory()
        .await
        .expect("open in-memory database")
        .pool
}

pub fn remote_item(
    id: &str,
    name: &str,
    price: i64,
    currency: &str,
    category_id: Option<&str>,
) -> RemoteCatalogItem {
    RemoteCatalogItem {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} description"),
        category_id: category_id.map(str::to_string),
        price,
        currency: currency.to_string(),
        image: Some(format!("img://{id}")),
        stock_quantity: Some(10),
    }
}

/// Scriptable in-process POS double.
///
/// Failure flags switch individual operations to transport errors; the
/// order map plays the POS-side system of record.
#[derive(Default)]
pub struct MockPos {
    pub items: Mutex<Vec<RemoteCatalogItem>>,
    pub categories: Mutex<Vec<RemoteCategory>>,
    pub orders: Mutex<HashMap<String, OrderSnapshot>>,

    pub fail_items: AtomicBool,
    pub fail_categories: AtomicBool,
    pub fail_get_order: AtomicBool,
    pub fail_create_order: AtomicBool,
    pub fail_append: AtomicBool,

    pub create_order_calls: AtomicU32,
    next_order: AtomicU32,
}

impl MockPos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<RemoteCatalogItem>) -> Self {
        let mock = Self::default();
        *mock.items.lock().unwrap() = items;
        mock
    }

    pub fn set_items(&self, items: Vec<RemoteCatalogItem>) {
        *self.items.lock().unwrap() = items;
    }

    pub fn set_categories(&self, categories: Vec<(&str, &str)>) {
        *self.categories.lock().unwrap() = categories
            .into_iter()
            .map(|(id, name)| RemoteCategory {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();
    }

    /// Flip the POS-side state of an order (e.g. staff closed it).
    pub fn set_order_state(&self, order_id: &str, state: &str) {
        if let Some(order) = self.orders.lock().unwrap().get_mut(order_id) {
            order.state = state.to_string();
        }
    }

    /// Drop an order entirely, as if the POS purged it.
    pub fn remove_order(&self, order_id: &str) {
        self.orders.lock().unwrap().remove(order_id);
    }

    fn outage() -> PosError {
        PosError::Unavailable("simulated outage".to_string())
    }
}

#[async_trait]
impl PosClient for MockPos {
    async fn list_catalog_items(&self) -> Result<Vec<RemoteCatalogItem>, PosError> {
        if self.fail_items.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        Ok(self.items.lock().unwrap().clone())
    }

    async fn list_categories(&self) -> Result<Vec<RemoteCategory>, PosError> {
        if self.fail_categories.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn get_order(&self, order_id: &str) -> Result<OrderSnapshot, PosError> {
        if self.fail_get_order.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.orders
            .lock()
            .unwrap()
            .get(order_id)
            .cloned()
            .ok_or_else(|| PosError::OrderNotFound(order_id.to_string()))
    }

    async fn create_order(
        &self,
        _room_number: &str,
        _guest_name: &str,
    ) -> Result<OrderSnapshot, PosError> {
        if self.fail_create_order.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.create_order_calls.fetch_add(1, Ordering::SeqCst);
        let n = self.next_order.fetch_add(1, Ordering::SeqCst) + 1;
        let order = OrderSnapshot {
            id: format!("pos-order-{n}"),
            state: "open".to_string(),
            line_items: Vec::new(),
            created_at: Some(now_millis()),
        };
        self.orders
            .lock()
            .unwrap()
            .insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn append_line_items(
        &self,
        order_id: &str,
        items: &[OrderLineItem],
    ) -> Result<OrderSnapshot, PosError> {
        if self.fail_append.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| PosError::OrderNotFound(order_id.to_string()))?;
        order.line_items.extend_from_slice(items);
        Ok(order.clone())
    }
}
