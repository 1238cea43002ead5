//! Inventory ledger service
//!
//! The only write path for item counters and derived status labels. Input
//! validation happens here, before any store access; the atomic counter
//! mutations themselves live in the items repository.

use std::time::Duration;

use crate::{
    error::{is_transient_store_error, AppError, AppResult},
    models::{
        item::{CreateItem, Item, ReturnOutcome, UpdateItem},
        ItemStatus,
    },
    repository::Repository,
};

/// Single retry backoff for transient store errors
const RETRY_BACKOFF_MS: u64 = 50;

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
}

impl InventoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Item>> {
        self.repository.items.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Item> {
        self.repository.items.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateItem) -> AppResult<Item> {
        self.repository.items.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateItem) -> AppResult<Item> {
        self.repository.items.update(id, data).await
    }

    /// Take `qty` units of an item out of the pool
    pub async fn approve_checkout(&self, item_id: i32, qty: i32) -> AppResult<Item> {
        if qty <= 0 {
            return Err(AppError::Validation(
                "Checkout quantity must be positive".to_string(),
            ));
        }

        let item = self
            .with_retry(|| self.repository.items.approve_checkout(item_id, qty))
            .await?;
        tracing::info!(
            item_id,
            qty,
            available = item.quantity_available,
            "checkout approved"
        );
        Ok(item)
    }

    /// Put `qty` units of an item back into the pool, clamping at the total
    pub async fn register_return(&self, item_id: i32, qty: i32) -> AppResult<ReturnOutcome> {
        if qty <= 0 {
            return Err(AppError::Validation(
                "Return quantity must be positive".to_string(),
            ));
        }

        let outcome = self.repository.items.register_return(item_id, qty).await?;
        if outcome.over_return > 0 {
            tracing::warn!(
                item_id,
                qty,
                over_return = outcome.over_return,
                "over-return clamped at item total"
            );
        }
        Ok(outcome)
    }

    /// Change the physical unit count of an item
    pub async fn adjust_total(&self, item_id: i32, new_total: i32) -> AppResult<Item> {
        if new_total < 0 {
            return Err(AppError::Validation(
                "Total quantity must be non-negative".to_string(),
            ));
        }
        self.repository.items.adjust_total(item_id, new_total).await
    }

    /// Administrative transition into UnderRepair or Retired
    pub async fn set_maintenance_status(&self, item_id: i32, status: ItemStatus) -> AppResult<Item> {
        if !status.is_administrative() {
            return Err(AppError::Validation(format!(
                "Status {} is derived from the counters and cannot be set directly",
                status
            )));
        }
        self.repository.items.set_status(item_id, status).await?;
        tracing::info!(item_id, %status, "item taken out of service");
        self.repository.items.get_by_id(item_id).await
    }

    /// Bring an item back into service; the label is recomputed from the
    /// counters rather than restored to what it was
    pub async fn return_to_service(&self, item_id: i32) -> AppResult<Item> {
        let item = self.repository.items.get_by_id(item_id).await?;
        if !item.status().is_administrative() {
            return Err(AppError::Lifecycle(format!(
                "Item {} is already in service",
                item_id
            )));
        }
        self.repository.items.refresh_status(item_id).await
    }

    /// Retry an operation once when the store hiccups
    async fn with_retry<T, F, Fut>(&self, op: F) -> AppResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = AppResult<T>>,
    {
        match op().await {
            Err(AppError::Database(e)) if is_transient_store_error(&e) => {
                tracing::warn!(error = %e, "transient store error, retrying once");
                tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS)).await;
                op().await
            }
            other => other,
        }
    }
}
