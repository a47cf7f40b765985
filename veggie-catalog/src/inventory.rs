use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use veggie_core::{CoreError, CoreResult, InventoryRepository, Store, StoreSession};
use veggie_shared::models::{InventoryItem, StockMovementKind, StockTransaction};

/// Check a movement before touching any stock
pub fn validate_movement(transaction: &StockTransaction) -> CoreResult<()> {
    if transaction.quantity <= rust_decimal::Decimal::ZERO {
        return Err(CoreError::ValidationError(format!(
            "Stock movement quantity must be positive, got {}",
            transaction.quantity
        )));
    }

    if transaction.kind == StockMovementKind::Transfer {
        let has_destination = transaction
            .destination_location
            .as_deref()
            .map_or(false, |location| !location.trim().is_empty());
        if !has_destination {
            return Err(CoreError::ValidationError(
                "Transfer requires a destination location".to_string(),
            ));
        }
    }

    Ok(())
}

/// Apply the source-side effect of a movement to `item`.
/// On error `item` is left untouched.
pub fn apply_movement(item: &mut InventoryItem, transaction: &StockTransaction) -> CoreResult<()> {
    let requested = transaction.quantity;

    match transaction.kind {
        StockMovementKind::In => {
            item.quantity = item
                .quantity
                .checked_add(requested)
                .ok_or_else(|| CoreError::overflow(format!("stock of inventory item {}", item.id)))?;
            item.last_restocked = Some(transaction.transaction_date);
        }
        StockMovementKind::Out | StockMovementKind::Transfer => {
            if item.quantity < requested {
                return Err(CoreError::InsufficientStock {
                    item_id: item.id,
                    requested,
                    available: item.quantity,
                });
            }
            item.quantity -= requested;
        }
        StockMovementKind::Waste => {
            if item.quantity < requested {
                return Err(CoreError::InvalidQuantity {
                    item_id: item.id,
                    requested,
                    available: item.quantity,
                });
            }
            let wastage = item
                .wastage_quantity
                .checked_add(requested)
                .ok_or_else(|| CoreError::overflow(format!("wastage of inventory item {}", item.id)))?;
            item.quantity -= requested;
            item.wastage_quantity = wastage;
        }
    }

    Ok(())
}

/// Applies stock movements inside the caller's session and keeps the audit trail
#[derive(Debug, Clone, Copy, Default)]
pub struct StockLedger;

impl StockLedger {
    pub fn new() -> Self {
        Self
    }

    /// Apply one movement and append its audit row. Returns the recorded row.
    pub async fn apply<S>(
        &self,
        session: &mut S,
        mut transaction: StockTransaction,
    ) -> CoreResult<StockTransaction>
    where
        S: InventoryRepository + ?Sized,
    {
        validate_movement(&transaction)?;

        let mut item = session
            .inventory_item(transaction.inventory_item_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Inventory item", transaction.inventory_item_id))?;

        let destination = match transaction.kind {
            StockMovementKind::Transfer => {
                let destination = transaction.destination_location.clone().unwrap_or_default();
                if destination == item.location_code {
                    return Err(CoreError::ValidationError(format!(
                        "Transfer source and destination are both {}",
                        destination
                    )));
                }
                Some(destination)
            }
            _ => None,
        };

        apply_movement(&mut item, &transaction)?;
        let now = Utc::now();

        if let Some(destination) = destination {
            transaction
                .source_location
                .get_or_insert_with(|| item.location_code.clone());

            match session
                .inventory_at_location(item.vegetable_id, &destination)
                .await?
            {
                Some(mut existing) => {
                    existing.quantity = existing
                        .quantity
                        .checked_add(transaction.quantity)
                        .ok_or_else(|| {
                            CoreError::overflow(format!("stock of inventory item {}", existing.id))
                        })?;
                    existing.updated_at = now;
                    session.update_inventory_item(&existing).await?;
                }
                None => {
                    let created = item.relocated(destination.as_str(), transaction.quantity);
                    session.insert_inventory_item(&created).await?;
                    info!(
                        "Created inventory for {} at {} from transfer",
                        created.vegetable_name, destination
                    );
                }
            }
        }

        item.updated_at = now;
        session.update_inventory_item(&item).await?;
        session.insert_stock_transaction(&transaction).await?;

        debug!(
            "Applied {} of {} {} to inventory item {} (now {})",
            transaction.kind, transaction.quantity, transaction.unit, item.id, item.quantity
        );

        Ok(transaction)
    }
}

/// Manual stock adjustments and inventory read models
pub struct InventoryService<S> {
    store: Arc<S>,
    ledger: StockLedger,
}

impl<S: Store> InventoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            ledger: StockLedger::new(),
        }
    }

    /// Apply a movement as its own atomic unit
    pub async fn record(&self, transaction: StockTransaction) -> CoreResult<StockTransaction> {
        let mut session = self.store.begin().await?;
        let recorded = self.ledger.apply(&mut session, transaction).await?;
        session.commit().await?;
        Ok(recorded)
    }

    pub async fn inventory(&self) -> CoreResult<Vec<InventoryItem>> {
        let mut session = self.store.begin().await?;
        session.list_inventory().await
    }

    pub async fn item(&self, id: Uuid) -> CoreResult<Option<InventoryItem>> {
        let mut session = self.store.begin().await?;
        session.inventory_item(id).await
    }

    pub async fn item_at_location(
        &self,
        vegetable_id: Uuid,
        location_code: &str,
    ) -> CoreResult<Option<InventoryItem>> {
        let mut session = self.store.begin().await?;
        session.inventory_at_location(vegetable_id, location_code).await
    }

    /// Items at or below their reorder point
    pub async fn low_stock(&self) -> CoreResult<Vec<InventoryItem>> {
        let items = self.inventory().await?;
        Ok(items.into_iter().filter(InventoryItem::is_low_stock).collect())
    }

    /// Items expiring within `days` from now
    pub async fn expiring(&self, days: i64) -> CoreResult<Vec<InventoryItem>> {
        let now = Utc::now();
        let items = self.inventory().await?;
        Ok(items
            .into_iter()
            .filter(|item| item.expires_within(now, days))
            .collect())
    }

    pub async fn history(
        &self,
        inventory_item_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CoreResult<Vec<StockTransaction>> {
        let mut session = self.store.begin().await?;
        session.stock_transactions(inventory_item_id, start, end).await
    }

    /// Insert a new inventory row, or update the settings of an existing one.
    ///
    /// Stock levels of an existing row only move through [`StockLedger`], so an update keeps
    /// the stored quantity, wastage, restock date and location.
    pub async fn save_item(&self, item: &mut InventoryItem) -> CoreResult<()> {
        let mut session = self.store.begin().await?;
        item.updated_at = Utc::now();
        if let Some(stored) = session.inventory_item(item.id).await? {
            item.quantity = stored.quantity;
            item.wastage_quantity = stored.wastage_quantity;
            item.last_restocked = stored.last_restocked;
            item.location_code = stored.location_code;
            item.created_at = stored.created_at;
            session.update_inventory_item(item).await?;
        } else {
            item.created_at = item.updated_at;
            session.insert_inventory_item(item).await?;
        }
        session.commit().await
    }
}
