use sqlx::sqlite::SqliteConnection;
use tracing::info;

use crate::domain::{InventoryItem, InventoryItemInput, ItemId};
use crate::storage::{inventory, jobs};

use super::{AppError, ShopService};

const ENTITY: &str = "InventoryItem";

impl ShopService {
    pub async fn create_inventory_item(&self, input: InventoryItemInput) -> Result<InventoryItem, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        check_assignment(&mut write.tx, &input).await?;
        let item = inventory::insert(&mut write.tx, &input).await?;
        write.commit().await?;

        info!(item_id = item.item_id, item_type = %item.item_type, "created inventory item");
        Ok(item)
    }

    pub async fn list_inventory(&self) -> Result<Vec<InventoryItem>, AppError> {
        let mut conn = self.repo.acquire().await?;
        Ok(inventory::list(&mut conn).await?)
    }

    pub async fn list_inventory_for_job(&self, job_id: &str) -> Result<Vec<InventoryItem>, AppError> {
        let mut conn = self.repo.acquire().await?;
        Ok(inventory::list_for_job(&mut conn, job_id).await?)
    }

    pub async fn get_inventory_item(&self, id: ItemId) -> Result<InventoryItem, AppError> {
        let mut conn = self.repo.acquire().await?;
        inventory::get(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, id))
    }

    pub async fn update_inventory_item(
        &self,
        id: ItemId,
        input: InventoryItemInput,
    ) -> Result<InventoryItem, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        if inventory::get(&mut write.tx, id).await?.is_none() {
            return Err(AppError::not_found(ENTITY, id));
        }
        check_assignment(&mut write.tx, &input).await?;
        inventory::update(&mut write.tx, id, &input).await?;
        let item = inventory::get(&mut write.tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, id))?;
        write.commit().await?;

        info!(item_id = id, "updated inventory item");
        Ok(item)
    }

    pub async fn delete_inventory_item(&self, id: ItemId) -> Result<(), AppError> {
        let mut write = self.begin_write().await?;
        if !inventory::delete(&mut write.tx, id).await? {
            return Err(AppError::not_found(ENTITY, id));
        }
        write.commit().await?;

        info!(item_id = id, "deleted inventory item");
        Ok(())
    }
}

async fn check_assignment(conn: &mut SqliteConnection, input: &InventoryItemInput) -> Result<(), AppError> {
    if let Some(job_id) = input.normalized_job_id() {
        if !jobs::exists(conn, job_id).await? {
            return Err(AppError::invalid_reference("Job", job_id));
        }
    }
    Ok(())
}
