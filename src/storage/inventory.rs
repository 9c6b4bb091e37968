use anyhow::{Context, Result, anyhow};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnection, SqliteRow};

use crate::domain::{InventoryItem, InventoryItemInput, ItemId};

use super::repository::{amount_column, amount_param};

pub async fn insert(conn: &mut SqliteConnection, input: &InventoryItemInput) -> Result<InventoryItem> {
    let result = sqlx::query(
        "INSERT INTO inventory (type, quantity, cost, cost_markup, assigned_job_id) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&input.item_type)
    .bind(input.quantity)
    .bind(amount_param(input.cost))
    .bind(amount_param(input.cost_markup))
    .bind(input.normalized_job_id())
    .execute(&mut *conn)
    .await
    .context("Failed to save inventory item")?;

    let id = result.last_insert_rowid();
    get(conn, id)
        .await?
        .ok_or_else(|| anyhow!("Inventory item {id} missing after insert"))
}

pub async fn get(conn: &mut SqliteConnection, id: ItemId) -> Result<Option<InventoryItem>> {
    let row = sqlx::query(
        "SELECT item_id, type, quantity, cost, cost_markup, assigned_job_id FROM inventory WHERE item_id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .context("Failed to fetch inventory item")?;

    row.as_ref().map(row_to_item).transpose()
}

pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<InventoryItem>> {
    let rows = sqlx::query(
        "SELECT item_id, type, quantity, cost, cost_markup, assigned_job_id FROM inventory ORDER BY item_id",
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list inventory")?;

    rows.iter().map(row_to_item).collect()
}

/// Items currently assigned to a job.
pub async fn list_for_job(conn: &mut SqliteConnection, job_id: &str) -> Result<Vec<InventoryItem>> {
    let rows = sqlx::query(
        r#"
        SELECT item_id, type, quantity, cost, cost_markup, assigned_job_id
        FROM inventory
        WHERE assigned_job_id = ?
        ORDER BY item_id
        "#,
    )
    .bind(job_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list inventory for job")?;

    rows.iter().map(row_to_item).collect()
}

pub async fn update(conn: &mut SqliteConnection, id: ItemId, input: &InventoryItemInput) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE inventory
        SET type = ?, quantity = ?, cost = ?, cost_markup = ?, assigned_job_id = ?
        WHERE item_id = ?
        "#,
    )
    .bind(&input.item_type)
    .bind(input.quantity)
    .bind(amount_param(input.cost))
    .bind(amount_param(input.cost_markup))
    .bind(input.normalized_job_id())
    .bind(id)
    .execute(&mut *conn)
    .await
    .context("Failed to update inventory item")?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut SqliteConnection, id: ItemId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM inventory WHERE item_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete inventory item")?;

    Ok(result.rows_affected() > 0)
}

/// Release every item held for a job. The items themselves stay.
pub async fn unassign_job(conn: &mut SqliteConnection, job_id: &str) -> Result<u64> {
    let result = sqlx::query("UPDATE inventory SET assigned_job_id = NULL WHERE assigned_job_id = ?")
        .bind(job_id)
        .execute(&mut *conn)
        .await
        .context("Failed to unassign inventory")?;

    Ok(result.rows_affected())
}

fn row_to_item(row: &SqliteRow) -> Result<InventoryItem> {
    Ok(InventoryItem {
        item_id: row.get("item_id"),
        item_type: row.get("type"),
        quantity: row.get("quantity"),
        cost: amount_column(row, "cost")?,
        cost_markup: amount_column(row, "cost_markup")?,
        assigned_job_id: row.get("assigned_job_id"),
    })
}
