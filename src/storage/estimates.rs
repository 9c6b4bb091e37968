use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnection, SqliteRow};

use crate::domain::{
    Amount, Estimate, EstimateId, EstimateInput, EstimateMaterial, EstimateMaterialId,
    EstimateMaterialInput, EstimateTotals,
};

use super::repository::{
    amount_column, amount_param, optional_date_column, timestamp_column,
};

/// Insert an estimate with zero totals. Callers follow up with
/// [`store_totals`] inside the same transaction.
pub async fn insert(
    conn: &mut SqliteConnection,
    input: &EstimateInput,
    now: DateTime<Utc>,
) -> Result<EstimateId> {
    let now = now.to_rfc3339();
    let result = sqlx::query(
        r#"
        INSERT INTO estimates (client_id, status, estimated_hours, estimated_hourly_rate,
                               total_materials_cost, total_hourly_cost, total_estimate_cost,
                               scheduled_date, date_created, date_updated)
        VALUES (?, ?, ?, ?, '0', '0', '0', ?, ?, ?)
        "#,
    )
    .bind(input.client_id)
    .bind(&input.status)
    .bind(amount_param(input.estimated_hours))
    .bind(amount_param(input.estimated_hourly_rate))
    .bind(input.scheduled_date.map(|d| d.to_string()))
    .bind(&now)
    .bind(&now)
    .execute(&mut *conn)
    .await
    .context("Failed to save estimate")?;

    Ok(result.last_insert_rowid())
}

/// Fetch an estimate with its line items.
pub async fn get(conn: &mut SqliteConnection, id: EstimateId) -> Result<Option<Estimate>> {
    let row = sqlx::query(
        r#"
        SELECT estimate_id, client_id, status, estimated_hours, estimated_hourly_rate,
               total_materials_cost, total_hourly_cost, total_estimate_cost,
               scheduled_date, date_created, date_updated
        FROM estimates
        WHERE estimate_id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .context("Failed to fetch estimate")?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut estimate = row_to_estimate(&row)?;
    estimate.materials = list_materials(conn, id).await?;
    Ok(Some(estimate))
}

pub async fn exists(conn: &mut SqliteConnection, id: EstimateId) -> Result<bool> {
    Ok(sqlx::query("SELECT 1 FROM estimates WHERE estimate_id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to look up estimate")?
        .is_some())
}

/// List all estimates, newest first, each with its line items.
pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Estimate>> {
    let rows = sqlx::query(
        r#"
        SELECT estimate_id, client_id, status, estimated_hours, estimated_hourly_rate,
               total_materials_cost, total_hourly_cost, total_estimate_cost,
               scheduled_date, date_created, date_updated
        FROM estimates
        ORDER BY estimate_id DESC
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list estimates")?;

    let mut estimates = rows
        .iter()
        .map(row_to_estimate)
        .collect::<Result<Vec<_>>>()?;

    // One query for every line item, grouped in memory.
    let material_rows = sqlx::query(
        r#"
        SELECT material_id, estimate_id, description, quantity, unit_cost, total_cost
        FROM estimate_materials
        ORDER BY material_id
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list estimate materials")?;

    let mut by_estimate: HashMap<EstimateId, Vec<EstimateMaterial>> = HashMap::new();
    for row in &material_rows {
        let material = row_to_material(row)?;
        by_estimate
            .entry(material.estimate_id)
            .or_default()
            .push(material);
    }

    for estimate in &mut estimates {
        estimate.materials = by_estimate
            .remove(&estimate.estimate_id)
            .unwrap_or_default();
    }

    Ok(estimates)
}

/// Overwrite the caller-editable fields. Totals are left for [`store_totals`].
pub async fn update(
    conn: &mut SqliteConnection,
    id: EstimateId,
    input: &EstimateInput,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE estimates
        SET client_id = ?, status = ?, estimated_hours = ?, estimated_hourly_rate = ?, scheduled_date = ?
        WHERE estimate_id = ?
        "#,
    )
    .bind(input.client_id)
    .bind(&input.status)
    .bind(amount_param(input.estimated_hours))
    .bind(amount_param(input.estimated_hourly_rate))
    .bind(input.scheduled_date.map(|d| d.to_string()))
    .bind(id)
    .execute(&mut *conn)
    .await
    .context("Failed to update estimate")?;

    Ok(result.rows_affected() > 0)
}

/// Delete an estimate together with its line items.
pub async fn delete(conn: &mut SqliteConnection, id: EstimateId) -> Result<bool> {
    sqlx::query("DELETE FROM estimate_materials WHERE estimate_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete estimate materials")?;

    let result = sqlx::query("DELETE FROM estimates WHERE estimate_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete estimate")?;

    Ok(result.rows_affected() > 0)
}

// ========================
// Line items
// ========================

pub async fn insert_material(
    conn: &mut SqliteConnection,
    estimate_id: EstimateId,
    input: &EstimateMaterialInput,
    total_cost: Amount,
) -> Result<EstimateMaterial> {
    let result = sqlx::query(
        r#"
        INSERT INTO estimate_materials (estimate_id, description, quantity, unit_cost, total_cost)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(estimate_id)
    .bind(&input.description)
    .bind(amount_param(input.quantity))
    .bind(amount_param(input.unit_cost))
    .bind(amount_param(total_cost))
    .execute(&mut *conn)
    .await
    .context("Failed to save estimate material")?;

    Ok(EstimateMaterial {
        material_id: result.last_insert_rowid(),
        estimate_id,
        description: input.description.clone(),
        quantity: input.quantity,
        unit_cost: input.unit_cost,
        total_cost,
    })
}

/// Delete one line item, only if it belongs to the given estimate.
pub async fn delete_material(
    conn: &mut SqliteConnection,
    estimate_id: EstimateId,
    material_id: EstimateMaterialId,
) -> Result<bool> {
    let result =
        sqlx::query("DELETE FROM estimate_materials WHERE material_id = ? AND estimate_id = ?")
            .bind(material_id)
            .bind(estimate_id)
            .execute(&mut *conn)
            .await
            .context("Failed to delete estimate material")?;

    Ok(result.rows_affected() > 0)
}

/// Line items in insertion order.
pub async fn list_materials(
    conn: &mut SqliteConnection,
    estimate_id: EstimateId,
) -> Result<Vec<EstimateMaterial>> {
    let rows = sqlx::query(
        r#"
        SELECT material_id, estimate_id, description, quantity, unit_cost, total_cost
        FROM estimate_materials
        WHERE estimate_id = ?
        ORDER BY material_id
        "#,
    )
    .bind(estimate_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list estimate materials")?;

    rows.iter().map(row_to_material).collect()
}

// ========================
// Aggregation
// ========================

/// Hours and hourly rate of an estimate, or `None` if it is gone.
pub async fn labour(conn: &mut SqliteConnection, id: EstimateId) -> Result<Option<(Amount, Amount)>> {
    let row = sqlx::query(
        "SELECT estimated_hours, estimated_hourly_rate FROM estimates WHERE estimate_id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .context("Failed to load estimate labour")?;

    row.map(|row| {
        Ok((
            amount_column(&row, "estimated_hours")?,
            amount_column(&row, "estimated_hourly_rate")?,
        ))
    })
    .transpose()
}

/// Store an estimate's derived totals and stamp `date_updated`.
pub async fn store_totals(
    conn: &mut SqliteConnection,
    id: EstimateId,
    totals: &EstimateTotals,
    now: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE estimates
        SET total_materials_cost = ?, total_hourly_cost = ?, total_estimate_cost = ?, date_updated = ?
        WHERE estimate_id = ?
        "#,
    )
    .bind(amount_param(totals.total_materials_cost))
    .bind(amount_param(totals.total_hourly_cost))
    .bind(amount_param(totals.total_estimate_cost))
    .bind(now.to_rfc3339())
    .bind(id)
    .execute(&mut *conn)
    .await
    .context("Failed to store estimate totals")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_estimate(row: &SqliteRow) -> Result<Estimate> {
    Ok(Estimate {
        estimate_id: row.get("estimate_id"),
        client_id: row.get("client_id"),
        status: row.get("status"),
        estimated_hours: amount_column(row, "estimated_hours")?,
        estimated_hourly_rate: amount_column(row, "estimated_hourly_rate")?,
        total_materials_cost: amount_column(row, "total_materials_cost")?,
        total_hourly_cost: amount_column(row, "total_hourly_cost")?,
        total_estimate_cost: amount_column(row, "total_estimate_cost")?,
        scheduled_date: optional_date_column(row, "scheduled_date")?,
        date_created: timestamp_column(row, "date_created")?,
        date_updated: timestamp_column(row, "date_updated")?,
        materials: Vec::new(),
    })
}

fn row_to_material(row: &SqliteRow) -> Result<EstimateMaterial> {
    Ok(EstimateMaterial {
        material_id: row.get("material_id"),
        estimate_id: row.get("estimate_id"),
        description: row.get("description"),
        quantity: amount_column(row, "quantity")?,
        unit_cost: amount_column(row, "unit_cost")?,
        total_cost: amount_column(row, "total_cost")?,
    })
}
