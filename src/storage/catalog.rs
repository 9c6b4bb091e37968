use anyhow::{Context, Result, anyhow};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnection, SqliteRow};

use crate::domain::{
    Material, MaterialId, MaterialInput, MaterialType, MaterialTypeId, MaterialTypeInput, Vendor,
    VendorId, VendorInput,
};

use super::repository::{amount_column, amount_param};

// ========================
// Material types
// ========================

pub async fn insert_type(conn: &mut SqliteConnection, input: &MaterialTypeInput) -> Result<MaterialType> {
    let name = input.name.trim();
    let result = sqlx::query("INSERT INTO material_types (name) VALUES (?)")
        .bind(name)
        .execute(&mut *conn)
        .await
        .context("Failed to save material type")?;

    Ok(MaterialType {
        type_id: result.last_insert_rowid(),
        name: name.to_string(),
    })
}

pub async fn get_type(conn: &mut SqliteConnection, id: MaterialTypeId) -> Result<Option<MaterialType>> {
    let row = sqlx::query("SELECT type_id, name FROM material_types WHERE type_id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch material type")?;

    Ok(row.as_ref().map(row_to_type))
}

pub async fn type_exists(conn: &mut SqliteConnection, id: MaterialTypeId) -> Result<bool> {
    Ok(get_type(conn, id).await?.is_some())
}

/// Id of the type holding `name`, if any. Names are compared after trimming.
pub async fn type_id_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<MaterialTypeId>> {
    let row = sqlx::query("SELECT type_id FROM material_types WHERE name = ?")
        .bind(name.trim())
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to look up material type by name")?;

    Ok(row.map(|r| r.get("type_id")))
}

pub async fn list_types(conn: &mut SqliteConnection) -> Result<Vec<MaterialType>> {
    let rows = sqlx::query("SELECT type_id, name FROM material_types ORDER BY name")
        .fetch_all(&mut *conn)
        .await
        .context("Failed to list material types")?;

    Ok(rows.iter().map(row_to_type).collect())
}

pub async fn rename_type(
    conn: &mut SqliteConnection,
    id: MaterialTypeId,
    input: &MaterialTypeInput,
) -> Result<bool> {
    let result = sqlx::query("UPDATE material_types SET name = ? WHERE type_id = ?")
        .bind(input.name.trim())
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to rename material type")?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_type(conn: &mut SqliteConnection, id: MaterialTypeId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM material_types WHERE type_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete material type")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_type(row: &SqliteRow) -> MaterialType {
    MaterialType {
        type_id: row.get("type_id"),
        name: row.get("name"),
    }
}

// ========================
// Vendors
// ========================

pub async fn insert_vendor(conn: &mut SqliteConnection, input: &VendorInput) -> Result<Vendor> {
    let result = sqlx::query(
        r#"
        INSERT INTO vendors (name, status, notes, contact_name, phone, email, address)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.status)
    .bind(&input.notes)
    .bind(&input.contact_name)
    .bind(&input.phone)
    .bind(&input.email)
    .bind(&input.address)
    .execute(&mut *conn)
    .await
    .context("Failed to save vendor")?;

    let id = result.last_insert_rowid();
    get_vendor(conn, id)
        .await?
        .ok_or_else(|| anyhow!("Vendor {id} missing after insert"))
}

pub async fn get_vendor(conn: &mut SqliteConnection, id: VendorId) -> Result<Option<Vendor>> {
    let row = sqlx::query(
        r#"
        SELECT vendor_id, name, status, notes, contact_name, phone, email, address
        FROM vendors
        WHERE vendor_id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .context("Failed to fetch vendor")?;

    Ok(row.as_ref().map(row_to_vendor))
}

pub async fn vendor_exists(conn: &mut SqliteConnection, id: VendorId) -> Result<bool> {
    Ok(sqlx::query("SELECT 1 FROM vendors WHERE vendor_id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to look up vendor")?
        .is_some())
}

pub async fn list_vendors(conn: &mut SqliteConnection) -> Result<Vec<Vendor>> {
    let rows = sqlx::query(
        r#"
        SELECT vendor_id, name, status, notes, contact_name, phone, email, address
        FROM vendors
        ORDER BY name, vendor_id
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list vendors")?;

    Ok(rows.iter().map(row_to_vendor).collect())
}

pub async fn update_vendor(conn: &mut SqliteConnection, id: VendorId, input: &VendorInput) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE vendors
        SET name = ?, status = ?, notes = ?, contact_name = ?, phone = ?, email = ?, address = ?
        WHERE vendor_id = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.status)
    .bind(&input.notes)
    .bind(&input.contact_name)
    .bind(&input.phone)
    .bind(&input.email)
    .bind(&input.address)
    .bind(id)
    .execute(&mut *conn)
    .await
    .context("Failed to update vendor")?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_vendor(conn: &mut SqliteConnection, id: VendorId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM vendors WHERE vendor_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete vendor")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_vendor(row: &SqliteRow) -> Vendor {
    Vendor {
        vendor_id: row.get("vendor_id"),
        name: row.get("name"),
        status: row.get("status"),
        notes: row.get("notes"),
        contact_name: row.get("contact_name"),
        phone: row.get("phone"),
        email: row.get("email"),
        address: row.get("address"),
    }
}

// ========================
// Materials
// ========================

pub async fn insert_material(conn: &mut SqliteConnection, input: &MaterialInput) -> Result<Material> {
    let result = sqlx::query(
        r#"
        INSERT INTO materials (type_id, vendor_id, price_paid_per_unit, units_held,
                               client_price_per_unit, reorder_threshold, description)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.type_id)
    .bind(input.vendor_id)
    .bind(amount_param(input.price_paid_per_unit))
    .bind(amount_param(input.units_held))
    .bind(amount_param(input.client_price_per_unit))
    .bind(amount_param(input.reorder_threshold))
    .bind(&input.description)
    .execute(&mut *conn)
    .await
    .context("Failed to save material")?;

    let id = result.last_insert_rowid();
    get_material(conn, id)
        .await?
        .ok_or_else(|| anyhow!("Material {id} missing after insert"))
}

pub async fn get_material(conn: &mut SqliteConnection, id: MaterialId) -> Result<Option<Material>> {
    let row = sqlx::query(
        r#"
        SELECT material_id, type_id, vendor_id, price_paid_per_unit, units_held,
               client_price_per_unit, reorder_threshold, description
        FROM materials
        WHERE material_id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .context("Failed to fetch material")?;

    row.as_ref().map(row_to_material).transpose()
}

pub async fn list_materials(conn: &mut SqliteConnection) -> Result<Vec<Material>> {
    let rows = sqlx::query(
        r#"
        SELECT material_id, type_id, vendor_id, price_paid_per_unit, units_held,
               client_price_per_unit, reorder_threshold, description
        FROM materials
        ORDER BY material_id
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list materials")?;

    rows.iter().map(row_to_material).collect()
}

pub async fn update_material(
    conn: &mut SqliteConnection,
    id: MaterialId,
    input: &MaterialInput,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE materials
        SET type_id = ?, vendor_id = ?, price_paid_per_unit = ?, units_held = ?,
            client_price_per_unit = ?, reorder_threshold = ?, description = ?
        WHERE material_id = ?
        "#,
    )
    .bind(input.type_id)
    .bind(input.vendor_id)
    .bind(amount_param(input.price_paid_per_unit))
    .bind(amount_param(input.units_held))
    .bind(amount_param(input.client_price_per_unit))
    .bind(amount_param(input.reorder_threshold))
    .bind(&input.description)
    .bind(id)
    .execute(&mut *conn)
    .await
    .context("Failed to update material")?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_material(conn: &mut SqliteConnection, id: MaterialId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM materials WHERE material_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete material")?;

    Ok(result.rows_affected() > 0)
}

/// Drop a vendor reference from every material. The materials stay.
pub async fn clear_vendor(conn: &mut SqliteConnection, vendor_id: VendorId) -> Result<u64> {
    let result = sqlx::query("UPDATE materials SET vendor_id = NULL WHERE vendor_id = ?")
        .bind(vendor_id)
        .execute(&mut *conn)
        .await
        .context("Failed to clear vendor from materials")?;

    Ok(result.rows_affected())
}

pub async fn count_for_type(conn: &mut SqliteConnection, type_id: MaterialTypeId) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM materials WHERE type_id = ?")
        .bind(type_id)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to count materials for type")?;

    Ok(row.get("count"))
}

fn row_to_material(row: &SqliteRow) -> Result<Material> {
    Ok(Material {
        material_id: row.get("material_id"),
        type_id: row.get("type_id"),
        vendor_id: row.get("vendor_id"),
        price_paid_per_unit: amount_column(row, "price_paid_per_unit")?,
        units_held: amount_column(row, "units_held")?,
        client_price_per_unit: amount_column(row, "client_price_per_unit")?,
        reorder_threshold: amount_column(row, "reorder_threshold")?,
        description: row.get("description"),
    })
}
