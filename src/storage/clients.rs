use anyhow::{Context, Result, anyhow};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnection, SqliteRow};

use crate::domain::{Client, ClientId, ClientInput};

/// Insert a client and return the stored record.
pub async fn insert(conn: &mut SqliteConnection, input: &ClientInput) -> Result<Client> {
    let result = sqlx::query("INSERT INTO clients (name, address, phone, status) VALUES (?, ?, ?, ?)")
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.status)
        .execute(&mut *conn)
        .await
        .context("Failed to save client")?;

    let id = result.last_insert_rowid();
    get(conn, id)
        .await?
        .ok_or_else(|| anyhow!("Client {id} missing after insert"))
}

pub async fn get(conn: &mut SqliteConnection, id: ClientId) -> Result<Option<Client>> {
    let row = sqlx::query(
        "SELECT account_id, name, address, phone, status FROM clients WHERE account_id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .context("Failed to fetch client")?;

    row.as_ref().map(row_to_client).transpose()
}

pub async fn exists(conn: &mut SqliteConnection, id: ClientId) -> Result<bool> {
    Ok(sqlx::query("SELECT 1 FROM clients WHERE account_id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to look up client")?
        .is_some())
}

/// List all clients in creation order.
pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Client>> {
    let rows = sqlx::query(
        "SELECT account_id, name, address, phone, status FROM clients ORDER BY account_id",
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list clients")?;

    rows.iter().map(row_to_client).collect()
}

/// Overwrite every field. Returns false when no such client exists.
pub async fn update(conn: &mut SqliteConnection, id: ClientId, input: &ClientInput) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE clients SET name = ?, address = ?, phone = ?, status = ? WHERE account_id = ?",
    )
    .bind(&input.name)
    .bind(&input.address)
    .bind(&input.phone)
    .bind(&input.status)
    .bind(id)
    .execute(&mut *conn)
    .await
    .context("Failed to update client")?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut SqliteConnection, id: ClientId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM clients WHERE account_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete client")?;

    Ok(result.rows_affected() > 0)
}

/// Jobs and estimates that still point at the client.
pub async fn count_dependents(conn: &mut SqliteConnection, id: ClientId) -> Result<(i64, i64)> {
    let row = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM jobs WHERE client_account_id = ?) AS jobs,
            (SELECT COUNT(*) FROM estimates WHERE client_id = ?) AS estimates
        "#,
    )
    .bind(id)
    .bind(id)
    .fetch_one(&mut *conn)
    .await
    .context("Failed to count client dependents")?;

    Ok((row.get("jobs"), row.get("estimates")))
}

fn row_to_client(row: &SqliteRow) -> Result<Client> {
    Ok(Client {
        account_id: row.get("account_id"),
        name: row.get("name"),
        address: row.get("address"),
        phone: row.get("phone"),
        status: row.get("status"),
    })
}
