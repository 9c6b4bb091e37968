use anyhow::{Context, Result, anyhow};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnection, SqliteRow};

use crate::domain::{CrewId, Employee, EmployeeId, EmployeeInput, WorkCrew, WorkCrewInput};

// ========================
// Employees
// ========================

pub async fn insert_employee(conn: &mut SqliteConnection, input: &EmployeeInput) -> Result<Employee> {
    let result = sqlx::query("INSERT INTO employees (name, phone, status, role) VALUES (?, ?, ?, ?)")
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.status)
        .bind(&input.role)
        .execute(&mut *conn)
        .await
        .context("Failed to save employee")?;

    let id = result.last_insert_rowid();
    get_employee(conn, id)
        .await?
        .ok_or_else(|| anyhow!("Employee {id} missing after insert"))
}

pub async fn get_employee(conn: &mut SqliteConnection, id: EmployeeId) -> Result<Option<Employee>> {
    let row = sqlx::query(
        "SELECT employee_id, name, phone, status, role FROM employees WHERE employee_id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .context("Failed to fetch employee")?;

    Ok(row.as_ref().map(row_to_employee))
}

pub async fn employee_exists(conn: &mut SqliteConnection, id: EmployeeId) -> Result<bool> {
    Ok(sqlx::query("SELECT 1 FROM employees WHERE employee_id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to look up employee")?
        .is_some())
}

pub async fn list_employees(conn: &mut SqliteConnection) -> Result<Vec<Employee>> {
    let rows = sqlx::query(
        "SELECT employee_id, name, phone, status, role FROM employees ORDER BY name, employee_id",
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list employees")?;

    Ok(rows.iter().map(row_to_employee).collect())
}

pub async fn update_employee(
    conn: &mut SqliteConnection,
    id: EmployeeId,
    input: &EmployeeInput,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE employees SET name = ?, phone = ?, status = ?, role = ? WHERE employee_id = ?",
    )
    .bind(&input.name)
    .bind(&input.phone)
    .bind(&input.status)
    .bind(&input.role)
    .bind(id)
    .execute(&mut *conn)
    .await
    .context("Failed to update employee")?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_employee(conn: &mut SqliteConnection, id: EmployeeId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete employee")?;

    Ok(result.rows_affected() > 0)
}

/// Take an employee off every crew.
pub async fn remove_employee_memberships(conn: &mut SqliteConnection, id: EmployeeId) -> Result<u64> {
    let result = sqlx::query("DELETE FROM crew_members WHERE employee_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to remove crew memberships")?;

    Ok(result.rows_affected())
}

fn row_to_employee(row: &SqliteRow) -> Employee {
    Employee {
        employee_id: row.get("employee_id"),
        name: row.get("name"),
        phone: row.get("phone"),
        status: row.get("status"),
        role: row.get("role"),
    }
}

// ========================
// Crews
// ========================

/// Insert the crew row only. Membership is written by [`set_members`].
pub async fn insert_crew(conn: &mut SqliteConnection, input: &WorkCrewInput) -> Result<CrewId> {
    let result = sqlx::query("INSERT INTO work_crews (name, status) VALUES (?, ?)")
        .bind(&input.name)
        .bind(&input.status)
        .execute(&mut *conn)
        .await
        .context("Failed to save work crew")?;

    Ok(result.last_insert_rowid())
}

pub async fn get_crew(conn: &mut SqliteConnection, id: CrewId) -> Result<Option<WorkCrew>> {
    let row = sqlx::query("SELECT crew_id, name, status FROM work_crews WHERE crew_id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch work crew")?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut crew = row_to_crew(&row);
    crew.members = members_of(conn, id).await?;
    Ok(Some(crew))
}

pub async fn crew_exists(conn: &mut SqliteConnection, id: CrewId) -> Result<bool> {
    Ok(sqlx::query("SELECT 1 FROM work_crews WHERE crew_id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to look up work crew")?
        .is_some())
}

pub async fn list_crews(conn: &mut SqliteConnection) -> Result<Vec<WorkCrew>> {
    let rows = sqlx::query("SELECT crew_id, name, status FROM work_crews ORDER BY name, crew_id")
        .fetch_all(&mut *conn)
        .await
        .context("Failed to list work crews")?;

    let mut crews: Vec<WorkCrew> = rows.iter().map(row_to_crew).collect();
    for crew in &mut crews {
        crew.members = members_of(conn, crew.crew_id).await?;
    }
    Ok(crews)
}

pub async fn update_crew(conn: &mut SqliteConnection, id: CrewId, input: &WorkCrewInput) -> Result<bool> {
    let result = sqlx::query("UPDATE work_crews SET name = ?, status = ? WHERE crew_id = ?")
        .bind(&input.name)
        .bind(&input.status)
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to update work crew")?;

    Ok(result.rows_affected() > 0)
}

/// Delete a crew and its membership rows.
pub async fn delete_crew(conn: &mut SqliteConnection, id: CrewId) -> Result<bool> {
    sqlx::query("DELETE FROM crew_members WHERE crew_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete crew members")?;

    let result = sqlx::query("DELETE FROM work_crews WHERE crew_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete work crew")?;

    Ok(result.rows_affected() > 0)
}

/// Replace a crew's membership with `member_ids`, which must be distinct.
pub async fn set_members(
    conn: &mut SqliteConnection,
    crew_id: CrewId,
    member_ids: &[EmployeeId],
) -> Result<()> {
    sqlx::query("DELETE FROM crew_members WHERE crew_id = ?")
        .bind(crew_id)
        .execute(&mut *conn)
        .await
        .context("Failed to clear crew members")?;

    for employee_id in member_ids {
        sqlx::query("INSERT INTO crew_members (crew_id, employee_id) VALUES (?, ?)")
            .bind(crew_id)
            .bind(employee_id)
            .execute(&mut *conn)
            .await
            .context("Failed to add crew member")?;
    }
    Ok(())
}

/// Employees on a crew, in the order they were added.
pub async fn members_of(conn: &mut SqliteConnection, crew_id: CrewId) -> Result<Vec<Employee>> {
    let rows = sqlx::query(
        r#"
        SELECT e.employee_id, e.name, e.phone, e.status, e.role
        FROM crew_members cm
        JOIN employees e ON e.employee_id = cm.employee_id
        WHERE cm.crew_id = ?
        ORDER BY cm.id
        "#,
    )
    .bind(crew_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list crew members")?;

    Ok(rows.iter().map(row_to_employee).collect())
}

fn row_to_crew(row: &SqliteRow) -> WorkCrew {
    WorkCrew {
        crew_id: row.get("crew_id"),
        name: row.get("name"),
        status: row.get("status"),
        members: Vec::new(),
    }
}
