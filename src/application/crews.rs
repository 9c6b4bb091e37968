use sqlx::sqlite::SqliteConnection;
use tracing::info;

use crate::domain::{CrewId, Employee, EmployeeId, EmployeeInput, WorkCrew, WorkCrewInput};
use crate::storage::{crews, jobs};

use super::{AppError, ShopService};

impl ShopService {
    // ========================
    // Employees
    // ========================

    pub async fn create_employee(&self, input: EmployeeInput) -> Result<Employee, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        let employee = crews::insert_employee(&mut write.tx, &input).await?;
        write.commit().await?;

        info!(employee_id = employee.employee_id, name = %employee.name, "created employee");
        Ok(employee)
    }

    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let mut conn = self.repo.acquire().await?;
        Ok(crews::list_employees(&mut conn).await?)
    }

    pub async fn get_employee(&self, id: EmployeeId) -> Result<Employee, AppError> {
        let mut conn = self.repo.acquire().await?;
        crews::get_employee(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee", id))
    }

    pub async fn update_employee(&self, id: EmployeeId, input: EmployeeInput) -> Result<Employee, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        if !crews::update_employee(&mut write.tx, id, &input).await? {
            return Err(AppError::not_found("Employee", id));
        }
        let employee = crews::get_employee(&mut write.tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee", id))?;
        write.commit().await?;

        info!(employee_id = id, "updated employee");
        Ok(employee)
    }

    /// Delete an employee and take them off every crew.
    pub async fn delete_employee(&self, id: EmployeeId) -> Result<(), AppError> {
        let mut write = self.begin_write().await?;
        if !crews::employee_exists(&mut write.tx, id).await? {
            return Err(AppError::not_found("Employee", id));
        }
        let memberships = crews::remove_employee_memberships(&mut write.tx, id).await?;
        crews::delete_employee(&mut write.tx, id).await?;
        write.commit().await?;

        info!(employee_id = id, memberships, "deleted employee");
        Ok(())
    }

    // ========================
    // Work crews
    // ========================

    /// Create a crew with its initial members. Repeated member ids count once.
    pub async fn create_work_crew(&self, input: WorkCrewInput) -> Result<WorkCrew, AppError> {
        input.validate()?;
        let member_ids = input.distinct_member_ids();

        let mut write = self.begin_write().await?;
        check_members(&mut write.tx, &member_ids).await?;
        let crew_id = crews::insert_crew(&mut write.tx, &input).await?;
        crews::set_members(&mut write.tx, crew_id, &member_ids).await?;
        let crew = load_crew(&mut write.tx, crew_id).await?;
        write.commit().await?;

        info!(crew_id, name = %crew.name, members = member_ids.len(), "created work crew");
        Ok(crew)
    }

    pub async fn list_work_crews(&self) -> Result<Vec<WorkCrew>, AppError> {
        let mut conn = self.repo.acquire().await?;
        Ok(crews::list_crews(&mut conn).await?)
    }

    pub async fn get_work_crew(&self, id: CrewId) -> Result<WorkCrew, AppError> {
        let mut conn = self.repo.acquire().await?;
        load_crew(&mut conn, id).await
    }

    /// Replace a crew's name, status and full membership.
    pub async fn update_work_crew(&self, id: CrewId, input: WorkCrewInput) -> Result<WorkCrew, AppError> {
        input.validate()?;
        let member_ids = input.distinct_member_ids();

        let mut write = self.begin_write().await?;
        if !crews::crew_exists(&mut write.tx, id).await? {
            return Err(AppError::not_found("WorkCrew", id));
        }
        check_members(&mut write.tx, &member_ids).await?;
        crews::update_crew(&mut write.tx, id, &input).await?;
        crews::set_members(&mut write.tx, id, &member_ids).await?;
        let crew = load_crew(&mut write.tx, id).await?;
        write.commit().await?;

        info!(crew_id = id, members = member_ids.len(), "updated work crew");
        Ok(crew)
    }

    /// Delete a crew. Jobs it was assigned to keep their rows with the crew
    /// cleared.
    pub async fn delete_work_crew(&self, id: CrewId) -> Result<(), AppError> {
        let mut write = self.begin_write().await?;
        if !crews::crew_exists(&mut write.tx, id).await? {
            return Err(AppError::not_found("WorkCrew", id));
        }
        let unassigned = jobs::clear_crew(&mut write.tx, id).await?;
        crews::delete_crew(&mut write.tx, id).await?;
        write.commit().await?;

        info!(crew_id = id, unassigned, "deleted work crew");
        Ok(())
    }
}

async fn check_members(conn: &mut SqliteConnection, member_ids: &[EmployeeId]) -> Result<(), AppError> {
    for id in member_ids {
        if !crews::employee_exists(conn, *id).await? {
            return Err(AppError::invalid_reference("Employee", id));
        }
    }
    Ok(())
}

async fn load_crew(conn: &mut SqliteConnection, id: CrewId) -> Result<WorkCrew, AppError> {
    crews::get_crew(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("WorkCrew", id))
}
