use tracing::info;

use crate::domain::{Client, ClientId, ClientInput};
use crate::storage::clients;

use super::{AppError, ShopService};

const ENTITY: &str = "Client";

impl ShopService {
    pub async fn create_client(&self, input: ClientInput) -> Result<Client, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        let client = clients::insert(&mut write.tx, &input).await?;
        write.commit().await?;

        info!(account_id = client.account_id, name = %client.name, "created client");
        Ok(client)
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        let mut conn = self.repo.acquire().await?;
        Ok(clients::list(&mut conn).await?)
    }

    pub async fn get_client(&self, id: ClientId) -> Result<Client, AppError> {
        let mut conn = self.repo.acquire().await?;
        clients::get(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, id))
    }

    /// Replace every field of a client.
    pub async fn update_client(&self, id: ClientId, input: ClientInput) -> Result<Client, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        if !clients::update(&mut write.tx, id, &input).await? {
            return Err(AppError::not_found(ENTITY, id));
        }
        let client = clients::get(&mut write.tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, id))?;
        write.commit().await?;

        info!(account_id = id, "updated client");
        Ok(client)
    }

    /// Delete a client. Refused while any job or estimate still belongs to it.
    pub async fn delete_client(&self, id: ClientId) -> Result<(), AppError> {
        let mut write = self.begin_write().await?;
        if !clients::exists(&mut write.tx, id).await? {
            return Err(AppError::not_found(ENTITY, id));
        }

        let (jobs, estimates) = clients::count_dependents(&mut write.tx, id).await?;
        if jobs > 0 || estimates > 0 {
            return Err(AppError::InvalidState(format!(
                "Client {id} still has {jobs} job(s) and {estimates} estimate(s)"
            )));
        }

        clients::delete(&mut write.tx, id).await?;
        write.commit().await?;

        info!(account_id = id, "deleted client");
        Ok(())
    }
}
