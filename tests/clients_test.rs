mod common;

use anyhow::Result;
use common::{create_client, create_estimate, create_job, test_service};
use shopledger::application::AppError;
use shopledger::domain::ClientInput;

#[tokio::test]
async fn test_client_crud() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let client = create_client(&service, "Ironworks Ltd").await?;
    assert_eq!(client.status, "active");
    assert_eq!(service.get_client(client.account_id).await?, client);

    let updated = service
        .update_client(
            client.account_id,
            ClientInput::new("Ironworks Group", "3 Smelter Way", "555-0111").with_status("inactive"),
        )
        .await?;
    assert_eq!(updated.name, "Ironworks Group");
    assert_eq!(updated.status, "inactive");

    service.delete_client(client.account_id).await?;
    assert!(matches!(
        service.get_client(client.account_id).await,
        Err(AppError::NotFound { .. })
    ));

    Ok(())
}

#[tokio::test]
async fn test_clients_listed_in_creation_order() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let first = create_client(&service, "Zinc Works").await?;
    let second = create_client(&service, "Anchor Fab").await?;

    let ids: Vec<_> = service
        .list_clients()
        .await?
        .into_iter()
        .map(|c| c.account_id)
        .collect();
    assert_eq!(ids, [first.account_id, second.account_id]);

    Ok(())
}

#[tokio::test]
async fn test_client_with_jobs_cannot_be_deleted() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;
    create_job(&service, "J-1", client.account_id).await?;

    let result = service.delete_client(client.account_id).await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));
    assert!(service.get_client(client.account_id).await.is_ok());

    service.delete_job("J-1").await?;
    service.delete_client(client.account_id).await?;

    Ok(())
}

#[tokio::test]
async fn test_client_with_estimates_cannot_be_deleted() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;
    create_estimate(&service, client.account_id, "1", "1").await?;

    let result = service.delete_client(client.account_id).await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));

    Ok(())
}

#[tokio::test]
async fn test_missing_client() -> Result<()> {
    let (service, _temp) = test_service().await?;

    assert!(matches!(
        service.delete_client(1).await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        service
            .update_client(1, ClientInput::new("Nobody", "-", "-"))
            .await,
        Err(AppError::NotFound { .. })
    ));

    Ok(())
}

#[tokio::test]
async fn test_client_name_required() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service.create_client(ClientInput::new(" ", "-", "-")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(service.list_clients().await?.is_empty());

    Ok(())
}
