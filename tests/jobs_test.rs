mod common;

use anyhow::Result;
use common::{create_client, create_job, date, dec, test_service};
use rust_decimal::Decimal;
use shopledger::application::AppError;
use shopledger::domain::{
    ConvertToJob, ESTIMATE_ACCEPTED, EstimateInput, InventoryItemInput, Job, WorkCrewInput,
};

#[tokio::test]
async fn test_job_for_missing_client_is_not_persisted() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service
        .create_job(Job::new("J1", 999, "1 Anvil Rd", date("2024-06-03"), dec("100")))
        .await;

    assert!(matches!(
        result,
        Err(AppError::InvalidReference { entity: "Client", .. })
    ));
    assert!(service.list_jobs().await?.is_empty());
    assert!(matches!(
        service.get_job("J1").await,
        Err(AppError::NotFound { .. })
    ));

    Ok(())
}

#[tokio::test]
async fn test_job_with_missing_crew_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;

    let result = service
        .create_job(
            Job::new("J1", client.account_id, "1 Anvil Rd", date("2024-06-03"), dec("100"))
                .with_crew(5),
        )
        .await;

    assert!(matches!(
        result,
        Err(AppError::InvalidReference { entity: "WorkCrew", .. })
    ));

    Ok(())
}

#[tokio::test]
async fn test_duplicate_job_id_conflicts() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;
    create_job(&service, "J-7", client.account_id).await?;

    let result = create_job(&service, "J-7", client.account_id).await;
    let err = result.unwrap_err().downcast::<AppError>()?;
    assert!(matches!(err, AppError::Conflict { .. }));

    Ok(())
}

#[tokio::test]
async fn test_blank_job_id_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;

    let result = service
        .create_job(Job::new("   ", client.account_id, "1 Anvil Rd", date("2024-06-03"), dec("1")))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    Ok(())
}

#[tokio::test]
async fn test_jobs_listed_latest_first_and_by_client() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let acme = create_client(&service, "Acme").await?;
    let bolt = create_client(&service, "Bolt & Co").await?;

    for (id, client, day) in [
        ("J-1", acme.account_id, "2024-05-01"),
        ("J-2", bolt.account_id, "2024-07-15"),
        ("J-3", acme.account_id, "2024-06-10"),
    ] {
        service
            .create_job(Job::new(id, client, "Yard 4", date(day), dec("300")))
            .await?;
    }

    let all: Vec<_> = service
        .list_jobs()
        .await?
        .into_iter()
        .map(|j| j.job_id)
        .collect();
    assert_eq!(all, ["J-2", "J-3", "J-1"]);

    let acme_jobs: Vec<_> = service
        .list_jobs_for_client(acme.account_id)
        .await?
        .into_iter()
        .map(|j| j.job_id)
        .collect();
    assert_eq!(acme_jobs, ["J-3", "J-1"]);

    assert!(service.list_jobs_for_client(999).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_update_settles_actual_total() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;
    let mut job = create_job(&service, "J-9", client.account_id).await?;

    job.actual_hours = Some(dec("12"));
    job.actual_hourly_rate = Some(dec("55"));
    job.actual_materials_cost = Some(dec("210.40"));
    job.actual_total_cost = Some(dec("1"));
    job.status = "completed".into();

    let updated = service.update_job("J-9", job).await?;
    assert_eq!(updated.actual_total_cost, Some(dec("870.40")));
    assert_eq!(updated.status, "completed");
    assert_eq!(service.get_job("J-9").await?, updated);

    Ok(())
}

#[tokio::test]
async fn test_update_keeps_supplied_total_without_rate() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;
    let mut job = create_job(&service, "J-9", client.account_id).await?;

    job.actual_hours = Some(dec("12"));
    job.actual_total_cost = Some(dec("999"));

    let updated = service.update_job("J-9", job).await?;
    assert_eq!(updated.actual_total_cost, Some(dec("999")));

    Ok(())
}

#[tokio::test]
async fn test_update_takes_id_from_path() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;
    let mut job = create_job(&service, "J-9", client.account_id).await?;

    job.job_id = "J-OTHER".into();
    job.address = "New site".into();
    let updated = service.update_job("J-9", job).await?;

    assert_eq!(updated.job_id, "J-9");
    assert_eq!(service.get_job("J-9").await?.address, "New site");
    assert!(matches!(
        service.get_job("J-OTHER").await,
        Err(AppError::NotFound { .. })
    ));

    Ok(())
}

#[tokio::test]
async fn test_update_missing_job() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;

    let result = service
        .update_job(
            "J-404",
            Job::new("", client.account_id, "x", date("2024-01-01"), dec("0")),
        )
        .await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn test_delete_job_releases_inventory() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;
    create_job(&service, "J-1", client.account_id).await?;

    let held = service
        .create_inventory_item(
            InventoryItemInput::new("Angle iron", 6, dec("14.20"), dec("0.25")).assigned_to("J-1"),
        )
        .await?;
    let free = service
        .create_inventory_item(InventoryItemInput::new("Welding wire", 2, dec("38"), dec("0.1")))
        .await?;
    assert_eq!(service.list_inventory_for_job("J-1").await?, vec![held.clone()]);

    service.delete_job("J-1").await?;

    let items = service.list_inventory().await?;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].item_id, held.item_id);
    assert_eq!(items[0].assigned_job_id, None);
    assert_eq!(items[0].quantity, 6);
    assert_eq!(items[1], free);
    assert!(service.list_inventory_for_job("J-1").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_inventory_for_missing_job_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service
        .create_inventory_item(
            InventoryItemInput::new("Sheet", 1, dec("80"), dec("0.2")).assigned_to("J-404"),
        )
        .await;
    assert!(matches!(
        result,
        Err(AppError::InvalidReference { entity: "Job", .. })
    ));

    // A blank assignment means unassigned.
    let item = service
        .create_inventory_item(InventoryItemInput::new("Sheet", 1, dec("80"), dec("0.2")).assigned_to("  "))
        .await?;
    assert_eq!(item.assigned_job_id, None);

    Ok(())
}

#[tokio::test]
async fn test_delete_crew_clears_job_assignment() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;
    let crew = service.create_work_crew(WorkCrewInput::new("Install")).await?;
    service
        .create_job(
            Job::new("J-1", client.account_id, "Yard", date("2024-06-03"), dec("10"))
                .with_crew(crew.crew_id),
        )
        .await?;

    service.delete_work_crew(crew.crew_id).await?;

    assert_eq!(service.get_job("J-1").await?.crew_id, None);

    Ok(())
}

#[tokio::test]
async fn test_overflowing_actual_total_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;

    let mut job = Job::new("J-1", client.account_id, "Yard", date("2024-06-03"), dec("10"));
    job.actual_hours = Some(Decimal::MAX);
    job.actual_hourly_rate = Some(dec("2"));
    let result = service.create_job(job.clone()).await;
    assert!(matches!(result, Err(AppError::Validation(ref err)) if err.field == "actual_total_cost"));
    assert!(service.list_jobs().await?.is_empty());

    let stored = create_job(&service, "J-1", client.account_id).await?;
    job.actual_hourly_rate = Some(dec("1"));
    job.actual_materials_cost = Some(dec("1"));
    let result = service.update_job("J-1", job).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(service.get_job("J-1").await?, stored);

    Ok(())
}

#[tokio::test]
async fn test_taken_job_id_wins_over_bad_reference() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Ironworks Ltd").await?;
    create_job(&service, "J-1", client.account_id).await?;

    let direct = service
        .create_job(
            Job::new("J-1", client.account_id, "Yard", date("2024-06-03"), dec("10")).with_crew(404),
        )
        .await;
    assert!(matches!(direct, Err(AppError::Conflict { .. })));

    let estimate = service
        .create_estimate(EstimateInput::new(client.account_id).with_status(ESTIMATE_ACCEPTED))
        .await?;
    let mut fields = ConvertToJob::new("J-1", "Yard", date("2024-06-03"));
    fields.crew_id = Some(404);
    let converted = service.convert_estimate_to_job(estimate.estimate_id, fields).await;
    assert!(matches!(converted, Err(AppError::Conflict { .. })));

    Ok(())
}

#[tokio::test]
async fn test_update_missing_item_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service
        .update_inventory_item(
            999,
            InventoryItemInput::new("Sheet", 1, dec("80"), dec("0.2")).assigned_to("J-404"),
        )
        .await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));

    Ok(())
}
