// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shopledger::application::ShopService;
use shopledger::domain::{Client, ClientInput, Estimate, EstimateInput, Job};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(ShopService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = ShopService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Decimal literal, e.g. `dec("12.50")`.
pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub async fn create_client(service: &ShopService, name: &str) -> Result<Client> {
    Ok(service
        .create_client(ClientInput::new(name, "12 Forge Lane", "555-0100"))
        .await?)
}

/// Estimate for `client_id` with the given labour and no line items.
pub async fn create_estimate(
    service: &ShopService,
    client_id: i64,
    hours: &str,
    rate: &str,
) -> Result<Estimate> {
    Ok(service
        .create_estimate(EstimateInput::new(client_id).with_labour(dec(hours), dec(rate)))
        .await?)
}

pub async fn create_job(service: &ShopService, job_id: &str, client_id: i64) -> Result<Job> {
    Ok(service
        .create_job(Job::new(
            job_id,
            client_id,
            "12 Forge Lane",
            date("2024-06-03"),
            dec("1200"),
        ))
        .await?)
}
