use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::api;
use crate::application::ShopService;
use crate::config::{DEFAULT_BIND, DEFAULT_CORS_ORIGINS, DEFAULT_DATABASE, ServerConfig, init_tracing};
use crate::domain::{Estimate, EstimateId, format_amount};

/// Shopledger - records service for a metal-fabrication shop
#[derive(Parser)]
#[command(name = "shopledger")]
#[command(about = "Clients, jobs, inventory, estimates and crews over a JSON HTTP API")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, global = true, env = "SHOPLEDGER_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// Log level (RUST_LOG takes precedence when set)
    #[arg(long, global = true, env = "SHOPLEDGER_LOG", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "SHOPLEDGER_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and apply migrations
    Init,

    /// Serve the HTTP API until interrupted
    Serve {
        /// Address to listen on
        #[arg(long, env = "SHOPLEDGER_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,

        /// Allowed CORS origin (repeat or comma-separate)
        #[arg(
            long = "cors-origin",
            env = "SHOPLEDGER_CORS_ORIGINS",
            value_delimiter = ',',
            default_values = DEFAULT_CORS_ORIGINS
        )]
        cors_origins: Vec<String>,
    },

    /// Verify estimate totals and references
    Check,

    /// Estimate commands
    #[command(subcommand)]
    Estimate(EstimateCommands),
}

#[derive(Subcommand)]
pub enum EstimateCommands {
    /// Show an estimate with its line items and totals
    Show {
        /// Estimate id
        id: EstimateId,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        init_tracing(&self.log_level, self.log_json);

        match self.command {
            Commands::Init => {
                ShopService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Serve { bind, cors_origins } => {
                let service = ShopService::init(&self.database).await?;
                info!(database = %self.database, "database ready");
                let config = ServerConfig::new(bind, cors_origins);
                api::serve(Arc::new(service), &config).await?;
            }

            Commands::Check => {
                let service = ShopService::connect(&self.database).await?;
                run_check_command(&service).await?;
            }

            Commands::Estimate(EstimateCommands::Show { id }) => {
                let service = ShopService::connect(&self.database).await?;
                let estimate = service.get_estimate(id).await?;
                print_estimate(&estimate);
            }
        }

        Ok(())
    }
}

async fn run_check_command(service: &ShopService) -> Result<()> {
    println!("Checking records...\n");

    let report = service.check_integrity().await?;

    println!("Estimates:  {}", report.estimate_count);
    println!("Line items: {}", report.line_item_count);
    println!();

    if report.is_healthy() {
        println!("Records are consistent.");
    } else {
        println!("Issues found:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
        anyhow::bail!("Integrity check failed");
    }

    Ok(())
}

fn print_estimate(estimate: &Estimate) {
    println!("Estimate {} ({})", estimate.estimate_id, estimate.status);
    println!("  Client:      {}", estimate.client_id);
    match estimate.scheduled_date {
        Some(date) => println!("  Scheduled:   {}", date),
        None => println!("  Scheduled:   -"),
    }
    println!(
        "  Created:     {}",
        estimate.date_created.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  Updated:     {}",
        estimate.date_updated.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  Labour:      {} h x {}",
        format_amount(estimate.estimated_hours),
        format_amount(estimate.estimated_hourly_rate)
    );

    println!();
    if estimate.materials.is_empty() {
        println!("  No line items.");
    } else {
        println!("  Line items:");
        for line in &estimate.materials {
            println!(
                "    #{:<4} {:<30} {:>8} x {:>10} = {:>10}",
                line.material_id,
                line.description,
                format_amount(line.quantity),
                format_amount(line.unit_cost),
                format_amount(line.total_cost)
            );
        }
    }

    println!();
    println!("  {:<12} {:>12}", "Materials:", format_amount(estimate.total_materials_cost));
    println!("  {:<12} {:>12}", "Labour:", format_amount(estimate.total_hourly_cost));
    println!("  {}", "-".repeat(25));
    println!("  {:<12} {:>12}", "Total:", format_amount(estimate.total_estimate_cost));
}
