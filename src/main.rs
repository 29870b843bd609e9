use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

mod db;
mod loader;
mod metrics;
mod models;
mod report;

use loader::TicketStore;

#[derive(Parser)]
#[command(name = "ticket-insight")]
#[command(about = "Work-order ticket analytics and technician scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Global ticket count, mean duration, and rejection rate
    Summary {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Per-technician performance scores
    Technicians {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Most frequent ticket notes
    Notes {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = 10)]
        top: usize,
        #[arg(long)]
        json: bool,
    },
    /// Ticket volume by hour of creation
    Hourly {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Technician-days whose ticket volume crossed the alert threshold
    Alerts {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Write a combined markdown report
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Forecast ticket volume (not yet available)
    Forecast,
    /// Export the report as a PDF (not yet available)
    ExportPdf,
    /// Create the persisted task table if absent
    InitDb,
    /// Insert sample task rows
    SeedTasks,
}

async fn connect_pool() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

fn open_table(csv: PathBuf) -> anyhow::Result<TicketStore> {
    let mut store = TicketStore::new(csv);
    let skewed = loader::negative_duration_count(store.tickets()?);
    if skewed > 0 {
        eprintln!("Warning: {skewed} tickets close before they open; durations kept as-is.");
    }
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { csv, json } => {
            let mut store = open_table(csv)?;
            let summary = metrics::fleet_summary(store.tickets()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", report::render_summary(&summary));
            }
        }
        Commands::Technicians { csv, limit, json } => {
            let mut store = open_table(csv)?;
            let summaries = metrics::technician_summaries(store.tickets()?);
            if json {
                let top: Vec<_> = summaries.iter().take(limit).collect();
                println!("{}", serde_json::to_string_pretty(&top)?);
            } else {
                print!("{}", report::render_technicians(&summaries, limit));
            }
        }
        Commands::Notes { csv, top, json } => {
            let mut store = open_table(csv)?;
            let frequencies = metrics::note_frequencies(store.tickets()?);
            if json {
                let ranked: Vec<_> = frequencies.iter().take(top).collect();
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            } else {
                print!("{}", report::render_notes(&frequencies, top));
            }
        }
        Commands::Hourly { csv, json } => {
            let mut store = open_table(csv)?;
            let buckets = metrics::hourly_distribution(store.tickets()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&buckets)?);
            } else {
                print!("{}", report::render_hourly(&buckets));
            }
        }
        Commands::Alerts { csv, json } => {
            let mut store = open_table(csv)?;
            let alerts = metrics::daily_volume_alerts(store.tickets()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&alerts)?);
            } else {
                print!("{}", report::render_alerts(&alerts));
            }
        }
        Commands::Report { csv, out } => {
            let source = csv.display().to_string();
            let mut store = open_table(csv)?;
            let tickets = store.tickets()?;
            let rendered = report::build_report(
                &source,
                &metrics::fleet_summary(tickets),
                &metrics::technician_summaries(tickets),
                &metrics::note_frequencies(tickets),
                &metrics::hourly_distribution(tickets),
                &metrics::daily_volume_alerts(tickets),
            );
            std::fs::write(&out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Forecast => {
            println!("Ticket volume forecasting is not yet available.");
        }
        Commands::ExportPdf => {
            println!("PDF export is not yet available.");
        }
        Commands::InitDb => {
            let pool = connect_pool().await?;
            db::ensure_tasks_table(&pool).await?;
            println!("Task table ready.");
        }
        Commands::SeedTasks => {
            let pool = connect_pool().await?;
            db::ensure_tasks_table(&pool).await?;
            let inserted = db::seed_tasks(&pool).await?;
            println!("Inserted {inserted} sample tasks.");
        }
    }

    Ok(())
}
