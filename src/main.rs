//! CLI entry point for quest-data.
//!
//! Fetches a quest's datasets through the authenticated API and renders one
//! of the read projections:
//!
//! ```bash
//! quest-data --quest-id <guid> chart --category steps
//! quest-data --quest-id <guid> table
//! quest-data --quest-id <guid> export
//! quest-data --quest-id <guid> subscribers
//! ```
//!
//! The API base URL and bearer token come from `quest-data.toml` or the
//! `QUEST_DATA_` environment (see [`quest_data::config::Settings`]).

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use quest_data::api::HttpQuestApi;
use quest_data::config::Settings;
use quest_data::model::{category_by_value, DISPLAY_CATEGORIES};
use quest_data::session::QuestSession;
use quest_data::telemetry;

#[derive(Parser)]
#[command(name = "quest-data")]
#[command(about = "Fetch, normalize, and project quest datasets", long_about = None)]
struct Cli {
    /// Quest identifier to operate on
    #[arg(long)]
    quest_id: String,

    /// Path to the settings file
    #[arg(long, default_value = "quest-data.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the health bucket as a time series for one metric category
    Chart {
        /// Metric category (steps, sleep, heart_rate)
        #[arg(long, default_value = "steps")]
        category: String,
    },

    /// Flatten prompt and onboarding responses into table rows
    Table,

    /// Write the CSV export file
    Export {
        /// Output directory (defaults to the configured export directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show the distinct subscriber count
    Subscribers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_from(&cli.config)?;
    telemetry::init_from_settings(&settings)?;

    let api = Arc::new(HttpQuestApi::new(
        settings.api.base_url.clone(),
        settings.api.bearer_token.clone(),
    ));
    let session = QuestSession::with_window(api, cli.quest_id, settings.chart.window);
    session.refresh().await;

    match cli.command {
        Commands::Chart { category } => {
            let Some(category) = category_by_value(&category) else {
                let known: Vec<&str> = DISPLAY_CATEGORIES.iter().map(|c| c.value).collect();
                bail!("unknown category '{category}'; expected one of {known:?}");
            };
            let points = session.chart(category);
            println!("{} in the retained window: {} points", category.name, points.len());
            for point in points {
                println!("{}\t{}", point.timestamp.to_rfc3339(), point.value);
            }
        }
        Commands::Table => {
            let rows = session.table();
            println!("{} participant responses", rows.len());
            for row in rows {
                println!(
                    "{}\t{}\t{}\t{}",
                    row.user_guid,
                    row.kind,
                    row.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    row.value
                );
            }
        }
        Commands::Export { out } => {
            let dir = out.unwrap_or(settings.export.output_dir);
            let path = session.export_to_dir(&dir)?;
            println!("wrote {}", path.display());
        }
        Commands::Subscribers => {
            let count = session
                .snapshot()
                .map(|snap| snap.subscribers.count())
                .unwrap_or(0);
            println!("Active participants: {count}");
        }
    }

    Ok(())
}
