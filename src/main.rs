mod commands;
mod dates;
mod render;
mod utils;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use postcal_core::caption::ThemedCaptions;
use postcal_core::clock::SystemClock;
use postcal_core::config::PostcalConfig;
use postcal_core::date_grid::ViewMode;
use postcal_core::image::DataUrlEncoder;
use postcal_core::planner::Planner;
use postcal_core::session::SessionController;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "postcal")]
#[command(about = "Plan captioned posts on a month or week calendar")]
struct Cli {
    /// Log session and store activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one calendar page
    Show {
        /// "month" or "week" (defaults to the configured view)
        #[arg(long)]
        view: Option<ViewMode>,

        /// Any day on the page to show (YYYY-MM-DD or e.g. "next friday")
        #[arg(long)]
        date: Option<String>,
    },
    /// Schedule, edit and delete posts interactively (default)
    Plan {
        /// "month" or "week" (defaults to the configured view)
        #[arg(long)]
        view: Option<ViewMode>,

        /// Day to start on instead of today
        #[arg(long)]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = PostcalConfig::load().context("Failed to load postcal config")?;

    match cli.command {
        Some(Commands::Show { view, date }) => {
            let date = parse_date_arg(date.as_deref())?;
            commands::show::run(view.unwrap_or(config.view), date)
        }
        Some(Commands::Plan { view, date }) => run_plan(&config, view, date.as_deref()).await,
        None => run_plan(&config, None, None).await,
    }
}

async fn run_plan(config: &PostcalConfig, view: Option<ViewMode>, date: Option<&str>) -> Result<()> {
    let date = parse_date_arg(date)?;

    let session = SessionController::new(SystemClock).with_default_theme(config.theme);
    let mut planner = Planner::new(session, view.unwrap_or(config.view));
    if let Some(date) = date {
        planner.go_to(date);
    }

    let generator = ThemedCaptions::new(config.caption_delay()?);
    let tools = commands::plan::Collaborators {
        generator: &generator,
        encoder: &DataUrlEncoder,
        caption_timeout: config.caption_timeout()?,
    };

    commands::plan::run(planner, tools).await
}

fn parse_date_arg(date: Option<&str>) -> Result<Option<NaiveDate>> {
    date.map(dates::parse_date).transpose()
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("POSTCAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
