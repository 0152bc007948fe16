use anyhow::Result;
use aquaforge_schemas::measurement::MeasurementRecord;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod form;
mod logging;
mod plotting;
mod render;
mod web;
mod workflow;

use logging::*;

#[derive(Debug, Parser)]
#[command(
    name = "aquaforge",
    version,
    about = "Predict O₂, BSK5 and suspended solids from water chemistry measurements"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, env = "AQUAFORGE_CONFIG", default_value = "aquaforge-app/config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the prediction form over HTTP.
    Serve {
        /// Address to listen on, overriding the configuration file.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Predict a single water sample.
    Predict(PredictArgs),
    /// Score every row of a CSV file with columns NH4,NO3,NO2,SO4,PO4,CL.
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
}

/// Measurements in mg/L, each within [0, 100].
#[derive(Debug, Args)]
struct PredictArgs {
    #[arg(long, default_value_t = 1.0, value_parser = form::parse_nh4)]
    nh4: f64,
    #[arg(long, default_value_t = 1.0, value_parser = form::parse_no3)]
    no3: f64,
    #[arg(long, default_value_t = 1.0, value_parser = form::parse_no2)]
    no2: f64,
    #[arg(long, default_value_t = 1.0, value_parser = form::parse_so4)]
    so4: f64,
    #[arg(long, default_value_t = 1.0, value_parser = form::parse_po4)]
    po4: f64,
    #[arg(long, default_value_t = 1.0, value_parser = form::parse_cl)]
    cl: f64,

    /// Save a bar chart under the configured chart directory.
    #[arg(long)]
    chart: bool,

    /// Save the bar chart to this PNG file instead.
    #[arg(long)]
    chart_path: Option<PathBuf>,
}

impl PredictArgs {
    fn record(&self) -> MeasurementRecord {
        MeasurementRecord {
            nh4: self.nh4,
            no3: self.no3,
            no2: self.no2,
            so4: self.so4,
            po4: self.po4,
            cl: self.cl,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = DEFAULT.new(o!("function" => "main"));

    let mut app_config = config::AppConfig::load(&cli.config)?;
    debug!(log, "configuration loaded"; "path" => %cli.config.display());

    // Artifacts are a startup precondition: nothing below runs without them.
    let predictor = workflow::load_predictor(&app_config.artifacts)?;

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                app_config.server.bind = bind;
            }
            workflow::run_serve(predictor, &app_config).await?;
        }
        Command::Predict(args) => {
            let chart_path = match (&args.chart_path, args.chart) {
                (Some(path), _) => Some(path.clone()),
                (None, true) => Some(workflow::default_chart_path(&app_config.chart)),
                (None, false) => None,
            };
            workflow::run_predict(
                &predictor,
                &args.record(),
                chart_path.as_deref(),
                &app_config.chart,
            )?;
        }
        Command::Batch { input, output } => {
            workflow::run_batch(&predictor, &input, &output)?;
        }
    }

    Ok(())
}
