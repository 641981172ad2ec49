use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "puzzlebench",
    version,
    about = "Aggregate daily puzzle results per model into datasets, statistics and plots"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Inventory(InventoryArgs),
    Ingest(IngestArgs),
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(long, default_value = ".")]
    pub input_root: PathBuf,

    #[arg(long, default_value = "results.md")]
    pub report_name: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    #[arg(long, default_value = ".")]
    pub input_root: PathBuf,

    #[arg(long, default_value = "results.md")]
    pub report_name: PathBuf,

    #[arg(long, default_value = "model_performance.json")]
    pub output_path: PathBuf,

    #[arg(long = "strip-suffix", default_values_t = [String::from(".py")])]
    pub strip_suffixes: Vec<String>,

    #[arg(long)]
    pub run_manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(long, default_value = "model_performance.json")]
    pub dataset_path: PathBuf,

    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    #[arg(long, default_value = "performance_stats.json")]
    pub stats_name: PathBuf,

    #[arg(long, default_value = "success_rate_by_model_part.png")]
    pub model_part_chart_name: PathBuf,

    #[arg(long, default_value = "overall_success_rate.png")]
    pub overall_chart_name: PathBuf,

    #[arg(long, default_value = "daily_scores_distribution.png")]
    pub daily_chart_name: PathBuf,

    #[arg(long, default_value_t = false)]
    pub no_plots: bool,
}
