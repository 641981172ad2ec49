use super::*;

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub stats: PathBuf,
    pub model_part_chart: PathBuf,
    pub overall_chart: PathBuf,
    pub daily_chart: PathBuf,
}

impl ArtifactPaths {
    pub fn from_args(args: &AnalyzeArgs) -> Self {
        Self {
            stats: args.output_dir.join(&args.stats_name),
            model_part_chart: args.output_dir.join(&args.model_part_chart_name),
            overall_chart: args.output_dir.join(&args.overall_chart_name),
            daily_chart: args.output_dir.join(&args.daily_chart_name),
        }
    }
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut output = io::BufWriter::new(stdout.lock());
    run_with_output(args, &mut output)?;
    output.flush().context("failed to flush summary output")
}

/// Runs `analyze` with the textual summary sent to `output` instead of stdout.
pub fn run_with_output(args: AnalyzeArgs, output: &mut dyn Write) -> Result<()> {
    info!(dataset_path = %args.dataset_path.display(), "starting analyze");

    let dataset: Dataset = read_json(&args.dataset_path)?;
    let report = analyze(&dataset);

    ensure_directory(&args.output_dir)?;
    let paths = ArtifactPaths::from_args(&args);

    let mut renderer = PlottersRenderer;
    let renderer: Option<&mut dyn ChartRenderer> = if args.no_plots {
        None
    } else {
        Some(&mut renderer)
    };

    let written = emit_artifacts(&report, &paths, renderer, output)?;

    info!(
        models = report.ranking.len(),
        days = report.per_day_totals.len(),
        artifacts = written.len(),
        "analyze completed"
    );

    Ok(())
}

/// Emits artifacts in a fixed order: statistics, model/part chart, overall chart,
/// daily chart, then the textual summary. Returns the files written.
pub fn emit_artifacts(
    report: &Report,
    paths: &ArtifactPaths,
    renderer: Option<&mut dyn ChartRenderer>,
    output: &mut dyn Write,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    write_json_pretty(&paths.stats, report)?;
    info!(path = %paths.stats.display(), "wrote statistics table");
    written.push(paths.stats.clone());

    match renderer {
        Some(_) if report.no_data => {
            warn!("dataset has no outcomes; plots suppressed");
        }
        Some(renderer) => {
            renderer.render_grouped_bars(&model_part_chart(report), &paths.model_part_chart)?;
            info!(path = %paths.model_part_chart.display(), "wrote success rate by model and part chart");
            written.push(paths.model_part_chart.clone());

            renderer.render_bars(&overall_chart(report), &paths.overall_chart)?;
            info!(path = %paths.overall_chart.display(), "wrote overall success rate chart");
            written.push(paths.overall_chart.clone());

            renderer.render_lines(&daily_chart(report), &paths.daily_chart)?;
            info!(path = %paths.daily_chart.display(), "wrote daily scores chart");
            written.push(paths.daily_chart.clone());
        }
        None => {
            info!("plot rendering disabled");
        }
    }

    write_summary(output, report).context("failed to write textual summary")?;

    Ok(written)
}
