use super::*;

pub fn run(args: IngestArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    info!(
        input_root = %args.input_root.display(),
        run_id = %run_id,
        "starting ingest"
    );

    let options = IngestOptions {
        report_name: args.report_name.clone(),
        strip_suffixes: args.strip_suffixes.clone(),
    };
    let output = ingest(&args.input_root, &options)?;

    if output.dataset.is_empty() {
        warn!(input_root = %args.input_root.display(), "ingest produced an empty dataset");
    }

    write_json_pretty(&args.output_path, &output.dataset)?;
    info!(path = %args.output_path.display(), "wrote canonical dataset");

    if let Some(manifest_path) = &args.run_manifest_path {
        let manifest = IngestRunManifest {
            manifest_version: 1,
            run_id: run_id.clone(),
            status: "completed".to_string(),
            started_at,
            updated_at: now_utc_string(),
            command: render_ingest_command(&args),
            paths: IngestPaths {
                input_root: args.input_root.display().to_string(),
                report_name: args.report_name.display().to_string(),
                output_path: args.output_path.display().to_string(),
            },
            counts: output.counts.clone(),
            source_hashes: inventory::hash_reports(&output.sources),
            warnings: output
                .diagnostics
                .iter()
                .map(ToString::to_string)
                .collect(),
        };

        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote ingest run manifest");
    }

    info!(
        run_id = %run_id,
        days = output.counts.days,
        models = output.counts.models,
        records = output.counts.records,
        warnings = output.diagnostics.len(),
        "ingest completed"
    );

    Ok(())
}

pub(super) fn render_ingest_command(args: &IngestArgs) -> String {
    let mut command = vec![
        "puzzlebench".to_string(),
        "ingest".to_string(),
        "--input-root".to_string(),
        args.input_root.display().to_string(),
        "--report-name".to_string(),
        args.report_name.display().to_string(),
        "--output-path".to_string(),
        args.output_path.display().to_string(),
    ];

    for suffix in &args.strip_suffixes {
        command.push("--strip-suffix".to_string());
        command.push(suffix.clone());
    }
    if let Some(path) = &args.run_manifest_path {
        command.push("--run-manifest-path".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}
