use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::InventoryArgs;
use crate::error::BenchError;
use crate::model::{DayId, ReportEntry, ReportInventoryManifest};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

const DAY_DIRECTORY_PREFIX: &str = "day";

#[derive(Debug, Clone)]
pub struct DayDirectory {
    pub day: DayId,
    pub path: PathBuf,
    pub report_path: PathBuf,
}

#[derive(Debug, Default)]
pub struct Discovery {
    pub days: Vec<DayDirectory>,
    pub skipped: Vec<PathBuf>,
}

pub fn run(args: InventoryArgs) -> Result<()> {
    let manifest = build_manifest(&args.input_root, &args.report_name)?;

    if args.dry_run {
        info!(
            day_count = manifest.day_count,
            skipped = manifest.skipped_directories.len(),
            input_root = %manifest.input_root,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.input_root.join("report_inventory.json"));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote report inventory manifest");
    info!(day_count = manifest.day_count, "inventory completed");

    Ok(())
}

pub fn build_manifest(input_root: &Path, report_name: &Path) -> Result<ReportInventoryManifest> {
    let discovery = discover_day_directories(input_root, report_name)?;
    let days = hash_reports(&discovery.days);

    Ok(ReportInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        input_root: input_root.display().to_string(),
        report_name: report_name.display().to_string(),
        day_count: days.len(),
        days,
        skipped_directories: discovery
            .skipped
            .iter()
            .map(|path| path.display().to_string())
            .collect(),
    })
}

/// A report that exists but cannot be hashed is listed without a digest.
pub fn hash_reports(days: &[DayDirectory]) -> Vec<ReportEntry> {
    let mut entries = Vec::with_capacity(days.len());
    for day in days {
        let report_present = day.report_path.is_file();
        let sha256 = if report_present {
            hash_report(&day.report_path)
        } else {
            None
        };

        entries.push(ReportEntry {
            day: day.day,
            directory: day.path.display().to_string(),
            report_path: day.report_path.display().to_string(),
            report_present,
            sha256,
        });
    }
    entries
}

fn hash_report(path: &Path) -> Option<String> {
    match sha256_file(path) {
        Ok(digest) => Some(digest),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to hash report");
            None
        }
    }
}

/// Lists `day_NN` directories under `input_root`, ordered by day number then path.
pub fn discover_day_directories(input_root: &Path, report_name: &Path) -> Result<Discovery> {
    if !input_root.is_dir() {
        return Err(BenchError::InputNotFound {
            path: input_root.to_path_buf(),
        }
        .into());
    }

    let entries = fs::read_dir(input_root)
        .with_context(|| format!("failed to read {}", input_root.display()))?;

    let mut discovery = Discovery::default();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_root.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_dir()
        {
            continue;
        }

        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !name.starts_with(DAY_DIRECTORY_PREFIX) {
            continue;
        }

        match DayId::from_directory_name(name) {
            Some(day) => {
                let report_path = path.join(report_name);
                discovery.days.push(DayDirectory {
                    day,
                    path,
                    report_path,
                });
            }
            None => {
                let err = BenchError::InvalidDayDirectory { path: path.clone() };
                warn!(error = %err, "skipping day directory");
                discovery.skipped.push(path);
            }
        }
    }

    discovery
        .days
        .sort_by(|a, b| a.day.cmp(&b.day).then_with(|| a.path.cmp(&b.path)));
    discovery.skipped.sort();

    Ok(discovery)
}
