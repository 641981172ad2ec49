use super::*;

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub report_name: PathBuf,
    pub strip_suffixes: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            report_name: PathBuf::from("results.md"),
            strip_suffixes: vec![".py".to_string()],
        }
    }
}

/// Out-of-band warnings raised while ingesting; none of them stop the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestDiagnostic {
    SkippedDirectory {
        path: PathBuf,
    },
    UnreadableReport {
        path: PathBuf,
        reason: String,
    },
    AmbiguousStatus {
        day: DayId,
        model: ModelId,
        part: PartId,
        status: String,
    },
}

impl fmt::Display for IngestDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedDirectory { path } => {
                write!(f, "skipped day directory without numeric suffix: {}", path.display())
            }
            Self::UnreadableReport { path, reason } => {
                write!(f, "unreadable report {}: {reason}", path.display())
            }
            Self::AmbiguousStatus {
                day,
                model,
                part,
                status,
            } => write!(
                f,
                "ambiguous status for ({day}, {model}, {part}) recorded as failure: {status:?}"
            ),
        }
    }
}

#[derive(Debug)]
pub struct IngestOutput {
    pub dataset: Dataset,
    pub diagnostics: Vec<IngestDiagnostic>,
    /// Day directories whose report was read and parsed.
    pub sources: Vec<DayDirectory>,
    pub counts: IngestCounts,
}

/// Walks `input_root` for day directories and folds their reports into a [`Dataset`].
///
/// A missing root is fatal. Unreadable reports and ambiguous statuses are reported as
/// diagnostics and the pass continues. When a (day, model, part) cell appears more than
/// once, the first occurrence in day-then-path-then-line order is kept. A day only
/// appears in the dataset once one of its reports yields a record.
pub fn ingest(input_root: &Path, options: &IngestOptions) -> Result<IngestOutput> {
    let parser = ReportParser::new(&options.strip_suffixes)?;
    let discovery = inventory::discover_day_directories(input_root, &options.report_name)?;

    let mut dataset = Dataset::new();
    let mut sources = Vec::new();
    let mut diagnostics = discovery
        .skipped
        .iter()
        .map(|path| IngestDiagnostic::SkippedDirectory { path: path.clone() })
        .collect::<Vec<_>>();
    let mut counts = IngestCounts {
        day_directories: discovery.days.len() + discovery.skipped.len(),
        ..IngestCounts::default()
    };

    for source in &discovery.days {
        let text = match read_report(&source.report_path) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!(day = %source.day, path = %source.report_path.display(), "no report in day directory");
                continue;
            }
            Err(err) => {
                warn!(error = %err, "skipping unreadable report");
                diagnostics.push(IngestDiagnostic::UnreadableReport {
                    path: source.report_path.clone(),
                    reason: err.to_string(),
                });
                counts.reports_unreadable += 1;
                continue;
            }
        };

        counts.reports_parsed += 1;
        sources.push(source.clone());

        for record in parser.parse(&text) {
            if record.class == StatusClass::Ambiguous {
                let err = BenchError::MalformedRecord {
                    day: source.day,
                    model: record.model.clone(),
                    part: record.part,
                    status: record.status.clone(),
                };
                warn!(
                    error = %err,
                    path = %source.report_path.display(),
                    line = record.line_number,
                    "ambiguous status recorded as failure"
                );
                diagnostics.push(IngestDiagnostic::AmbiguousStatus {
                    day: source.day,
                    model: record.model.clone(),
                    part: record.part,
                    status: record.status.clone(),
                });
                counts.ambiguous_records += 1;
            }

            let inserted = dataset.insert_first(
                source.day,
                record.model.clone(),
                record.part,
                record.class.outcome(),
            );
            if inserted {
                counts.records += 1;
            } else {
                debug!(
                    day = %source.day,
                    model = %record.model,
                    part = %record.part,
                    line = record.line_number,
                    "ignoring duplicate record"
                );
                counts.duplicate_records += 1;
            }
        }
    }

    counts.days = dataset.day_count();
    counts.models = dataset.model_ids().len();

    Ok(IngestOutput {
        dataset,
        diagnostics,
        sources,
        counts,
    })
}

fn read_report(path: &Path) -> std::result::Result<Option<String>, BenchError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(BenchError::InputUnreadable {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}
