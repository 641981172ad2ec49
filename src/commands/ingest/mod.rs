use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::cli::IngestArgs;
use crate::commands::inventory::{self, DayDirectory};
use crate::error::BenchError;
use crate::model::{
    Dataset, DayId, IngestCounts, IngestPaths, IngestRunManifest, ModelId, Outcome, PartId,
};
use crate::util::{now_utc_string, utc_compact_string, write_json_pretty};

mod pipeline;
mod report_parse;
mod run;

pub use pipeline::{IngestOptions, IngestOutput, ingest};
pub use run::run;

use pipeline::*;
use report_parse::*;
use run::*;
