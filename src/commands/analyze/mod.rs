use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::AnalyzeArgs;
use crate::model::{Dataset, DayId, FlatRecord, ModelId, PartId};
use crate::util::{ensure_directory, ensure_parent_directory, read_json, write_json_pretty};

mod charts;
mod render;
mod run;
mod stats;
mod summary;

pub use run::run;

use charts::*;
use render::*;
use run::*;
use stats::*;
use summary::*;
