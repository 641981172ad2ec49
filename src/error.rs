use std::path::PathBuf;

use thiserror::Error;

use crate::model::{DayId, ModelId, PartId};

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("input not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("input unreadable: {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record ({day}, {model}, {part}): unrecognized status {status:?}")]
    MalformedRecord {
        day: DayId,
        model: ModelId,
        part: PartId,
        status: String,
    },

    #[error("day directory has no numeric suffix: {}", .path.display())]
    InvalidDayDirectory { path: PathBuf },
}
