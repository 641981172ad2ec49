use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Day tag of the form `dayNN`, ordered by its number rather than its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayId(u32);

impl DayId {
    pub fn new(number: u32) -> Option<Self> {
        (number >= 1).then_some(Self(number))
    }

    pub fn number(self) -> u32 {
        self.0
    }

    /// Derives the day from the trailing digit run of a directory name such as `day_07`.
    pub fn from_directory_name(name: &str) -> Option<Self> {
        let prefix_len = name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let digits = &name[prefix_len..];
        if digits.is_empty() {
            return None;
        }

        digits.parse::<u32>().ok().and_then(Self::new)
    }
}

impl fmt::Display for DayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day{:02}", self.0)
    }
}

impl FromStr for DayId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value
            .strip_prefix("day")
            .filter(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| format!("invalid day tag: {value}"))?;

        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("invalid day number in tag: {value}"))
    }
}

impl TryFrom<String> for DayId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayId> for String {
    fn from(value: DayId) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PartId {
    Part1,
    Part2,
}

impl PartId {
    pub const ALL: [PartId; 2] = [PartId::Part1, PartId::Part2];

    pub fn from_number(number: u32) -> Option<Self> {
        match number {
            1 => Some(Self::Part1),
            2 => Some(Self::Part2),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Part1 => "part1",
            Self::Part2 => "part2",
        }
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PartId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "part1" => Ok(Self::Part1),
            "part2" => Ok(Self::Part2),
            other => Err(format!("invalid part tag: {other}")),
        }
    }
}

impl From<PartId> for String {
    fn from(value: PartId) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    pub fn as_count(self) -> u32 {
        u32::from(u8::from(self))
    }
}

impl TryFrom<u8> for Outcome {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Failure),
            1 => Ok(Self::Success),
            other => Err(format!("outcome must be 0 or 1, got {other}")),
        }
    }
}

impl From<Outcome> for u8 {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }
}

pub type ModelOutcomes = BTreeMap<PartId, Outcome>;
pub type DayOutcomes = BTreeMap<ModelId, ModelOutcomes>;

/// Canonical day -> model -> part -> outcome mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    days: BTreeMap<DayId, DayOutcomes>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an outcome unless the cell already holds one. Returns whether it was inserted.
    pub fn insert_first(
        &mut self,
        day: DayId,
        model: ModelId,
        part: PartId,
        outcome: Outcome,
    ) -> bool {
        let parts = self
            .days
            .entry(day)
            .or_default()
            .entry(model)
            .or_default();

        if parts.contains_key(&part) {
            return false;
        }
        parts.insert(part, outcome);
        true
    }

    #[cfg(test)]
    pub fn get(&self, day: DayId, model: &ModelId, part: PartId) -> Option<Outcome> {
        self.days
            .get(&day)
            .and_then(|models| models.get(model))
            .and_then(|parts| parts.get(&part))
            .copied()
    }

    pub fn days(&self) -> impl Iterator<Item = (&DayId, &DayOutcomes)> {
        self.days.iter()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn cell_count(&self) -> usize {
        self.days
            .values()
            .flat_map(|models| models.values())
            .map(|parts| parts.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    pub fn model_ids(&self) -> Vec<ModelId> {
        let mut models = self
            .days
            .values()
            .flat_map(|models| models.keys().cloned())
            .collect::<Vec<_>>();
        models.sort();
        models.dedup();
        models
    }

    pub fn flatten(&self) -> Vec<FlatRecord> {
        let mut records = Vec::with_capacity(self.cell_count());
        for (day, models) in &self.days {
            for (model, parts) in models {
                for (part, outcome) in parts {
                    records.push(FlatRecord {
                        day: *day,
                        day_index: day.number(),
                        model: model.clone(),
                        part: *part,
                        outcome: *outcome,
                    });
                }
            }
        }
        records
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecord {
    pub day: DayId,
    pub day_index: u32,
    pub model: ModelId,
    pub part: PartId,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub day: DayId,
    pub directory: String,
    pub report_path: String,
    pub report_present: bool,
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub input_root: String,
    pub report_name: String,
    pub day_count: usize,
    pub days: Vec<ReportEntry>,
    pub skipped_directories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestPaths {
    pub input_root: String,
    pub report_name: String,
    pub output_path: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestCounts {
    pub day_directories: usize,
    pub reports_parsed: usize,
    pub reports_unreadable: usize,
    pub records: usize,
    pub ambiguous_records: usize,
    pub duplicate_records: usize,
    pub days: usize,
    pub models: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub paths: IngestPaths,
    pub counts: IngestCounts,
    pub source_hashes: Vec<ReportEntry>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_id_formats_with_two_digit_padding_and_orders_numerically() {
        let day_three = DayId::from_directory_name("day_3").unwrap();
        let day_twelve = DayId::from_directory_name("day_12").unwrap();
        let day_hundred = DayId::from_directory_name("day100").unwrap();

        assert_eq!(day_three.to_string(), "day03");
        assert_eq!(day_hundred.to_string(), "day100");
        assert!(day_three < day_twelve && day_twelve < day_hundred);
        assert_eq!("day07".parse::<DayId>(), Ok(DayId::new(7).unwrap()));
    }

    #[test]
    fn day_id_rejects_missing_or_zero_suffix() {
        assert_eq!(DayId::from_directory_name("day_"), None);
        assert_eq!(DayId::from_directory_name("day_00"), None);
        assert!("day".parse::<DayId>().is_err());
        assert!("dayx1".parse::<DayId>().is_err());
        assert!("day00".parse::<DayId>().is_err());
    }

    #[test]
    fn outcome_deserialization_rejects_values_other_than_zero_and_one() {
        let parsed: Dataset =
            serde_json::from_str(r#"{"day01": {"m": {"part1": 1, "part2": 0}}}"#).unwrap();
        assert_eq!(parsed.cell_count(), 2);

        assert!(serde_json::from_str::<Dataset>(r#"{"day01": {"m": {"part1": 2}}}"#).is_err());
        assert!(serde_json::from_str::<Dataset>(r#"{"day01": {"m": {"part3": 1}}}"#).is_err());
        assert!(serde_json::from_str::<Dataset>(r#"{"first": {"m": {"part1": 1}}}"#).is_err());
    }

    #[test]
    fn serialization_order_is_independent_of_insertion_order() {
        let cells = [
            (2, "zeta", PartId::Part2, Outcome::Success),
            (10, "alpha", PartId::Part1, Outcome::Failure),
            (2, "alpha", PartId::Part1, Outcome::Success),
            (1, "beta", PartId::Part1, Outcome::Failure),
        ];

        let mut forward = Dataset::new();
        let mut backward = Dataset::new();
        for (day, model, part, outcome) in cells {
            forward.insert_first(DayId::new(day).unwrap(), ModelId::new(model), part, outcome);
        }
        for (day, model, part, outcome) in cells.into_iter().rev() {
            backward.insert_first(DayId::new(day).unwrap(), ModelId::new(model), part, outcome);
        }

        let forward_json = serde_json::to_string_pretty(&forward).unwrap();
        assert_eq!(forward_json, serde_json::to_string_pretty(&backward).unwrap());
        assert!(forward_json.find("day01").unwrap() < forward_json.find("day10").unwrap());
    }

    #[test]
    fn flatten_carries_numeric_day_index() {
        let mut dataset = Dataset::new();
        dataset.insert_first(
            DayId::new(9).unwrap(),
            ModelId::new("m"),
            PartId::Part2,
            Outcome::Success,
        );

        let records = dataset.flatten();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].day_index, 9);
        assert_eq!(records[0].part, PartId::Part2);
        assert_eq!(records[0].outcome.as_count(), 1);
    }
}
