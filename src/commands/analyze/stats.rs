use std::cmp::Ordering;

use super::*;

pub const NO_DATA_SENTINEL: &str = "no data";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    attempts: u32,
    solved: u32,
}

impl Tally {
    fn record(&mut self, record: &FlatRecord) {
        self.attempts += 1;
        self.solved += record.outcome.as_count();
    }

    fn success_rate_pct(self) -> Option<f64> {
        success_rate_pct(self.attempts, self.solved)
    }
}

pub fn success_rate_pct(attempts: u32, solved: u32) -> Option<f64> {
    (attempts > 0).then(|| f64::from(solved) / f64::from(attempts) * 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPartStats {
    pub model: ModelId,
    pub part: PartId,
    pub attempts: u32,
    pub solved: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelOverall {
    pub model: ModelId,
    pub attempts: u32,
    pub solved: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_success_rate_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayTotal {
    pub day: DayId,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartVariance {
    pub part: PartId,
    pub samples: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDailySolves {
    pub model: ModelId,
    pub points: Vec<DayTotal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub no_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<String>,
    pub per_model_part_stats: Vec<ModelPartStats>,
    pub per_model_overall: Vec<ModelOverall>,
    pub per_day_totals: Vec<DayTotal>,
    pub per_part_variance: Vec<PartVariance>,
    pub best_model: Option<ModelId>,
    pub best_day: Option<DayTotal>,
    pub worst_day: Option<DayTotal>,
    pub ranking: Vec<ModelId>,
    pub daily_model_solves: Vec<ModelDailySolves>,
}

impl Report {
    pub fn empty() -> Self {
        Self {
            no_data: true,
            sentinel: Some(NO_DATA_SENTINEL.to_string()),
            ..Self::default()
        }
    }

    pub fn overall_for(&self, model: &ModelId) -> Option<&ModelOverall> {
        self.per_model_overall
            .iter()
            .find(|overall| &overall.model == model)
    }
}

/// Aggregates a dataset with single-pass group-bys over its flattened records.
pub fn analyze(dataset: &Dataset) -> Report {
    if dataset.is_empty() {
        return Report::empty();
    }

    let records = dataset.flatten();

    let mut by_model_part = BTreeMap::<(ModelId, PartId), Tally>::new();
    let mut by_model = BTreeMap::<ModelId, Tally>::new();
    let mut by_day = dataset
        .days()
        .map(|(day, _)| (*day, 0_u32))
        .collect::<BTreeMap<_, _>>();
    let mut by_model_day = BTreeMap::<ModelId, BTreeMap<DayId, u32>>::new();

    for record in &records {
        by_model_part
            .entry((record.model.clone(), record.part))
            .or_default()
            .record(record);
        by_model
            .entry(record.model.clone())
            .or_default()
            .record(record);
        *by_day.entry(record.day).or_default() += record.outcome.as_count();
        *by_model_day
            .entry(record.model.clone())
            .or_default()
            .entry(record.day)
            .or_default() += record.outcome.as_count();
    }

    let per_model_part_stats = by_model_part
        .iter()
        .map(|((model, part), tally)| ModelPartStats {
            model: model.clone(),
            part: *part,
            attempts: tally.attempts,
            solved: tally.solved,
            success_rate_pct: tally.success_rate_pct(),
        })
        .collect::<Vec<_>>();

    let per_model_overall = by_model
        .iter()
        .map(|(model, tally)| ModelOverall {
            model: model.clone(),
            attempts: tally.attempts,
            solved: tally.solved,
            overall_success_rate_pct: tally.success_rate_pct(),
        })
        .collect::<Vec<_>>();

    let per_day_totals = by_day
        .into_iter()
        .map(|(day, total)| DayTotal { day, total })
        .collect::<Vec<_>>();

    let ranking = rank_models(&by_model);

    Report {
        no_data: false,
        sentinel: None,
        per_part_variance: part_variances(&per_model_part_stats),
        best_model: ranking.first().cloned(),
        best_day: best_day(&per_day_totals),
        worst_day: worst_day(&per_day_totals),
        per_model_part_stats,
        per_model_overall,
        per_day_totals,
        ranking,
        daily_model_solves: by_model_day
            .into_iter()
            .map(|(model, days)| ModelDailySolves {
                model,
                points: days
                    .into_iter()
                    .map(|(day, total)| DayTotal { day, total })
                    .collect(),
            })
            .collect(),
    }
}

/// Orders models by overall success rate, then total solved, then identifier.
fn rank_models(by_model: &BTreeMap<ModelId, Tally>) -> Vec<ModelId> {
    let mut ranked = by_model
        .iter()
        .filter(|(_, tally)| tally.attempts > 0)
        .collect::<Vec<_>>();
    ranked.sort_by(|(left_model, left), (right_model, right)| {
        compare_rates(right, left)
            .then_with(|| right.solved.cmp(&left.solved))
            .then_with(|| left_model.cmp(right_model))
    });
    ranked.into_iter().map(|(model, _)| model.clone()).collect()
}

/// Compares solved/attempts ratios exactly; both tallies must have attempts.
fn compare_rates(left: &Tally, right: &Tally) -> Ordering {
    let left_scaled = u64::from(left.solved) * u64::from(right.attempts);
    let right_scaled = u64::from(right.solved) * u64::from(left.attempts);
    left_scaled.cmp(&right_scaled)
}

fn best_day(totals: &[DayTotal]) -> Option<DayTotal> {
    totals
        .iter()
        .copied()
        .reduce(|best, candidate| if candidate.total > best.total { candidate } else { best })
}

fn worst_day(totals: &[DayTotal]) -> Option<DayTotal> {
    totals
        .iter()
        .copied()
        .reduce(|worst, candidate| if candidate.total < worst.total { candidate } else { worst })
}

fn part_variances(stats: &[ModelPartStats]) -> Vec<PartVariance> {
    let mut rates_by_part = BTreeMap::<PartId, Vec<f64>>::new();
    for entry in stats {
        if let Some(rate) = entry.success_rate_pct {
            rates_by_part.entry(entry.part).or_default().push(rate);
        }
    }

    rates_by_part
        .into_iter()
        .map(|(part, rates)| PartVariance {
            part,
            samples: rates.len(),
            variance: sample_variance(&rates),
        })
        .collect()
}

/// Unbiased sample variance; undefined below two samples.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squared = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>();
    Some(squared / (n - 1.0))
}
