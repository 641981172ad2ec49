use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct BarGroup {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// One bar per (category, group); missing cells have no bar.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub groups: Vec<BarGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeriesSpec {
    pub name: String,
    pub points: Vec<(u32, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_ticks: Vec<u32>,
    pub series: Vec<LineSeriesSpec>,
}

/// Rendering seam for the analyze stage.
pub trait ChartRenderer {
    fn render_grouped_bars(&mut self, chart: &GroupedBarChart, path: &Path) -> Result<()>;
    fn render_bars(&mut self, chart: &BarChart, path: &Path) -> Result<()>;
    fn render_lines(&mut self, chart: &LineChart, path: &Path) -> Result<()>;
}

pub fn model_part_chart(report: &Report) -> GroupedBarChart {
    let categories = report
        .per_model_overall
        .iter()
        .map(|overall| overall.model.clone())
        .collect::<Vec<_>>();
    let parts = report
        .per_model_part_stats
        .iter()
        .map(|entry| entry.part)
        .collect::<BTreeSet<_>>();

    let groups = parts
        .into_iter()
        .map(|part| BarGroup {
            name: part.to_string(),
            values: categories
                .iter()
                .map(|model| {
                    report
                        .per_model_part_stats
                        .iter()
                        .find(|entry| &entry.model == model && entry.part == part)
                        .and_then(|entry| entry.success_rate_pct)
                })
                .collect(),
        })
        .collect();

    GroupedBarChart {
        title: "Success Rate by Model and Part".to_string(),
        x_label: "Model".to_string(),
        y_label: "Success Rate (%)".to_string(),
        categories: categories.iter().map(ToString::to_string).collect(),
        groups,
    }
}

pub fn overall_chart(report: &Report) -> BarChart {
    let rated = report
        .per_model_overall
        .iter()
        .filter_map(|overall| {
            overall
                .overall_success_rate_pct
                .map(|rate| (overall.model.to_string(), rate))
        })
        .collect::<Vec<_>>();

    BarChart {
        title: "Overall Success Rate by Model".to_string(),
        x_label: "Model".to_string(),
        y_label: "Overall Success Rate (%)".to_string(),
        categories: rated.iter().map(|(model, _)| model.clone()).collect(),
        values: rated.iter().map(|(_, rate)| *rate).collect(),
    }
}

pub fn daily_chart(report: &Report) -> LineChart {
    LineChart {
        title: "Daily Scores by Model".to_string(),
        x_label: "Day".to_string(),
        y_label: "Total Solves".to_string(),
        x_ticks: report
            .per_day_totals
            .iter()
            .map(|total| total.day.number())
            .collect(),
        series: report
            .daily_model_solves
            .iter()
            .map(|daily| LineSeriesSpec {
                name: daily.model.to_string(),
                points: daily
                    .points
                    .iter()
                    .map(|point| (point.day.number(), f64::from(point.total)))
                    .collect(),
            })
            .collect(),
    }
}
