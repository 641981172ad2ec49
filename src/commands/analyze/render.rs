use std::sync::OnceLock;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};

use super::*;

const PLOT_SIZE: (u32, u32) = (1200, 600);
const FONT_FAMILY: &str = "sans-serif";
const CAPTION_FONT: (&str, u32) = (FONT_FAMILY, 28);

/// Bitmap text needs glyph outlines; SVG output names the family instead.
static CHART_FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");

fn ensure_chart_font() -> Result<()> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();

    REGISTERED
        .get_or_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, CHART_FONT).map_err(|_| "invalid font data".to_string())
        })
        .clone()
        .map_err(|err| anyhow!("failed to load chart font: {err}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlotFormat {
    Png,
    Svg,
}

impl PlotFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Png,
        }
    }
}

/// Draws charts with plotters; `.svg` paths get the vector backend, anything else a PNG bitmap.
#[derive(Debug, Default)]
pub struct PlottersRenderer;

impl ChartRenderer for PlottersRenderer {
    fn render_grouped_bars(&mut self, chart: &GroupedBarChart, path: &Path) -> Result<()> {
        ensure_parent_directory(path)?;
        ensure_chart_font()?;
        match PlotFormat::from_path(path) {
            PlotFormat::Svg => {
                draw_grouped_bars(SVGBackend::new(path, PLOT_SIZE).into_drawing_area(), chart)
            }
            PlotFormat::Png => {
                draw_grouped_bars(BitMapBackend::new(path, PLOT_SIZE).into_drawing_area(), chart)
            }
        }
        .with_context(|| format!("failed to render chart: {}", path.display()))
    }

    fn render_bars(&mut self, chart: &BarChart, path: &Path) -> Result<()> {
        ensure_parent_directory(path)?;
        ensure_chart_font()?;
        match PlotFormat::from_path(path) {
            PlotFormat::Svg => draw_bars(SVGBackend::new(path, PLOT_SIZE).into_drawing_area(), chart),
            PlotFormat::Png => {
                draw_bars(BitMapBackend::new(path, PLOT_SIZE).into_drawing_area(), chart)
            }
        }
        .with_context(|| format!("failed to render chart: {}", path.display()))
    }

    fn render_lines(&mut self, chart: &LineChart, path: &Path) -> Result<()> {
        ensure_parent_directory(path)?;
        ensure_chart_font()?;
        match PlotFormat::from_path(path) {
            PlotFormat::Svg => {
                draw_lines(SVGBackend::new(path, PLOT_SIZE).into_drawing_area(), chart)
            }
            PlotFormat::Png => {
                draw_lines(BitMapBackend::new(path, PLOT_SIZE).into_drawing_area(), chart)
            }
        }
        .with_context(|| format!("failed to render chart: {}", path.display()))
    }
}

fn plot_error<E: std::fmt::Display>(err: E) -> anyhow::Error {
    anyhow!("plot rendering failed: {err}")
}

fn category_label(categories: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    categories.get(index as usize).cloned().unwrap_or_default()
}

fn series_color(index: usize) -> RGBAColor {
    Palette99::pick(index).to_rgba()
}

fn draw_grouped_bars<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    chart: &GroupedBarChart,
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_error)?;

    let category_count = chart.categories.len().max(1);
    let mut context = ChartBuilder::on(&root)
        .caption(&chart.title, CAPTION_FONT)
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(-0.5_f64..(category_count as f64 - 0.5), 0_f64..105_f64)
        .map_err(plot_error)?;

    context
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(category_count)
        .x_label_formatter(&|x: &f64| category_label(&chart.categories, *x))
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()
        .map_err(plot_error)?;

    let bar_width = 0.8 / chart.groups.len().max(1) as f64;
    for (group_index, group) in chart.groups.iter().enumerate() {
        let color = series_color(group_index);
        let offset = -0.4 + group_index as f64 * bar_width;
        let bars = group
            .values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| value.map(|value| (index as f64 + offset, value)))
            .map(|(left, value)| {
                Rectangle::new([(left, 0.0), (left + bar_width, value)], color.filled())
            });

        context
            .draw_series(bars)
            .map_err(plot_error)?
            .label(group.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    context
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, chart: &BarChart) -> Result<()> {
    root.fill(&WHITE).map_err(plot_error)?;

    let category_count = chart.categories.len().max(1);
    let mut context = ChartBuilder::on(&root)
        .caption(&chart.title, CAPTION_FONT)
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(-0.5_f64..(category_count as f64 - 0.5), 0_f64..105_f64)
        .map_err(plot_error)?;

    context
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(category_count)
        .x_label_formatter(&|x: &f64| category_label(&chart.categories, *x))
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()
        .map_err(plot_error)?;

    let color = series_color(0);
    context
        .draw_series(chart.values.iter().enumerate().map(|(index, value)| {
            let center = index as f64;
            Rectangle::new([(center - 0.4, 0.0), (center + 0.4, *value)], color.filled())
        }))
        .map_err(plot_error)?;

    context
        .draw_series(chart.values.iter().enumerate().map(|(index, value)| {
            Text::new(
                format!("{value:.1}%"),
                (index as f64 - 0.1, *value + 3.0),
                (FONT_FAMILY, 14.0),
            )
        }))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

fn draw_lines<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, chart: &LineChart) -> Result<()> {
    root.fill(&WHITE).map_err(plot_error)?;

    let first_day = chart.x_ticks.iter().copied().min().unwrap_or(1) as i32;
    let last_day = chart.x_ticks.iter().copied().max().unwrap_or(1) as i32;
    let y_max = chart
        .series
        .iter()
        .flat_map(|series| series.points.iter().map(|(_, y)| *y))
        .fold(0.0_f64, f64::max);
    let ticks = chart.x_ticks.iter().copied().collect::<BTreeSet<_>>();

    let mut context = ChartBuilder::on(&root)
        .caption(&chart.title, CAPTION_FONT)
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d((first_day - 1)..(last_day + 1), 0_f64..(y_max + 1.0))
        .map_err(plot_error)?;

    context
        .configure_mesh()
        .x_labels((last_day - first_day + 3) as usize)
        .x_label_formatter(&|x: &i32| {
            u32::try_from(*x)
                .ok()
                .filter(|day| ticks.contains(day))
                .map(|day| day.to_string())
                .unwrap_or_default()
        })
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()
        .map_err(plot_error)?;

    for (index, series) in chart.series.iter().enumerate() {
        let color = series_color(index);
        let points = series
            .points
            .iter()
            .map(|(day, total)| (*day as i32, *total))
            .collect::<Vec<_>>();

        context
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
            .map_err(plot_error)?
            .label(series.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        context
            .draw_series(
                points
                    .into_iter()
                    .map(|point| Circle::new(point, 3, color.filled())),
            )
            .map_err(plot_error)?;
    }

    context
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn plot_format_follows_extension() {
        assert_eq!(PlotFormat::from_path(Path::new("a/chart.svg")), PlotFormat::Svg);
        assert_eq!(PlotFormat::from_path(Path::new("chart.SVG")), PlotFormat::Svg);
        assert_eq!(PlotFormat::from_path(Path::new("chart.png")), PlotFormat::Png);
        assert_eq!(PlotFormat::from_path(Path::new("chart")), PlotFormat::Png);
    }

    #[test]
    fn category_label_only_names_integer_positions() {
        let categories = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&categories, 0.0), "a");
        assert_eq!(category_label(&categories, 1.0), "b");
        assert_eq!(category_label(&categories, 0.5), "");
        assert_eq!(category_label(&categories, 2.0), "");
        assert_eq!(category_label(&categories, -1.0), "");
    }

    #[test]
    fn svg_charts_are_written_to_disk() {
        let dir = TempDir::new().unwrap();
        let mut renderer = PlottersRenderer;

        let bars = BarChart {
            title: "Overall".to_string(),
            x_label: "Model".to_string(),
            y_label: "Rate".to_string(),
            categories: vec!["model-a".to_string(), "model-b".to_string()],
            values: vec![50.0, 75.0],
        };
        let lines = LineChart {
            title: "Daily".to_string(),
            x_label: "Day".to_string(),
            y_label: "Solves".to_string(),
            x_ticks: vec![1, 3],
            series: vec![LineSeriesSpec {
                name: "model-a".to_string(),
                points: vec![(1, 2.0), (3, 1.0)],
            }],
        };

        let bars_path = dir.path().join("nested").join("overall.svg");
        let lines_path = dir.path().join("daily.svg");
        renderer.render_bars(&bars, &bars_path).unwrap();
        renderer.render_lines(&lines, &lines_path).unwrap();

        assert!(std::fs::read_to_string(&bars_path).unwrap().contains("<svg"));
        assert!(std::fs::read_to_string(&lines_path).unwrap().contains("<svg"));
    }

    #[test]
    fn png_charts_draw_captions_and_labels() {
        let dir = TempDir::new().unwrap();
        let mut renderer = PlottersRenderer;

        let grouped = GroupedBarChart {
            title: "Success rate by model and part".to_string(),
            x_label: "Model".to_string(),
            y_label: "Success rate (%)".to_string(),
            categories: vec!["model-a".to_string(), "model-b".to_string()],
            groups: vec![
                BarGroup {
                    name: "part1".to_string(),
                    values: vec![Some(100.0), Some(0.0)],
                },
                BarGroup {
                    name: "part2".to_string(),
                    values: vec![Some(0.0), None],
                },
            ],
        };
        let bars = BarChart {
            title: "Overall".to_string(),
            x_label: "Model".to_string(),
            y_label: "Rate".to_string(),
            categories: vec!["model-a".to_string()],
            values: vec![50.0],
        };
        let lines = LineChart {
            title: "Daily".to_string(),
            x_label: "Day".to_string(),
            y_label: "Solves".to_string(),
            x_ticks: vec![1, 2],
            series: vec![LineSeriesSpec {
                name: "model-a".to_string(),
                points: vec![(1, 2.0), (2, 0.0)],
            }],
        };

        let grouped_path = dir.path().join("grouped.png");
        let bars_path = dir.path().join("overall.png");
        let lines_path = dir.path().join("daily.png");
        renderer.render_grouped_bars(&grouped, &grouped_path).unwrap();
        renderer.render_bars(&bars, &bars_path).unwrap();
        renderer.render_lines(&lines, &lines_path).unwrap();

        for path in [grouped_path, bars_path, lines_path] {
            let bytes = std::fs::read(&path).unwrap();
            assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", path.display());
        }
    }
}
