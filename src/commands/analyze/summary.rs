use super::*;

fn format_rate(rate: Option<f64>) -> String {
    rate.map(|value| format!("{value:.1}%"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn model_column_width(report: &Report) -> usize {
    report
        .per_model_overall
        .iter()
        .map(|overall| overall.model.as_str().len())
        .max()
        .unwrap_or(0)
        .max("model".len())
}

/// Writes the textual summary: model/part table, overall table, highlights, variance, ranking.
pub fn write_summary<W: Write + ?Sized>(output: &mut W, report: &Report) -> io::Result<()> {
    if report.no_data {
        writeln!(
            output,
            "Summary: {}",
            report.sentinel.as_deref().unwrap_or(NO_DATA_SENTINEL)
        )?;
        return Ok(());
    }

    let width = model_column_width(report);

    writeln!(output, "Success rate by model and part")?;
    writeln!(
        output,
        "{:<width$}  {:<5}  {:>8}  {:>6}  {:>12}",
        "model", "part", "attempts", "solved", "success_rate"
    )?;
    for entry in &report.per_model_part_stats {
        writeln!(
            output,
            "{:<width$}  {:<5}  {:>8}  {:>6}  {:>12}",
            entry.model.as_str(),
            entry.part.as_str(),
            entry.attempts,
            entry.solved,
            format_rate(entry.success_rate_pct)
        )?;
    }
    writeln!(output)?;

    writeln!(output, "Overall success rate by model")?;
    writeln!(
        output,
        "{:<width$}  {:>8}  {:>6}  {:>12}",
        "model", "attempts", "solved", "success_rate"
    )?;
    for overall in &report.per_model_overall {
        writeln!(
            output,
            "{:<width$}  {:>8}  {:>6}  {:>12}",
            overall.model.as_str(),
            overall.attempts,
            overall.solved,
            format_rate(overall.overall_success_rate_pct)
        )?;
    }
    writeln!(output)?;

    if let Some(best) = report
        .best_model
        .as_ref()
        .and_then(|model| report.overall_for(model))
    {
        writeln!(
            output,
            "Best model: {} with {} overall success ({} of {} solved)",
            best.model,
            format_rate(best.overall_success_rate_pct),
            best.solved,
            best.attempts
        )?;
    }
    if let Some(best_day) = report.best_day {
        writeln!(
            output,
            "Best day: {} with {} total solves",
            best_day.day, best_day.total
        )?;
    }
    if let Some(worst_day) = report.worst_day {
        writeln!(
            output,
            "Worst day: {} with {} total solves",
            worst_day.day, worst_day.total
        )?;
    }
    writeln!(output)?;

    writeln!(output, "Variance of success rate by part")?;
    writeln!(output, "{:<5}  {:>6}  {:>10}", "part", "models", "variance")?;
    for entry in &report.per_part_variance {
        let variance = entry
            .variance
            .map(|value| format!("{value:.1}"))
            .unwrap_or_else(|| "omitted".to_string());
        writeln!(
            output,
            "{:<5}  {:>6}  {:>10}",
            entry.part.as_str(),
            entry.samples,
            variance
        )?;
    }
    writeln!(output)?;

    writeln!(output, "Final ranking")?;
    writeln!(
        output,
        "{:>4}  {:<width$}  {:>12}  {:>6}",
        "rank", "model", "success_rate", "solved"
    )?;
    for (index, model) in report.ranking.iter().enumerate() {
        let overall = report.overall_for(model);
        writeln!(
            output,
            "{:>4}  {:<width$}  {:>12}  {:>6}",
            index + 1,
            model.as_str(),
            format_rate(overall.and_then(|value| value.overall_success_rate_pct)),
            overall.map(|value| value.solved).unwrap_or_default()
        )?;
    }

    Ok(())
}
