use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::turnaround::TurnaroundRecord;

const CHART_SIZE: (u32, u32) = (1400, 600);
const ROLLING_WINDOW: usize = 5;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to render chart: {0}")]
    Draw(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Draw(err.to_string())
    }
}

/// Label-to-color mapping for bar fills. Passed into the renderer explicitly
/// so the pipeline carries no process-wide state.
#[derive(Debug, Clone)]
pub struct LabelColorTable {
    entries: Vec<(String, RGBColor)>,
    fallback: RGBColor,
}

impl Default for LabelColorTable {
    fn default() -> Self {
        LabelColorTable {
            entries: vec![
                ("bug".to_string(), RGBColor(0xE2, 0x4A, 0x33)),
                ("enhancement".to_string(), RGBColor(0x34, 0x8A, 0xBD)),
                ("documentation".to_string(), RGBColor(0x98, 0x8E, 0xD5)),
            ],
            fallback: RGBColor(0x4C, 0x72, 0xB0),
        }
    }
}

impl LabelColorTable {
    /// First label in the record's own order that the table knows wins;
    /// a record with no recognized label gets the fallback color.
    pub fn color_for(&self, labels: &[String]) -> RGBColor {
        labels
            .iter()
            .find_map(|label| {
                self.entries
                    .iter()
                    .find(|(name, _)| name == label)
                    .map(|(_, color)| *color)
            })
            .unwrap_or(self.fallback)
    }
}

/// Render the per-repository turnaround chart to a PNG file.
///
/// One bar per merged PR at x = PR number, y = turnaround in days, plus a
/// dashed OLS trend line, an optional 5-point rolling mean, and a text
/// annotation on every point above mean + 2 standard deviations.
#[instrument(skip(records, colors), fields(repo = repo_name))]
pub fn render(
    records: &[TurnaroundRecord],
    repo_name: &str,
    path: &Path,
    colors: &LabelColorTable,
    show_rolling: bool,
) -> Result<(), ChartError> {
    let mut merged: Vec<&TurnaroundRecord> = records.iter().filter(|r| r.merged).collect();
    merged.sort_by_key(|r| r.number);

    let points: Vec<(f64, f64)> = merged
        .iter()
        .map(|r| (r.number as f64, r.turnaround_hours / 24.0))
        .collect();
    if points.is_empty() {
        warn!("no merged PRs to plot, rendering empty axes");
    }

    let (x_min, x_max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(x, _)| {
            (lo.min(x), hi.max(x))
        });
    let (x_min, x_max) = if points.is_empty() {
        (0.0, 1.0)
    } else {
        (x_min, x_max)
    };
    let x_pad = ((x_max - x_min) * 0.02).max(1.0);
    let y_top = points
        .iter()
        .map(|&(_, y)| y)
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.1;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("PR Turnaround Time (Days) – {repo_name}"),
            ("sans-serif", 28),
        )
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d((x_min - x_pad)..(x_max + x_pad), 0.0..y_top)?;

    chart
        .configure_mesh()
        .x_desc("PR Number")
        .y_desc("Turnaround Time (Days)")
        .disable_x_mesh()
        .draw()?;

    // Filled bar plus a black outline, drawn as two rectangles
    chart.draw_series(merged.iter().zip(&points).flat_map(|(record, &(x, y))| {
        let color = colors.color_for(&record.labels);
        let corners = [(x - 0.4, 0.0), (x + 0.4, y)];
        [
            Rectangle::new(corners, color.filled()),
            Rectangle::new(corners, BLACK.stroke_width(1)),
        ]
    }))?;

    let has_trend = points.len() >= 2;
    if has_trend {
        let (slope, intercept) = polyfit_linear(&points);
        debug!(slope, intercept, "fitted trend line");
        chart
            .draw_series(DashedLineSeries::new(
                [x_min, x_max]
                    .iter()
                    .map(|&x| (x, slope * x + intercept)),
                6,
                4,
                BLACK.stroke_width(2),
            ))?
            .label("Linear Trend")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));
    }

    if show_rolling && points.len() >= ROLLING_WINDOW {
        let ys: Vec<f64> = points.iter().map(|&(_, y)| y).collect();
        let rolling = rolling_mean(&ys, ROLLING_WINDOW);
        chart
            .draw_series(LineSeries::new(
                points
                    .iter()
                    .zip(&rolling)
                    .filter_map(|(&(x, _), avg)| avg.map(|avg| (x, avg))),
                GREEN.stroke_width(2),
            ))?
            .label(format!("Rolling Avg ({ROLLING_WINDOW})"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN.stroke_width(2)));
    }

    if !points.is_empty() {
        let ys: Vec<f64> = points.iter().map(|&(_, y)| y).collect();
        let mean = crate::report::mean(&ys);
        let threshold = mean + 2.0 * population_std_dev(&ys);
        chart.draw_series(points.iter().filter(|&&(_, y)| y > threshold).map(
            |&(x, y)| {
                Text::new(
                    format!("{}d", y.floor() as i64),
                    (x, y + 0.5),
                    ("sans-serif", 14).into_font().color(&RED),
                )
            },
        ))?;
    }

    if has_trend {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()?;
    }

    root.present()?;
    debug!(path = %path.display(), bars = points.len(), "chart written");
    Ok(())
}

/// Degree-1 least-squares fit over (x, y) pairs, returning (slope, intercept).
fn polyfit_linear(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    let x_mean = points.iter().map(|&(x, _)| x).sum::<f64>() / n;
    let y_mean = points.iter().map(|&(_, y)| y).sum::<f64>() / n;
    let covariance: f64 = points
        .iter()
        .map(|&(x, y)| (x - x_mean) * (y - y_mean))
        .sum();
    let variance: f64 = points.iter().map(|&(x, _)| (x - x_mean).powi(2)).sum();
    let slope = covariance / variance;
    (slope, y_mean - slope * x_mean)
}

/// Trailing-window mean; positions before the window fills are `None`.
fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                None
            } else {
                let slice = &values[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

/// Population standard deviation (n degrees of freedom). The outlier
/// threshold uses this, while the author report uses the sample variant.
fn population_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = crate::report::mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / n).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn test_polyfit_recovers_line() {
        let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
        let (slope, intercept) = polyfit_linear(&points);
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_mean_window_five() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let rolling = rolling_mean(&values, 5);
        assert_eq!(rolling[..4], [None, None, None, None]);
        assert_eq!(rolling[4], Some(3.0));
        assert_eq!(rolling[5], Some(4.0));
    }

    #[test]
    fn test_population_std_dev() {
        // np.std([2, 4, 4, 4, 5, 5, 7, 9]) == 2.0
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_color_first_recognized_label_wins() {
        let table = LabelColorTable::default();
        let labels = vec!["backend".to_string(), "bug".to_string(), "enhancement".to_string()];
        assert_eq!(table.color_for(&labels), RGBColor(0xE2, 0x4A, 0x33));
    }

    #[test]
    fn test_color_fallback_for_unrecognized_labels() {
        let table = LabelColorTable::default();
        assert_eq!(
            table.color_for(&["backend".to_string()]),
            RGBColor(0x4C, 0x72, 0xB0)
        );
        assert_eq!(table.color_for(&[]), RGBColor(0x4C, 0x72, 0xB0));
    }

    fn record(number: u64, hours: f64) -> TurnaroundRecord {
        let created: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        TurnaroundRecord {
            number,
            title: format!("PR {number}"),
            author: "alice".to_string(),
            created_at: created,
            closed_at: created + chrono::Duration::hours(hours as i64),
            merged: true,
            labels: vec!["bug".to_string()],
            turnaround_hours: hours,
        }
    }

    #[test]
    fn test_render_writes_png() {
        let records: Vec<TurnaroundRecord> =
            (1..=10).map(|i| record(i, 24.0 * i as f64)).collect();
        let path = std::env::temp_dir().join("pr_turnaround_chart_test.png");
        render(
            &records,
            "test-repo",
            &path,
            &LabelColorTable::default(),
            true,
        )
        .unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_render_empty_records() {
        let path = std::env::temp_dir().join("pr_turnaround_chart_empty_test.png");
        render(&[], "empty-repo", &path, &LabelColorTable::default(), true).unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }
}
