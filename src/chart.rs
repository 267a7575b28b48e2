//! Chart rendering.

use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::report::ChartSeries;

/// Receives chart series from the reporter and renders them somewhere.
pub trait ChartSink {
    fn render(&mut self, series: &ChartSeries) -> Result<()>;
}

const SIZE: (u32, u32) = (900, 480);
const BAR_COLOR: RGBColor = RGBColor(74, 144, 217);
/// Histograms have more bins than fit as readable labels.
const MAX_X_LABELS: usize = 12;

type DrawResult<T> = std::result::Result<T, DrawingAreaErrorKind<std::io::Error>>;

/// Writes each series as a standalone SVG bar chart, `chart_<name>.svg`.
pub struct SvgChartSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl SvgChartSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Files rendered so far, in render order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn path_for(&self, series: &ChartSeries) -> PathBuf {
        self.dir.join(format!("chart_{}.svg", series.name))
    }
}

impl ChartSink for SvgChartSink {
    fn render(&mut self, series: &ChartSeries) -> Result<()> {
        let path = self.path_for(series);
        write_svg(&path, &bar_chart_svg(series)?)?;
        info!(path = %path.display(), bars = series.points.len(), "Chart rendered");
        self.written.push(path);
        Ok(())
    }
}

fn write_svg(path: &Path, svg: &str) -> Result<()> {
    fs::write(path, svg).map_err(|e| PipelineError::persistence(path, e))
}

/// Renders `series` as SVG markup, one bar per point. Negative values are
/// drawn as empty bars.
pub fn bar_chart_svg(series: &ChartSeries) -> Result<String> {
    let mut svg = String::new();
    draw_bars(&mut svg, series).map_err(|e| PipelineError::Chart {
        name: series.name.clone(),
        reason: e.to_string(),
    })?;
    Ok(svg)
}

fn draw_bars(svg: &mut String, series: &ChartSeries) -> DrawResult<()> {
    let root = SVGBackend::with_string(svg, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let slots = series.points.len().max(1);
    let max = series
        .points
        .iter()
        .map(|(_, v)| *v)
        .fold(0.0_f64, f64::max);
    let top = if max > 0.0 { max * 1.1 } else { 1.0 };

    let label_of = |x: &SegmentValue<usize>| match x {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => series
            .points
            .get(*i)
            .map(|(label, _)| label.clone())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(&series.title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0..slots).into_segmented(), 0f64..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots.min(MAX_X_LABELS))
        .x_label_formatter(&label_of)
        .x_desc(series.x_label.as_str())
        .y_desc(series.y_label.as_str())
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .margin(4)
            .data(
                series
                    .points
                    .iter()
                    .enumerate()
                    .map(|(i, (_, v))| (i, f64::max(*v, 0.0))),
            ),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: Vec<(&str, f64)>) -> ChartSeries {
        ChartSeries {
            name: "test".to_string(),
            title: "Comments per Week".to_string(),
            x_label: "Week".to_string(),
            y_label: "Comments".to_string(),
            points: points.into_iter().map(|(l, v)| (l.to_string(), v)).collect(),
        }
    }

    #[test]
    fn test_svg_document_carries_title_and_axes() {
        let svg = bar_chart_svg(&series(vec![("a", 1.0), ("b", 3.0), ("c", 2.0)])).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Comments per Week"));
        assert!(svg.contains(">Week<"));
    }

    #[test]
    fn test_svg_empty_and_zero_series() {
        let svg = bar_chart_svg(&series(vec![])).unwrap();
        assert!(svg.contains("</svg>"));
        let svg = bar_chart_svg(&series(vec![("z", 0.0), ("n", -2.0)])).unwrap();
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = SvgChartSink::new(dir.path());
        let s = series(vec![("a", 1.0)]);

        sink.render(&s).unwrap();

        let path = dir.path().join("chart_test.svg");
        assert_eq!(sink.written(), [path.clone()]);
        assert!(fs::read_to_string(path).unwrap().contains("<svg"));
    }

    #[test]
    fn test_sink_missing_dir_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = SvgChartSink::new(dir.path().join("nope"));
        assert!(matches!(
            sink.render(&series(vec![("a", 1.0)])),
            Err(PipelineError::Persistence { .. })
        ));
    }
}
