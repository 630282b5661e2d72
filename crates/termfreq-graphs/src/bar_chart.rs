//! Vertical bar chart of a term-frequency series

use crate::renderer::{ChartLabels, ChartRenderer, ChartStyle, FONT_FAMILY};
use crate::types::ChartSeries;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use termfreq_common::Result;
use tracing::{debug, info, instrument};

/// Draws one bar per series point with rotated category labels
#[derive(Debug, Clone, Default)]
pub struct BarChartRenderer {
    style: ChartStyle,
}

impl BarChartRenderer {
    /// Renderer drawing with the given style
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    /// Upper end of the y axis: a tenth of headroom, never below 1
    pub fn y_axis_max(series: &ChartSeries) -> u64 {
        let max = series.max_count();
        max + (max / 10).max(1)
    }

    fn x_label_area(&self, series: &ChartSeries) -> u32 {
        let longest = series.points.iter().map(|p| p.label.len()).max().unwrap_or(4) as u32;
        longest * self.style.label_font_size * 3 / 5 + self.style.label_font_size * 2
    }

    fn draw<DB>(
        &self,
        root: DrawingArea<DB, Shift>,
        series: &ChartSeries,
        labels: &ChartLabels,
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&self.style.background_color)?;

        // An empty series still gets one (empty) category so the axes can be built
        let categories = series.len().max(1);
        let y_max = Self::y_axis_max(series);
        let category_labels = series.labels();

        let mut chart = ChartBuilder::on(&root)
            .caption(&labels.title, (FONT_FAMILY, self.style.title_font_size))
            .margin(10)
            .x_label_area_size(self.x_label_area(series))
            .y_label_area_size(self.style.label_font_size * 4)
            .build_cartesian_2d((0..categories).into_segmented(), 0u64..y_max)?;

        let label_font = (FONT_FAMILY, self.style.label_font_size).into_font();

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(categories)
            .x_label_formatter(&|value| match value {
                SegmentValue::CenterOf(i) => category_labels
                    .get(*i)
                    .map(|label| (*label).to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .x_label_style(label_font.clone().transform(FontTransform::Rotate90))
            .y_label_style(label_font.clone())
            .x_desc(labels.x_desc.as_str())
            .y_desc(labels.y_desc.as_str())
            .axis_desc_style(label_font)
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(self.style.bar_color.filled())
                .margin(1)
                .data(
                    series
                        .points
                        .iter()
                        .enumerate()
                        .map(|(i, point)| (i, point.count)),
                ),
        )?;

        root.present()?;
        debug!(bars = series.len(), y_max, "Drew bar chart");
        Ok(())
    }
}

impl ChartRenderer for BarChartRenderer {
    fn style(&self) -> &ChartStyle {
        &self.style
    }

    #[instrument(skip(self, series, labels), fields(bars = series.len()))]
    fn render_png(&self, series: &ChartSeries, labels: &ChartLabels, path: &Path) -> Result<()> {
        let root =
            BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        self.draw(root, series, labels)?;
        info!("Rendered bar chart to {}", path.display());
        Ok(())
    }

    #[instrument(skip(self, series, labels), fields(bars = series.len()))]
    fn render_svg(&self, series: &ChartSeries, labels: &ChartLabels) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.style.width, self.style.height))
                .into_drawing_area();
            self.draw(root, series, labels)?;
        }
        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SeriesPoint;
    use termfreq_common::Granularity;

    /// Text rendering needs a system font; skip drawing tests without one
    fn fonts_available() -> bool {
        (FONT_FAMILY, 12).into_font().box_size("x").is_ok()
    }

    fn series(counts: &[(&str, u64)]) -> ChartSeries {
        ChartSeries {
            granularity: Granularity::Month,
            points: counts
                .iter()
                .map(|(label, count)| SeriesPoint {
                    label: (*label).to_string(),
                    count: *count,
                })
                .collect(),
        }
    }

    fn labels() -> ChartLabels {
        ChartLabels {
            title: "Terms: test; Period: 2021-01-01 to 2021-03-31".to_string(),
            x_desc: "Months".to_string(),
            y_desc: "mention count".to_string(),
        }
    }

    #[test]
    fn test_y_axis_headroom() {
        assert_eq!(BarChartRenderer::y_axis_max(&series(&[])), 1);
        assert_eq!(BarChartRenderer::y_axis_max(&series(&[("a", 0), ("b", 0)])), 1);
        assert_eq!(BarChartRenderer::y_axis_max(&series(&[("a", 5)])), 6);
        assert_eq!(BarChartRenderer::y_axis_max(&series(&[("a", 40), ("b", 7)])), 44);
    }

    #[test]
    fn test_renderer_keeps_style() {
        let style = ChartStyle {
            width: 640,
            ..ChartStyle::default()
        };
        let renderer = BarChartRenderer::new(style.clone());
        assert_eq!(renderer.style(), &style);
    }

    #[test]
    fn test_svg_contains_labels() {
        if !fonts_available() {
            return;
        }
        let renderer = BarChartRenderer::default();
        let svg = renderer
            .render_svg(&series(&[("2021-01", 4), ("2021-02", 1), ("2021-03", 0)]), &labels())
            .unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("2021-02"));
        assert!(svg.contains("mention count"));
        assert!(svg.contains("Period: 2021-01-01 to 2021-03-31"));
    }

    #[test]
    fn test_zero_series_still_draws_every_label() {
        if !fonts_available() {
            return;
        }
        let renderer = BarChartRenderer::default();
        let svg = renderer
            .render_svg(&series(&[("2021", 0), ("2022", 0)]), &labels())
            .unwrap();

        assert!(svg.contains("2021"));
        assert!(svg.contains("2022"));
    }

    #[test]
    fn test_png_written() {
        if !fonts_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");

        BarChartRenderer::default()
            .render_png(&series(&[("2021-01-01", 2), ("2021-01-02", 0)]), &labels(), &path)
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
