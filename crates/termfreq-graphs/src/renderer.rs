//! Chart rendering trait, styling and labels

use crate::types::ChartSeries;
use plotters::style::RGBColor;
use std::path::Path;
use termfreq_common::{QuerySpec, Result};
use termfreq_config::ChartConfig;
use termfreq_i18n::Messages;
use tracing::debug;

/// Font family used for every text element
pub const FONT_FAMILY: &str = "sans-serif";

/// Size and colors of a chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bar fill
    pub bar_color: RGBColor,
    /// Canvas fill
    pub background_color: RGBColor,
    /// Title size in points
    pub title_font_size: u32,
    /// Axis label size in points
    pub label_font_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from(&ChartConfig::default())
    }
}

impl From<&ChartConfig> for ChartStyle {
    fn from(config: &ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            bar_color: parse_color(&config.bar_color).unwrap_or(RGBColor(31, 119, 180)),
            background_color: parse_color(&config.background_color)
                .unwrap_or(RGBColor(255, 255, 255)),
            title_font_size: config.title_font_size,
            label_font_size: config.label_font_size,
        }
    }
}

/// Parse a `#RRGGBB` color string
pub fn parse_color(color_str: &str) -> Option<RGBColor> {
    let hex = color_str.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    match (
        u8::from_str_radix(&hex[0..2], 16),
        u8::from_str_radix(&hex[2..4], 16),
        u8::from_str_radix(&hex[4..6], 16),
    ) {
        (Ok(r), Ok(g), Ok(b)) => Some(RGBColor(r, g, b)),
        _ => None,
    }
}

/// Title and axis descriptions of a chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLabels {
    /// Caption above the plot
    pub title: String,
    /// Description under the x axis
    pub x_desc: String,
    /// Description beside the y axis
    pub y_desc: String,
}

impl ChartLabels {
    /// Labels for a query in the language of `messages`
    pub fn localized(messages: &Messages, spec: &QuerySpec) -> Self {
        Self {
            title: messages.chart_title(spec.term(), spec.date_since(), spec.date_until()),
            x_desc: messages.granularity_name(spec.granularity()),
            y_desc: messages.axis_mentions(),
        }
    }
}

/// Output format of a rendered chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartFormat {
    /// Raster image
    #[default]
    Png,
    /// Vector image
    Svg,
}

impl ChartFormat {
    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// Trait for rendering a bar series
pub trait ChartRenderer {
    /// Style the renderer draws with
    fn style(&self) -> &ChartStyle;

    /// Render to a PNG file
    fn render_png(&self, series: &ChartSeries, labels: &ChartLabels, path: &Path) -> Result<()>;

    /// Render to an SVG document held in memory
    fn render_svg(&self, series: &ChartSeries, labels: &ChartLabels) -> Result<String>;

    /// Render to `path` in the given format
    fn render_to_file(
        &self,
        series: &ChartSeries,
        labels: &ChartLabels,
        path: &Path,
        format: ChartFormat,
    ) -> Result<()> {
        let style = self.style();
        debug!(
            width = style.width,
            height = style.height,
            bars = series.len(),
            "Rendering {} chart to {}",
            format.extension(),
            path.display()
        );

        match format {
            ChartFormat::Png => self.render_png(series, labels, path),
            ChartFormat::Svg => {
                let svg = self.render_svg(series, labels)?;
                std::fs::write(path, svg)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termfreq_common::test_utils::date;
    use termfreq_common::Granularity;

    #[test]
    fn test_color_parsing() {
        assert_eq!(parse_color("#FF0000"), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_color("#1f77b4"), Some(RGBColor(31, 119, 180)));
        assert_eq!(parse_color("invalid"), None);
        assert_eq!(parse_color("#ZZ0000"), None);
        assert_eq!(parse_color("#FFF"), None);
    }

    #[test]
    fn test_style_from_config() {
        let config = ChartConfig {
            bar_color: "#00FF00".to_string(),
            ..ChartConfig::default()
        };
        let style = ChartStyle::from(&config);

        assert_eq!(style.bar_color, RGBColor(0, 255, 0));
        assert_eq!(style.background_color, RGBColor(255, 255, 255));
        assert_eq!((style.width, style.height), (1000, 400));
    }

    #[test]
    fn test_localized_labels() {
        let spec = QuerySpec::new(
            "Soziale Republik",
            date(2021, 1, 1),
            date(2021, 6, 30),
            Granularity::Year,
        )
        .unwrap();

        let german = ChartLabels::localized(&Messages::new("de-DE").unwrap(), &spec);
        assert_eq!(
            german.title,
            "Begriffe: Soziale Republik; Zeitraum: 2021-01-01 bis 2021-06-30"
        );
        assert_eq!(german.x_desc, "Jahre");
        assert_eq!(german.y_desc, "Nennungen");

        let english = ChartLabels::localized(&Messages::new("en-US").unwrap(), &spec);
        assert_eq!(english.y_desc, "mention count");
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(ChartFormat::default().extension(), "png");
        assert_eq!(ChartFormat::Svg.extension(), "svg");
    }
}
