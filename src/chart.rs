/// Chart rendering for experiment logs.
///
/// Draws two line charts stacked on one canvas: distance over time on top,
/// flow rate over time below. Each chart gets a title, axis labels, a grid,
/// and a legend in the upper right. The drawing routine is generic over the
/// plotters backend, so file output (SVG/PNG) and in-memory SVG share it.

use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{PanelConfig, PlotConfig};
use crate::model::SensorSeries;

/// Output image format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Svg,
    Png,
}

impl ChartKind {
    pub fn from_path(path: &Path) -> Result<Self, ChartError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("svg") => Ok(ChartKind::Svg),
            Some("png") => Ok(ChartKind::Png),
            _ => Err(ChartError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug)]
pub enum ChartError {
    /// Output path has no `.svg` or `.png` extension
    UnsupportedFormat(PathBuf),
    /// PNG text needs a font rasterizer, which is behind the `ttf` feature
    MissingFontSupport,
    /// Backend or layout failure reported by plotters
    Drawing(String),
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::UnsupportedFormat(path) => {
                write!(f, "Unsupported chart format for {} (expected .svg or .png)", path.display())
            }
            ChartError::MissingFontSupport => {
                write!(f, "PNG output requires building with `--features ttf`; use an .svg path instead")
            }
            ChartError::Drawing(msg) => write!(f, "Chart drawing failed: {}", msg),
        }
    }
}

impl std::error::Error for ChartError {}

fn drawing_error<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Drawing(e.to_string())
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Renders both charts to `path`. The format follows the extension.
pub fn render_to_file<P: AsRef<Path>>(
    series: &SensorSeries,
    config: &PlotConfig,
    path: P,
) -> Result<(), ChartError> {
    let path = path.as_ref();
    let size = (config.output.width, config.output.height);

    match ChartKind::from_path(path)? {
        ChartKind::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_panels(&root, series, config)?;
        }
        ChartKind::Png => {
            if !cfg!(feature = "ttf") {
                return Err(ChartError::MissingFontSupport);
            }
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_panels(&root, series, config)?;
        }
    }

    info!(path = %path.display(), points = series.len(), "rendered experiment charts");
    Ok(())
}

/// Renders both charts into an SVG document held in memory.
pub fn render_svg_string(series: &SensorSeries, config: &PlotConfig) -> Result<String, ChartError> {
    let size = (config.output.width, config.output.height);
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, size).into_drawing_area();
        draw_panels(&root, series, config)?;
    }
    Ok(buffer)
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn draw_panels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &SensorSeries,
    config: &PlotConfig,
) -> Result<(), ChartError> {
    root.fill(&WHITE).map_err(drawing_error)?;

    let panels = root.split_evenly((2, 1));
    draw_panel(&panels[0], series.times(), series.water_levels(), &config.water_level)?;
    draw_panel(&panels[1], series.times(), series.flow_rates(), &config.flow_rate)?;

    root.present().map_err(drawing_error)?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    times: &[f64],
    values: &[f64],
    panel: &PanelConfig,
) -> Result<(), ChartError> {
    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(axis_range(times), axis_range(values))
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .x_desc(&panel.x_label)
        .y_desc(&panel.y_label)
        .draw()
        .map_err(drawing_error)?;

    let [r, g, b] = panel.color;
    let color = RGBColor(r, g, b);

    // nan/inf pass the row filter but have no place on the axes
    let points = times
        .iter()
        .copied()
        .zip(values.iter().copied())
        .filter(|(x, y)| x.is_finite() && y.is_finite());

    chart
        .draw_series(LineSeries::new(points, color.stroke_width(2)))
        .map_err(drawing_error)?
        .label(panel.legend.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(drawing_error)?;

    Ok(())
}

/// Axis range covering the finite values, padded by 5%.
///
/// Empty input gets `0..1` so an empty chart still has axes; a single
/// distinct value is widened by one unit either side.
pub fn axis_range(values: &[f64]) -> Range<f64> {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    let Some(first) = finite.next() else {
        return 0.0..1.0;
    };
    let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min == max {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}
