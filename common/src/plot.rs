//! SVG rendering of histograms.
use crate::histogram::{Axis, Histogram1D, Histogram2D, ScaledHistogram};
use plotters::prelude::{
    ChartBuilder, Color, HSLColor, IntoDrawingArea, IntoFont, LineSeries, PathElement, RGBColor,
    Rectangle, SVGBackend, SeriesLabelPosition, BLACK, BLUE, RED, WHITE,
};
use std::{
    fmt::Display,
    fs::create_dir_all,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, instrument};

const PLOT_SIZE: (u32, u32) = (1000, 750);

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Cannot create plot directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot draw {path}: {message}")]
    Drawing { path: PathBuf, message: String },
    #[error("Nothing to draw in {0}")]
    NoSeries(PathBuf),
}

fn drawing_error<E: Display>(path: &Path) -> impl FnOnce(E) -> PlotError + '_ {
    move |e| PlotError::Drawing {
        path: path.to_owned(),
        message: e.to_string(),
    }
}

/// Creates `dir` if needed and returns the path of the SVG file `name` within it.
pub fn plot_path(dir: &Path, name: &str) -> Result<PathBuf, PlotError> {
    create_dir_all(dir).map_err(|source| PlotError::CreateDir {
        path: dir.to_owned(),
        source,
    })?;
    Ok(dir.join(name).with_extension("svg"))
}

#[derive(Clone, Copy, Debug)]
pub struct Labels<'a> {
    pub title: &'a str,
    pub x: &'a str,
    pub y: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesColour {
    Blue,
    Red,
}

impl SeriesColour {
    fn rgb(self) -> RGBColor {
        match self {
            SeriesColour::Blue => BLUE,
            SeriesColour::Red => RED,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Series {
    pub label: String,
    pub histogram: ScaledHistogram,
    pub colour: SeriesColour,
}

fn step_points(axis: &Axis, values: impl Iterator<Item = f64>) -> Vec<(f64, f64)> {
    let mut points = vec![(axis.low(), 0.0)];
    for (index, value) in values.enumerate() {
        points.push((axis.lower_edge(index), value));
        points.push((axis.lower_edge(index + 1), value));
    }
    points.push((axis.high(), 0.0));
    points
}

/// Draws a single histogram as a step outline.
pub fn save_histogram_svg(
    path: &Path,
    histogram: &Histogram1D,
    labels: Labels,
) -> Result<(), PlotError> {
    let series = Series {
        label: labels.title.to_owned(),
        histogram: histogram.scaled(1.0),
        colour: SeriesColour::Blue,
    };
    draw_steps(path, &[series], labels, false)
}

/// Draws several histograms on shared axes, with a legend.
pub fn save_overlay_svg(path: &Path, series: &[Series], labels: Labels) -> Result<(), PlotError> {
    draw_steps(path, series, labels, true)
}

#[instrument(skip_all, level = "debug", fields(path = %path.display()))]
fn draw_steps(
    path: &Path,
    series: &[Series],
    labels: Labels,
    legend: bool,
) -> Result<(), PlotError> {
    if series.is_empty() {
        return Err(PlotError::NoSeries(path.to_owned()));
    }
    let x_min = series
        .iter()
        .map(|s| s.histogram.axis().low())
        .fold(f64::INFINITY, f64::min);
    let x_max = series
        .iter()
        .map(|s| s.histogram.axis().high())
        .fold(f64::NEG_INFINITY, f64::max);
    let y_max = match series
        .iter()
        .map(|s| s.histogram.max_value())
        .fold(0.0, f64::max)
    {
        max if max > 0.0 => max * 1.1,
        _ => 1.0,
    };

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error(path))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(drawing_error(path))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(labels.x)
        .y_desc(labels.y)
        .draw()
        .map_err(drawing_error(path))?;

    for s in series {
        let colour = s.colour.rgb();
        let points = step_points(s.histogram.axis(), s.histogram.values().iter().copied());
        let drawn = chart
            .draw_series(LineSeries::new(points, &colour))
            .map_err(drawing_error(path))?;
        if legend {
            drawn
                .label(s.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour));
        }
    }

    if legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(drawing_error(path))?;
    }

    root.present().map_err(drawing_error(path))?;
    debug!("Saved plot");
    Ok(())
}

/// Blue for sparse bins through to red for the fullest bin.
fn heat_colour(fraction: f64) -> HSLColor {
    HSLColor(0.66 * (1.0 - fraction.clamp(0.0, 1.0)), 0.9, 0.5)
}

/// Draws a two dimensional histogram as a colour map, leaving empty bins blank.
#[instrument(skip_all, level = "debug", fields(path = %path.display()))]
pub fn save_heatmap_svg(
    path: &Path,
    histogram: &Histogram2D,
    labels: Labels,
) -> Result<(), PlotError> {
    let (x_axis, y_axis) = (*histogram.x_axis(), *histogram.y_axis());
    let max = histogram.max_bin_content().max(1) as f64;

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error(path))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_axis.low()..x_axis.high(), y_axis.low()..y_axis.high())
        .map_err(drawing_error(path))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(labels.x)
        .y_desc(labels.y)
        .draw()
        .map_err(drawing_error(path))?;

    chart
        .draw_series(
            histogram
                .counts()
                .indexed_iter()
                .filter(|(_, count)| **count > 0)
                .map(|((i, j), count)| {
                    Rectangle::new(
                        [
                            (x_axis.lower_edge(i), y_axis.lower_edge(j)),
                            (x_axis.lower_edge(i + 1), y_axis.lower_edge(j + 1)),
                        ],
                        heat_colour(*count as f64 / max).filled(),
                    )
                }),
        )
        .map_err(drawing_error(path))?;

    root.present().map_err(drawing_error(path))?;
    debug!("Saved plot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_outline_closes_on_the_axis() {
        let axis = Axis::new(2, 0.0, 4.0).unwrap();
        let points = step_points(&axis, [3.0, 1.0].into_iter());
        assert_eq!(
            points,
            vec![
                (0.0, 0.0),
                (0.0, 3.0),
                (2.0, 3.0),
                (2.0, 1.0),
                (4.0, 1.0),
                (4.0, 0.0)
            ]
        );
    }

    #[test]
    fn overlay_needs_a_series() {
        let result = save_overlay_svg(
            Path::new("unused.svg"),
            &[],
            Labels {
                title: "",
                x: "",
                y: "",
            },
        );
        assert!(matches!(result, Err(PlotError::NoSeries(_))));
    }
}
