//! Plotters-backed chart renderer.
//!
//! Draws into an owned RGB8 buffer so the artifact stays transient: no file
//! is written and no encoder dependency is pulled in. Text uses plotters'
//! pure-Rust glyph backend with an embedded face, registered once per
//! process, so rendering never depends on system font discovery.

use async_trait::async_trait;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle, IntoFont, Palette, Palette99};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::sync::OnceLock;
use tabula_core::chart::{
    pie_distribution, ChartImage, ChartKind, ChartRenderer, ChartRequest, PieSlice,
};
use tabula_core::dataset::Dataset;
use tabula_core::error::{Result, TabulaError};

const DEFAULT_WIDTH: u32 = 960;
const DEFAULT_HEIGHT: u32 = 720;

static FONT_BYTES: &[u8] = include_bytes!("../../fonts/DejaVuSans.ttf");

/// Registers the embedded face as `sans-serif`.
///
/// The glyph backend has no fallback font, so this must succeed before any
/// caption or axis label is drawn.
fn ensure_fonts() -> Result<()> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            register_font("sans-serif", FontStyle::Normal, FONT_BYTES)
                .map_err(|_| "embedded font is invalid".to_string())
        })
        .clone()
        .map_err(TabulaError::render)
}

/// Renders chart requests with plotters' bitmap backend.
pub struct PlottersChartRenderer {
    width: u32,
    height: u32,
}

impl PlottersChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for PlottersChartRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

fn draw_error(err: impl std::fmt::Display) -> TabulaError {
    TabulaError::render(err.to_string())
}

/// Tightly packed RGB8 buffer size; widened before multiplying so large
/// dimensions cannot overflow `u32`.
fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

#[async_trait]
impl ChartRenderer for PlottersChartRenderer {
    async fn render(&self, dataset: &Dataset, request: &ChartRequest) -> Result<ChartImage> {
        request.validate(&dataset.schema())?;
        ensure_fonts()?;

        let mut rgb = vec![0u8; buffer_len(self.width, self.height)];
        {
            let root =
                BitMapBackend::with_buffer(&mut rgb, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_error)?;

            match request.kind {
                ChartKind::Bar => draw_bar(&root, dataset, request)?,
                ChartKind::Line => draw_line(&root, dataset, request)?,
                ChartKind::Pie => draw_pie(&root, dataset, request, self.width, self.height)?,
            }

            root.present().map_err(draw_error)?;
        }

        tracing::debug!(kind = ?request.kind, label = %request.label_column, "chart rendered");
        Ok(ChartImage {
            width: self.width,
            height: self.height,
            rgb,
        })
    }
}

type PixelArea<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

/// Label/value pairs with rows skipped when either cell is empty.
fn series_pairs(dataset: &Dataset, request: &ChartRequest) -> Result<Vec<(String, f64)>> {
    // validate() has already guaranteed the value column is present.
    let value_column = request
        .value_column
        .as_deref()
        .ok_or_else(|| TabulaError::internal("value column missing after validation"))?;

    let labels = dataset.label_cells(&request.label_column)?;
    let values = dataset.numeric_cells(value_column)?;

    let pairs: Vec<(String, f64)> = labels
        .into_iter()
        .zip(values)
        .filter_map(|(label, value)| Some((label?, value?)))
        .collect();

    if pairs.is_empty() {
        return Err(TabulaError::render("no rows with both label and value"));
    }
    Ok(pairs)
}

/// Y range spanning the values and the zero baseline.
fn value_range(pairs: &[(String, f64)]) -> (f64, f64) {
    let mut min = 0f64;
    let mut max = 0f64;
    for (_, value) in pairs {
        min = min.min(*value);
        max = max.max(*value);
    }
    if min == max {
        max = min + 1.0;
    }
    (min, max)
}

/// Axes with the label column's values along X and numeric ticks along Y.
fn draw_axes(
    chart: &mut ChartContext<'_, BitMapBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    pairs: &[(String, f64)],
) -> Result<()> {
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(pairs.len())
        .x_label_formatter(&|x| {
            pairs
                .get(*x as usize)
                .map(|(label, _)| label.clone())
                .unwrap_or_default()
        })
        .label_style(("sans-serif", 14))
        .draw()
        .map_err(draw_error)
}

fn draw_bar(root: &PixelArea<'_>, dataset: &Dataset, request: &ChartRequest) -> Result<()> {
    let pairs = series_pairs(dataset, request)?;
    let (y_min, y_max) = value_range(&pairs);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..pairs.len() as f64, y_min..y_max)
        .map_err(draw_error)?;

    draw_axes(&mut chart, &pairs)?;

    for (index, (_, value)) in pairs.iter().enumerate() {
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(index as f64 + 0.15, 0.0), (index as f64 + 0.85, *value)],
                BLUE.filled(),
            )))
            .map_err(draw_error)?;
    }
    Ok(())
}

fn draw_line(root: &PixelArea<'_>, dataset: &Dataset, request: &ChartRequest) -> Result<()> {
    let pairs = series_pairs(dataset, request)?;
    let (y_min, y_max) = value_range(&pairs);
    let x_max = (pairs.len().saturating_sub(1)).max(1) as f64;

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)
        .map_err(draw_error)?;

    draw_axes(&mut chart, &pairs)?;

    chart
        .draw_series(LineSeries::new(
            pairs
                .iter()
                .enumerate()
                .map(|(index, (_, value))| (index as f64, *value)),
            &BLUE,
        ))
        .map_err(draw_error)?;
    Ok(())
}

/// Caption drawn on each wedge, with the slice's one-decimal percentage.
fn slice_caption(slice: &PieSlice) -> String {
    format!("{} ({:.1}%)", slice.label, slice.percent)
}

/// Pie slices are drawn as polygon wedges; proportions come from the domain's
/// frequency distribution so the rendered sweep matches the captioned
/// one-decimal percentages' source counts exactly.
fn draw_pie(
    root: &PixelArea<'_>,
    dataset: &Dataset,
    request: &ChartRequest,
    width: u32,
    height: u32,
) -> Result<()> {
    let slices = pie_distribution(dataset, &request.label_column)?;
    let total: usize = slices.iter().map(|s| s.count).sum();

    let center = ((width / 2) as i32, (height / 2) as i32);
    let radius = (width.min(height) as f64) / 2.0 - 20.0;

    let mut start = -FRAC_PI_2;
    for (index, slice) in slices.iter().enumerate() {
        let sweep = slice.count as f64 / total as f64 * TAU;
        let end = start + sweep;

        let mut points = vec![center];
        let steps = ((sweep / 0.02).ceil() as usize).max(2);
        for step in 0..=steps {
            let angle = start + sweep * step as f64 / steps as f64;
            points.push((
                center.0 + (radius * angle.cos()) as i32,
                center.1 + (radius * angle.sin()) as i32,
            ));
        }

        root.draw(&Polygon::new(points, Palette99::pick(index).filled()))
            .map_err(draw_error)?;

        let mid = start + sweep / 2.0;
        let caption_radius = radius * 0.55;
        root.draw(&Text::new(
            slice_caption(slice),
            (
                center.0 + (caption_radius * mid.cos()) as i32,
                center.1 + (caption_radius * mid.sin()) as i32,
            ),
            ("sans-serif", 16).into_font().color(&BLACK),
        ))
        .map_err(draw_error)?;

        start = end;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_string_rows(
            vec!["region".to_string(), "sales".to_string()],
            vec![
                vec!["A".to_string(), "120".to_string()],
                vec!["A".to_string(), "90".to_string()],
                vec!["B".to_string(), "45".to_string()],
            ],
        )
        .unwrap()
    }

    fn labeled_dataset(labels: &[&str]) -> Dataset {
        Dataset::from_string_rows(
            vec!["region".to_string(), "sales".to_string()],
            labels
                .iter()
                .enumerate()
                .map(|(i, l)| vec![l.to_string(), (100 + i).to_string()])
                .collect(),
        )
        .unwrap()
    }

    fn has_non_white_pixel(image: &ChartImage) -> bool {
        image.rgb.chunks(3).any(|px| px != [255, 255, 255])
    }

    #[tokio::test]
    async fn test_bar_chart_renders_pixels() {
        let renderer = PlottersChartRenderer::new(320, 240);
        let request = ChartRequest {
            kind: ChartKind::Bar,
            label_column: "region".to_string(),
            value_column: Some("sales".to_string()),
        };
        let image = renderer.render(&dataset(), &request).await.unwrap();
        assert_eq!(image.width, 320);
        assert_eq!(image.height, 240);
        assert_eq!(image.rgb.len(), 320 * 240 * 3);
        assert!(has_non_white_pixel(&image));
    }

    #[tokio::test]
    async fn test_line_chart_renders_pixels() {
        let renderer = PlottersChartRenderer::new(320, 240);
        let request = ChartRequest {
            kind: ChartKind::Line,
            label_column: "region".to_string(),
            value_column: Some("sales".to_string()),
        };
        let image = renderer.render(&dataset(), &request).await.unwrap();
        assert!(has_non_white_pixel(&image));
    }

    #[tokio::test]
    async fn test_pie_chart_ignores_value_column() {
        let renderer = PlottersChartRenderer::new(320, 240);
        let request = ChartRequest {
            kind: ChartKind::Pie,
            label_column: "region".to_string(),
            value_column: Some("region".to_string()),
        };
        let image = renderer.render(&dataset(), &request).await.unwrap();
        assert!(has_non_white_pixel(&image));
    }

    #[tokio::test]
    async fn test_bar_with_text_value_column_is_rejected_before_drawing() {
        let renderer = PlottersChartRenderer::new(320, 240);
        let request = ChartRequest {
            kind: ChartKind::Bar,
            label_column: "region".to_string(),
            value_column: Some("region".to_string()),
        };
        let err = renderer.render(&dataset(), &request).await.unwrap_err();
        assert!(err.is_invalid_column());
    }

    #[test]
    fn test_slice_caption_shows_one_decimal_percent() {
        let slice = PieSlice {
            label: "A".to_string(),
            count: 2,
            percent: 66.7,
        };
        assert_eq!(slice_caption(&slice), "A (66.7%)");
    }

    // Identical counts in identical order give identical wedges; only the
    // drawn captions can make the buffers differ.
    #[tokio::test]
    async fn test_pie_slice_captions_are_drawn() {
        let renderer = PlottersChartRenderer::new(320, 240);
        let request = ChartRequest {
            kind: ChartKind::Pie,
            label_column: "region".to_string(),
            value_column: None,
        };

        let short = renderer
            .render(&labeled_dataset(&["A", "A", "B"]), &request)
            .await
            .unwrap();
        let long = renderer
            .render(&labeled_dataset(&["north", "north", "south"]), &request)
            .await
            .unwrap();
        assert_ne!(short.rgb, long.rgb);
    }

    #[tokio::test]
    async fn test_bar_axis_labels_follow_label_column() {
        let renderer = PlottersChartRenderer::new(320, 240);
        let request = ChartRequest {
            kind: ChartKind::Bar,
            label_column: "region".to_string(),
            value_column: Some("sales".to_string()),
        };

        let first = renderer
            .render(&labeled_dataset(&["a", "b", "c"]), &request)
            .await
            .unwrap();
        let second = renderer
            .render(&labeled_dataset(&["east", "west", "north"]), &request)
            .await
            .unwrap();
        assert_ne!(first.rgb, second.rgb);
    }

    #[test]
    fn test_buffer_len_handles_large_dimensions() {
        // 40_000 * 40_000 * 3 exceeds u32::MAX.
        assert_eq!(buffer_len(40_000, 40_000), 4_800_000_000);
        assert_eq!(buffer_len(320, 240), 320 * 240 * 3);
    }
}
