//! Engagement trend charts rendered to in-memory PNG.
//!
//! Rendering is CPU-bound, so async callers go through [`render_graph`],
//! which runs [`generate_graph_sync`] on tokio's blocking pool.
//!
//! Chart text is drawn with system fonts through plotters' `ttf` backend
//! (the default `system-fonts` feature). Any failure inside plotters,
//! including a panic from a missing font backend, comes back as
//! [`MembitError::Chart`].

use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::{MembitError, Result};

/// Output size in pixels.
pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 400;

/// File name used when the chart is attached to a chat message.
pub const CHART_FILENAME: &str = "graph.png";

const LINE_COLOR: RGBColor = RGBColor(0x00, 0x99, 0xFF);
const MARKER_RADIUS: i32 = 4;

/// Plot `values` against `labels` and return PNG bytes.
///
/// Series arrive newest-first and are drawn oldest-to-newest (reversed) as
/// a dashed line with circular markers, with the keyword in the title and
/// rotated x-axis labels. Every failure is returned as
/// [`MembitError::Chart`].
pub fn generate_graph_sync(labels: &[String], values: &[f64], keyword: &str) -> Result<Vec<u8>> {
    if labels.is_empty() {
        return Err(MembitError::Chart("no data points to plot".into()));
    }
    if labels.len() != values.len() {
        return Err(MembitError::Chart(format!(
            "{} labels but {} values",
            labels.len(),
            values.len()
        )));
    }

    let labels: Vec<&str> = labels.iter().rev().map(String::as_str).collect();
    let values: Vec<f64> = values
        .iter()
        .rev()
        .map(|v| if v.is_finite() { *v } else { 0.0 })
        .collect();

    let mut pixels = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    match panic::catch_unwind(AssertUnwindSafe(|| draw(&mut pixels, &labels, &values, keyword))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(MembitError::Chart(e.to_string())),
        Err(payload) => return Err(MembitError::Chart(panic_message(payload.as_ref()))),
    }
    encode_png(pixels)
}

/// Async wrapper that keeps rendering off the cooperative scheduler.
pub async fn render_graph(labels: Vec<String>, values: Vec<f64>, keyword: String) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || generate_graph_sync(&labels, &values, &keyword))
        .await
        .map_err(|e| MembitError::Chart(format!("render task failed: {e}")))?
}

fn draw(
    pixels: &mut [u8],
    labels: &[&str],
    values: &[f64],
    keyword: &str,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::with_buffer(pixels, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let (y_min, y_max) = y_bounds(values);
    let last = labels.len() as i32 - 1;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Engagement Trend — {keyword}"), ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(70)
        .y_label_area_size(50)
        .build_cartesian_2d(-1i32..last + 1, y_min..y_max)?;

    let x_label_style = ("sans-serif", 12)
        .into_font()
        .transform(FontTransform::Rotate90);

    chart
        .configure_mesh()
        .x_labels(labels.len() + 2)
        .x_label_formatter(&|x| {
            usize::try_from(*x)
                .ok()
                .and_then(|i| labels.get(i))
                .map(|l| (*l).to_string())
                .unwrap_or_default()
        })
        .x_label_style(x_label_style)
        .draw()?;

    let points: Vec<(i32, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as i32, *v))
        .collect();

    chart.draw_series(DashedLineSeries::new(
        points.iter().copied(),
        8,
        5,
        LINE_COLOR.stroke_width(2),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new(*p, MARKER_RADIUS, LINE_COLOR.filled())),
    )?;

    root.present()?;
    Ok(())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("chart rendering panicked: {detail}")
}

/// Y range padded so flat or single-point series still have height.
fn y_bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max - min) * 0.1).max(1.0);
    (min - pad, max + pad)
}

fn encode_png(pixels: Vec<u8>) -> Result<Vec<u8>> {
    let image = RgbImage::from_raw(CHART_WIDTH, CHART_HEIGHT, pixels)
        .ok_or_else(|| MembitError::Chart("pixel buffer size mismatch".into()))?;
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| MembitError::Chart(format!("PNG encoding failed: {e}")))?;
    Ok(out.into_inner())
}
