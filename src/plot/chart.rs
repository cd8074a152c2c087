//! Plotters-powered figure files.
//!
//! The bitmap size is the 300-dpi equivalent of a 6.4 x 4.8 inch figure.
//! Vector output goes through the SVG back end; everything else through the
//! bitmap back end, whose encoder picks the format from the file extension.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::AppError;
use crate::plot::{ChartSpec, PRELIM_LABEL, X_LABEL, Y_LABEL};

pub const FIGURE_SIZE: (u32, u32) = (1920, 1440);

const BITMAP_EXTS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Whether `ext` names a format we can write.
pub fn is_supported_ext(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    ext == "svg" || BITMAP_EXTS.contains(&ext.as_str())
}

/// Draw `spec` into `path`, choosing the back end from the extension.
pub fn render_chart_file(spec: &ChartSpec, path: &Path) -> Result<(), AppError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let result = if ext == "svg" {
        let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
        draw_amplitude_chart(&root, spec)
            .and_then(|()| root.present())
            .map_err(|e| e.to_string())
    } else if BITMAP_EXTS.contains(&ext.as_str()) {
        let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
        draw_amplitude_chart(&root, spec)
            .and_then(|()| root.present())
            .map_err(|e| e.to_string())
    } else {
        return Err(AppError::usage(format!(
            "Unsupported output extension '{ext}' (use png, jpg, jpeg, bmp or svg)."
        )));
    };

    result.map_err(|e| AppError::render(format!("Failed to draw '{}': {e}", path.display())))
}

/// Draw the amplitude-vs-energy chart on any Plotters drawing area.
pub fn draw_amplitude_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let [x0, x1] = spec.x_bounds;
    let [y0, y1] = spec.y_bounds;

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 56))
        .margin(40)
        .x_label_area_size(130)
        .y_label_area_size(200)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .x_labels(9)
        .y_labels(9)
        .x_label_formatter(&|v| format!("{v:.1}"))
        .y_label_formatter(&|v| format!("{v:.4}"))
        .label_style(("sans-serif", 36))
        .axis_desc_style(("sans-serif", 48))
        .axis_style(BLACK.stroke_width(2))
        .draw()?;

    let bar_style = BLUE.stroke_width(3);

    // Asymmetric x errors (bin width), symmetric y errors (fit uncertainty).
    chart.draw_series(
        spec.points
            .iter()
            .map(|p| ErrorBar::new_horizontal(p.y, p.x_lo, p.x, p.x_hi, bar_style, 0)),
    )?;
    chart.draw_series(
        spec.points
            .iter()
            .map(|p| ErrorBar::new_vertical(p.x, p.y_lo, p.y, p.y_hi, bar_style, 16)),
    )?;
    chart.draw_series(
        spec.points
            .iter()
            .map(|p| Circle::new((p.x, p.y), 10, BLUE.filled())),
    )?;

    // Overlay labels in data coordinates near the top of the frame.
    let (dx, dy) = (x1 - x0, y1 - y0);
    let area = chart.plotting_area();
    if let Some(label) = &spec.left_label {
        area.draw(&Text::new(
            label.clone(),
            (x0 + 0.03 * dx, y1 - 0.04 * dy),
            ("sans-serif", 40).into_font(),
        ))?;
    }
    if let Some(label) = &spec.right_label {
        area.draw(&Text::new(
            label.clone(),
            (x0 + 0.70 * dx, y1 - 0.04 * dy),
            ("sans-serif", 40).into_font(),
        ))?;
    }
    if spec.prelim {
        area.draw(&Text::new(
            PRELIM_LABEL,
            (x0 + 0.35 * dx, y1 - 0.12 * dy),
            ("sans-serif", 44).into_font().color(&RED),
        ))?;
    }

    Ok(())
}
