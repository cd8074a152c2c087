//! ASCII plotting for terminal output.
//!
//! This is the "display" of a figure when no file is requested. It is
//! intentionally dumb (fixed-size grid) and deterministic, which keeps golden
//! tests simple.
//!
//! Plot elements:
//! - markers: `o`
//! - x error bars: `-`
//! - y error bars: `|`

use crate::plot::ChartSpec;

/// Render a chart into a fixed-size character grid.
pub fn render_ascii_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let [x_min, x_max] = spec.x_bounds;
    let [y_min, y_max] = spec.y_bounds;

    let mut grid = vec![vec![' '; width]; height];

    for p in &spec.points {
        let y = map_y(p.y, y_min, y_max, height);
        let x0 = map_x(p.x_lo, x_min, x_max, width);
        let x1 = map_x(p.x_hi, x_min, x_max, width);
        draw_line(&mut grid, x0, y, x1, y, '-');
    }
    for p in &spec.points {
        let x = map_x(p.x, x_min, x_max, width);
        let y0 = map_y(p.y_lo, y_min, y_max, height);
        let y1 = map_y(p.y_hi, y_min, y_max, height);
        draw_line(&mut grid, x, y0, x, y1, '|');
    }
    // Markers overwrite bars.
    for p in &spec.points {
        let x = map_x(p.x, x_min, x_max, width);
        let y = map_y(p.y, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{} | x=[{x_min:.2}, {x_max:.2}] {} | y=[{y_min:.4}, {y_max:.4}] {}\n",
        spec.title,
        crate::plot::X_LABEL,
        crate::plot::Y_LABEL,
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let footer: Vec<&str> = [
        spec.left_label.as_deref(),
        spec.prelim.then_some(crate::plot::PRELIM_LABEL),
        spec.right_label.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !footer.is_empty() {
        out.push_str(&footer.join(" | "));
        out.push('\n');
    }

    out
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills empty cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
