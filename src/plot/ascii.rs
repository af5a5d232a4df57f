//! ASCII plotting for terminal output.
//!
//! Fixed-size character grid, deterministic output (golden-testable).
//! Radial profiles span decades, so either axis may be logarithmic. Points
//! that cannot be placed on a log axis (non-positive or non-finite) are
//! skipped. Each series is drawn as line segments using its own marker.

/// One curve to draw.
#[derive(Debug, Clone)]
pub struct Series<'a> {
    pub label: &'a str,
    pub marker: char,
    pub points: Vec<(f64, f64)>,
}

impl<'a> Series<'a> {
    pub fn new(label: &'a str, marker: char, xs: &[f64], ys: &[f64]) -> Self {
        Self {
            label,
            marker,
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisScale {
    pub log_x: bool,
    pub log_y: bool,
}

impl AxisScale {
    pub const LOG_LOG: AxisScale = AxisScale { log_x: true, log_y: true };
    pub const LOG_X: AxisScale = AxisScale { log_x: true, log_y: false };
}

fn transform(v: f64, log: bool) -> Option<f64> {
    if !v.is_finite() {
        return None;
    }
    if log {
        (v > 0.0).then(|| v.log10())
    } else {
        Some(v)
    }
}

/// Render the series onto a `width` x `height` grid with a range header and legend.
pub fn render_ascii_plot(series: &[Series<'_>], width: usize, height: usize, scale: AxisScale) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mapped: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .filter_map(|&(x, y)| Some((transform(x, scale.log_x)?, transform(y, scale.log_y)?)))
                .collect()
        })
        .collect();

    let (x_min, x_max) = range(mapped.iter().flatten().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = range(mapped.iter().flatten().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for (s, pts) in series.iter().zip(&mapped) {
        draw_series(&mut grid, pts, s.marker, (x_min, x_max), (y_min, y_max));
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{}, {}]{} | y=[{}, {}]{}\n",
        fmt_axis(x_min, scale.log_x),
        fmt_axis(x_max, scale.log_x),
        if scale.log_x { " (log)" } else { "" },
        fmt_axis(y_min, scale.log_y),
        fmt_axis(y_max, scale.log_y),
        if scale.log_y { " (log)" } else { "" },
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    let legend: Vec<String> = series.iter().map(|s| format!("{} {}", s.marker, s.label)).collect();
    out.push_str(&legend.join("  "));
    out.push('\n');

    out
}

fn fmt_axis(v: f64, log: bool) -> String {
    if log {
        format!("{:.3e}", 10f64.powf(v))
    } else {
        format!("{v:.3}")
    }
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else if min.is_finite() && max.is_finite() {
        Some((min - 0.5, max + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top of the plot.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_series(grid: &mut [Vec<char>], pts: &[(f64, f64)], marker: char, xr: (f64, f64), yr: (f64, f64)) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in pts {
        let cx = map_x(x, xr.0, xr.1, width);
        let cy = map_y(y, yr.0, yr.1, height);
        let (x0, y0) = prev.unwrap_or((cx, cy));
        draw_line(grid, x0, y0, cx, cy, marker);
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham). Earlier series keep their cells.
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
        let cell = &mut grid[y0 as usize][x0 as usize];
        if *cell == ' ' {
            *cell = ch;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let xs = [1.0, 10.0];
        let rising = Series::new("up", '-', &xs, &[100.0, 110.0]);
        let txt = render_ascii_plot(&[rising], 10, 5, AxisScale::LOG_X);
        let expected = concat!(
            "Plot: x=[1.000e0, 1.000e1] (log) | y=[99.500, 110.500]\n",
            "        --\n",
            "      --\n",
            "    --\n",
            "  --\n",
            "--\n",
            "- up\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn log_axes_drop_unplaceable_points() {
        let xs = [0.1, 1.0, 10.0];
        let s = Series::new("xi", 'o', &xs, &[10.0, -1.0, 0.1]);
        let txt = render_ascii_plot(&[s], 12, 6, AxisScale::LOG_LOG);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 1 + 6 + 1);
        assert!(lines[1].starts_with('o'));
        assert!(lines[6].ends_with('o'));
        assert_eq!(lines[7], "o xi");
    }

    #[test]
    fn earlier_series_win_overlaps() {
        let xs = [1.0, 2.0];
        let a = Series::new("a", 'a', &xs, &[1.0, 2.0]);
        let b = Series::new("b", 'b', &xs, &[1.0, 2.0]);
        let txt = render_ascii_plot(&[a, b], 10, 5, AxisScale::default());
        assert!(!txt.lines().take(6).any(|l| l.contains('b')));
    }
}
