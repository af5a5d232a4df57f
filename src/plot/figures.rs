//! Standard figures for each result kind.
//!
//! Profiles are drawn on log-log axes; bias is drawn against log mass. Curves
//! that go negative (e.g. `ξ_1h` far outside the halo) simply lose those points.

use crate::domain::{BiasRow, LensingRow, PressureRow, XiRow};
use crate::plot::{AxisScale, Series, render_ascii_plot};

pub fn plot_bias(rows: &[BiasRow], width: usize, height: usize) -> String {
    let mass: Vec<f64> = rows.iter().map(|r| r.mass).collect();
    let bias: Vec<f64> = rows.iter().map(|r| r.bias).collect();
    render_ascii_plot(&[Series::new("bias(M)", '*', &mass, &bias)], width, height, AxisScale::LOG_X)
}

pub fn plot_xi(rows: &[XiRow], width: usize, height: usize) -> String {
    let r: Vec<f64> = rows.iter().map(|row| row.r).collect();
    let column = |f: fn(&XiRow) -> f64| rows.iter().map(f).collect::<Vec<f64>>();
    let series = [
        Series::new("xi_hm", '*', &r, &column(|row| row.xi_hm)),
        Series::new("xi_1h", '1', &r, &column(|row| row.xi_1h)),
        Series::new("xi_2h", '2', &r, &column(|row| row.xi_2h)),
    ];
    render_ascii_plot(&series, width, height, AxisScale::LOG_LOG)
}

pub fn plot_pressure(rows: &[PressureRow], width: usize, height: usize) -> String {
    let r: Vec<f64> = rows.iter().map(|row| row.r).collect();
    let y: Vec<f64> = rows.iter().map(|row| row.y).collect();
    render_ascii_plot(&[Series::new("compton y", 'y', &r, &y)], width, height, AxisScale::LOG_LOG)
}

pub fn plot_lensing(rows: &[LensingRow], width: usize, height: usize) -> String {
    let r: Vec<f64> = rows.iter().map(|row| row.r).collect();
    let column = |f: fn(&LensingRow) -> f64| rows.iter().map(f).collect::<Vec<f64>>();
    let series = [
        Series::new("sigma", 's', &r, &column(|row| row.sigma)),
        Series::new("sigma_mis", 'm', &r, &column(|row| row.sigma_mis)),
        Series::new("delta_sigma_mis", 'd', &r, &column(|row| row.delta_sigma_mis)),
    ];
    render_ascii_plot(&series, width, height, AxisScale::LOG_LOG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xi_figure_has_a_legend_entry_per_term() {
        let rows: Vec<XiRow> = [0.1, 1.0, 10.0]
            .iter()
            .map(|&r| XiRow {
                r,
                xi_1h: 100.0 / r,
                xi_mm: 1.0 / r,
                xi_2h: 2.0 / r,
                xi_hm: 100.0 / r,
            })
            .collect();
        let txt = plot_xi(&rows, 20, 6);
        assert!(txt.starts_with("Plot: "));
        assert_eq!(txt.lines().last(), Some("* xi_hm  1 xi_1h  2 xi_2h"));
    }

    #[test]
    fn bias_figure_uses_log_mass() {
        let rows = [
            BiasRow { mass: 1e13, radius: 1.0, sigma2: 4.0, nu: 0.8, bias: 0.9 },
            BiasRow { mass: 1e15, radius: 5.0, sigma2: 0.5, nu: 2.4, bias: 3.1 },
        ];
        let first = plot_bias(&rows, 20, 6).lines().next().map(str::to_string);
        assert_eq!(first.as_deref(), Some("Plot: x=[1.000e13, 1.000e15] (log) | y=[0.790, 3.210]"));
    }
}
