//! Heatmap rendering for grid scans.
//!
//! One filled rectangle per cell on an integer-indexed chart, colored by
//! the normalized cell value. Rows follow ascending m, so the largest
//! bargaining-power ratio sits at the top of the image; columns follow
//! ascending p. Non-finite cells (undefined ratios, negative values that
//! were log-transformed away) render light gray instead of poisoning the
//! color scale. A vertical scale strip with value ticks sits right of the
//! grid so colors map back to metric values.

use plotters::prelude::*;

/// Cell color ramps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Black through red and yellow to white; for one-signed metrics.
    Sequential,
    /// Blue through white to red; for metrics that cross zero.
    Divergent,
}

fn channel(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn lerp(a: (f64, f64, f64), b: (f64, f64, f64), s: f64) -> RGBColor {
    RGBColor(
        channel(a.0 + (b.0 - a.0) * s),
        channel(a.1 + (b.1 - a.1) * s),
        channel(a.2 + (b.2 - a.2) * s),
    )
}

impl Colormap {
    /// Color for a normalized value in [0, 1]; inputs outside are clamped.
    pub fn color(&self, t: f64) -> RGBColor {
        let t = t.clamp(0.0, 1.0);
        match self {
            Colormap::Sequential => RGBColor(
                channel(3.0 * t),
                channel(3.0 * t - 1.0),
                channel(3.0 * t - 2.0),
            ),
            Colormap::Divergent => {
                let cold = (0.23, 0.30, 0.75);
                let warm = (0.71, 0.02, 0.15);
                let white = (1.0, 1.0, 1.0);
                if t < 0.5 {
                    lerp(cold, white, t * 2.0)
                } else {
                    lerp(white, warm, (t - 0.5) * 2.0)
                }
            }
        }
    }
}

/// Fill for cells with nothing to show.
const MISSING: RGBColor = RGBColor(205, 205, 205);

/// Rectangles stacked in the color scale strip.
const SCALE_STEPS: i32 = 60;

/// `10^{x.x}` tick labels for log-scaled axis values, even indices blanked
/// so a dense axis stays readable.
pub fn log_tick_labels(values: &[f64]) -> Vec<String> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if i % 2 == 0 {
                String::new()
            } else {
                format!("10^{:.1}", v.log10())
            }
        })
        .collect()
}

/// Render a row-major value grid to a PNG.
///
/// `values[i][j]` is drawn at row i (bottom to top), column j (left to
/// right); `y_labels[i]` and `x_labels[j]` follow the same indexing. The
/// color scale normalizes over finite cells only; a grid with no finite
/// cell at all is refused. A gradient strip right of the grid ticks the
/// scale's value range.
pub fn render_heatmap(
    out_path: &str,
    title: &str,
    values: &[Vec<f64>],
    x_labels: &[String],
    y_labels: &[String],
    colormap: Colormap,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows = values.len();
    if rows == 0 {
        return Err("empty value grid".into());
    }
    let cols = values[0].len();
    if cols == 0 || values.iter().any(|r| r.len() != cols) {
        return Err("value grid rows must be non-empty and equally sized".into());
    }
    if x_labels.len() != cols || y_labels.len() != rows {
        return Err("axis label counts must match the grid shape".into());
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values.iter().flatten() {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !lo.is_finite() {
        return Err("no finite cells to draw".into());
    }
    let span = (hi - lo).max(1e-12);

    let root = BitMapBackend::new(out_path, (1120, 860)).into_drawing_area();
    root.fill(&WHITE)?;
    let (plot, scale) = root.split_horizontally(980);

    let mut chart = ChartBuilder::on(&plot)
        .caption(title, ("sans-serif", 22))
        .margin(14)
        .x_label_area_size(58)
        .y_label_area_size(92)
        .build_cartesian_2d(0i32..cols as i32, 0i32..rows as i32)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Prob(bargaining success)")
        .y_desc("Ratio of bargaining powers (team aligned)/(team unaligned)")
        .x_labels(cols)
        .y_labels(rows)
        .x_label_formatter(&|x| {
            let i = (*x).clamp(0, cols as i32 - 1) as usize;
            x_labels[i].clone()
        })
        .y_label_formatter(&|y| {
            let i = (*y).clamp(0, rows as i32 - 1) as usize;
            y_labels[i].clone()
        })
        .draw()?;

    for (i, row) in values.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            let color = if v.is_finite() {
                colormap.color((v - lo) / span)
            } else {
                MISSING
            };
            chart.draw_series(std::iter::once(Rectangle::new(
                [(j as i32, i as i32), (j as i32 + 1, i as i32 + 1)],
                color.filled(),
            )))?;
        }
    }

    // Color scale: thin rectangles stepping through the ramp, low values
    // at the bottom, value ticks on the right.
    let mut bar = ChartBuilder::on(&scale)
        .margin_top(46)
        .margin_bottom(72)
        .margin_left(18)
        .set_label_area_size(LabelAreaPosition::Right, 64)
        .build_cartesian_2d(0i32..1i32, 0i32..SCALE_STEPS)?;
    bar.configure_mesh()
        .disable_mesh()
        .y_labels(4)
        .y_label_formatter(&|y| {
            format!("{:.2}", lo + span * (*y as f64) / SCALE_STEPS as f64)
        })
        .draw()?;
    bar.draw_series((0..SCALE_STEPS).map(|k| {
        let t = (k as f64 + 0.5) / SCALE_STEPS as f64;
        Rectangle::new([(0, k), (1, k + 1)], colormap.color(t).filled())
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ramp_endpoints() {
        assert_eq!(Colormap::Sequential.color(0.0), RGBColor(0, 0, 0));
        assert_eq!(Colormap::Sequential.color(1.0), RGBColor(255, 255, 255));
        // Mid-ramp is saturated red heading into yellow.
        let mid = Colormap::Sequential.color(0.4);
        assert_eq!(mid.0, 255);
        assert!(mid.2 == 0);
    }

    #[test]
    fn divergent_midpoint_is_white() {
        assert_eq!(Colormap::Divergent.color(0.5), RGBColor(255, 255, 255));
        let cold = Colormap::Divergent.color(0.0);
        let warm = Colormap::Divergent.color(1.0);
        assert!(cold.2 > cold.0);
        assert!(warm.0 > warm.2);
    }

    #[test]
    fn tick_labels_blank_even_indices() {
        let labels = log_tick_labels(&[1e-3, 1e-2, 1e-1, 1.0]);
        assert_eq!(labels[0], "");
        assert_eq!(labels[1], "10^-2.0");
        assert_eq!(labels[2], "");
        assert_eq!(labels[3], "10^0.0");
    }

    #[test]
    fn renders_a_small_grid_with_a_nan_cell() {
        let out = std::env::temp_dir().join("bargain_heatmap_smoke.png");
        let out_str = out.to_string_lossy().to_string();
        let values = vec![vec![0.0, 1.0], vec![f64::NAN, 2.0]];
        let labels = vec![String::new(), "10^0.0".to_string()];
        render_heatmap(
            &out_str,
            "smoke",
            &values,
            &labels,
            &labels,
            Colormap::Sequential,
        )
        .unwrap();
        let meta = std::fs::metadata(&out).unwrap();
        assert!(meta.len() > 0);
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn renders_a_color_scale_beside_the_cells() {
        let out = std::env::temp_dir().join("bargain_heatmap_scale.png");
        let out_str = out.to_string_lossy().to_string();
        let values = vec![vec![-2.0, 0.0, 2.0], vec![1.0, f64::NAN, -1.0]];
        let x = vec![String::new(), "10^-1.0".to_string(), String::new()];
        let y = vec![String::new(), "10^1.0".to_string()];
        render_heatmap(&out_str, "scale", &values, &x, &y, Colormap::Divergent).unwrap();
        assert!(std::fs::metadata(&out).unwrap().len() > 0);
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn mismatched_labels_are_refused() {
        let values = vec![vec![0.0, 1.0]];
        let one = vec![String::new()];
        let two = vec![String::new(), String::new()];
        assert!(render_heatmap("/tmp/unused.png", "t", &values, &one, &two, Colormap::Sequential).is_err());
        let empty: Vec<Vec<f64>> = Vec::new();
        assert!(render_heatmap("/tmp/unused.png", "t", &empty, &two, &two, Colormap::Sequential).is_err());
    }
}
