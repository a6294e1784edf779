//! Grid scan driver: sweep (m, p) scenario space and render a heatmap.
//!
//! Pipeline:
//! 1. Parse flags (metric, welfare, policy, grid extents, output paths)
//! 2. Scan the grid in parallel (rayon, one task per m row)
//! 3. Natural-log the metric values for plotting; cells that go
//!    non-positive or undefined render gray
//! 4. Render the PNG, optionally dump the raw scan as JSON

use serde::Serialize;
use std::io::Write;
use std::time::Instant;

use bargain::disagreement::DisagreementPolicy;
use bargain::evaluator::{
    Metric, ScenarioConfig, ScenarioEvaluator, SuccessWelfare, DEFAULT_DELTA, DEFAULT_RATIO_FLOOR,
};
use bargain::grid::{probability_to_odds, scan, GridConfig, GridScan};
use bargain::heatmap::{log_tick_labels, render_heatmap, Colormap};
use bargain::welfare::Welfare;

#[derive(Serialize)]
struct ScanReport<'a> {
    metric: Metric,
    welfare: Welfare,
    policy: DisagreementPolicy,
    success_welfare: SuccessWelfare,
    delta: f64,
    ratio_floor: f64,
    grid: GridConfig,
    scan: &'a GridScan,
}

fn parse_metric(s: &str) -> Metric {
    match s {
        "expected-utility" => Metric::ExpectedUtility,
        "delta-m" => Metric::DeltaM,
        "delta-p" => Metric::DeltaP,
        "shift-ratio" => Metric::ShiftRatio,
        "max-shift" => Metric::MaxShift,
        other => {
            eprintln!(
                "Unknown metric: {} (expected-utility, delta-m, delta-p, shift-ratio, max-shift)",
                other
            );
            std::process::exit(1);
        }
    }
}

fn parse_welfare(s: &str) -> Welfare {
    match s {
        "nash" => Welfare::Nash,
        "ks" => Welfare::KalaiSmorodinsky,
        other => {
            eprintln!("Unknown welfare: {} (nash, ks)", other);
            std::process::exit(1);
        }
    }
}

fn parse_policy(s: &str) -> DisagreementPolicy {
    match s {
        "unilateral" => DisagreementPolicy::Unilateral,
        "zero" => DisagreementPolicy::Zero,
        "mirrored-loss" => DisagreementPolicy::MirroredLoss,
        other => {
            eprintln!("Unknown policy: {} (unilateral, zero, mirrored-loss)", other);
            std::process::exit(1);
        }
    }
}

fn parse_success_welfare(s: &str) -> SuccessWelfare {
    match s {
        "always-nash" => SuccessWelfare::AlwaysNash,
        "configured" => SuccessWelfare::Configured,
        other => {
            eprintln!("Unknown success welfare: {} (always-nash, configured)", other);
            std::process::exit(1);
        }
    }
}

fn plot_style(metric: Metric, delta: f64) -> (String, Colormap) {
    let pct = delta * 100.0;
    match metric {
        Metric::ExpectedUtility => (
            "log(expected payoff for team aligned)".to_string(),
            Colormap::Sequential,
        ),
        Metric::DeltaM => (
            format!("log(expected payoff gain from {:.0}% increase in m/(1-m))", pct),
            Colormap::Divergent,
        ),
        Metric::DeltaP => (
            format!("log(expected payoff gain from {:.0}% increase in p/(1-p))", pct),
            Colormap::Divergent,
        ),
        Metric::ShiftRatio => (
            "log(payoff gain ratio: p/(1-p) nudge over m/(1-m) nudge)".to_string(),
            Colormap::Divergent,
        ),
        Metric::MaxShift => (
            format!(
                "log(max expected payoff gain from {:.0}% change in p/(1-p) or m/(1-m))",
                pct
            ),
            Colormap::Sequential,
        ),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut metric = Metric::MaxShift;
    let mut welfare = Welfare::KalaiSmorodinsky;
    let mut policy = DisagreementPolicy::MirroredLoss;
    let mut success_welfare = SuccessWelfare::AlwaysNash;
    let mut grid = GridConfig::default();
    let mut delta = DEFAULT_DELTA;
    let mut ratio_floor = DEFAULT_RATIO_FLOOR;
    let mut out_path = String::from("bargaining_heatmap.png");
    let mut json_path: Option<String> = None;
    let mut threads: Option<usize> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--metric" => {
                i += 1;
                metric = parse_metric(&args[i]);
            }
            "--welfare" => {
                i += 1;
                welfare = parse_welfare(&args[i]);
            }
            "--policy" => {
                i += 1;
                policy = parse_policy(&args[i]);
            }
            "--success-welfare" => {
                i += 1;
                success_welfare = parse_success_welfare(&args[i]);
            }
            "--resolution" => {
                i += 1;
                grid.resolution = args[i].parse().expect("Invalid --resolution");
            }
            "--min-m-odds" => {
                i += 1;
                grid.min_m_odds = args[i].parse().expect("Invalid --min-m-odds");
            }
            "--max-m-odds" => {
                i += 1;
                grid.max_m_odds = args[i].parse().expect("Invalid --max-m-odds");
            }
            "--min-p" => {
                i += 1;
                grid.min_p = args[i].parse().expect("Invalid --min-p");
            }
            "--max-p" => {
                i += 1;
                grid.max_p = args[i].parse().expect("Invalid --max-p");
            }
            "--delta" => {
                i += 1;
                delta = args[i].parse().expect("Invalid --delta");
            }
            "--ratio-floor" => {
                i += 1;
                ratio_floor = args[i].parse().expect("Invalid --ratio-floor");
            }
            "--out" => {
                i += 1;
                out_path = args[i].clone();
            }
            "--json" => {
                i += 1;
                json_path = Some(args[i].clone());
            }
            "--threads" => {
                i += 1;
                threads = Some(args[i].parse().expect("Invalid --threads"));
            }
            "--help" | "-h" => {
                println!("Usage: bargain-heatmap [OPTIONS]");
                println!("  --metric NAME           expected-utility | delta-m | delta-p | shift-ratio | max-shift (default: max-shift)");
                println!("  --welfare NAME          nash | ks (default: ks)");
                println!("  --policy NAME           unilateral | zero | mirrored-loss (default: mirrored-loss)");
                println!("  --success-welfare NAME  always-nash | configured (default: always-nash)");
                println!("  --resolution N          Cells per axis (default: 12)");
                println!("  --min-m-odds F          Smallest m/(1-m) (default: 1e-5)");
                println!("  --max-m-odds F          Largest m/(1-m) (default: 1e5)");
                println!("  --min-p F               Smallest p (default: 1e-3)");
                println!("  --max-p F               Largest p (default: 0.999)");
                println!("  --delta F               Relative odds nudge (default: 0.01)");
                println!("  --ratio-floor F         Smallest |delta_m| to divide by (default: 1e-9)");
                println!("  --out PATH              Output PNG (default: bargaining_heatmap.png)");
                println!("  --json PATH             Also write the raw scan as JSON");
                println!("  --threads N             Rayon thread count (default: all cores)");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .expect("Failed to build rayon pool");
        println!("Using {} rayon threads", n);
    }

    let scenario = ScenarioConfig {
        welfare,
        policy,
        success_welfare,
        delta,
        ratio_floor,
        ..ScenarioConfig::default()
    };
    let evaluator = ScenarioEvaluator::new(scenario);

    println!(
        "Scanning {}x{} grid: {:?} under {:?} welfare, {:?} policy...",
        grid.resolution, grid.resolution, metric, welfare, policy
    );
    let start = Instant::now();
    let result = match scan(&evaluator, metric, &grid) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Scan failed: {}", e);
            std::process::exit(1);
        }
    };
    let cells = grid.resolution * grid.resolution;
    println!(
        "  Done in {:.1}s ({} cells, {} unconverged, {} undefined)",
        start.elapsed().as_secs_f64(),
        cells,
        result.unconverged,
        result.undefined,
    );

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in result.values.iter().flatten() {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if lo.is_finite() {
        println!("  Metric range: [{:.4}, {:.4}]", lo, hi);
    } else {
        println!("  No finite cells in the scan");
    }

    // The plot shows ln(metric); non-positive cells drop out as gray, the
    // same cells a log color scale cannot place anyway.
    let plot_values: Vec<Vec<f64>> = result
        .values
        .iter()
        .map(|row| row.iter().map(|v| v.ln()).collect())
        .collect();
    let x_labels = log_tick_labels(&result.p_values);
    let m_odds: Vec<f64> = result.m_values.iter().map(|&m| probability_to_odds(m)).collect();
    let y_labels = log_tick_labels(&m_odds);

    let (title, colormap) = plot_style(metric, delta);
    if let Err(e) = render_heatmap(&out_path, &title, &plot_values, &x_labels, &y_labels, colormap) {
        eprintln!("Render failed: {}", e);
        std::process::exit(1);
    }
    println!("Wrote {}", out_path);

    if let Some(path) = json_path {
        let report = ScanReport {
            metric,
            welfare,
            policy,
            success_welfare,
            delta,
            ratio_floor,
            grid,
            scan: &result,
        };
        let json = serde_json::to_string_pretty(&report).expect("JSON serialization failed");
        let mut f = std::fs::File::create(&path).expect("Failed to create JSON");
        f.write_all(json.as_bytes()).unwrap();
        println!("Wrote {}", path);
    }
}
