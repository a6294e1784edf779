//! Single-scenario inspector: solve one (m, p) point and print everything
//! the grid scan would otherwise average away. Useful for sanity-checking a
//! suspicious heatmap cell.

use bargain::disagreement::DisagreementPolicy;
use bargain::error::BargainError;
use bargain::evaluator::{
    ScenarioConfig, ScenarioEvaluator, SuccessWelfare, DEFAULT_DELTA, DEFAULT_RATIO_FLOOR,
};
use bargain::grid::probability_to_odds;
use bargain::solver::find_bargaining_solution;
use bargain::types::Evaluation;
use bargain::utility::{utility_aligned, utility_unaligned};
use bargain::welfare::{ideal_utilities, Welfare};

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

fn print_metric(name: &str, result: Result<Evaluation, BargainError>) {
    match result {
        Ok(e) => {
            let note = if e.converged { "" } else { "  (unconverged)" };
            println!("  {:<18} {:>16.8e}{}", name, e.value, note);
        }
        Err(e) => println!("  {:<18} {}", name, e),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut m = 0.5;
    let mut p = 0.5;
    let mut welfare = Welfare::KalaiSmorodinsky;
    let mut policy = DisagreementPolicy::MirroredLoss;
    let mut success_welfare = SuccessWelfare::AlwaysNash;
    let mut delta = DEFAULT_DELTA;
    let mut ratio_floor = DEFAULT_RATIO_FLOOR;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--m" => {
                i += 1;
                m = args[i].parse().expect("Invalid --m");
            }
            "--p" => {
                i += 1;
                p = args[i].parse().expect("Invalid --p");
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
            "--delta" => {
                i += 1;
                delta = args[i].parse().expect("Invalid --delta");
            }
            "--ratio-floor" => {
                i += 1;
                ratio_floor = args[i].parse().expect("Invalid --ratio-floor");
            }
            "--help" | "-h" => {
                println!("Usage: bargain-point [OPTIONS]");
                println!("  --m F                   Bargaining weight in (0, 1) (default: 0.5)");
                println!("  --p F                   Success probability in (0, 1) (default: 0.5)");
                println!("  --welfare NAME          nash | ks (default: ks)");
                println!("  --policy NAME           unilateral | zero | mirrored-loss (default: mirrored-loss)");
                println!("  --success-welfare NAME  always-nash | configured (default: always-nash)");
                println!("  --delta F               Relative odds nudge (default: 0.01)");
                println!("  --ratio-floor F         Smallest |delta_m| to divide by (default: 1e-9)");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
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
    let cfg = &scenario.solver;
    let pool = cfg.resource_pool;

    println!("=== Scenario ===");
    println!("  m = {} (odds ratio {:.4e}), p = {}", m, probability_to_odds(m), p);
    println!(
        "  welfare = {:?}, policy = {:?}, success welfare = {:?}, delta = {}",
        welfare, policy, success_welfare, delta
    );

    let disagreement = policy.payoffs(m, pool);
    println!("\n=== Disagreement point ===");
    println!("  aligned   {:>12.6}", disagreement.aligned);
    println!("  unaligned {:>12.6}", disagreement.unaligned);

    // The deal the evaluator prices: Nash unless the configured welfare is
    // wired through to the success branch.
    let deal_welfare = match success_welfare {
        SuccessWelfare::AlwaysNash => Welfare::Nash,
        SuccessWelfare::Configured => welfare,
    };
    let solution = match find_bargaining_solution(m, deal_welfare, disagreement, cfg) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Solve failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n=== Bargaining solve ({:?}) ===", deal_welfare);
    println!(
        "  profile   aligned keeps {:.6}, unaligned keeps {:.6}",
        solution.profile.aligned, solution.profile.unaligned
    );
    println!("  welfare   {:.8e}", solution.welfare);
    println!(
        "  iterations {} ({})",
        solution.iterations,
        if solution.converged { "converged" } else { "NOT converged" }
    );
    println!(
        "  utilities aligned = {:.6}, unaligned = {:.6}",
        utility_aligned(m, solution.profile, pool),
        utility_unaligned(m, solution.profile, pool)
    );
    if deal_welfare == Welfare::KalaiSmorodinsky {
        let ideal = ideal_utilities(m, cfg);
        println!(
            "  ideal point aligned = {:.6}, unaligned = {:.6}{}",
            ideal.aligned,
            ideal.unaligned,
            if ideal.converged { "" } else { "  (unconverged)" }
        );
    }

    println!("\n=== Metrics ===");
    print_metric("expected_utility", evaluator.expected_utility_aligned(m, p));
    print_metric("delta_m", evaluator.delta_m(m, p));
    print_metric("delta_p", evaluator.delta_p(m, p));
    print_metric("shift_ratio", evaluator.shift_ratio(m, p));
    print_metric("max_shift", evaluator.max_shift(m, p));
}
