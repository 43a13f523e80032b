use std::time::Instant;

use anyhow::Context;
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fuel_match_sim::config::{RunnerConfig, SimConfig};
use fuel_match_sim::game::field::Alliance;
use fuel_match_sim::game::match_result::{BatchSummary, MatchResult};
use fuel_match_sim::game::state::Simulation;

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging (RUST_LOG overrides)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Fuel match simulator v{}", env!("CARGO_PKG_VERSION"));

    let runner = RunnerConfig::load_or_default();
    runner.validate()?;

    let base = match &runner.config_path {
        Some(path) => SimConfig::load_file(path).with_context(|| format!("loading {}", path))?,
        None => SimConfig::default(),
    };
    let base = base.with_mode(runner.mode);
    base.validate()?;

    let base_seed = runner.seed.or(base.seed).unwrap_or_else(rand::random);
    info!(
        runs = runner.runs,
        mode = %runner.mode,
        seed = base_seed,
        threads = rayon::current_num_threads(),
        "Starting batch"
    );

    let started = Instant::now();
    let results = (0..runner.runs)
        .into_par_iter()
        .map(|i| {
            let config = SimConfig {
                seed: Some(base_seed.wrapping_add(i as u64)),
                ..base.clone()
            };
            run_match(i + 1, config, runner.verbose)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let wall = started.elapsed().as_secs_f32();

    for (i, result) in results.iter().enumerate() {
        println!("{}", match_line(i + 1, result));
    }

    let summary = BatchSummary::from_results(&results);
    let simulated: f32 = results.iter().map(|r| r.duration).sum();
    print_summary(&summary, simulated, wall);

    Ok(())
}

fn run_match(number: usize, config: SimConfig, verbose: bool) -> anyhow::Result<MatchResult> {
    let mut sim = Simulation::new(config)?;
    if !verbose {
        return Ok(sim.run_to_end());
    }

    loop {
        let report = sim.step();
        if report.phase_changed {
            if let Some(phase) = report.phase {
                info!(
                    "Match {} [{:>6.1}s] {} (red {} - blue {})",
                    number,
                    sim.elapsed(),
                    phase,
                    sim.scoreboard().total(Alliance::Red),
                    sim.scoreboard().total(Alliance::Blue)
                );
            }
        }
        if report.is_finished() {
            break;
        }
    }
    Ok(sim.result())
}

fn match_line(number: usize, result: &MatchResult) -> String {
    let winner = match result.winner {
        Some(alliance) => alliance.name().to_uppercase(),
        None => "TIE".to_string(),
    };
    format!(
        "Match {}: RED {} (+{}P) - BLUE {} (+{}P)  [{}]",
        number, result.red.total, result.red.penalty, result.blue.total, result.blue.penalty, winner
    )
}

fn print_summary(summary: &BatchSummary, simulated: f32, wall: f32) {
    println!();
    println!("=== {} matches ===", summary.matches);
    println!(
        "Red wins:  {} ({:.1}%)",
        summary.red_wins,
        summary.win_rate(Alliance::Red)
    );
    println!(
        "Blue wins: {} ({:.1}%)",
        summary.blue_wins,
        summary.win_rate(Alliance::Blue)
    );
    println!("Ties:      {} ({:.1}%)", summary.ties, summary.tie_rate());
    println!(
        "Average:   RED {:.1} (pen {:.1}) - BLUE {:.1} (pen {:.1})",
        summary.red_avg, summary.red_avg_penalty, summary.blue_avg, summary.blue_avg_penalty
    );
    println!("Max:       RED {} - BLUE {}", summary.red_max, summary.blue_max);
    if wall > 0.0 {
        println!(
            "Simulated {:.0}s in {:.2}s ({:.0}x real time)",
            simulated,
            wall,
            simulated / wall
        );
    }
}
