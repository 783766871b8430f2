//! Main benchmark CLI executable.

use env_logger::Env;
use filter_bench::benchmarks::{BenchmarkResult, BenchmarkRunner, ConfigLoader};
use log::error;
use std::env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let result = run_benchmarks();

    if let Err(e) = result {
        error!("Benchmark execution failed: {}", e);
        std::process::exit(1);
    }
}

/// Removes `--config <path>` from `args` and returns the path.
fn take_config_path(args: &mut Vec<String>) -> Option<String> {
    let position = args.iter().position(|a| a == "--config")?;
    if position + 1 >= args.len() {
        return None;
    }
    let path = args.remove(position + 1);
    args.remove(position);
    Some(path)
}

fn run_benchmarks() -> BenchmarkResult<()> {
    let mut args: Vec<String> = env::args().collect();
    let config_path = take_config_path(&mut args);

    match args.len() {
        1 => {
            // No arguments - run all benchmarks
            let config = ConfigLoader::load_sweep_config(config_path.as_deref())?;
            BenchmarkRunner::run_all_benchmarks(&config).map(|_| ())
        }
        2 => match args[1].as_str() {
            "--list" => {
                BenchmarkRunner::list_benchmarks();
                Ok(())
            }
            "--help" | "-h" | "--config" => {
                print_usage();
                Ok(())
            }
            benchmark_name => {
                let config = ConfigLoader::load_sweep_config(config_path.as_deref())?;
                BenchmarkRunner::run_benchmark(benchmark_name, &config).map(|_| ())
            }
        },
        3 if args[1] == "--benchmark" => {
            let config = ConfigLoader::load_sweep_config(config_path.as_deref())?;
            BenchmarkRunner::run_benchmark(&args[2], &config).map(|_| ())
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("Usage:");
    println!("  cargo run --bin benchmark --release                          # Run all benchmarks");
    println!("  cargo run --bin benchmark --release -- --list               # List available benchmarks");
    println!("  cargo run --bin benchmark --release -- <benchmark>          # Run specific benchmark");
    println!("  cargo run --bin benchmark --release -- --benchmark <benchmark>");
    println!("  cargo run --bin benchmark --release -- --config <path> ...  # Use a JSON sweep config");
    println!();
    BenchmarkRunner::list_benchmarks();
}
