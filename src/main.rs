use std::hint::black_box;
use std::path::Path;
use std::process::exit;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use loopbench::report::{self, ConsoleSink, RunRecord};
use loopbench::{BenchmarkConfig, BenchmarkState};

const SETTINGS_FILE: &str = "loopbench.json";
const RESULTS_FILE: &str = "results.csv";

fn main() {
    if let Err(e) = run() {
        eprintln!("Fatal error: {}", e);
        exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("{:^60}", format!("Loopbench v{}", loopbench::VERSION).bold().cyan());
    println!("{}\n", separator);

    println!("{}", "System Information".bold().yellow());
    println!("━━━━━━━━━━━━━━━━━━━");
    let os_info = os_info::get();
    println!("▸ OS: {} {}", os_info.os_type(), os_info.version());
    let cpuid = raw_cpuid::CpuId::new();
    if let Some(brand) = cpuid.get_processor_brand_string() {
        println!("▸ CPU: {}", brand.as_str().trim());
    } else {
        println!("▸ CPU: Unknown");
    }
    println!();

    let config = if Path::new(SETTINGS_FILE).exists() {
        println!("▸ Using settings from {}", SETTINGS_FILE);
        BenchmarkConfig::load(SETTINGS_FILE)?
    } else {
        BenchmarkConfig::default()
    };
    println!(
        "▸ Warm-up: ≥{} iterations, ≥{} ms | trial target: {} ms, [{}, {}] iterations | {} trials\n",
        config.warmup_min_iterations,
        config.warmup_duration_ms,
        config.target_trial_duration_ms,
        config.min_trial_iterations,
        config.max_trial_iterations,
        config.repeat_count,
    );

    let workloads: Vec<(&str, fn(&mut BenchmarkState))> = vec![
        ("array_copy", bench_array_copy),
        ("string_format", bench_string_format),
        ("vec_sort", bench_vec_sort),
    ];

    println!("{}", "Benchmarks".bold().yellow());
    println!("━━━━━━━━━━━━━━━━━━━");
    let pb = ProgressBar::new(workloads.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut sink = ConsoleSink;
    let mut records = Vec::new();
    for (name, workload) in workloads {
        pb.set_message(name.to_string());
        let mut state = BenchmarkState::with_config(config.clone())?;
        workload(&mut state);
        state.send_full_status_report(&mut sink, name);
        records.push(RunRecord::from_state(name, &state));
        pb.inc(1);
    }
    pb.finish_with_message("all benchmarks completed");
    println!();

    println!("{}", report::summary_table(&records));

    report::write_csv(&records, RESULTS_FILE)?;
    println!("\n✅ Results written to {}", RESULTS_FILE);

    Ok(())
}

fn bench_array_copy(state: &mut BenchmarkState) {
    let src = [1u32, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    while state.keep_running() {
        let dest = src.to_vec();
        black_box(dest);
    }
}

fn bench_string_format(state: &mut BenchmarkState) {
    let mut n = 0u64;
    while state.keep_running() {
        n = n.wrapping_add(1);
        black_box(format!("iteration {n}"));
    }
}

/// Sorts a freshly shuffled buffer each iteration; the reshuffle happens
/// with timing paused so only the sort is measured.
fn bench_vec_sort(state: &mut BenchmarkState) {
    let base: Vec<u64> = (0..256).map(|i| (i * 2654435761u64) % 997).collect();
    while state.keep_running() {
        state.pause_timing();
        let mut data = base.clone();
        state.resume_timing();
        data.sort_unstable();
        black_box(data);
    }
}
