//! Benchmark timing state machine.
//!
//! A `BenchmarkState` is polled by the code under measurement:
//!
//! ```no_run
//! use loopbench::BenchmarkState;
//!
//! let mut state = BenchmarkState::new();
//! while state.keep_running() {
//!     // measured work
//! }
//! println!("{}", state.summary_line());
//! ```
//!
//! The first poll starts an unmeasured warm-up. Once the warm-up has run long
//! enough to estimate per-iteration cost, the machine sizes the measured
//! trials from that estimate and times a fixed number of trials, yielding one
//! per-iteration duration sample each. When the last trial closes the machine
//! computes summary statistics and `keep_running()` returns `false`.
//!
//! Call sequencing violations (double pause, resume without pause, polling
//! after completion, reading statistics early) are caller bugs and panic with
//! a descriptive message; they are not recoverable conditions.

use std::time::{Duration, Instant};

use crate::config::{BenchmarkConfig, ConfigError};
use crate::stats::SummaryStatistics;

/// Receives the numeric statistics of a finished run as key/value pairs.
///
/// Stands in for an external instrumentation result channel; implementations
/// only need to accept keyed nanosecond values.
pub trait StatusSink {
    fn put(&mut self, key: &str, value_ns: u64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Warmup,
    Running,
    Finished,
}

/// One benchmark session, driven by [`keep_running`](BenchmarkState::keep_running).
///
/// All timing state is owned here and mutated only through the polling and
/// pause/resume calls; the instance is single-owner and not meant to be
/// shared across threads.
#[derive(Debug)]
pub struct BenchmarkState {
    config: BenchmarkConfig,
    phase: Phase,

    start: Instant,
    paused_at: Option<Instant>,
    paused_total: Duration,

    iteration: u64,
    target_iterations: u64,
    completed_trials: u32,

    // Per-iteration durations in nanoseconds, one per trial.
    samples: Vec<u64>,
    statistics: Option<SummaryStatistics>,
}

impl BenchmarkState {
    /// Creates a state machine with the default tunables.
    pub fn new() -> Self {
        Self::from_parts(BenchmarkConfig::default())
    }

    /// Creates a state machine with validated custom tunables.
    pub fn with_config(config: BenchmarkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: BenchmarkConfig) -> Self {
        Self {
            config,
            phase: Phase::NotStarted,
            start: Instant::now(),
            paused_at: None,
            paused_total: Duration::ZERO,
            iteration: 0,
            target_iterations: 0,
            completed_trials: 0,
            samples: Vec::new(),
            statistics: None,
        }
    }

    /// Judges whether the benchmark needs more loop iterations.
    ///
    /// The measured loop body must execute once per `true` return and the
    /// loop must stop on `false`. Panics when polled after the benchmark has
    /// finished, or when an iteration completes with timing still paused.
    pub fn keep_running(&mut self) -> bool {
        match self.phase {
            Phase::NotStarted => {
                self.begin_warmup();
                true
            }
            Phase::Warmup => {
                self.iteration += 1;
                // Check the clock on every iteration here; there is no target
                // iteration count yet.
                let elapsed = self.start.elapsed();
                if self.iteration >= self.config.warmup_min_iterations
                    && elapsed >= self.config.warmup_duration()
                {
                    self.begin_trials(elapsed, self.iteration);
                }
                true
            }
            Phase::Running => {
                self.iteration += 1;
                if self.paused_at.is_some() {
                    panic!(
                        "benchmark step finished with timing paused; \
                         call resume_timing() before the loop iteration completes"
                    );
                }
                if self.iteration >= self.target_iterations {
                    return self.close_trial();
                }
                true
            }
            Phase::Finished => panic!("the benchmark has already finished"),
        }
    }

    /// Stops the benchmark timer for caller-side setup or teardown.
    ///
    /// Panics if timing is already paused.
    pub fn pause_timing(&mut self) {
        if self.paused_at.is_some() {
            panic!("unable to pause: the benchmark is already paused");
        }
        self.paused_at = Some(Instant::now());
    }

    /// Restarts the benchmark timer, excluding the paused span from the trial.
    ///
    /// Panics if timing is not paused.
    pub fn resume_timing(&mut self) {
        match self.paused_at.take() {
            Some(paused_at) => self.paused_total += paused_at.elapsed(),
            None => panic!("unable to resume: the benchmark is not paused"),
        }
    }

    fn begin_warmup(&mut self) {
        self.start = Instant::now();
        self.iteration = 0;
        self.phase = Phase::Warmup;
    }

    /// Sizes the measured trials from the observed warm-up cost and starts
    /// the first trial.
    fn begin_trials(&mut self, warmup_elapsed: Duration, warmup_iterations: u64) {
        let per_iteration_ns = (warmup_elapsed.as_nanos() as u64 / warmup_iterations).max(1);
        self.target_iterations = (self.config.target_trial_duration().as_nanos() as u64
            / per_iteration_ns)
            .clamp(
                self.config.min_trial_iterations,
                self.config.max_trial_iterations,
            );
        self.paused_total = Duration::ZERO;
        self.iteration = 0;
        self.completed_trials = 0;
        self.phase = Phase::Running;
        self.start = Instant::now();
    }

    /// Records the closing trial's per-iteration duration and either starts
    /// the next trial or finishes the benchmark.
    fn close_trial(&mut self) -> bool {
        let elapsed = self.start.elapsed().saturating_sub(self.paused_total);
        self.samples
            .push(elapsed.as_nanos() as u64 / self.target_iterations);
        self.completed_trials += 1;

        if self.completed_trials >= self.config.repeat_count {
            let statistics = SummaryStatistics::from_samples(&self.samples)
                .unwrap_or_else(|e| panic!("benchmark produced unusable samples: {e}"));
            self.statistics = Some(statistics);
            self.phase = Phase::Finished;
            return false;
        }

        self.paused_total = Duration::ZERO;
        self.iteration = 0;
        self.start = Instant::now();
        true
    }

    /// True once the benchmark has completed all its trials.
    pub fn finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Per-iteration duration samples in nanoseconds, one per closed trial.
    pub fn samples(&self) -> &[u64] {
        &self.samples
    }

    /// Statistics of the finished run. Panics before completion.
    pub fn statistics(&self) -> &SummaryStatistics {
        match (&self.phase, &self.statistics) {
            (Phase::Finished, Some(statistics)) => statistics,
            _ => panic!("the benchmark has not finished"),
        }
    }

    pub fn median(&self) -> u64 {
        self.statistics().median
    }

    pub fn mean(&self) -> u64 {
        self.statistics().mean as u64
    }

    pub fn min(&self) -> u64 {
        self.statistics().min
    }

    pub fn standard_deviation(&self) -> u64 {
        self.statistics().standard_deviation as u64
    }

    /// Human-readable one-line summary of the finished run, including up to
    /// the first 16 individual samples. Panics before completion.
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "Summary: median={}ns, mean={}ns, min={}ns, sigma={}, iteration={}",
            self.median(),
            self.mean(),
            self.min(),
            self.standard_deviation(),
            self.samples.len(),
        );
        for (i, sample) in self.samples.iter().take(16).enumerate() {
            line.push_str(&format!(", No {i} result is {sample}"));
        }
        line
    }

    /// Delivers the four scalar statistics to `sink` under suffixed keys and
    /// logs the summary line keyed by `key`. Panics before completion.
    pub fn send_full_status_report<S: StatusSink>(&self, sink: &mut S, key: &str) {
        println!("{} {}", key, self.summary_line());
        sink.put(&format!("{key}_median"), self.median());
        sink.put(&format!("{key}_mean"), self.mean());
        sink.put(&format!("{key}_min"), self.min());
        sink.put(&format!("{key}_standardDeviation"), self.standard_deviation());
    }
}

impl Default for BenchmarkState {
    fn default() -> Self {
        Self::new()
    }
}
