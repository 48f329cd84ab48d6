//! Loopbench - a polling micro-benchmark harness
//!
//! The harness is driven by a single polling call: the code under test runs
//! inside a `while state.keep_running() { ... }` loop. The state machine
//! warms up until per-iteration cost can be estimated, sizes the measured
//! trials from that estimate, times a fixed number of trials and then
//! summarizes the per-iteration durations.
//!
//! ```no_run
//! use loopbench::BenchmarkState;
//!
//! let mut state = BenchmarkState::new();
//! let src = [1u32, 2, 3, 4, 5, 6, 7, 8, 9, 10];
//! while state.keep_running() {
//!     let dest = src.to_vec();
//!     std::hint::black_box(dest);
//! }
//! println!("{}", state.summary_line());
//! ```

pub mod config;
pub mod core;
pub mod report;
pub mod stats;

pub use config::BenchmarkConfig;
pub use core::{BenchmarkState, StatusSink};
pub use stats::summary::SummaryStatistics;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
