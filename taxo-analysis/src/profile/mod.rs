//! Coverage profiling: per-group discriminating-code statistics and tiering.

pub mod profiler;
pub mod types;

pub use profiler::CoverageProfiler;
pub use types::{CodeCoverage, CoverageTier};
