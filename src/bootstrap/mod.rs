/*! Paired bootstrap significance testing.

Estimates whether an experimental translation system improves on a baseline by resampling a test set
with replacement and counting, per metric, how often each system wins.

- [evaluator] drives the iterations,
- [stats] holds the accumulators and the reduced [BootstrapSummary],
- [workspace] manages the per-iteration temporary files.
!*/
pub mod evaluator;
pub mod stats;
pub mod workspace;

pub use evaluator::{BootstrapConfig, BootstrapEvaluator};
pub use stats::{BootstrapSummary, MetricSummary, RunningSeries, Tally};
pub use workspace::{IterationArea, Workspace};
