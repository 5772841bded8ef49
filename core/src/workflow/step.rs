// core/src/workflow/step.rs

//! Step definitions and the boxed handler type attached to them.

use super::{ContextData, PipelineControl};
use std::future::Future;
use std::pin::Pin;

/// An asynchronous step handler.
///
/// It receives a clone of the run's `ContextData<TData>`, takes whatever locks
/// it needs (dropping them before awaiting), and tells the pipeline whether to
/// continue.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// A named step. Optional steps without handlers are skipped instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDef {
  pub name: String,
  pub optional: bool,
}
