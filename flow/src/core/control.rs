// bazaar/flow/src/core/control.rs

//! Flow-control signals returned by handlers and the outcome of a run.

/// Returned by a handler to tell the pipeline whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt the run now. Remaining handlers and steps are not executed.
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran (or was an optional step without handlers).
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
