// bazaar/flow/src/core/step.rs

/// A named step of a pipeline.
///
/// An optional step without handlers is skipped; a non-optional one fails the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDef {
  pub name: String,
  pub optional: bool,
}
