// bazaar/flow/src/lib.rs

//! Bazaar Flow: async step pipelines for the marketplace workflows.
//!
//! A [`Pipeline`] is an ordered list of named steps. Each step can carry
//! `before`, `on` and `after` handlers that operate on a shared
//! [`ContextData`]. A handler either lets the run continue or stops it early;
//! the first error aborts the run.
//!
//! The [`Workflows`] registry keys pipelines by their context data type, so a
//! caller only has to build the context to pick the workflow it wants to run.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::StepDef;

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::FlowError;

pub use crate::registry::Workflows;
