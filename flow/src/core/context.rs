// bazaar/flow/src/core/context.rs

//! Defines the `Handler<TData, Err>` type used for every pipeline step handler.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A boxed, type-erased step handler.
///
/// Each invocation receives its own clone of the run's `ContextData<TData>`.
/// Handlers must release any lock guard before the next `.await`.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
