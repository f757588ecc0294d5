// bazaar/flow/src/pipeline/execution.rs

//! `Pipeline::run()`: executes steps and their handlers against one context.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::step::StepDef;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, info_span, instrument, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx_data`.
  ///
  /// Within a step, `before` handlers run first, then `on`, then `after`, each
  /// group in registration order. The first handler error is returned as is.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = info_span!(
        "pipeline_step",
        step_name = %step_def.name,
        step_index = step_idx,
        optional = step_def.optional
      );
      let control = self.run_step(step_def, ctx_data.clone()).instrument(step_span).await?;
      if control == PipelineControl::Stop {
        event!(Level::INFO, step_name = %step_def.name, "Pipeline stopped by a handler.");
        return Ok(PipelineResult::Stopped);
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_def: &StepDef, ctx_data: ContextData<TData>) -> Result<PipelineControl, Err> {
    let name = step_def.name.as_str();
    let phases: [(&'static str, Option<&Vec<Handler<TData, Err>>>); 3] = [
      ("before", self.before.get(name)),
      ("on", self.on.get(name)),
      ("after", self.after.get(name)),
    ];

    let has_handlers = phases
      .iter()
      .any(|(_, handlers)| handlers.map_or(false, |v| !v.is_empty()));
    if !has_handlers {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Ok(PipelineControl::Continue);
      }
      event!(Level::ERROR, "Non-optional step has no handlers.");
      return Err(Err::from(FlowError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for (phase, handlers) in phases {
      for (handler_idx, handler_fn) in handlers.into_iter().flatten().enumerate() {
        match handler_fn(ctx_data.clone()).await {
          Ok(PipelineControl::Continue) => {}
          Ok(PipelineControl::Stop) => {
            event!(Level::DEBUG, phase, handler_idx, "Handler requested stop.");
            return Ok(PipelineControl::Stop);
          }
          Err(e) => {
            event!(Level::WARN, phase, handler_idx, error = %e, "Handler failed.");
            return Err(e);
          }
        }
      }
    }

    Ok(PipelineControl::Continue)
  }
}
