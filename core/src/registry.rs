// core/src/registry.rs

//! `Registry<E>`: pipelines keyed by the type of context they run over.
//!
//! The application registers one pipeline per context type at startup and
//! later dispatches with just a `ContextData<TData>`.

use crate::workflow::context_data::ContextData;
use crate::workflow::control::PipelineResult;
use crate::error::WorkflowError;
use crate::pipeline::definition::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Type-erased runner so pipelines over different `TData` share one map.
#[async_trait]
trait AnyPipelineRunner<ApplicationError>: Send + Sync
where
  ApplicationError: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` must hold a `ContextData<TData>` matching the wrapped pipeline.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, ApplicationError>;
}

struct PipelineWrapper<TData, HandlerError>
where
  TData: 'static + Send + Sync,
  HandlerError: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pipeline: Arc<Pipeline<TData, HandlerError>>,
}

#[async_trait]
impl<TData, HandlerError, ApplicationError> AnyPipelineRunner<ApplicationError> for PipelineWrapper<TData, HandlerError>
where
  TData: 'static + Send + Sync,
  HandlerError: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
  ApplicationError: std::error::Error + From<HandlerError> + From<WorkflowError> + Send + Sync + 'static,
{
  #[instrument(
        name = "PipelineWrapper::run_erased",
        skip_all,
        fields(target_tdata_type = %std::any::type_name::<TData>()),
    )]
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, ApplicationError> {
    let typed_ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed_ctx_data) => *boxed_ctx_data,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>().to_string();
        event!(Level::ERROR, "Context object type mismatch. Expected {}.", expected_type);
        return Err(ApplicationError::from(WorkflowError::TypeMismatch { expected_type }));
      }
    };

    self.pipeline.run(typed_ctx_data).await.map_err(ApplicationError::from)
  }
}

/// Pipelines keyed by context type. `run` returns `ApplicationError`, which must
/// absorb both the pipelines' handler errors and engine errors.
pub struct Registry<ApplicationError = WorkflowError>
where
  ApplicationError: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pipelines: RwLock<HashMap<TypeId, Arc<dyn AnyPipelineRunner<ApplicationError>>>>,
  _phantom_app_err: PhantomData<ApplicationError>,
}

impl<ApplicationError> Registry<ApplicationError>
where
  ApplicationError: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      pipelines: RwLock::new(HashMap::new()),
      _phantom_app_err: PhantomData,
    }
  }

  /// Registers `pipeline` for contexts of type `TData`, replacing any earlier one.
  pub fn register_pipeline<TData, HandlerError>(&self, pipeline: Pipeline<TData, HandlerError>)
  where
    TData: 'static + Send + Sync,
    HandlerError: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
    ApplicationError: From<HandlerError>,
  {
    event!(Level::DEBUG, tdata_type = %std::any::type_name::<TData>(), steps = ?pipeline.step_names(), "Registering pipeline.");
    let wrapper = PipelineWrapper {
      pipeline: Arc::new(pipeline),
    };
    self
      .pipelines
      .write()
      .insert(TypeId::of::<TData>(), Arc::new(wrapper));
  }

  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.pipelines.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for `TData`.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, ApplicationError>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self
      .pipelines
      .read()
      .get(&TypeId::of::<TData>())
      .cloned()
      .ok_or_else(|| {
        let type_name = std::any::type_name::<TData>();
        event!(Level::ERROR, "No pipeline registered for TData type {}.", type_name);
        ApplicationError::from(WorkflowError::NotRegistered {
          type_name: type_name.to_string(),
        })
      })?;

    runner.run_erased(Box::new(ctx_data)).await
  }
}

impl<ApplicationError> Default for Registry<ApplicationError>
where
  ApplicationError: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
