// storefront/src/handlers/mod.rs

//! Transport-agnostic request handlers. Each takes the shared `AppState` plus
//! already-extracted request parts and returns a serializable view or an
//! `AppError` (see `AppError::to_response`).

use crate::errors::{AppError, Result};
use crate::state::AppState;
use marivor_core::{ContextData, PipelineResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

pub mod cart_handlers;
pub mod checkout_handlers;
pub mod order_handlers;
pub mod product_handlers;
pub mod views;

/// Runs the pipeline registered for `TData`. A graceful stop still fails the request.
pub(crate) async fn run_pipeline<TData>(app_state: &AppState, ctx_data: ContextData<TData>) -> Result<()>
where
  TData: Send + Sync + 'static,
{
  match app_state.workflows.run(ctx_data).await? {
    PipelineResult::Completed => Ok(()),
    PipelineResult::Stopped => {
      warn!(
        "Pipeline for {} was stopped by a handler.",
        std::any::type_name::<TData>()
      );
      Err(AppError::PipelineHaltedByHandler)
    }
  }
}

/// Decodes a JSON request body.
pub(crate) fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T> {
  serde_json::from_value(payload).map_err(|e| AppError::Validation(format!("Malformed request body: {}", e)))
}
