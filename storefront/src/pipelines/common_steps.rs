// storefront/src/pipelines/common_steps.rs

//! Steps shared by several pipelines.

use crate::errors::{AppError, Result};
use crate::pipelines::contexts::WorkingCart;
use marivor_core::{ContextData, PipelineControl};
use tracing::{debug, instrument};

/// Writes the pipeline's working cart back to the session.
///
/// Always the last step of a cart pipeline: earlier failures never reach it,
/// so the session keeps its previous cart.
#[instrument(name = "common_step::commit_session_cart", skip(ctx_data), err)]
pub async fn commit_session_cart<T>(ctx_data: ContextData<T>) -> Result<PipelineControl>
where
  T: WorkingCart + Send + Sync + 'static,
{
  let (session, working_cart) = {
    let mut guard = ctx_data.write();
    (guard.session().clone(), guard.take_working_cart())
  };

  let cart = working_cart
    .ok_or_else(|| AppError::Internal("No working cart to commit.".to_string()))?;

  let mut session_guard = session.write();
  debug!(
    session_id = %session_guard.session_id,
    lines = cart.lines().len(),
    total_items = cart.total_items(),
    "Committing cart to session."
  );
  session_guard.commit_cart(cart);
  Ok(PipelineControl::Continue)
}
