// storefront/src/pipelines/order_status_pipeline.rs

use crate::errors::{AppError, Result};
use crate::pipelines::contexts::UpdateOrderStatusCtxData;
use marivor_core::{ContextData, Pipeline, PipelineControl, Registry};
use tracing::{info, warn};

pub fn register_order_status_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<UpdateOrderStatusCtxData, AppError>::new(&[
    ("load_order", false),
    ("apply_status_transition", false),
    ("persist_order_status", false),
  ]);

  p.on_root("load_order", |ctx_data: ContextData<UpdateOrderStatusCtxData>| async move {
    let (order_id, store) = {
      let guard = ctx_data.read();
      (guard.order_id, guard.app_state.orders.clone())
    };

    let order = store.load(order_id).await?;
    ctx_data.write().order = Some(order);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on_root("apply_status_transition", apply_status_transition);

  p.on_root("persist_order_status", |ctx_data: ContextData<UpdateOrderStatusCtxData>| async move {
    let (order, previous, store) = {
      let guard = ctx_data.read();
      (guard.order.clone(), guard.previous_status, guard.app_state.orders.clone())
    };
    let order = order.ok_or_else(|| AppError::Internal("Order missing before status save.".to_string()))?;
    let previous = previous.ok_or_else(|| AppError::Internal("Previous status missing before save.".to_string()))?;

    // Fails with `StatusChanged` if another update got there first.
    store.save_status(&order, previous).await?;
    info!(
      "Order Status Pipeline: Order {} saved with status {}.",
      ctx_data.read().order_id,
      order.status()
    );
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  registry.register_pipeline(p);
}

async fn apply_status_transition(ctx_data: ContextData<UpdateOrderStatusCtxData>) -> Result<PipelineControl> {
  let mut guard = ctx_data.write();
  let requested = guard.requested_status;
  let order_id = guard.order_id;
  let order = guard
    .order
    .as_mut()
    .ok_or_else(|| AppError::Internal("Order missing after load step.".to_string()))?;

  let previous = order.status();
  if let Err(e) = order.transition(requested) {
    warn!(
      "Order Status Pipeline: Order {} cannot move from {} to {}: {}",
      order_id, previous, requested, e
    );
    return Err(e.into());
  }
  guard.previous_status = Some(previous);
  Ok(PipelineControl::Continue)
}
