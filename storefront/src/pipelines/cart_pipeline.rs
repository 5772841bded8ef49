// storefront/src/pipelines/cart_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::common_steps::commit_session_cart;
use crate::pipelines::contexts::{AddToCartCtxData, RemoveFromCartCtxData, UpdateCartLineCtxData};
use marivor_core::{ContextData, Pipeline, PipelineControl, ProductLookup, Registry, ShopError};
use tracing::{info, warn};

pub fn register_add_to_cart_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<AddToCartCtxData, AppError>::new(&[
    ("validate_cart_input", false),
    ("fetch_product_for_cart", false),
    ("apply_add_to_cart", false),
    ("commit_session_cart", false),
  ]);

  p.on_root("validate_cart_input", |ctx_data: ContextData<AddToCartCtxData>| async move {
    let quantity = ctx_data.read().quantity;
    if quantity < 1 {
      warn!("Add to Cart Pipeline: Invalid quantity ({}) provided.", quantity);
      return Err(AppError::from(ShopError::InvalidQuantity(format!(
        "{} (must be at least 1)",
        quantity
      ))));
    }
    Ok(PipelineControl::Continue)
  });

  p.on_root("fetch_product_for_cart", |ctx_data: ContextData<AddToCartCtxData>| async move {
    let (product_id, catalog) = {
      let guard = ctx_data.read();
      (guard.product_id, guard.app_state.catalog.clone())
    };

    let product = catalog.get_product(product_id).await?;
    info!(
      "Add to Cart Pipeline: Product {} found. Price: {}, Stock: {}",
      product.id, product.price_cents, product.stock
    );
    ctx_data.write().product = Some(product);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on_root("apply_add_to_cart", |ctx_data: ContextData<AddToCartCtxData>| async move {
    let mut guard = ctx_data.write();
    let product = guard
      .product
      .take()
      .ok_or_else(|| AppError::Internal("Product missing after fetch step.".to_string()))?;

    let mut cart = guard.session.read().cart().clone();
    cart.add(&product, guard.quantity)?;
    guard.working_cart = Some(cart);
    guard.product = Some(product);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on_root("commit_session_cart", commit_session_cart::<AddToCartCtxData>);

  registry.register_pipeline(p);
}

pub fn register_update_cart_line_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<UpdateCartLineCtxData, AppError>::new(&[
    ("refresh_stock_for_line", false),
    ("apply_cart_update", false),
    ("commit_session_cart", false),
  ]);

  // Zero or negative quantities remove the line, so there is nothing to validate up front.
  p.on_root("refresh_stock_for_line", |ctx_data: ContextData<UpdateCartLineCtxData>| async move {
    let (product_id, catalog) = {
      let guard = ctx_data.read();
      (guard.product_id, guard.app_state.catalog.clone())
    };

    match catalog.get_product(product_id).await {
      Ok(product) => {
        ctx_data.write().fresh_stock = Some(product.stock);
      }
      Err(ShopError::NotFound { .. }) => {
        warn!(
          "Update Cart Pipeline: Product {} no longer listed; validating against the cart snapshot.",
          product_id
        );
      }
      Err(e) => return Err(AppError::from(e)),
    }
    Ok(PipelineControl::Continue)
  });

  p.on_root("apply_cart_update", |ctx_data: ContextData<UpdateCartLineCtxData>| async move {
    let mut guard = ctx_data.write();
    let product_id = guard.product_id;

    let mut cart = guard.session.read().cart().clone();
    if let Some(stock) = guard.fresh_stock {
      if cart.line(product_id).is_some() {
        cart.refresh_stock_limit(product_id, stock)?;
      }
    }
    cart.update(product_id, guard.quantity)?;
    guard.working_cart = Some(cart);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on_root("commit_session_cart", commit_session_cart::<UpdateCartLineCtxData>);

  registry.register_pipeline(p);
}

pub fn register_remove_from_cart_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<RemoveFromCartCtxData, AppError>::new(&[
    ("apply_cart_removal", false),
    ("commit_session_cart", false),
  ]);

  p.on_root("apply_cart_removal", |ctx_data: ContextData<RemoveFromCartCtxData>| async move {
    let mut guard = ctx_data.write();
    let mut cart = guard.session.read().cart().clone();
    let removed = cart.remove(guard.product_id)?;
    info!("Remove from Cart Pipeline: Removed line for product {}.", removed.product_id);
    guard.removed_line = Some(removed);
    guard.working_cart = Some(cart);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on_root("commit_session_cart", commit_session_cart::<RemoveFromCartCtxData>);

  registry.register_pipeline(p);
}
