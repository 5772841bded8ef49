// storefront/src/pipelines/contexts.rs

//! Data carried through each pipeline run.
//! Handlers receive these wrapped in `marivor_core::ContextData`.
//!
//! Cart pipelines work on a copy of the session cart (`working_cart`) and only
//! write it back in their last step, so a failed run leaves the session as it was.

use crate::state::AppState;
use marivor_core::{Cart, CartLine, Order, OrderId, OrderStatus, Product, ProductId, SessionHandle};

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub app_state: AppState,
  pub session: SessionHandle,
  pub product_id: ProductId,
  pub quantity: i64,
  pub product: Option<Product>,
  pub working_cart: Option<Cart>,
}

#[derive(Clone)]
pub struct UpdateCartLineCtxData {
  pub app_state: AppState,
  pub session: SessionHandle,
  pub product_id: ProductId,
  pub quantity: i64,
  /// Current stock, when the product is still listed.
  pub fresh_stock: Option<u32>,
  pub working_cart: Option<Cart>,
}

#[derive(Clone)]
pub struct RemoveFromCartCtxData {
  pub app_state: AppState,
  pub session: SessionHandle,
  pub product_id: ProductId,
  pub removed_line: Option<CartLine>,
  pub working_cart: Option<Cart>,
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub session: SessionHandle,
  pub pending_orders: Vec<Order>,
  pub placed_orders: Vec<Order>,
}

#[derive(Clone)]
pub struct UpdateOrderStatusCtxData {
  pub app_state: AppState,
  pub order_id: OrderId,
  pub requested_status: OrderStatus,
  pub order: Option<Order>,
  pub previous_status: Option<OrderStatus>,
}

/// Contexts whose pipelines end by committing a working cart to the session.
pub trait WorkingCart {
  fn session(&self) -> &SessionHandle;
  fn take_working_cart(&mut self) -> Option<Cart>;
}

macro_rules! impl_working_cart {
  ($($ctx:ty),+) => {
    $(impl WorkingCart for $ctx {
      fn session(&self) -> &SessionHandle {
        &self.session
      }

      fn take_working_cart(&mut self) -> Option<Cart> {
        self.working_cart.take()
      }
    })+
  };
}

impl_working_cart!(AddToCartCtxData, UpdateCartLineCtxData, RemoveFromCartCtxData);

impl AddToCartCtxData {
  pub fn new(app_state: AppState, session: SessionHandle, product_id: ProductId, quantity: i64) -> Self {
    Self {
      app_state,
      session,
      product_id,
      quantity,
      product: None,
      working_cart: None,
    }
  }
}

impl UpdateCartLineCtxData {
  pub fn new(app_state: AppState, session: SessionHandle, product_id: ProductId, quantity: i64) -> Self {
    Self {
      app_state,
      session,
      product_id,
      quantity,
      fresh_stock: None,
      working_cart: None,
    }
  }
}

impl RemoveFromCartCtxData {
  pub fn new(app_state: AppState, session: SessionHandle, product_id: ProductId) -> Self {
    Self {
      app_state,
      session,
      product_id,
      removed_line: None,
      working_cart: None,
    }
  }
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, session: SessionHandle) -> Self {
    Self {
      app_state,
      session,
      pending_orders: Vec::new(),
      placed_orders: Vec::new(),
    }
  }
}

impl UpdateOrderStatusCtxData {
  pub fn new(app_state: AppState, order_id: OrderId, requested_status: OrderStatus) -> Self {
    Self {
      app_state,
      order_id,
      requested_status,
      order: None,
      previous_status: None,
    }
  }
}
