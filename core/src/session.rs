// core/src/session.rs

//! Per-session state. Each session owns exactly one cart.

use crate::cart::Cart;
use crate::workflow::context_data::ContextData;
use crate::order::UserId;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
  pub session_id: Uuid,
  pub user_id: Option<UserId>,
  cart: Cart,
}

impl SessionContext {
  pub fn new(session_id: Uuid) -> Self {
    Self {
      session_id,
      user_id: None,
      cart: Cart::new(),
    }
  }

  pub fn cart(&self) -> &Cart {
    &self.cart
  }

  /// Replaces the session cart with one produced by a successful operation.
  pub fn commit_cart(&mut self, cart: Cart) {
    self.cart = cart;
  }

  /// Number of distinct lines, as shown next to the cart icon.
  pub fn cart_count(&self) -> usize {
    self.cart.lines().len()
  }
}

pub type SessionHandle = ContextData<SessionContext>;

/// Live sessions keyed by id.
///
/// There is no cross-request locking beyond the per-session `RwLock`: two
/// requests on one session that both copy the cart out race, and the later
/// commit wins.
#[derive(Debug, Default)]
pub struct SessionStore {
  sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Starts a fresh session with an empty cart.
  pub fn open(&self) -> (Uuid, SessionHandle) {
    let session_id = Uuid::new_v4();
    let handle = SessionHandle::new(SessionContext::new(session_id));
    self.sessions.write().insert(session_id, handle.clone());
    debug!(%session_id, "Session opened.");
    (session_id, handle)
  }

  pub fn get(&self, session_id: Uuid) -> Option<SessionHandle> {
    self.sessions.read().get(&session_id).cloned()
  }

  /// Returns the session, creating it under the given id if it is not live yet.
  pub fn get_or_create(&self, session_id: Uuid) -> SessionHandle {
    if let Some(handle) = self.get(session_id) {
      return handle;
    }
    self
      .sessions
      .write()
      .entry(session_id)
      .or_insert_with(|| SessionHandle::new(SessionContext::new(session_id)))
      .clone()
  }

  pub fn end(&self, session_id: Uuid) -> Option<SessionHandle> {
    let removed = self.sessions.write().remove(&session_id);
    if removed.is_some() {
      debug!(%session_id, "Session ended.");
    }
    removed
  }

  pub fn len(&self) -> usize {
    self.sessions.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.sessions.read().is_empty()
  }
}
