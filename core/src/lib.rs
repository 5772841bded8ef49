// src/lib.rs

//! Marivor core: the typed heart of a fish-and-vegetable storefront.
//!
//!  - `cart`: session-scoped line items whose totals are recomputed on every change.
//!  - `order`: orders snapshotted from a cart, split per seller, and the
//!    allow-listed status workflow they move through.
//!  - `catalog` / `store`: the Product Lookup and Order Store collaborators,
//!    with in-memory implementations.
//!  - `session`: the per-session context that owns a cart.
//!  - A small async step pipeline (`Pipeline`, `Registry`) the application uses
//!    to run "read collaborators, apply pure logic, write back" as named steps.

pub mod cart;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod order;
pub mod pipeline;
pub mod registry;
pub mod session;
pub mod store;
pub mod workflow;

// --- Re-exports for the Public API ---

pub use crate::workflow::context_data::ContextData;
pub use crate::workflow::control::{PipelineControl, PipelineResult};
pub use crate::workflow::step::{Handler, StepDef};
pub use crate::pipeline::definition::Pipeline;
pub use crate::registry::Registry;

pub use crate::cart::{Cart, CartLine};
pub use crate::catalog::{
  featured_products, Category, InMemoryCatalog, Product, ProductChanges, ProductDraft, ProductId, ProductLookup,
  ProductStore, SellerId,
};
pub use crate::dashboard::DashboardStats;
pub use crate::money::{format_minor_units, parse_minor_units};
pub use crate::error::{ShopError, ShopResult, WorkflowError, WorkflowResult};
pub use crate::order::{orders_from_cart, transition, Order, OrderId, OrderStatus, UserId};
pub use crate::session::{SessionContext, SessionHandle, SessionStore};
pub use crate::store::{InMemoryOrderStore, OrderStore};
