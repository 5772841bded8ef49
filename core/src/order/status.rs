// core/src/order/status.rs

//! The Order Status Machine.

use crate::error::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  Pending,
  // Older rows still carry `processed` and `shipped`.
  #[serde(alias = "processed")]
  Processing,
  #[serde(alias = "shipped")]
  OnDelivery,
  Completed,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Processing,
    OrderStatus::OnDelivery,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
  ];

  /// Statuses reachable in one step from `self`.
  pub fn allowed_transitions(self) -> &'static [OrderStatus] {
    match self {
      OrderStatus::Pending => &[OrderStatus::Processing, OrderStatus::Cancelled],
      OrderStatus::Processing => &[OrderStatus::OnDelivery, OrderStatus::Cancelled],
      OrderStatus::OnDelivery => &[OrderStatus::Completed, OrderStatus::Cancelled],
      OrderStatus::Completed | OrderStatus::Cancelled => &[],
    }
  }

  pub fn can_transition_to(self, next: OrderStatus) -> bool {
    self.allowed_transitions().contains(&next)
  }

  pub fn is_terminal(self) -> bool {
    self.allowed_transitions().is_empty()
  }

  /// Checks a change from `self` to `next` without applying it.
  pub fn validate_transition(self, next: OrderStatus) -> ShopResult<()> {
    if self == next {
      return Err(ShopError::SameStatus { status: self });
    }
    if !self.can_transition_to(next) {
      return Err(ShopError::IllegalTransition { from: self, to: next });
    }
    Ok(())
  }

  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Processing => "processing",
      OrderStatus::OnDelivery => "on_delivery",
      OrderStatus::Completed => "completed",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = ShopError;

  /// Case-insensitive. `processed` and `shipped` are older names still sent by some clients.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "pending" => Ok(OrderStatus::Pending),
      "processing" | "processed" => Ok(OrderStatus::Processing),
      "on_delivery" | "shipped" => Ok(OrderStatus::OnDelivery),
      "completed" => Ok(OrderStatus::Completed),
      "cancelled" => Ok(OrderStatus::Cancelled),
      _ => Err(ShopError::UnknownStatus(s.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn terminal_states_have_no_outgoing_transitions() {
    let terminal: Vec<_> = OrderStatus::ALL.iter().copied().filter(|s| s.is_terminal()).collect();
    assert_eq!(terminal, vec![OrderStatus::Completed, OrderStatus::Cancelled]);
  }

  #[test]
  fn display_and_parse_agree() {
    for status in OrderStatus::ALL {
      assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
    }
  }

  #[test]
  fn legacy_names_parse_to_current_statuses() {
    assert_eq!("Processed".parse::<OrderStatus>().unwrap(), OrderStatus::Processing);
    assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::OnDelivery);
    assert!(matches!(
      "lost".parse::<OrderStatus>(),
      Err(ShopError::UnknownStatus(s)) if s == "lost"
    ));
  }
}
