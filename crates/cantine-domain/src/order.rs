//! Order fulfilment status and its transition rules.

use serde::{Deserialize, Serialize};

/// Order fulfilment status.
///
/// Wire format: `u8`, stored as `i16` in the orders table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending = 0,
    Confirmed = 1,
    Ready = 2,
    Delivered = 3,
    Cancelled = 4,
}

impl OrderStatus {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Pending),
            1 => Some(Self::Confirmed),
            2 => Some(Self::Ready),
            3 => Some(Self::Delivered),
            4 => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Position on the pending → confirmed → ready → delivered chain.
    /// `None` for cancelled, which sits outside the chain.
    fn rank(self) -> Option<u8> {
        match self {
            Self::Cancelled => None,
            other => Some(other.as_u8()),
        }
    }

    /// Whether a staff status change from `self` to `to` is allowed:
    /// strictly forward on the fulfilment chain (skips permitted), or any
    /// non-cancelled status to cancelled. Never out of cancelled.
    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        match (self.rank(), to.rank()) {
            (Some(_), None) => true,
            (Some(from), Some(to)) => to > from,
            (None, _) => false,
        }
    }

    /// The user received (or will receive) the dish: the statuses that make
    /// an order count for review eligibility.
    pub fn is_received(self) -> bool {
        matches!(self, Self::Confirmed | Self::Ready | Self::Delivered)
    }

    /// The user may still change the dish on this order.
    pub fn is_modifiable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}
