//! # Order Lifecycle
//!
//! The status state machine of a placed order.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Order Lifecycle                                 │
//! │                                                                         │
//! │  PENDING ──approve (admin)──────────► APPROVED                          │
//! │     │                                    │                              │
//! │     ├──reject + reason (admin)──► REJECTED                              │
//! │     │                                    │                              │
//! │     ├──cancel (customer)────────► CANCELLED ◄──cancel (customer)        │
//! │     │                                    │                              │
//! │     └──deliver (admin)──────────► DELIVERED ◄──deliver (admin)          │
//! │                                                                         │
//! │  Terminal: REJECTED, CANCELLED, DELIVERED                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checks run before any request leaves the client. A refused change leaves
//! the order untouched.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Order, OrderStatus};

/// Who is asking for the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    Customer,
    Admin,
}

impl Actor {
    /// Maps the session's admin flag to an actor.
    pub fn from_is_admin(is_admin: bool) -> Self {
        if is_admin {
            Actor::Admin
        } else {
            Actor::Customer
        }
    }
}

/// A requested status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Approve,
    Reject { reason: String },
    Cancel,
    Deliver,
}

impl StatusChange {
    /// The status the order ends up in.
    pub fn target(&self) -> OrderStatus {
        match self {
            StatusChange::Approve => OrderStatus::Approved,
            StatusChange::Reject { .. } => OrderStatus::Rejected,
            StatusChange::Cancel => OrderStatus::Cancelled,
            StatusChange::Deliver => OrderStatus::Delivered,
        }
    }

    /// Trimmed rejection reason, if this is a rejection.
    pub fn reason(&self) -> Option<&str> {
        match self {
            StatusChange::Reject { reason } => Some(reason.trim()),
            _ => None,
        }
    }
}

impl OrderStatus {
    /// No further transitions out of this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Rejected | OrderStatus::Cancelled | OrderStatus::Delivered
        )
    }

    /// Whether the customer's cancel button is enabled.
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether the admin approve/reject buttons are enabled.
    pub fn can_review(&self) -> bool {
        *self == OrderStatus::Pending
    }

    /// Whether the admin deliver button is enabled.
    pub fn can_deliver(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Approved)
    }
}

/// Checks that `actor` may apply `change` to an order in status `from`.
pub fn check_transition(
    order_id: &str,
    from: OrderStatus,
    change: &StatusChange,
    actor: Actor,
) -> CoreResult<()> {
    let to = change.target();

    // privilege is checked before status
    if matches!(
        change,
        StatusChange::Approve | StatusChange::Reject { .. } | StatusChange::Deliver
    ) && actor != Actor::Admin
    {
        return Err(CoreError::NotPermitted(to));
    }

    if let Some(reason) = change.reason() {
        if reason.is_empty() {
            return Err(ValidationError::required("reason").into());
        }
    }

    let allowed = match change {
        StatusChange::Approve | StatusChange::Reject { .. } => from.can_review(),
        StatusChange::Cancel => from.can_cancel(),
        StatusChange::Deliver => from.can_deliver(),
    };

    if !allowed {
        return Err(CoreError::InvalidTransition {
            order_id: order_id.to_string(),
            from,
            to,
        });
    }

    Ok(())
}

impl Order {
    /// Validates `change` against this order without modifying it.
    pub fn check(&self, change: &StatusChange, actor: Actor) -> CoreResult<()> {
        check_transition(&self.id, self.status, change, actor)
    }

    /// Applies `change` locally after a successful backend update.
    ///
    /// The rejection reason is stored only on rejection and cleared
    /// otherwise.
    pub fn apply(&mut self, change: &StatusChange, actor: Actor) -> CoreResult<()> {
        self.check(change, actor)?;

        self.status = change.target();
        self.reject_reason = change.reason().map(str::to_string);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::ShippingAddress;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: "o1".to_string(),
            order_items: Vec::new(),
            shipping_address: ShippingAddress::default(),
            payment_method: "Cash".to_string(),
            items_price: Money::from_cents(4000),
            shipping_price: Money::from_cents(1000),
            discount_price: Money::from_cents(400),
            total_price: Money::from_cents(4600),
            user: None,
            status,
            reject_reason: None,
            created_at: None,
        }
    }

    fn reject(reason: &str) -> StatusChange {
        StatusChange::Reject {
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_admin_approves_pending() {
        let mut o = order(OrderStatus::Pending);
        o.apply(&StatusChange::Approve, Actor::Admin).unwrap();
        assert_eq!(o.status, OrderStatus::Approved);
        assert_eq!(o.reject_reason(), None);
    }

    #[test]
    fn test_customer_cannot_approve_or_reject() {
        let o = order(OrderStatus::Pending);
        assert!(matches!(
            o.check(&StatusChange::Approve, Actor::Customer),
            Err(CoreError::NotPermitted(OrderStatus::Approved))
        ));
        assert!(matches!(
            o.check(&reject("bad"), Actor::Customer),
            Err(CoreError::NotPermitted(OrderStatus::Rejected))
        ));
    }

    #[test]
    fn test_reject_requires_reason() {
        let mut o = order(OrderStatus::Pending);

        let err = o.apply(&reject("   "), Actor::Admin).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(o.status, OrderStatus::Pending);

        o.apply(&reject(" Missing prescription "), Actor::Admin).unwrap();
        assert_eq!(o.status, OrderStatus::Rejected);
        assert_eq!(o.reject_reason(), Some("Missing prescription"));
    }

    #[test]
    fn test_cancel_only_before_terminal() {
        for status in [OrderStatus::Pending, OrderStatus::Approved] {
            let mut o = order(status);
            o.apply(&StatusChange::Cancel, Actor::Customer).unwrap();
            assert_eq!(o.status, OrderStatus::Cancelled);
        }

        for status in [
            OrderStatus::Delivered,
            OrderStatus::Rejected,
            OrderStatus::Cancelled,
        ] {
            assert!(!status.can_cancel());
            let err = order(status)
                .check(&StatusChange::Cancel, Actor::Customer)
                .unwrap_err();
            assert!(matches!(err, CoreError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn test_deliver_from_approved() {
        let mut o = order(OrderStatus::Approved);
        o.apply(&StatusChange::Deliver, Actor::Admin).unwrap();
        assert_eq!(o.status, OrderStatus::Delivered);

        assert!(o.check(&StatusChange::Deliver, Actor::Admin).is_err());
    }

    #[test]
    fn test_approved_cannot_be_reviewed_again() {
        let o = order(OrderStatus::Approved);
        assert!(matches!(
            o.check(&reject("late"), Actor::Admin),
            Err(CoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_actor_from_flag() {
        assert_eq!(Actor::from_is_admin(true), Actor::Admin);
        assert_eq!(Actor::from_is_admin(false), Actor::Customer);
    }
}
