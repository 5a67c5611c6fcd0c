use crate::db_types::OrderStatusType;

/// The outcome of asking for an order to move to a new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// The order is already in the requested status. Nothing is written.
    NoOp,
    Apply { from: OrderStatusType, to: OrderStatusType },
}

impl StatusTransition {
    /// Decides what a status change request amounts to.
    ///
    /// The machine is permissive: any status may move to any other status. Administrative moves to `PAID` are allowed
    /// here, but they do not settle the order. Only a payment confirmation sets `paid`, `paid_at` and the receipt.
    pub fn evaluate(current: OrderStatusType, requested: OrderStatusType) -> Self {
        if current == requested {
            StatusTransition::NoOp
        } else {
            StatusTransition::Apply { from: current, to: requested }
        }
    }
}
