//! UseCase: session authorization.
//!
//! Gates every connection before it touches the room registry: only the
//! order's buyer or the gig's seller may join an order's chat.

use std::sync::Arc;

use crate::domain::{Order, OrderId, OrderStore, Principal};

use super::error::ConnectError;

/// Decides whether a principal may join an order's room. Pure read + decision,
/// no side effects.
pub struct SessionAuthorizer {
    orders: Arc<dyn OrderStore>,
}

impl SessionAuthorizer {
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    /// Authorize `principal` against `order_id`.
    ///
    /// Returns the order on success so the connection can keep it for the
    /// session's lifetime. Fails with `OrderNotFound` if the order does not
    /// exist and `Forbidden` if the principal is neither the buyer nor the
    /// gig's seller.
    pub async fn authorize(
        &self,
        principal: &Principal,
        order_id: OrderId,
    ) -> Result<Order, ConnectError> {
        let order = self
            .orders
            .get_order(order_id)
            .await?
            .ok_or(ConnectError::OrderNotFound)?;

        if !order.is_participant(principal.id) {
            return Err(ConnectError::Forbidden);
        }

        Ok(order)
    }
}
