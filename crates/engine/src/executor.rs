use std::sync::Arc;

use tracing::{error, info};

use common::{BrokerSession, OrderRequest, TradeOutcome};

/// Places risk-approved orders with the broker and waits for their result.
///
/// This is the ONLY component that calls `BrokerSession::place_order`.
/// Broker failures stop here: they are logged and reported as `None` so the
/// caller never mistakes a failed attempt for a win or a loss.
pub struct TradeExecutor {
    session: Arc<dyn BrokerSession>,
}

impl TradeExecutor {
    pub fn new(session: Arc<dyn BrokerSession>) -> Self {
        Self { session }
    }

    /// Place `order` and block until it resolves.
    pub async fn execute(&self, order: &OrderRequest) -> Option<TradeOutcome> {
        info!(
            symbol = %order.symbol,
            direction = %order.direction,
            stake = order.stake,
            expiry = ?order.expiry,
            "Placing order"
        );

        let handle = match self.session.place_order(order).await {
            Ok(handle) => handle,
            Err(e) => {
                error!(symbol = %order.symbol, error = %e, "Order placement failed");
                return None;
            }
        };

        match self.session.await_outcome(&handle).await {
            Ok(outcome) => {
                info!(
                    handle = %handle,
                    result = %outcome.result,
                    payout = outcome.payout,
                    "Order resolved"
                );
                Some(outcome)
            }
            Err(e) => {
                error!(handle = %handle, error = %e, "Failed to retrieve order outcome");
                None
            }
        }
    }
}
