//! The chain gateway interface.

use async_trait::async_trait;
use tappay_types::{TransactionRecord, TxHash};

use crate::GatewayError;

/// Submits payments and answers account queries.
///
/// `recipient` and `amount` arrive as the strings read off a tag; every
/// implementation validates them before doing anything else.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Short label for logs (`live`, `mock`).
    fn name(&self) -> &'static str;

    /// Pay `amount` (decimal, whole tokens) to `recipient`.
    async fn submit(&self, recipient: &str, amount: &str) -> Result<TxHash, GatewayError>;

    /// Token balance of `address` as a decimal string.
    async fn balance_of(&self, address: &str) -> Result<String, GatewayError>;

    /// Recent transactions, newest first.
    async fn transaction_history(&self) -> Result<Vec<TransactionRecord>, GatewayError>;
}
