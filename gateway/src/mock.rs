//! Mock gateway: canned answers after a delay.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tappay_crypto::short_address;
use tappay_types::{parse_positive_amount, Address, BaseUnits, TransactionRecord, TxHash};

use crate::{demo_history, ChainGateway, GatewayError};

/// Balance every address reports.
pub const MOCK_BALANCE: &str = "10.5";

/// A gateway that never touches the network.
///
/// Inputs are validated exactly as the live gateway validates them, so the
/// flows behave the same apart from what reaches the chain.
pub struct MockGateway {
    submit_delay: Duration,
    history_delay: Duration,
    fixed_hash: Option<TxHash>,
    balance: String,
    submissions: Mutex<Vec<(Address, BaseUnits)>>,
}

impl MockGateway {
    pub fn new(submit_delay: Duration, history_delay: Duration) -> Self {
        Self {
            submit_delay,
            history_delay,
            fixed_hash: None,
            balance: MOCK_BALANCE.to_string(),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// No delays, for tests.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Return `hash` from every submission instead of a random one.
    pub fn with_fixed_hash(mut self, hash: TxHash) -> Self {
        self.fixed_hash = Some(hash);
        self
    }

    pub fn with_balance(mut self, balance: impl Into<String>) -> Self {
        self.balance = balance.into();
        self
    }

    /// Payments accepted so far, oldest first.
    pub fn submissions(&self) -> Vec<(Address, BaseUnits)> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000), Duration::from_millis(1000))
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl ChainGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn submit(&self, recipient: &str, amount: &str) -> Result<TxHash, GatewayError> {
        let to = Address::parse(recipient)?;
        let units = parse_positive_amount(amount)?;
        pause(self.submit_delay).await;

        let hash = self
            .fixed_hash
            .unwrap_or_else(|| TxHash::new(rand::random()));
        tracing::info!(to = %short_address(to.as_str()), amount = %units, %hash, "mock payment submitted");
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((to, units));
        Ok(hash)
    }

    async fn balance_of(&self, address: &str) -> Result<String, GatewayError> {
        Address::parse(address)?;
        Ok(self.balance.clone())
    }

    async fn transaction_history(&self) -> Result<Vec<TransactionRecord>, GatewayError> {
        pause(self.history_delay).await;
        Ok(demo_history()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tappay_types::to_base_units;

    const RECIPIENT: &str = "0x1234567890123456789012345678901234567890";

    #[tokio::test]
    async fn random_hashes_differ() {
        let gateway = MockGateway::instant();
        let a = gateway.submit(RECIPIENT, "1").await.unwrap();
        let b = gateway.submit(RECIPIENT, "1").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 66);
        assert_eq!(gateway.submissions().len(), 2);
    }

    #[tokio::test]
    async fn fixed_hash_and_recorded_amount() {
        let hash = TxHash::new([0xab; 32]);
        let gateway = MockGateway::instant().with_fixed_hash(hash);
        assert_eq!(gateway.submit(RECIPIENT, "2.5").await.unwrap(), hash);
        let (to, units) = gateway.submissions().remove(0);
        assert_eq!(to.as_str(), RECIPIENT);
        assert_eq!(units, to_base_units("2.5").unwrap());
    }

    #[tokio::test]
    async fn rejects_invalid_input() {
        let gateway = MockGateway::instant();
        assert!(matches!(
            gateway.submit("0xnope", "1").await,
            Err(GatewayError::Validation(_))
        ));
        assert!(matches!(
            gateway.submit(RECIPIENT, "-1").await,
            Err(GatewayError::Validation(_))
        ));
        assert!(gateway.submissions().is_empty());
    }

    #[tokio::test]
    async fn canned_balance() {
        let gateway = MockGateway::instant();
        assert_eq!(gateway.balance_of(RECIPIENT).await.unwrap(), "10.5");
        let gateway = MockGateway::instant().with_balance("3");
        assert_eq!(gateway.balance_of(RECIPIENT).await.unwrap(), "3");
    }

    #[tokio::test(start_paused = true)]
    async fn delays_are_honoured() {
        let gateway = MockGateway::default();
        let started = tokio::time::Instant::now();
        gateway.submit(RECIPIENT, "1").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));

        let started = tokio::time::Instant::now();
        assert_eq!(gateway.transaction_history().await.unwrap().len(), 5);
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }
}
