//! The payment facade.

use std::sync::Arc;

use tappay_crypto::{short_address, validate_address, GeneratedWallet, WalletFactory};
use tappay_gateway::ChainGateway;
use tappay_protocol::{codec, PayloadGeneration};
use tappay_transport::TagTransport;
use tappay_types::{
    parse_positive_amount, Address, PaymentRequest, TransactionRecord, TxHash, ValidationError,
};
use tappay_utils::{Clock, SystemClock};

use crate::{ClientConfig, ClientError};

/// The outcome of the receive flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub request: PaymentRequest,
    pub generation: PayloadGeneration,
    pub hash: TxHash,
}

/// Entry point for app screens: one per process, built explicitly.
pub struct PaymentClient {
    transport: TagTransport,
    gateway: Arc<dyn ChainGateway>,
    wallet_factory: WalletFactory,
    clock: Arc<dyn Clock>,
}

impl PaymentClient {
    pub fn new(transport: TagTransport, gateway: Arc<dyn ChainGateway>) -> Self {
        Self {
            transport,
            gateway,
            wallet_factory: WalletFactory::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Build every collaborator from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let client = Self::new(config.build_transport(), config.build_gateway()?)
            .with_wallet_factory(config.wallet_factory.factory());
        tracing::info!(
            network = config.network.as_str(),
            gateway = client.gateway.name(),
            wallet_factory = client.wallet_factory.as_str(),
            "payment client ready"
        );
        Ok(client)
    }

    pub fn with_wallet_factory(mut self, factory: WalletFactory) -> Self {
        self.wallet_factory = factory;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn transport(&self) -> &TagTransport {
        &self.transport
    }

    pub fn gateway(&self) -> &dyn ChainGateway {
        self.gateway.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn validate_address(&self, address: &str) -> bool {
        validate_address(address)
    }

    pub fn generate_wallet(&self) -> GeneratedWallet {
        let wallet = self.wallet_factory.generate();
        tracing::info!(
            address = %short_address(wallet.address.as_str()),
            can_sign = wallet.can_sign(),
            "wallet generated"
        );
        wallet
    }

    pub async fn send_payment(&self, recipient: &str, amount: &str) -> Result<TxHash, ClientError> {
        Ok(self.gateway.submit(recipient, amount).await?)
    }

    pub async fn get_balance(&self, address: &str) -> Result<String, ClientError> {
        Ok(self.gateway.balance_of(address).await?)
    }

    pub async fn get_transaction_history(&self) -> Result<Vec<TransactionRecord>, ClientError> {
        Ok(self.gateway.transaction_history().await?)
    }

    /// Bring NFC up. `Ok(false)` when the device has none or it is off.
    pub async fn initialize_nfc(&self) -> Result<bool, ClientError> {
        Ok(self.transport.initialize().await?)
    }

    /// Encode `{recipient, amount}` stamped with the current time and write
    /// it to a tag. No validation; see [`PaymentClient::compose_and_write`].
    pub async fn write_nfc_data(&self, recipient: &str, amount: &str) -> Result<(), ClientError> {
        let bytes = codec::encode_at(recipient, amount, self.clock.now())?;
        self.transport.write(&bytes).await?;
        Ok(())
    }

    /// Read a tag. `Ok(None)` when it does not hold a payment request.
    pub async fn read_nfc_data(&self) -> Result<Option<PaymentRequest>, ClientError> {
        Ok(self.transport.read().await?.into_request())
    }

    pub async fn cleanup_nfc(&self) {
        self.transport.cleanup().await;
    }

    /// Send flow: validate the request, make sure NFC is up, write the tag.
    pub async fn compose_and_write(
        &self,
        recipient: &str,
        amount: &str,
    ) -> Result<PaymentRequest, ClientError> {
        if recipient.is_empty() {
            return Err(ValidationError::Missing("recipient").into());
        }
        let to = Address::parse(recipient)?;
        parse_positive_amount(amount)?;

        if !self.transport.is_initialized() && !self.transport.initialize().await? {
            return Err(ClientError::NfcUnavailable);
        }

        let request = PaymentRequest::new(recipient, amount).with_timestamp(self.clock.now());
        let bytes = codec::encode_request(&request)?;
        self.transport.write(&bytes).await?;
        tracing::info!(recipient = %short_address(to.as_str()), amount, "payment request written to tag");
        Ok(request)
    }

    /// Receive flow: read a tag and submit the payment it carries.
    pub async fn read_and_submit(&self) -> Result<Receipt, ClientError> {
        let outcome = self.transport.read().await?;
        let generation = outcome.generation().ok_or(ClientError::UnrecognizedPayload)?;
        let request = outcome.into_request().ok_or(ClientError::UnrecognizedPayload)?;

        tracing::info!(
            recipient = %short_address(&request.recipient),
            amount = %request.amount,
            ?generation,
            "payment request read from tag"
        );
        let hash = self
            .gateway
            .submit(&request.recipient, &request.amount)
            .await?;
        Ok(Receipt {
            request,
            generation,
            hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tappay_gateway::MockGateway;

    #[tokio::test]
    async fn compose_rejects_bad_input_before_touching_nfc() {
        let client = PaymentClient::new(TagTransport::unsupported(), Arc::new(MockGateway::instant()));

        let err = client.compose_and_write("", "1").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ValidationError::Missing("recipient"))));

        let err = client.compose_and_write("0x12", "1").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ValidationError::InvalidAddress(_))));

        let err = client
            .compose_and_write("0x1234567890123456789012345678901234567890", "0")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(ValidationError::NonPositiveAmount)));
    }

    #[tokio::test]
    async fn compose_without_nfc_is_unavailable() {
        let client = PaymentClient::new(TagTransport::unsupported(), Arc::new(MockGateway::instant()));
        let err = client
            .compose_and_write("0x1234567890123456789012345678901234567890", "1")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NfcUnavailable));
        assert!(!err.is_retryable());
    }

    #[test]
    fn wallet_factory_is_configurable() {
        let client = PaymentClient::new(TagTransport::unsupported(), Arc::new(MockGateway::instant()))
            .with_wallet_factory(WalletFactory::Placeholder);
        let wallet = client.generate_wallet();
        assert!(!wallet.can_sign());
        assert!(client.validate_address(wallet.address.as_str()));
    }
}
