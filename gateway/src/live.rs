//! Live gateway: signed contract calls over JSON-RPC.

use async_trait::async_trait;
use tappay_crypto::short_address;
use tappay_types::{
    from_base_units, parse_positive_amount, Address, BaseUnits, PrivateKey, TransactionRecord,
    TxHash,
};

use crate::tx::{contract_call, TxSigner};
use crate::{abi, demo_history, ChainGateway, GatewayError, RpcClient};

/// Gas limit for `sendPayment`.
pub const DEFAULT_GAS_LIMIT: u64 = 200_000;

/// 1 gwei.
pub const DEFAULT_GAS_PRICE_WEI: u128 = 1_000_000_000;

/// Everything a [`LiveGateway`] needs to reach the network.
pub struct LiveSettings {
    pub rpc_url: String,
    pub chain_id: u64,
    pub payment_contract: Address,
    pub token_contract: Address,
    /// Key that signs submissions. Without one, `submit` fails with
    /// [`GatewayError::NotConfigured`]; balance queries still work.
    pub signer: Option<PrivateKey>,
    pub gas_limit: u64,
    pub gas_price_wei: u128,
}

pub struct LiveGateway {
    rpc: RpcClient,
    chain_id: u64,
    payment_contract: Address,
    token_contract: Address,
    signer: Option<TxSigner>,
    gas_limit: u64,
    gas_price_wei: u128,
}

impl LiveGateway {
    pub fn new(settings: LiveSettings) -> Result<Self, GatewayError> {
        let rpc = RpcClient::new(settings.rpc_url)?;
        let signer = settings.signer.as_ref().map(TxSigner::new).transpose()?;
        let sender = signer
            .as_ref()
            .map(|s| short_address(s.address().as_str()))
            .unwrap_or_else(|| "none".to_string());
        tracing::info!(
            url = rpc.url(),
            chain_id = settings.chain_id,
            %sender,
            "live gateway ready"
        );
        Ok(Self {
            rpc,
            chain_id: settings.chain_id,
            payment_contract: settings.payment_contract,
            token_contract: settings.token_contract,
            signer,
            gas_limit: settings.gas_limit,
            gas_price_wei: settings.gas_price_wei,
        })
    }

    /// Address payments are sent from, if a signing key is configured.
    pub fn sender(&self) -> Option<&Address> {
        self.signer.as_ref().map(TxSigner::address)
    }

    async fn send_payment(
        &self,
        signer: &TxSigner,
        to: &Address,
        amount: BaseUnits,
    ) -> Result<TxHash, GatewayError> {
        let nonce = self.rpc.pending_nonce(signer.address()).await?;
        let tx = contract_call(
            self.chain_id,
            nonce,
            self.gas_price_wei,
            self.gas_limit,
            &self.payment_contract,
            abi::encode_send_payment(to, amount),
        );
        let signed = signer.sign_legacy(tx)?;
        let hash = self.rpc.send_raw_transaction(&signed.raw_hex()).await?;
        if hash != signed.hash {
            tracing::warn!(node = %hash, local = %signed.hash, "node reported a different tx hash");
        }
        Ok(hash)
    }

    async fn query_balance(&self, owner: &Address) -> Result<BaseUnits, GatewayError> {
        let data = self
            .rpc
            .eth_call(&self.token_contract, &abi::encode_balance_of(owner))
            .await?;
        abi::decode_balance(&data)
    }
}

#[async_trait]
impl ChainGateway for LiveGateway {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn submit(&self, recipient: &str, amount: &str) -> Result<TxHash, GatewayError> {
        let to = Address::parse(recipient)?;
        let units = parse_positive_amount(amount)?;
        let signer = self
            .signer
            .as_ref()
            .ok_or(GatewayError::NotConfigured("signing key"))?;

        match self.send_payment(signer, &to, units).await {
            Ok(hash) => {
                tracing::info!(to = %short_address(to.as_str()), amount = %units, %hash, "payment submitted");
                Ok(hash)
            }
            Err(e) => {
                tracing::error!(to = %short_address(to.as_str()), error = %e, "payment submission failed");
                Err(GatewayError::Submission)
            }
        }
    }

    async fn balance_of(&self, address: &str) -> Result<String, GatewayError> {
        let owner = Address::parse(address)?;
        match self.query_balance(&owner).await {
            Ok(units) => Ok(from_base_units(units)),
            Err(e) => {
                tracing::error!(owner = %short_address(owner.as_str()), error = %e, "balance query failed");
                Err(GatewayError::Balance)
            }
        }
    }

    async fn transaction_history(&self) -> Result<Vec<TransactionRecord>, GatewayError> {
        Ok(demo_history()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tappay_types::ValidationError;

    const CONTRACT: &str = "0x1234567890123456789012345678901234567890";

    fn settings(signer: Option<PrivateKey>) -> LiveSettings {
        LiveSettings {
            // Nothing listens here; tests below never reach the network.
            rpc_url: "http://127.0.0.1:1".into(),
            chain_id: 44787,
            payment_contract: Address::parse(CONTRACT).unwrap(),
            token_contract: Address::parse(CONTRACT).unwrap(),
            signer,
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price_wei: DEFAULT_GAS_PRICE_WEI,
        }
    }

    #[test]
    fn sender_is_derived_from_key() {
        let key = PrivateKey::from_hex(&"46".repeat(32)).unwrap();
        let gateway = LiveGateway::new(settings(Some(key))).unwrap();
        assert_eq!(
            gateway.sender().unwrap().as_str(),
            "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"
        );
    }

    #[tokio::test]
    async fn validation_happens_before_any_network_call() {
        let key = PrivateKey::from_hex(&"46".repeat(32)).unwrap();
        let gateway = LiveGateway::new(settings(Some(key))).unwrap();

        let err = gateway.submit("0x123", "1").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Validation(ValidationError::InvalidAddress(_))
        ));
        let err = gateway.submit(CONTRACT, "0").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Validation(ValidationError::NonPositiveAmount)
        ));
        assert!(matches!(
            gateway.balance_of("nope").await,
            Err(GatewayError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn submit_without_key_is_not_configured() {
        let gateway = LiveGateway::new(settings(None)).unwrap();
        assert!(gateway.sender().is_none());
        assert!(matches!(
            gateway.submit(CONTRACT, "1").await,
            Err(GatewayError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_generic_submission_error() {
        let key = PrivateKey::from_hex(&"46".repeat(32)).unwrap();
        let gateway = LiveGateway::new(settings(Some(key))).unwrap();
        let err = gateway.submit(CONTRACT, "1").await.unwrap_err();
        assert!(matches!(err, GatewayError::Submission));
        assert_eq!(err.to_string(), "failed to send payment");
        assert!(matches!(
            gateway.balance_of(CONTRACT).await,
            Err(GatewayError::Balance)
        ));
    }

    #[tokio::test]
    async fn history_is_the_demo_set() {
        let gateway = LiveGateway::new(settings(None)).unwrap();
        assert_eq!(
            gateway.transaction_history().await.unwrap(),
            demo_history().unwrap()
        );
    }
}
