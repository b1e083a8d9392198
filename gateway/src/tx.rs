//! Legacy (pre-EIP-1559) transactions with EIP-155 replay protection.

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Bytes, TxKind, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use tappay_types::{Address, PrivateKey, TxHash};

use crate::abi::eth_address;
use crate::GatewayError;

/// A contract call with no value attached, replay-protected for `chain_id`.
pub fn contract_call(
    chain_id: u64,
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    contract: &Address,
    data: Vec<u8>,
) -> TxLegacy {
    TxLegacy {
        chain_id: Some(chain_id),
        nonce,
        gas_price,
        gas_limit,
        to: TxKind::Call(eth_address(contract)),
        value: U256::ZERO,
        input: Bytes::from(data),
    }
}

/// A signed transaction ready for `eth_sendRawTransaction`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw: Vec<u8>,
    pub hash: TxHash,
}

impl SignedTransaction {
    /// `0x`-prefixed hex of the raw bytes.
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }
}

/// Signs transactions with the configured payment key.
pub struct TxSigner {
    inner: PrivateKeySigner,
    address: Address,
}

impl TxSigner {
    pub fn new(key: &PrivateKey) -> Result<Self, GatewayError> {
        let inner = PrivateKeySigner::from_bytes(&B256::from(*key.as_bytes()))
            .map_err(|e| GatewayError::Signing(e.to_string()))?;
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(inner.address().as_slice());
        Ok(Self {
            inner,
            address: Address::from_bytes(bytes),
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Sign under EIP-155: `v = recovery_id + 2 * chain_id + 35`.
    pub fn sign_legacy(&self, tx: TxLegacy) -> Result<SignedTransaction, GatewayError> {
        let signature = self
            .inner
            .sign_hash_sync(&tx.signature_hash())
            .map_err(|e| GatewayError::Signing(e.to_string()))?;
        let signed = tx.into_signed(signature);
        let hash = TxHash::new(signed.hash().0);
        let raw = TxEnvelope::from(signed).encoded_2718();
        Ok(SignedTransaction { raw, hash })
    }
}
