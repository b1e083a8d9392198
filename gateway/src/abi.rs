//! Contract interfaces the gateway calls.

use alloy::primitives::{Address as EthAddress, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use tappay_types::{Address, BaseUnits};

use crate::GatewayError;

sol! {
    /// The payment contract's entry point.
    interface PaymentContract {
        function sendPayment(address to, uint256 amount) external;
    }

    /// ERC-20 style token balance lookup.
    interface Erc20 {
        function balanceOf(address owner) external view returns (uint256);
    }
}

pub fn eth_address(address: &Address) -> EthAddress {
    EthAddress::from(address.to_bytes())
}

/// Calldata for `sendPayment(to, amount)`.
pub fn encode_send_payment(to: &Address, amount: BaseUnits) -> Vec<u8> {
    PaymentContract::sendPaymentCall {
        to: eth_address(to),
        amount: U256::from(amount.raw()),
    }
    .abi_encode()
}

/// Calldata for `balanceOf(owner)`.
pub fn encode_balance_of(owner: &Address) -> Vec<u8> {
    Erc20::balanceOfCall {
        owner: eth_address(owner),
    }
    .abi_encode()
}

/// Decode the `uint256` returned by `balanceOf`.
///
/// Values above `u128::MAX` are rejected rather than truncated.
pub fn decode_balance(data: &[u8]) -> Result<BaseUnits, GatewayError> {
    let value = Erc20::balanceOfCall::abi_decode_returns(data)
        .map_err(|e| GatewayError::Rpc(format!("bad balanceOf return data: {e}")))?;
    let raw = u128::try_from(value)
        .map_err(|_| GatewayError::Rpc("uint256 value exceeds u128".into()))?;
    Ok(BaseUnits::new(raw))
}
