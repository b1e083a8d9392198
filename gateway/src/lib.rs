//! Chain gateway for TapPay.
//!
//! [`ChainGateway`] is the seam between the payment flows and the network.
//! Two implementations are selected by configuration:
//!
//! - [`LiveGateway`] signs a legacy EIP-155 transaction calling
//!   `sendPayment(address,uint256)` on the payment contract and relays it
//!   over JSON-RPC.
//! - [`MockGateway`] answers with canned values after a delay.

pub mod abi;
pub mod error;
pub mod gateway;
pub mod history;
pub mod live;
pub mod mock;
pub mod rpc;
pub mod tx;

pub use error::GatewayError;
pub use gateway::ChainGateway;
pub use history::{demo_history, HistorySummary};
pub use live::{LiveGateway, LiveSettings, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE_WEI};
pub use mock::{MockGateway, MOCK_BALANCE};
pub use rpc::RpcClient;
pub use tx::{SignedTransaction, TxSigner};
