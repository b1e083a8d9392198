//! Demo transaction history and its summary.
//!
//! The network offers no history index here, so both gateways serve the
//! same five canned records, newest first.

use tappay_types::{
    to_base_units, Address, BaseUnits, Timestamp, TransactionRecord, TxHash, TxKind, TxStatus,
    ValidationError,
};

const DEMO: [(&str, TxKind, &str, &str, u64, &str, TxStatus); 5] = [
    (
        "1",
        TxKind::Sent,
        "2.5",
        "0x1234567890123456789012345678901234567890",
        1_705_314_600_000,
        "0xabcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890",
        TxStatus::Confirmed,
    ),
    (
        "2",
        TxKind::Received,
        "5.0",
        "0x0987654321098765432109876543210987654321",
        1_705_247_100_000,
        "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
        TxStatus::Confirmed,
    ),
    (
        "3",
        TxKind::Sent,
        "1.0",
        "0x5555555555555555555555555555555555555555",
        1_705_134_000_000,
        "0xfedcba0987654321fedcba0987654321fedcba0987654321fedcba0987654321",
        TxStatus::Pending,
    ),
    (
        "4",
        TxKind::Received,
        "3.2",
        "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
        1_705_068_900_000,
        "0x9876543210fedcba9876543210fedcba9876543210fedcba9876543210fedcba",
        TxStatus::Confirmed,
    ),
    (
        "5",
        TxKind::Sent,
        "0.5",
        "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
        1_704_965_400_000,
        "0x1111111111111111111111111111111111111111111111111111111111111111",
        TxStatus::Failed,
    ),
];

/// The canned history, newest first.
///
/// Every row is parsed; a malformed row is an error, never a shorter history.
pub fn demo_history() -> Result<Vec<TransactionRecord>, ValidationError> {
    DEMO.iter()
        .map(|&(id, kind, amount, address, millis, hash, status)| {
            Ok(TransactionRecord {
                id: id.to_string(),
                kind,
                amount: amount.to_string(),
                address: Address::parse(address)?,
                timestamp: Timestamp::new(millis),
                hash: TxHash::from_hex(hash)?,
                status,
            })
        })
        .collect()
}

/// Totals over a set of history records.
///
/// Only confirmed records move the balance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub received: BaseUnits,
    pub sent: BaseUnits,
    pub confirmed: usize,
    pub pending: usize,
    pub failed: usize,
}

impl HistorySummary {
    pub fn from_records(records: &[TransactionRecord]) -> Result<Self, ValidationError> {
        let mut summary = Self::default();
        for record in records {
            match record.status {
                TxStatus::Pending => summary.pending += 1,
                TxStatus::Failed => summary.failed += 1,
                TxStatus::Confirmed => {
                    summary.confirmed += 1;
                    let amount = to_base_units(&record.amount)?;
                    let total = match record.kind {
                        TxKind::Received => &mut summary.received,
                        TxKind::Sent => &mut summary.sent,
                    };
                    *total = total
                        .checked_add(amount)
                        .ok_or_else(|| ValidationError::AmountOverflow(record.amount.clone()))?;
                }
            }
        }
        Ok(summary)
    }

    /// Received minus sent, rendered as a signed decimal.
    pub fn net_display(&self) -> String {
        if self.received >= self.sent {
            (self.received - self.sent).to_string()
        } else {
            format!("-{}", self.sent - self.received)
        }
    }

    pub fn total(&self) -> usize {
        self.confirmed + self.pending + self.failed
    }
}
