//! External value transfers (refunds, merchant withdrawals).
//!
//! Settlement lives outside the core: the engine only notifies an external
//! ledger that an account should be credited. Transfers run after the
//! state change has committed, and a failed transfer does not roll it
//! back; the failure is logged and left to the host to reconcile.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use storeledger_auth::CallerId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The external ledger refused or failed the credit.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Outbound credit to a caller's external account.
pub trait TransferPort: Send + Sync {
    fn credit(&self, to: CallerId, amount: u64) -> Result<(), TransferError>;
}

impl<T> TransferPort for Arc<T>
where
    T: TransferPort + ?Sized,
{
    fn credit(&self, to: CallerId, amount: u64) -> Result<(), TransferError> {
        (**self).credit(to, amount)
    }
}

/// Transfer port that accepts everything and records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTransfers;

impl TransferPort for NoopTransfers {
    fn credit(&self, _to: CallerId, _amount: u64) -> Result<(), TransferError> {
        Ok(())
    }
}

/// A single recorded credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub to: CallerId,
    pub amount: u64,
}

/// Transfer port for tests/dev: records every credit it accepts.
#[derive(Debug, Default)]
pub struct RecordingTransfers {
    log: Mutex<Vec<Transfer>>,
}

impl RecordingTransfers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transfers(&self) -> Vec<Transfer> {
        self.log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }
}

impl TransferPort for RecordingTransfers {
    fn credit(&self, to: CallerId, amount: u64) -> Result<(), TransferError> {
        let mut log = self
            .log
            .lock()
            .map_err(|_| TransferError::Rejected("recorder lock poisoned".to_string()))?;
        log.push(Transfer { to, amount });
        Ok(())
    }
}
