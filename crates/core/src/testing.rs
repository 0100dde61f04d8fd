//! In-memory chain client for tests.
//!
//! [`RecordingClient`] records every call it receives and settles it the way it was told
//! to. Enabled for this crate's own tests and, through the `testing` feature, for
//! downstream crates.

use crate::client::{ChainClient, Receipt, RemoteCall};
use crate::error::{ChainError, ChainResult};
use async_trait::async_trait;
use medchain_types::Address;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

#[derive(Clone, Debug)]
enum Settlement {
    Confirm,
    Reject(String),
    Transport(String),
    Hang,
    Gated,
}

#[derive(Debug)]
pub struct RecordingClient {
    accounts: Vec<Address>,
    accounts_error: Option<String>,
    accounts_hang: bool,
    settlement: Settlement,
    calls: Mutex<Vec<RemoteCall>>,
    started: Arc<Notify>,
    release: Arc<Notify>,
}

impl RecordingClient {
    /// A client that reports `accounts` and confirms every transaction.
    pub fn new(accounts: Vec<Address>) -> Self {
        Self {
            accounts,
            accounts_error: None,
            accounts_hang: false,
            settlement: Settlement::Confirm,
            calls: Mutex::new(Vec::new()),
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    pub fn with_accounts_error(mut self, message: impl Into<String>) -> Self {
        self.accounts_error = Some(message.into());
        self
    }

    /// Never answer the account lookup.
    pub fn with_hanging_accounts(mut self) -> Self {
        self.accounts_hang = true;
        self
    }

    /// Reject every transaction with `reason`.
    pub fn rejecting(mut self, reason: impl Into<String>) -> Self {
        self.settlement = Settlement::Reject(reason.into());
        self
    }

    pub fn failing_transport(mut self, message: impl Into<String>) -> Self {
        self.settlement = Settlement::Transport(message.into());
        self
    }

    /// Never settle.
    pub fn hanging(mut self) -> Self {
        self.settlement = Settlement::Hang;
        self
    }

    /// Hold each transaction until [`RecordingClient::release`] is called.
    pub fn gated(mut self) -> Self {
        self.settlement = Settlement::Gated;
        self
    }

    /// Wait until a gated transaction has been received.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Let one gated transaction settle.
    pub fn release(&self) {
        self.release.notify_one();
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RemoteCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ChainClient for RecordingClient {
    async fn accounts(&self) -> ChainResult<Vec<Address>> {
        if self.accounts_hang {
            std::future::pending::<()>().await;
        }
        match &self.accounts_error {
            Some(message) => Err(ChainError::Transport(message.clone())),
            None => Ok(self.accounts.clone()),
        }
    }

    async fn send_transaction(&self, call: &RemoteCall) -> ChainResult<Receipt> {
        let sequence = {
            let mut calls = self.lock();
            calls.push(call.clone());
            calls.len() as u64
        };

        match &self.settlement {
            Settlement::Confirm => {}
            Settlement::Reject(reason) => return Err(ChainError::Rejected(reason.clone())),
            Settlement::Transport(message) => return Err(ChainError::Transport(message.clone())),
            Settlement::Hang => std::future::pending::<()>().await,
            Settlement::Gated => {
                self.started.notify_one();
                self.release.notified().await;
            }
        }

        Ok(Receipt {
            transaction_hash: format!("0x{sequence:064x}"),
            block_number: Some(sequence),
        })
    }
}
