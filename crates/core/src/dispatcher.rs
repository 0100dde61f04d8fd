//! Submission dispatch.
//!
//! [`SubmissionGateway`] is the single write path: it takes one record, resolves the
//! authorizing account, issues exactly one remote operation and waits (bounded by the
//! configured timeout) for it to settle. Each form has an in-flight slot; while a
//! submission of a form is unsettled, further submissions of that form are refused
//! without touching the chain.

use crate::account::AccountResolver;
use crate::client::{ChainClient, Receipt, RemoteCall};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::intake::{read_form, FormFields};
use crate::records::{FormKind, SubmissionRecord};
use crate::reporter::{report, Notice};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One in-flight flag per form.
#[derive(Debug, Default)]
struct FormSlots([AtomicBool; 3]);

impl FormSlots {
    fn try_acquire(&self, form: FormKind) -> Option<InFlight<'_>> {
        let flag = &self.0[form.index()];
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight { flag })
    }

    fn is_busy(&self, form: FormKind) -> bool {
        self.0[form.index()].load(Ordering::Acquire)
    }
}

/// Holds a form's slot; releasing it on drop covers every exit path, including a
/// cancelled future.
struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// The write path shared by every caller of the process.
///
/// In-flight slots are per gateway, not per caller: while one HTTP client's hospital
/// submission is pending, a hospital submission from any other client is refused too.
/// Every submission is signed by the same node account, so callers are not told apart.
pub struct SubmissionGateway {
    cfg: Arc<GatewayConfig>,
    client: Arc<dyn ChainClient>,
    resolver: AccountResolver,
    slots: FormSlots,
}

impl std::fmt::Debug for SubmissionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionGateway")
            .field("cfg", &self.cfg)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

impl SubmissionGateway {
    pub fn new(cfg: Arc<GatewayConfig>, client: Arc<dyn ChainClient>) -> Self {
        let resolver = AccountResolver::new(cfg.from_account());
        Self {
            cfg,
            client,
            resolver,
            slots: FormSlots::default(),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.cfg
    }

    /// Whether a submission of `form` is currently unsettled.
    pub fn is_in_flight(&self, form: FormKind) -> bool {
        self.slots.is_busy(form)
    }

    /// Dispatch `record` and wait for it to settle.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::InFlight`] if the record's form already has a pending submission
    /// - [`GatewayError::Unauthenticated`] if no account can authorize the call; nothing is
    ///   sent in that case
    /// - [`GatewayError::Rejected`] / [`GatewayError::Transport`] from the chain client
    /// - [`GatewayError::Timeout`] if settlement takes longer than the configured timeout
    pub async fn submit(&self, record: SubmissionRecord) -> GatewayResult<Receipt> {
        let form = record.form();
        let _slot = self
            .slots
            .try_acquire(form)
            .ok_or(GatewayError::InFlight(form))?;

        let timeout = self.cfg.call_timeout();
        tokio::time::timeout(timeout, self.dispatch(record))
            .await
            .map_err(|_| GatewayError::Timeout(timeout))?
    }

    async fn dispatch(&self, record: SubmissionRecord) -> GatewayResult<Receipt> {
        let from = self.resolver.resolve(self.client.as_ref()).await?;
        let operation = record.operation();
        let call = RemoteCall {
            operation,
            contract: self.cfg.contracts().get(operation.contract()),
            from,
            args: record.arguments(),
        };

        tracing::info!(
            operation = %operation,
            contract = %call.contract,
            from = %from,
            "dispatching remote operation"
        );
        let receipt = self.client.send_transaction(&call).await?;
        tracing::info!(
            operation = %operation,
            tx = %receipt.transaction_hash,
            "remote operation settled"
        );
        Ok(receipt)
    }

    /// Read, dispatch and report one submitted form.
    ///
    /// Every failure, local or remote, is folded into the returned notice.
    pub async fn submit_form(&self, form: FormKind, fields: &FormFields) -> Notice {
        let result = match read_form(form, fields) {
            Ok(record) => self.submit(record).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = &result {
            tracing::warn!(form = %form, "submission failed: {}", e);
        }
        report(form, &result)
    }
}
