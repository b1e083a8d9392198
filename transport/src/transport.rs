//! Tag transport: one guarded session at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tappay_protocol::{codec, DecodeOutcome};

use crate::{RadioStack, TransportError, TransportState};

/// How long to wait for a tag before giving up on a session.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Scan-sheet message shown after a successful write.
pub const WRITE_SUCCESS_MESSAGE: &str = "Payment data written successfully!";

/// Session bookkeeping shared with in-flight guards.
struct Shared {
    state: Mutex<TransportState>,
    last_outcome: Mutex<Option<TransportState>>,
    initialized: AtomicBool,
    in_flight: AtomicBool,
}

impl Shared {
    fn set_state(&self, state: TransportState) {
        let mut current = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = *current;
        tracing::trace!(from = %previous, to = %state, "transport state");
        *current = state;
    }

    fn state(&self) -> TransportState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the single in-flight slot, or `None` if an operation holds it.
    fn claim(self: &Arc<Self>) -> Option<InFlight> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(Arc::clone(self)))
    }

    fn resting_state(&self) -> TransportState {
        if self.initialized.load(Ordering::Acquire) {
            TransportState::Ready
        } else {
            TransportState::Idle
        }
    }
}

/// The in-flight slot; freed when dropped.
struct InFlight(Arc<Shared>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::Release);
    }
}

/// NFC tag transport over an injected [`RadioStack`].
///
/// Built with [`TagTransport::new`] on platforms with a radio, or
/// [`TagTransport::unsupported`] where there is none; the latter fails every
/// session operation without touching any stack.
pub struct TagTransport {
    stack: Option<Arc<dyn RadioStack>>,
    shared: Arc<Shared>,
    acquire_timeout: Duration,
}

impl TagTransport {
    pub fn new(stack: Arc<dyn RadioStack>) -> Self {
        Self::build(Some(stack))
    }

    /// A transport for a platform without NFC.
    pub fn unsupported() -> Self {
        Self::build(None)
    }

    fn build(stack: Option<Arc<dyn RadioStack>>) -> Self {
        Self {
            stack,
            shared: Arc::new(Shared {
                state: Mutex::new(TransportState::Idle),
                last_outcome: Mutex::new(None),
                initialized: AtomicBool::new(false),
                in_flight: AtomicBool::new(false),
            }),
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// Bound the wait for a tag session.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn acquire_timeout(&self) -> Duration {
        self.acquire_timeout
    }

    pub fn state(&self) -> TransportState {
        self.shared.state()
    }

    /// `Success` or `Failed` for the most recent finished session.
    pub fn last_outcome(&self) -> Option<TransportState> {
        *self
            .shared
            .last_outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the last [`TagTransport::initialize`] found NFC ready.
    pub fn is_initialized(&self) -> bool {
        self.shared.initialized.load(Ordering::Acquire)
    }

    pub fn is_platform_supported(&self) -> bool {
        self.stack.is_some()
    }

    /// Start the radio stack and check hardware support and enablement.
    ///
    /// Returns `Ok(false)` when NFC is absent, unsupported or switched off;
    /// `Err` only when the stack itself fails unexpectedly.
    pub async fn initialize(&self) -> Result<bool, TransportError> {
        let Some(stack) = &self.stack else {
            tracing::debug!("NFC unavailable on this platform");
            return Ok(false);
        };
        let Some(_slot) = self.shared.claim() else {
            tracing::warn!("rejected NFC initialisation: session already in progress");
            return Err(TransportError::Busy);
        };

        self.shared.set_state(TransportState::Starting);
        match Self::check_hardware(stack.as_ref()).await {
            Ok(true) => {
                self.shared.initialized.store(true, Ordering::Release);
                self.shared.set_state(TransportState::Ready);
                tracing::info!(stack = stack.name(), "NFC ready");
                Ok(true)
            }
            Ok(false) => {
                self.shared.initialized.store(false, Ordering::Release);
                self.shared.set_state(TransportState::Idle);
                Ok(false)
            }
            Err(e) => {
                self.shared.initialized.store(false, Ordering::Release);
                self.shared.set_state(TransportState::Idle);
                tracing::error!(stack = stack.name(), error = %e, "NFC initialisation failed");
                Err(e)
            }
        }
    }

    async fn check_hardware(stack: &dyn RadioStack) -> Result<bool, TransportError> {
        stack.start().await?;
        if !stack.is_supported().await? {
            tracing::info!(stack = stack.name(), "NFC hardware not supported");
            return Ok(false);
        }
        if !stack.is_enabled().await? {
            tracing::info!(stack = stack.name(), "NFC is switched off");
            return Ok(false);
        }
        Ok(true)
    }

    /// Write an NDEF message to the next tag brought into range.
    pub async fn write(&self, message: &[u8]) -> Result<(), TransportError> {
        let stack = self.stack()?;
        let session = self.open_session(stack).await?;

        if let Err(e) = stack.write_ndef(message).await {
            tracing::error!(error = %e, "tag write failed");
            return Err(e.into());
        }
        if let Err(e) = stack.alert_message(WRITE_SUCCESS_MESSAGE).await {
            tracing::warn!(error = %e, "failed to show write confirmation");
        }

        tracing::info!(bytes = message.len(), "payment data written to tag");
        session.finish(TransportState::Success);
        Ok(())
    }

    /// Read and decode the payment payload of the next tag brought into range.
    ///
    /// A tag without an NDEF message reads as [`DecodeOutcome::Unrecognized`].
    pub async fn read(&self) -> Result<DecodeOutcome, TransportError> {
        let stack = self.stack()?;
        let session = self.open_session(stack).await?;

        let message = match stack.read_ndef().await {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(error = %e, "tag read failed");
                return Err(e.into());
            }
        };
        let outcome = match message {
            Some(bytes) => codec::decode(&bytes),
            None => DecodeOutcome::Unrecognized,
        };

        tracing::info!(recognized = outcome.is_recognized(), "tag read");
        session.finish(TransportState::Success);
        Ok(outcome)
    }

    /// Stop the radio stack. Failures are logged, not returned.
    pub async fn cleanup(&self) {
        let Some(stack) = &self.stack else {
            return;
        };
        if let Err(e) = stack.stop().await {
            tracing::warn!(stack = stack.name(), error = %e, "NFC cleanup failed");
        }
        self.shared.initialized.store(false, Ordering::Release);
        if !self.shared.in_flight.load(Ordering::Acquire) {
            self.shared.set_state(TransportState::Idle);
        }
    }

    fn stack(&self) -> Result<&Arc<dyn RadioStack>, TransportError> {
        self.stack.as_ref().ok_or(TransportError::UnsupportedPlatform)
    }

    /// Claim the single in-flight slot and acquire a tag session.
    ///
    /// The returned guard releases the session when dropped; it is created
    /// before the request so a failed or timed-out acquisition is released too.
    async fn open_session(
        &self,
        stack: &Arc<dyn RadioStack>,
    ) -> Result<SessionGuard, TransportError> {
        let Some(slot) = self.shared.claim() else {
            tracing::warn!("rejected tag operation: session already in progress");
            return Err(TransportError::Busy);
        };

        let guard = SessionGuard {
            stack: Arc::clone(stack),
            shared: Arc::clone(&self.shared),
            outcome: TransportState::Failed,
            _slot: slot,
        };
        self.shared.set_state(TransportState::SessionRequested);

        match tokio::time::timeout(self.acquire_timeout, stack.request_session()).await {
            Ok(Ok(())) => {
                self.shared.set_state(TransportState::Active);
                Ok(guard)
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "tag session request failed");
                Err(e.into())
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.acquire_timeout, "no tag within acquire timeout");
                Err(TransportError::AcquireTimeout(self.acquire_timeout))
            }
        }
    }
}

/// Holds an acquired (or requested) tag session.
///
/// Dropping it releases the session exactly once, then frees the in-flight
/// slot. Unless [`SessionGuard::finish`] recorded success, the session
/// counts as failed, which covers errors and abandoned futures alike.
struct SessionGuard {
    stack: Arc<dyn RadioStack>,
    shared: Arc<Shared>,
    outcome: TransportState,
    // Dropped after `drop` runs, so the slot outlives the release.
    _slot: InFlight,
}

impl SessionGuard {
    fn finish(mut self, outcome: TransportState) {
        self.outcome = outcome;
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.shared.set_state(self.outcome);
        *self
            .shared
            .last_outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(self.outcome);

        if let Err(e) = self.stack.release_session() {
            tracing::warn!(stack = self.stack.name(), error = %e, "failed to release tag session");
        }

        self.shared.set_state(self.shared.resting_state());
    }
}
