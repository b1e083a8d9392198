//! Nullable radio: an in-memory NFC tag.
//!
//! Writes replace the tag contents and reads return them, so a write
//! followed by a read round-trips through the real codec. Every stack call
//! can be made to fail or stall, and calls are counted for assertions.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tappay_transport::{RadioStack, StackError};

/// Call counts observed by a [`NullRadio`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RadioCounters {
    pub starts: usize,
    pub requests: usize,
    pub releases: usize,
    pub reads: usize,
    pub writes: usize,
    pub stops: usize,
}

#[derive(Default)]
struct Failures {
    start: AtomicBool,
    request: AtomicBool,
    read: AtomicBool,
    write: AtomicBool,
    release: AtomicBool,
    stop: AtomicBool,
}

#[derive(Default)]
struct Counts {
    starts: AtomicUsize,
    requests: AtomicUsize,
    releases: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
    stops: AtomicUsize,
}

/// A simulated NFC radio with one tag always in range.
pub struct NullRadio {
    supported: AtomicBool,
    enabled: AtomicBool,
    tag: Mutex<Option<Vec<u8>>>,
    alerts: Mutex<Vec<String>>,
    start_delay: Mutex<Duration>,
    request_delay: Mutex<Duration>,
    io_delay: Mutex<Duration>,
    fail: Failures,
    counts: Counts,
}

impl NullRadio {
    /// A supported, enabled radio with a blank tag.
    pub fn new() -> Self {
        Self {
            supported: AtomicBool::new(true),
            enabled: AtomicBool::new(true),
            tag: Mutex::new(None),
            alerts: Mutex::new(Vec::new()),
            start_delay: Mutex::new(Duration::ZERO),
            request_delay: Mutex::new(Duration::ZERO),
            io_delay: Mutex::new(Duration::ZERO),
            fail: Failures::default(),
            counts: Counts::default(),
        }
    }

    /// A radio whose tag already holds `message`.
    pub fn with_tag(message: Vec<u8>) -> Self {
        let radio = Self::new();
        radio.set_tag(Some(message));
        radio
    }

    pub fn set_supported(&self, supported: bool) {
        self.supported.store(supported, Ordering::SeqCst);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Replace the tag contents. `None` is a tag without an NDEF message.
    pub fn set_tag(&self, message: Option<Vec<u8>>) {
        *self.tag.lock().unwrap_or_else(PoisonError::into_inner) = message;
    }

    /// Current tag contents.
    pub fn tag(&self) -> Option<Vec<u8>> {
        self.tag.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Messages shown via the scan sheet.
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// How long starting the stack takes.
    pub fn set_start_delay(&self, delay: Duration) {
        *self.start_delay.lock().unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// How long a session request waits before a tag "arrives".
    pub fn set_request_delay(&self, delay: Duration) {
        *self.request_delay.lock().unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// How long each read or write takes.
    pub fn set_io_delay(&self, delay: Duration) {
        *self.io_delay.lock().unwrap_or_else(PoisonError::into_inner) = delay;
    }

    pub fn fail_start(&self, fail: bool) {
        self.fail.start.store(fail, Ordering::SeqCst);
    }

    pub fn fail_request(&self, fail: bool) {
        self.fail.request.store(fail, Ordering::SeqCst);
    }

    pub fn fail_read(&self, fail: bool) {
        self.fail.read.store(fail, Ordering::SeqCst);
    }

    pub fn fail_write(&self, fail: bool) {
        self.fail.write.store(fail, Ordering::SeqCst);
    }

    pub fn fail_release(&self, fail: bool) {
        self.fail.release.store(fail, Ordering::SeqCst);
    }

    pub fn fail_stop(&self, fail: bool) {
        self.fail.stop.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of the call counts.
    pub fn counters(&self) -> RadioCounters {
        RadioCounters {
            starts: self.counts.starts.load(Ordering::SeqCst),
            requests: self.counts.requests.load(Ordering::SeqCst),
            releases: self.counts.releases.load(Ordering::SeqCst),
            reads: self.counts.reads.load(Ordering::SeqCst),
            writes: self.counts.writes.load(Ordering::SeqCst),
            stops: self.counts.stops.load(Ordering::SeqCst),
        }
    }

    fn delay(slot: &Mutex<Duration>) -> Duration {
        *slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<(), StackError> {
        if flag.load(Ordering::SeqCst) {
            Err(StackError::new(format!("simulated {what} failure")))
        } else {
            Ok(())
        }
    }
}

impl Default for NullRadio {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RadioStack for NullRadio {
    fn name(&self) -> &str {
        "null-radio"
    }

    async fn start(&self) -> Result<(), StackError> {
        self.counts.starts.fetch_add(1, Ordering::SeqCst);
        let delay = Self::delay(&self.start_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Self::check(&self.fail.start, "start")
    }

    async fn is_supported(&self) -> Result<bool, StackError> {
        Ok(self.supported.load(Ordering::SeqCst))
    }

    async fn is_enabled(&self) -> Result<bool, StackError> {
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn request_session(&self) -> Result<(), StackError> {
        self.counts.requests.fetch_add(1, Ordering::SeqCst);
        let delay = Self::delay(&self.request_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Self::check(&self.fail.request, "session request")
    }

    async fn read_ndef(&self) -> Result<Option<Vec<u8>>, StackError> {
        self.counts.reads.fetch_add(1, Ordering::SeqCst);
        let delay = Self::delay(&self.io_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Self::check(&self.fail.read, "read")?;
        Ok(self.tag())
    }

    async fn write_ndef(&self, message: &[u8]) -> Result<(), StackError> {
        self.counts.writes.fetch_add(1, Ordering::SeqCst);
        let delay = Self::delay(&self.io_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Self::check(&self.fail.write, "write")?;
        self.set_tag(Some(message.to_vec()));
        Ok(())
    }

    async fn alert_message(&self, message: &str) -> Result<(), StackError> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
        Ok(())
    }

    fn release_session(&self) -> Result<(), StackError> {
        self.counts.releases.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail.release, "release")
    }

    async fn stop(&self) -> Result<(), StackError> {
        self.counts.stops.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail.stop, "stop")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read_returns_written_bytes() {
        let radio = NullRadio::new();
        assert_eq!(radio.read_ndef().await.unwrap(), None);
        radio.write_ndef(b"abc").await.unwrap();
        assert_eq!(radio.read_ndef().await.unwrap(), Some(b"abc".to_vec()));
        let counters = radio.counters();
        assert_eq!(counters.writes, 1);
        assert_eq!(counters.reads, 2);
    }

    #[tokio::test]
    async fn failure_toggles() {
        let radio = NullRadio::with_tag(b"old".to_vec());
        radio.fail_write(true);
        assert!(radio.write_ndef(b"new").await.is_err());
        assert_eq!(radio.tag(), Some(b"old".to_vec()));
        radio.fail_write(false);
        radio.fail_release(true);
        assert!(radio.release_session().is_err());
        assert_eq!(radio.counters().releases, 1);
    }
}
