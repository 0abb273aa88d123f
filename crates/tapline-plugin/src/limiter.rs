// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Throughput-limiting decorator.
//!
//! [`decorate`] wraps the I/O views of a [`PluginHandle`] so every read and
//! write passes a [`RateGate`] first. The capability set is preserved: a
//! source stays a source, a duplex plugin stays duplex and both of its
//! directions share one gate. The undecorated plugin stays reachable through
//! [`PluginHandle::plugin`].
//!
//! Over-limit reads are skipped and the next payload is read instead;
//! over-limit writes are acknowledged and dropped.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::Instant;
use tracing::trace;

use tapline_core::{
    Plugin, PluginHandle, RateLimit, Readable, RelayError, Role, TransportKind, Writable,
};

const WINDOW: Duration = Duration::from_secs(1);

/// Decides whether the next message may pass.
#[derive(Debug)]
pub struct RateGate {
    limit: RateLimit,
    window: Mutex<Window>,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    passed: u64,
}

impl RateGate {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            window: Mutex::new(Window {
                started: Instant::now(),
                passed: 0,
            }),
        }
    }

    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    /// Returns `true` if one more message may pass right now.
    pub fn allow(&self) -> bool {
        match self.limit {
            RateLimit::PerSecond(max) => {
                // The window only holds counters, so a poisoned lock is still usable.
                let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
                let now = Instant::now();
                if now.duration_since(window.started) >= WINDOW {
                    window.started = now;
                    window.passed = 0;
                }
                if window.passed >= max {
                    return false;
                }
                window.passed += 1;
                true
            }
            RateLimit::Percent(pct) => rand::thread_rng().gen_range(0..100u8) < pct,
        }
    }
}

/// Wrap a handle's I/O views in a rate gate built from `limit`.
pub fn decorate(handle: &PluginHandle, limit: RateLimit) -> PluginHandle {
    let gate = Arc::new(RateGate::new(limit));
    let role = match handle.role() {
        Role::Source(reader) => {
            Role::Source(Arc::new(LimitedReader::new(Arc::clone(reader), gate)))
        }
        Role::Sink(writer) => Role::Sink(Arc::new(LimitedWriter::new(Arc::clone(writer), gate))),
        Role::Duplex { reader, writer } => Role::Duplex {
            reader: Arc::new(LimitedReader::new(Arc::clone(reader), Arc::clone(&gate))),
            writer: Arc::new(LimitedWriter::new(Arc::clone(writer), gate)),
        },
        Role::Inert => Role::Inert,
    };
    handle.with_role(role)
}

/// Readable view that skips payloads once the gate closes.
pub struct LimitedReader {
    inner: Arc<dyn Readable>,
    gate: Arc<RateGate>,
}

impl LimitedReader {
    pub fn new(inner: Arc<dyn Readable>, gate: Arc<RateGate>) -> Self {
        Self { inner, gate }
    }
}

#[async_trait]
impl Plugin for LimitedReader {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn kind(&self) -> TransportKind {
        self.inner.kind()
    }

    async fn close(&self) -> Result<(), RelayError> {
        self.inner.close().await
    }
}

#[async_trait]
impl Readable for LimitedReader {
    async fn read_payload(&self) -> Result<Vec<u8>, RelayError> {
        loop {
            let payload = self.inner.read_payload().await?;
            if self.gate.allow() {
                return Ok(payload);
            }
            trace!(
                plugin = self.inner.name(),
                limit = %self.gate.limit(),
                "read over limit, skipped"
            );
        }
    }
}

/// Writable view that drops payloads once the gate closes.
pub struct LimitedWriter {
    inner: Arc<dyn Writable>,
    gate: Arc<RateGate>,
}

impl LimitedWriter {
    pub fn new(inner: Arc<dyn Writable>, gate: Arc<RateGate>) -> Self {
        Self { inner, gate }
    }
}

#[async_trait]
impl Plugin for LimitedWriter {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn kind(&self) -> TransportKind {
        self.inner.kind()
    }

    async fn close(&self) -> Result<(), RelayError> {
        self.inner.close().await
    }
}

#[async_trait]
impl Writable for LimitedWriter {
    async fn write_payload(&self, payload: &[u8]) -> Result<usize, RelayError> {
        if self.gate.allow() {
            return self.inner.write_payload(payload).await;
        }
        trace!(plugin = self.inner.name(), limit = %self.gate.limit(), "write over limit, dropped");
        Ok(payload.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tapline_core::Capabilities;

    /// Yields queued payloads, then reports itself closed. Counts writes.
    struct Scripted {
        queue: Mutex<VecDeque<Vec<u8>>>,
        writes: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn new(payloads: &[&str]) -> Self {
            Self {
                queue: Mutex::new(payloads.iter().map(|p| p.as_bytes().to_vec()).collect()),
                writes: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl Plugin for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn kind(&self) -> TransportKind {
            TransportKind::HttpOutput
        }

        async fn close(&self) -> Result<(), RelayError> {
            Ok(())
        }
    }

    #[async_trait]
    impl Readable for Scripted {
        async fn read_payload(&self) -> Result<Vec<u8>, RelayError> {
            self.queue
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| RelayError::Closed { name: "scripted".into() })
        }
    }

    #[async_trait]
    impl Writable for Scripted {
        async fn write_payload(&self, payload: &[u8]) -> Result<usize, RelayError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(payload.len())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn per_second_gate_resets_each_window() {
        let gate = RateGate::new(RateLimit::PerSecond(2));
        assert!(gate.allow());
        assert!(gate.allow());
        assert!(!gate.allow());

        tokio::time::advance(Duration::from_millis(1001)).await;
        assert!(gate.allow());
    }

    #[test]
    fn full_percentage_passes_everything() {
        let gate = RateGate::new(RateLimit::Percent(100));
        assert!((0..1000).all(|_| gate.allow()));
    }

    #[test]
    fn low_percentage_drops_most() {
        let gate = RateGate::new(RateLimit::Percent(1));
        let passed = (0..10_000).filter(|_| gate.allow()).count();
        assert!(passed < 1_000, "1% gate passed {passed} of 10000");
    }

    #[test]
    fn decorate_preserves_capabilities() {
        let limit = RateLimit::PerSecond(1);
        for handle in [
            PluginHandle::source(Scripted::new(&[])),
            PluginHandle::sink(Scripted::new(&[])),
            PluginHandle::duplex(Scripted::new(&[])),
            PluginHandle::inert(Scripted::new(&[])),
        ] {
            let decorated = decorate(&handle, limit);
            assert_eq!(decorated.capabilities(), handle.capabilities());
            assert!(Arc::ptr_eq(decorated.plugin(), handle.plugin()));
        }
        assert_eq!(
            decorate(&PluginHandle::source(Scripted::new(&[])), limit).capabilities(),
            Capabilities::SOURCE
        );
    }

    #[tokio::test(start_paused = true)]
    async fn limited_writer_drops_but_acknowledges() {
        let scripted = Scripted::new(&[]);
        let writes = Arc::clone(&scripted.writes);
        let handle = PluginHandle::sink(scripted);
        let decorated = decorate(&handle, RateLimit::PerSecond(2));
        let Role::Sink(writer) = decorated.role() else {
            panic!("expected sink role");
        };

        for _ in 0..5 {
            assert_eq!(writer.write_payload(b"GET /").await.unwrap(), 5);
        }
        assert_eq!(writes.load(Ordering::SeqCst), 2);

        let Role::Sink(raw) = handle.role() else {
            panic!("expected sink role");
        };
        // Raw view bypasses the gate.
        raw.write_payload(b"x").await.unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 3);
        assert_eq!(writer.name(), "scripted");
        assert_eq!(writer.kind(), TransportKind::HttpOutput);
    }

    #[tokio::test(start_paused = true)]
    async fn limited_reader_skips_over_limit_payloads() {
        let handle = PluginHandle::source(Scripted::new(&["1", "2", "3", "4", "5"]));
        let decorated = decorate(&handle, RateLimit::PerSecond(2));
        let Role::Source(reader) = decorated.role() else {
            panic!("expected source role");
        };

        assert_eq!(reader.read_payload().await.unwrap(), b"1");
        assert_eq!(reader.read_payload().await.unwrap(), b"2");
        // 3, 4, 5 are skipped inside the window; then the source runs dry.
        assert!(matches!(reader.read_payload().await, Err(RelayError::Closed { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn duplex_directions_share_one_gate() {
        let scripted = Scripted::new(&["resp"]);
        let handle = PluginHandle::duplex(scripted);
        let decorated = decorate(&handle, RateLimit::PerSecond(1));
        let Role::Duplex { reader, writer } = decorated.role() else {
            panic!("expected duplex role");
        };

        writer.write_payload(b"req").await.unwrap();
        // The single slot was spent on the write, so the response is skipped.
        assert!(reader.read_payload().await.is_err());
    }
}
