//! Upload progress reporting.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering},
    },
};

/// Final percentage, reported only once the backend confirmed the upload
pub const COMPLETE: u8 = 100;

/// Forwards integer percentages to a callback.
///
/// Reported values never decrease and never exceed 100; a value lower than
/// the last one is swallowed. Clones share the same high-water mark.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Arc<dyn Fn(u8) + Send + Sync>,
    last: Arc<AtomicU8>,
    started: Arc<AtomicBool>,
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("last", &self.last())
            .finish_non_exhaustive()
    }
}

impl ProgressReporter {
    pub fn new(callback: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
            last: Arc::new(AtomicU8::new(0)),
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reporter that drops every value
    pub fn silent() -> Self {
        Self::new(|_| {})
    }

    /// Highest percentage reported so far
    pub fn last(&self) -> u8 {
        self.last.load(Ordering::Acquire)
    }

    pub fn report(&self, percent: u8) {
        let percent = percent.min(COMPLETE);
        let previous = self.last.fetch_max(percent, Ordering::AcqRel);
        let first = !self.started.swap(true, Ordering::AcqRel);
        if percent > previous || first {
            (self.callback)(percent.max(previous));
        }
    }

    /// Sub-range `[start, start + span]` of this reporter
    pub fn phase(&self, start: u8, span: u8) -> PhaseProgress {
        PhaseProgress {
            reporter: self.clone(),
            start: start.min(COMPLETE),
            span: span.min(COMPLETE - start.min(COMPLETE)),
        }
    }
}

/// Maps a fraction of one upload step onto its share of the total
#[derive(Debug, Clone)]
pub struct PhaseProgress {
    reporter: ProgressReporter,
    start: u8,
    span: u8,
}

impl PhaseProgress {
    pub fn start(&self) -> u8 {
        self.start
    }

    pub fn end(&self) -> u8 {
        self.start + self.span
    }

    /// Percentage of the whole upload once `done` of `total` units are sent
    pub fn percent(&self, done: u64, total: u64) -> u8 {
        if total == 0 {
            return self.end();
        }
        let done = done.min(total);
        let scaled = done * u64::from(self.span) / total;
        self.start + scaled as u8
    }

    pub fn report(&self, done: u64, total: u64) {
        self.reporter.report(self.percent(done, total));
    }

    /// Byte counter for streamed bodies covering `total` bytes in this phase
    pub fn counter(&self, total: u64) -> ByteCounter {
        ByteCounter {
            phase: self.clone(),
            sent: Arc::new(AtomicU64::new(0)),
            total,
        }
    }
}

/// Accumulates bytes handed to the connection and reports the phase share.
///
/// Clones share the count, so several bodies can feed one phase.
#[derive(Debug, Clone)]
pub struct ByteCounter {
    phase: PhaseProgress,
    sent: Arc<AtomicU64>,
    total: u64,
}

impl ByteCounter {
    pub fn add(&self, bytes: u64) {
        let sent = self.sent.fetch_add(bytes, Ordering::AcqRel) + bytes;
        self.phase.report(sent, self.total);
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Acquire)
    }
}
