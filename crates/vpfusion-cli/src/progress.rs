//! One padded atomic snapshot per worker slot, polled into an `indicatif`
//! bar — no locking structure shared across workers.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Cache-line padded so adjacent slots never false-share under contention.
#[repr(align(64))]
#[derive(Default)]
struct Slot(AtomicU64);

/// One slot per `rayon` worker thread; each thread only ever touches its own
/// slot, so recording progress never contends across threads.
pub struct ProgressTable {
    slots: Vec<Slot>,
}

impl ProgressTable {
    pub fn new(worker_count: usize) -> Self {
        ProgressTable {
            slots: (0..worker_count.max(1)).map(|_| Slot::default()).collect(),
        }
    }

    /// Record one unit of completed work on the calling `rayon` worker's slot.
    pub fn record(&self) {
        self.record_n(1);
    }

    /// Record `count` units of completed work on the calling worker's slot.
    pub fn record_n(&self, count: u64) {
        let slot = rayon::current_thread_index().unwrap_or(0) % self.slots.len();
        self.slots[slot].0.fetch_add(count, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.slots.iter().map(|s| s.0.load(Ordering::Relaxed)).sum()
    }
}

/// Polls a `ProgressTable` into an `indicatif` bar on a background thread.
pub struct ProgressReporter {
    bar: ProgressBar,
    stop: Arc<AtomicBool>,
    poller: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    pub fn spawn(phase: &str, total_work: u64, table: Arc<ProgressTable>) -> Self {
        let bar = ProgressBar::new(total_work);
        let style = ProgressStyle::with_template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_prefix(phase.to_string());

        let stop = Arc::new(AtomicBool::new(false));
        let stop_poller = stop.clone();
        let bar_poller = bar.clone();
        let poller = std::thread::spawn(move || {
            while !stop_poller.load(Ordering::Relaxed) {
                bar_poller.set_position(table.total());
                std::thread::sleep(Duration::from_millis(150));
            }
            bar_poller.set_position(table.total());
        });

        ProgressReporter { bar, stop, poller: Some(poller) }
    }

    pub fn finish(mut self, message: &str) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(poller) = self.poller.take() {
            let _ = poller.join();
        }
        self.bar.finish_with_message(message.to_string());
    }
}
