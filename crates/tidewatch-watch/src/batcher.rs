//! Shared change buffer and the debounced drain over it.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, trace};

/// Deduplicated set of changed paths returned by a drain.
pub type ChangeSet = HashSet<PathBuf>;

/// Append-only sequence of changed paths shared between producer and batcher.
///
/// Cloning yields another handle to the same buffer. Appends and the drain's
/// swap take the same lock, so an append lands either wholly before or wholly
/// after any swap.
#[derive(Debug, Clone, Default)]
pub struct ChangeBuffer {
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl ChangeBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a changed path.
    pub fn append(&self, path: PathBuf) {
        self.paths.lock().push(path);
    }

    /// Number of appends since the last swap, duplicates included.
    pub fn len(&self) -> usize {
        self.paths.lock().len()
    }

    /// Whether nothing was appended since the last swap.
    pub fn is_empty(&self) -> bool {
        self.paths.lock().is_empty()
    }

    /// Replace the contents with an empty sequence and return the old one.
    fn take(&self) -> Vec<PathBuf> {
        std::mem::take(&mut *self.paths.lock())
    }
}

/// Pull side of the buffer: waits out the coalescing window, then drains.
#[derive(Debug, Clone)]
pub struct ChangeBatcher {
    buffer: ChangeBuffer,
    window: Duration,
    shutdown: watch::Receiver<bool>,
    interrupt_on_shutdown: bool,
}

impl ChangeBatcher {
    /// Create a batcher over `buffer`.
    ///
    /// `shutdown` flips to `true` when the owning watcher stops. It only cuts
    /// a pending wait short when `interrupt_on_shutdown` is set.
    pub fn new(
        buffer: ChangeBuffer,
        window: Duration,
        shutdown: watch::Receiver<bool>,
        interrupt_on_shutdown: bool,
    ) -> Self {
        Self {
            buffer,
            window,
            shutdown,
            interrupt_on_shutdown,
        }
    }

    /// Wait for the coalescing window, then return every distinct path
    /// appended since the previous drain.
    ///
    /// With interruption enabled, a shutdown signalled while the wait is in
    /// progress ends it early. A drain that begins after shutdown still waits
    /// the full window, so a polling loop keeps its pace.
    pub async fn drain(&self) -> ChangeSet {
        let sleep = tokio::time::sleep(self.window);
        tokio::pin!(sleep);

        let mut shutdown = self.shutdown.clone();
        let already_stopped = *shutdown.borrow_and_update();

        if self.interrupt_on_shutdown && !already_stopped {
            tokio::select! {
                _ = &mut sleep => {}
                changed = shutdown.changed() => {
                    if changed.is_ok() && *shutdown.borrow() {
                        debug!("Drain wait interrupted by shutdown");
                    } else {
                        // Sender gone without a stop signal
                        (&mut sleep).await;
                    }
                }
            }
        } else {
            sleep.await;
        }

        self.drain_now()
    }

    /// Swap out the buffer immediately and deduplicate its contents.
    pub fn drain_now(&self) -> ChangeSet {
        let appended = self.buffer.take();
        let raw_count = appended.len();
        let changes: ChangeSet = appended.into_iter().collect();

        if raw_count > 0 {
            debug!("Drained {} changed paths ({} raw events)", changes.len(), raw_count);
        } else {
            trace!("Drained no changes");
        }
        changes
    }

    /// Number of raw appends waiting for the next drain.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// The coalescing window.
    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn batcher(window: Duration, interrupt: bool) -> (ChangeBuffer, ChangeBatcher, watch::Sender<bool>) {
        let buffer = ChangeBuffer::new();
        let (tx, rx) = watch::channel(false);
        let batcher = ChangeBatcher::new(buffer.clone(), window, rx, interrupt);
        (buffer, batcher, tx)
    }

    #[test]
    fn buffer_handles_share_storage() {
        let buffer = ChangeBuffer::new();
        let other = buffer.clone();
        other.append(PathBuf::from("/a.py"));
        assert_eq!(buffer.len(), 1);
        assert!(!buffer.is_empty());
    }

    #[test]
    fn drain_now_dedups_and_clears() {
        let (buffer, batcher, _tx) = batcher(Duration::from_secs(1), false);
        for _ in 0..5 {
            buffer.append(PathBuf::from("/app/main.py"));
        }
        buffer.append(PathBuf::from("/app/app.yaml"));

        let changes = batcher.drain_now();
        assert_eq!(changes.len(), 2);
        assert!(changes.contains(&PathBuf::from("/app/main.py")));
        assert!(changes.contains(&PathBuf::from("/app/app.yaml")));
        assert_eq!(batcher.pending(), 0);
        assert!(batcher.drain_now().is_empty());
    }

    #[test]
    fn appends_after_a_drain_go_to_the_next_one() {
        let (buffer, batcher, _tx) = batcher(Duration::from_secs(1), false);
        buffer.append(PathBuf::from("/first.go"));
        let first = batcher.drain_now();
        buffer.append(PathBuf::from("/second.go"));
        let second = batcher.drain_now();

        assert_eq!(first, ChangeSet::from([PathBuf::from("/first.go")]));
        assert_eq!(second, ChangeSet::from([PathBuf::from("/second.go")]));
    }

    #[test]
    fn concurrent_appends_are_never_lost() {
        let (buffer, batcher, _tx) = batcher(Duration::from_secs(1), false);
        let producers: Vec<_> = (0..4)
            .map(|t| {
                let buffer = buffer.clone();
                std::thread::spawn(move || {
                    for i in 0..250 {
                        buffer.append(PathBuf::from(format!("/t{}/f{}.py", t, i)));
                    }
                })
            })
            .collect();

        let mut seen = ChangeSet::new();
        let mut total = 0;
        while producers.iter().any(|p| !p.is_finished()) {
            let drained = batcher.drain_now();
            total += drained.len();
            seen.extend(drained);
        }
        for producer in producers {
            producer.join().unwrap();
        }
        let drained = batcher.drain_now();
        total += drained.len();
        seen.extend(drained);

        assert_eq!(seen.len(), 1000);
        assert_eq!(total, 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn drain_waits_for_the_window() {
        let (buffer, batcher, _tx) = batcher(Duration::from_secs(1), false);
        buffer.append(PathBuf::from("/app/main.go"));

        let started = tokio::time::Instant::now();
        let changes = batcher.drain().await;
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_eq!(changes.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_idle_drains_are_empty() {
        let (_buffer, batcher, _tx) = batcher(Duration::from_secs(1), false);
        assert!(batcher.drain().await.is_empty());
        assert!(batcher.drain().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn appends_during_the_window_are_included() {
        let (buffer, batcher, _tx) = batcher(Duration::from_millis(500), false);

        let producer = {
            let buffer = buffer.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                buffer.append(PathBuf::from("/app/views.py"));
                buffer.append(PathBuf::from("/app/views.py"));
            })
        };

        let changes = batcher.drain().await;
        producer.await.unwrap();
        assert_eq!(changes, ChangeSet::from([PathBuf::from("/app/views.py")]));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_does_not_cut_the_window_by_default() {
        let (buffer, batcher, tx) = batcher(Duration::from_secs(1), false);
        buffer.append(PathBuf::from("/a.yaml"));

        let started = tokio::time::Instant::now();
        let drain = tokio::spawn(async move { batcher.drain().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.send(true).unwrap();

        let changes = drain.await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_eq!(changes.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_the_window_when_enabled() {
        let (buffer, batcher, tx) = batcher(Duration::from_secs(60), true);
        buffer.append(PathBuf::from("/a.yaml"));

        let started = tokio::time::Instant::now();
        let drain = tokio::spawn(async move { batcher.drain().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.send(true).unwrap();

        let changes = drain.await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(60));
        assert_eq!(changes, ChangeSet::from([PathBuf::from("/a.yaml")]));
    }

    #[tokio::test(start_paused = true)]
    async fn drains_after_shutdown_still_wait_the_window() {
        let (buffer, batcher, tx) = batcher(Duration::from_secs(1), true);
        tx.send(true).unwrap();

        for _ in 0..2 {
            buffer.append(PathBuf::from("/late.py"));
            let started = tokio::time::Instant::now();
            let changes = batcher.drain().await;
            assert!(started.elapsed() >= Duration::from_secs(1));
            assert_eq!(changes.len(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn drains_keep_their_pace_once_the_sender_is_gone() {
        let (_buffer, batcher, tx) = batcher(Duration::from_secs(1), true);
        drop(tx);

        for _ in 0..2 {
            let started = tokio::time::Instant::now();
            assert!(batcher.drain().await.is_empty());
            assert!(started.elapsed() >= Duration::from_secs(1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sender_dropped_mid_wait_does_not_cut_the_window() {
        let (_buffer, batcher, tx) = batcher(Duration::from_secs(1), true);

        let started = tokio::time::Instant::now();
        let drain = tokio::spawn(async move { batcher.drain().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(tx);

        drain.await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[test]
    fn drain_now_does_not_wait() {
        let (_buffer, batcher, _tx) = batcher(Duration::from_secs(3600), false);
        let started = Instant::now();
        batcher.drain_now();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(batcher.window(), Duration::from_secs(3600));
    }
}
