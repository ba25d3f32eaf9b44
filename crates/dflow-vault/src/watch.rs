//! Debounced change notification for a single note.
//!
//! External editors tend to save in bursts (truncate, write, rename, touch).
//! [`NoteWatcher`] collapses a burst into one callback once the note has been
//! quiet for the debounce window, so the caller re-reads it exactly once.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};

use crate::VaultError;

/// Default quiet period before a burst of changes is reported.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(75);

/// Trailing-edge debounce over a stream of change instants.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_change: Option<Instant>,
}

impl Debouncer {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_change: None,
        }
    }

    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Notes a change; each change restarts the window.
    pub const fn record(&mut self, at: Instant) {
        self.last_change = Some(at);
    }

    /// Time left until a pending burst settles; `None` when nothing is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.last_change
            .map(|last| self.window.saturating_sub(now.saturating_duration_since(last)))
    }

    /// True once a pending burst has been quiet for the whole window.
    /// Firing clears the pending state.
    pub fn ready(&mut self, now: Instant) -> bool {
        if self.remaining(now) == Some(Duration::ZERO) {
            self.last_change = None;
            true
        } else {
            false
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// Watches one note and calls back after each debounced burst of changes.
///
/// Dropping the watcher stops notification.
pub struct NoteWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl NoteWatcher {
    /// Starts watching `path`.
    ///
    /// The note's folder must exist; the note itself may not exist yet.
    pub fn spawn<F>(path: &Path, window: Duration, mut on_change: F) -> Result<Self, VaultError>
    where
        F: FnMut() + Send + 'static,
    {
        let path = path.to_path_buf();
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let file_name: Option<OsString> = path.file_name().map(ToOwned::to_owned);

        let (tx, rx) = mpsc::channel::<Instant>();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
            let Ok(event) = event else {
                return;
            };
            if matches!(event.kind, EventKind::Access(_)) {
                return;
            }
            let touches_note = event
                .paths
                .iter()
                .any(|p| p.file_name() == file_name.as_deref());
            if touches_note {
                let _ = tx.send(Instant::now());
            }
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = ?path, window_ms = window.as_millis(), "watching note");

        let watched = path.clone();
        thread::spawn(move || {
            let mut debouncer = Debouncer::new(window);
            loop {
                let received = match debouncer.remaining(Instant::now()) {
                    None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                    Some(wait) => rx.recv_timeout(wait),
                };
                match received {
                    Ok(at) => debouncer.record(at),
                    Err(RecvTimeoutError::Timeout) => {
                        if debouncer.ready(Instant::now()) {
                            tracing::debug!(path = ?watched, "note changed");
                            on_change();
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            tracing::trace!(path = ?watched, "note watcher stopped");
        });

        Ok(Self {
            path,
            _watcher: watcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for NoteWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteWatcher").field("path", &self.path).finish_non_exhaustive()
    }
}
