//! # Tail Stream
//!
//! Producer/consumer wrapper around [`TailScanner`]. The scanner runs on its
//! own thread and hands lines over a bounded channel; the terminal error, if
//! any, travels on a separate single-slot channel.

use std::any::Any;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender, bounded, select};
use tracing::{debug, info, warn};

use super::{ScanOutcome, ScanStats, TailOptions, TailScanner};
use crate::error::TailError;
use crate::filter::FilterSet;
use crate::source::{LogSource, RewindGuard};

/// Stops a running scan. Cheap to clone; any clone cancels the same scan.
#[derive(Clone)]
pub struct Canceller {
    flag: Arc<AtomicBool>,
    wake: Sender<()>,
}

impl Canceller {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
        let _ = self.wake.try_send(());
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Handle to a scan running on a producer thread.
pub struct TailStream {
    lines: Receiver<String>,
    errors: Receiver<TailError>,
    canceller: Canceller,
    handle: Option<thread::JoinHandle<Result<ScanStats, TailError>>>,
}

impl TailStream {
    /// Lines, newest first. Closed when the scan ends.
    pub fn lines(&self) -> &Receiver<String> {
        &self.lines
    }

    /// Yields at most one error, then closes.
    pub fn errors(&self) -> &Receiver<TailError> {
        &self.errors
    }

    pub fn canceller(&self) -> Canceller {
        self.canceller.clone()
    }

    pub fn cancel(&self) {
        self.canceller.cancel();
    }

    /// Stop the producer if it is still running, wait for it and report how
    /// the scan ended. A terminal error is returned here even if it was
    /// already taken from [`TailStream::errors`].
    pub fn finish(mut self) -> Result<ScanStats, TailError> {
        self.canceller.cancel();
        let Some(handle) = self.handle.take() else {
            return Err(TailError::MalformedState(
                "tail producer already joined".to_string(),
            ));
        };
        let result = handle
            .join()
            .map_err(|_| TailError::MalformedState("tail producer panicked".to_string()))?;
        result.map_err(|copy| self.errors.try_recv().unwrap_or(copy))
    }
}

impl Drop for TailStream {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.canceller.cancel();
        }
    }
}

/// Start scanning `source` on a producer thread and return immediately.
pub fn scan<S>(source: S, options: &TailOptions, filters: Arc<FilterSet>) -> TailStream
where
    S: LogSource + 'static,
{
    let (line_tx, line_rx) = bounded::<String>(options.channel_capacity);
    let (err_tx, err_rx) = bounded::<TailError>(1);
    let (wake_tx, wake_rx) = bounded::<()>(1);
    let canceller = Canceller {
        flag: Arc::new(AtomicBool::new(false)),
        wake: wake_tx,
    };
    let flag = canceller.flag.clone();
    let stop = canceller.flag.clone();
    let options = options.clone();

    let handle = thread::spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _rewind = RewindGuard::new(&source);
            TailScanner::new(&source, &filters, &options).and_then(|scanner| {
                scanner.with_cancel_flag(flag).run(|line| {
                    if stop.load(Ordering::Relaxed) {
                        return ControlFlow::Break(());
                    }
                    select! {
                        send(line_tx, line.text) -> res => match res {
                            Ok(()) => ControlFlow::Continue(()),
                            Err(_) => {
                                debug!("line receiver dropped; stopping scan");
                                ControlFlow::Break(())
                            }
                        },
                        recv(wake_rx) -> _ => ControlFlow::Break(()),
                    }
                })
            })
        }))
        .unwrap_or_else(|payload| {
            Err(TailError::MalformedState(format!(
                "tail producer panicked: {}",
                panic_message(payload.as_ref())
            )))
        });
        drop(line_tx);

        match result {
            Ok(stats) => {
                if stats.outcome == ScanOutcome::Cancelled {
                    info!("tail scan cancelled after {} lines", stats.lines_emitted);
                }
                drop(err_tx);
                Ok(stats)
            }
            Err(err) => {
                warn!("tail scan failed: {err}");
                let copy = err.duplicate();
                let _ = err_tx.send(err);
                drop(err_tx);
                Err(copy)
            }
        }
    });

    TailStream {
        lines: line_rx,
        errors: err_rx,
        canceller,
        handle: Some(handle),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}
