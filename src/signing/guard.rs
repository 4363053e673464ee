//! Signer guard - runs signer calls, optionally under a deadline
//!
//! The signer is the only blocking boundary of the attestor. Errors, panics
//! and missed deadlines all come back as `Err` so the caller can degrade to
//! an unsigned block.
//!
//! With a deadline, calls go to one long-lived worker thread. A call that
//! misses its deadline keeps that worker busy; until it returns, later calls
//! are refused instead of queued, so a stalled signer holds at most one
//! thread. The late result is discarded.

use crate::core::errors::{AttestError, Result};
use crate::core::traits::Signer;
use crate::utils::constants::SIGNER_THREAD_NAME;

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A signer plus the deadline policy used to call it.
pub struct SignerGuard {
    signer: Arc<dyn Signer>,
    timeout_ms: Option<u64>,
    worker: Option<SignerWorker>,
}

struct SignerWorker {
    requests: SyncSender<String>,
    results: Receiver<Result<String>>,
    in_flight: bool,
}

impl fmt::Debug for SignerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerGuard")
            .field("algorithm", &self.signer.algorithm())
            .field("timeout_ms", &self.timeout_ms)
            .field("worker_running", &self.worker.is_some())
            .field(
                "in_flight",
                &self.worker.as_ref().is_some_and(|worker| worker.in_flight),
            )
            .finish()
    }
}

impl SignerGuard {
    /// `timeout_ms = None` runs the signer inline on the caller's thread.
    pub fn new(signer: Arc<dyn Signer>, timeout_ms: Option<u64>) -> Self {
        Self {
            signer,
            timeout_ms,
            worker: None,
        }
    }

    pub fn signer(&self) -> &Arc<dyn Signer> {
        &self.signer
    }

    pub fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }

    /// True while a call that missed its deadline is still running.
    pub fn is_busy(&mut self) -> bool {
        match self.worker.as_mut() {
            Some(worker) => worker.poll_in_flight().is_err(),
            None => false,
        }
    }

    pub fn sign(&mut self, data: &str) -> Result<String> {
        let Some(timeout_ms) = self.timeout_ms else {
            return sign_catching_panics(self.signer.as_ref(), data);
        };

        let worker = match self.worker.take() {
            Some(worker) => worker,
            None => SignerWorker::spawn(Arc::clone(&self.signer))?,
        };
        let worker = self.worker.insert(worker);
        worker.poll_in_flight()?;
        worker.submit(data)?;

        match worker.results.recv_timeout(Duration::from_millis(timeout_ms)) {
            Ok(result) => {
                worker.in_flight = false;
                result
            }
            Err(RecvTimeoutError::Timeout) => Err(AttestError::SignerTimeout { timeout_ms }),
            Err(RecvTimeoutError::Disconnected) => {
                self.worker = None;
                Err(AttestError::SignerFailed {
                    reason: "Signer thread exited without a result".into(),
                })
            }
        }
    }
}

impl SignerWorker {
    fn spawn(signer: Arc<dyn Signer>) -> Result<Self> {
        let (requests, request_rx) = mpsc::sync_channel::<String>(1);
        let (result_tx, results) = mpsc::sync_channel(1);

        thread::Builder::new()
            .name(SIGNER_THREAD_NAME.into())
            .spawn(move || {
                // Ends when the guard drops its request sender
                for data in request_rx {
                    let result = sign_catching_panics(signer.as_ref(), &data);
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| AttestError::SignerFailed {
                reason: format!("Cannot spawn signer thread: {}", e),
            })?;

        Ok(Self {
            requests,
            results,
            in_flight: false,
        })
    }

    /// Drain the late result of a timed-out call, if it has arrived.
    fn poll_in_flight(&mut self) -> Result<()> {
        if !self.in_flight {
            return Ok(());
        }
        match self.results.try_recv() {
            Ok(_late) => {
                self.in_flight = false;
                Ok(())
            }
            Err(TryRecvError::Empty) => Err(AttestError::SignerFailed {
                reason: "Previous signer call is still running".into(),
            }),
            Err(TryRecvError::Disconnected) => Err(AttestError::SignerFailed {
                reason: "Signer thread exited without a result".into(),
            }),
        }
    }

    fn submit(&mut self, data: &str) -> Result<()> {
        self.requests
            .try_send(data.to_owned())
            .map_err(|e| AttestError::SignerFailed {
                reason: format!("Signer thread not accepting requests: {}", e),
            })?;
        self.in_flight = true;
        Ok(())
    }
}

fn sign_catching_panics(signer: &dyn Signer, data: &str) -> Result<String> {
    panic::catch_unwind(AssertUnwindSafe(|| signer.sign(data))).unwrap_or_else(|payload| {
        Err(AttestError::SignerFailed {
            reason: panic_reason(payload.as_ref()),
        })
    })
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("Signer panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("Signer panicked: {}", message)
    } else {
        "Signer panicked".into()
    }
}
