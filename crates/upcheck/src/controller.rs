//! Runs one update check at a time in the background.
//!
//! The host starts a check, keeps doing its own work, and later receives a
//! [`ControllerEvent`] on the completion channel. Cancelling fires the shared
//! [`CancellationToken`]; the in-flight check is abandoned and only
//! [`ControllerEvent::Cancelled`] is delivered.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use log::{debug, error, info};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use upcheck_core::{CheckError, UpdateChecker, UpdateInfo, VersionInfo, messages};

/// Outcome of a finished check as the host sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Results {
    pub was_check_successful: bool,
    pub error_message: String,
    pub update_info: UpdateInfo,
}

impl Results {
    #[must_use]
    pub fn from_check(result: Result<UpdateInfo, CheckError>) -> Self {
        match result {
            Ok(update_info) => Self {
                was_check_successful: true,
                error_message: String::new(),
                update_info,
            },
            Err(error) => Self::failed(error.to_string()),
        }
    }

    /// Result of a check that died without returning, e.g. by panicking.
    #[must_use]
    pub fn unknown_error(details: &str) -> Self {
        Self::failed(format!("{} {details}", messages::UNKNOWN_ERROR_OCCURRED))
    }

    fn failed(error_message: String) -> Self {
        Self {
            was_check_successful: false,
            error_message,
            update_info: UpdateInfo::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    Completed(Results),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("an update check is already running")]
    Busy,
    #[error("this controller was cancelled; create a new one to check again")]
    Cancelled,
}

/// What to check: the running version and where its manifest lives.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub current: VersionInfo,
    pub location: String,
    pub file_name: String,
}

pub struct UpdateCheckController {
    checker: UpdateChecker,
    request: CheckRequest,
    runtime: Handle,
    cancel: CancellationToken,
    sender: Sender<ControllerEvent>,
    receiver: Receiver<ControllerEvent>,
    running: Arc<AtomicBool>,
}

impl UpdateCheckController {
    /// `cancel` should be the same token handed to any fetcher that supports
    /// cancellation, so that cancelling here also stops it.
    #[must_use]
    pub fn new(
        checker: UpdateChecker,
        request: CheckRequest,
        runtime: Handle,
        cancel: CancellationToken,
    ) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            checker,
            request,
            runtime,
            cancel,
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cleared before the completion event is sent, so a host that has
    /// received the event can start again immediately.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Start a check on the runtime.
    ///
    /// # Errors
    /// [`ControllerError::Busy`] while a check is in flight and
    /// [`ControllerError::Cancelled`] once the controller has been cancelled.
    pub fn start(&mut self) -> Result<(), ControllerError> {
        if self.is_cancelled() {
            return Err(ControllerError::Cancelled);
        }
        if self.is_running() {
            return Err(ControllerError::Busy);
        }

        let checker = self.checker.clone();
        let request = self.request.clone();
        let token = self.cancel.clone();
        let sender = self.sender.clone();
        let running = Arc::clone(&self.running);

        debug!(
            "Starting background update check against {}",
            request.location
        );
        running.store(true, Ordering::Release);
        self.runtime.spawn(async move {
            let mut check = tokio::spawn(async move {
                checker
                    .check_for_updates(request.current, &request.location, &request.file_name)
                    .await
            });

            let event = tokio::select! {
                () = token.cancelled() => {
                    check.abort();
                    ControllerEvent::Cancelled
                }
                joined = &mut check => {
                    if token.is_cancelled() {
                        ControllerEvent::Cancelled
                    } else {
                        ControllerEvent::Completed(match joined {
                            Ok(result) => Results::from_check(result),
                            Err(join_error) => abandoned_check(join_error),
                        })
                    }
                }
            };

            running.store(false, Ordering::Release);
            let _ = sender.send(event);
        });

        Ok(())
    }

    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            info!("Cancelling update check");
            self.cancel.cancel();
        }
    }

    pub fn events(&self) -> &Receiver<ControllerEvent> {
        &self.receiver
    }

    /// Block until the running check reports, or until `timeout` elapses.
    pub fn wait(&self, timeout: Option<Duration>) -> Option<ControllerEvent> {
        match timeout {
            Some(timeout) => match self.receiver.recv_timeout(timeout) {
                Ok(event) => Some(event),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
            },
            None => self.receiver.recv().ok(),
        }
    }
}

fn abandoned_check(join_error: JoinError) -> Results {
    let details = match join_error.try_into_panic() {
        Ok(payload) => panic_message(payload.as_ref()),
        Err(join_error) => join_error.to_string(),
    };
    error!("Update check task failed: {details}");
    Results::unknown_error(&details)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "the check panicked".to_string()
    }
}

impl Drop for UpdateCheckController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
