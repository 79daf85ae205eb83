use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A cancellable job that runs a tick immediately and then once per period on
/// its own thread.
///
/// A tick that panics is logged and the schedule carries on with the next slot.
///
/// The resource the ticks operate on is created by a setup closure on the job
/// thread itself, so it never has to be `Send`. It is dropped on that thread
/// when the job stops, before [`PeriodicJob::stop`] returns.
pub struct PeriodicJob {
    name: String,
    stop_sender: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicJob {
    /// Runs `setup` on a new thread and waits for its result. If setup fails the
    /// thread exits without ticking and the error is returned.
    pub fn spawn<T, E, S, F>(name: &str, period: Duration, setup: S, mut tick: F) -> Result<Self, E>
    where
        T: 'static,
        E: Send + 'static,
        S: FnOnce() -> Result<T, E> + Send + 'static,
        F: FnMut(&mut T) + Send + 'static,
    {
        let (stop_sender, stop_receiver) = mpsc::channel::<()>();
        let (ready_sender, ready_receiver) = mpsc::sync_channel::<Result<(), E>>(1);
        let job_name = name.to_string();

        let handle = thread::spawn(move || {
            let mut resource = match setup() {
                Ok(resource) => {
                    let _ = ready_sender.send(Ok(()));
                    resource
                }
                Err(e) => {
                    let _ = ready_sender.send(Err(e));
                    return;
                }
            };

            let started = Instant::now();
            let mut next_deadline = started;

            loop {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| tick(&mut resource))) {
                    log::error!("{}: tick panicked: {}", job_name, panic_message(payload.as_ref()));
                }

                next_deadline += period;
                let now = Instant::now();
                if now > next_deadline {
                    log::warn!(
                        "{}: tick overran its {:?} period, skipping ahead to the next slot",
                        job_name,
                        period
                    );
                    next_deadline = next_slot(started, period, now);
                }

                let wait = next_deadline.saturating_duration_since(Instant::now());
                match stop_receiver.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            log::debug!("{}: stopped", job_name);
        });

        match ready_receiver.recv() {
            Ok(Ok(())) => Ok(Self {
                name: name.to_string(),
                stop_sender,
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                // The ready sender only goes away unanswered when setup panicked.
                let payload = handle
                    .join()
                    .err()
                    .unwrap_or_else(|| Box::new("periodic job setup ended without reporting") as Box<dyn Any + Send>);
                panic::resume_unwind(payload)
            }
        }
    }

    /// Cancels the job and waits for the running tick, if any, to finish.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.stop_sender.send(());
            if handle.join().is_err() {
                log::error!("{}: job thread panicked", self.name);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

/// First instant on the `started + k * period` grid that lies strictly after `now`.
pub(crate) fn next_slot(started: Instant, period: Duration, now: Instant) -> Instant {
    let period_nanos = period.as_nanos().max(1);
    let elapsed = now.saturating_duration_since(started).as_nanos();
    let slot = (elapsed / period_nanos + 1) * period_nanos;
    started + Duration::from_nanos(u64::try_from(slot).unwrap_or(u64::MAX))
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Drop for PeriodicJob {
    fn drop(&mut self) {
        self.stop();
    }
}
