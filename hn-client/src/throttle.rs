//! Leading-edge throttle with a single coalesced trailing run.
//!
//! A [`Throttle`] wraps an async operation so that it starts at most once per
//! interval. The first call after an idle window runs immediately. Calls that
//! land inside the window are folded into one deferred run at the window
//! boundary, which uses the arguments of the most recent call. Each deferred
//! run answers exactly one caller: the latest one. Callers whose arguments
//! were overwritten get [`ThrottleError::Superseded`].

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{oneshot, Mutex};
use tokio::time::{sleep_until, Instant};
use tracing::debug;

type Operation<A, T> = Arc<dyn Fn(A) -> BoxFuture<'static, T> + Send + Sync>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleError {
    #[error("call was superseded by a later call in the same throttle window")]
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    Idle,
    CoolingDown,
    CoolingDownWithPending,
}

struct Pending<A, T> {
    args: A,
    reply: oneshot::Sender<T>,
}

struct Schedule<A, T> {
    last_run: Option<Instant>,
    pending: Option<Pending<A, T>>,
    // Generation of the armed deferred timer. A timer whose generation no
    // longer matches has been disarmed.
    timer: u64,
}

struct Inner<A, T> {
    interval: Duration,
    op: Operation<A, T>,
    schedule: Mutex<Schedule<A, T>>,
}

enum Dispatch<A, T> {
    Now(A),
    Deferred(oneshot::Receiver<T>),
}

pub struct Throttle<A, T> {
    inner: Arc<Inner<A, T>>,
}

impl<A, T> Clone for Throttle<A, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, T> std::fmt::Debug for Throttle<A, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("interval", &self.inner.interval)
            .finish_non_exhaustive()
    }
}

impl<A, T> Throttle<A, T>
where
    A: Send + 'static,
    T: Send + 'static,
{
    pub fn new<F, Fut>(interval: Duration, op: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let op: Operation<A, T> =
            Arc::new(move |args| Box::pin(op(args)) as BoxFuture<'static, T>);

        Self {
            inner: Arc::new(Inner {
                interval,
                op,
                schedule: Mutex::new(Schedule {
                    last_run: None,
                    pending: None,
                    timer: 0,
                }),
            }),
        }
    }

    /// Runs or schedules the operation.
    ///
    /// Returns the operation's output for the call that triggered the run,
    /// or [`ThrottleError::Superseded`] if a later call replaced this one's
    /// arguments before the deferred run started.
    pub async fn call(&self, args: A) -> Result<T, ThrottleError> {
        let dispatch = {
            let mut schedule = self.inner.schedule.lock().await;
            let now = Instant::now();
            let interval = self.inner.interval;

            let window_open = schedule
                .last_run
                .map_or(true, |last| now.duration_since(last) >= interval);

            if window_open {
                if schedule.pending.take().is_some() {
                    debug!("Throttle window elapsed before the deferred run fired, superseding it");
                }
                schedule.timer = schedule.timer.wrapping_add(1);
                schedule.last_run = Some(now);
                Dispatch::Now(args)
            } else {
                let (reply, receiver) = oneshot::channel();
                let previous = schedule.pending.replace(Pending { args, reply });

                if previous.is_some() {
                    debug!("Coalescing throttled call into the pending deferred run");
                } else {
                    let deadline = schedule
                        .last_run
                        .map_or(now, |last| last + interval);
                    schedule.timer = schedule.timer.wrapping_add(1);
                    debug!(
                        "Deferring throttled call by {:?}",
                        deadline.saturating_duration_since(now)
                    );
                    self.arm_timer(deadline, schedule.timer);
                }

                Dispatch::Deferred(receiver)
            }
        };

        match dispatch {
            Dispatch::Now(args) => Ok((self.inner.op)(args).await),
            Dispatch::Deferred(receiver) => {
                receiver.await.map_err(|_| ThrottleError::Superseded)
            }
        }
    }

    pub async fn state(&self) -> ThrottleState {
        let schedule = self.inner.schedule.lock().await;
        if schedule.pending.is_some() {
            return ThrottleState::CoolingDownWithPending;
        }

        match schedule.last_run {
            Some(last) if last.elapsed() < self.inner.interval => ThrottleState::CoolingDown,
            _ => ThrottleState::Idle,
        }
    }

    fn arm_timer(&self, deadline: Instant, generation: u64) {
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            sleep_until(deadline).await;

            let pending = {
                let mut schedule = inner.schedule.lock().await;
                if schedule.timer != generation {
                    return;
                }
                let pending = schedule.pending.take();
                if pending.is_some() {
                    schedule.last_run = Some(Instant::now());
                }
                pending
            };

            if let Some(Pending { args, reply }) = pending {
                let output = (inner.op)(args).await;
                if reply.send(output).is_err() {
                    debug!("Deferred throttled call finished after its caller went away");
                }
            }
        });
    }
}
