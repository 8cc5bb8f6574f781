//! Meeting timer.
//!
//! # Responsibility
//! - Track elapsed meeting seconds through an explicit phase machine.
//! - Own the periodic tick source and release it whenever the machine
//!   leaves `Running`.
//!
//! # Invariants
//! - `elapsed_seconds` grows only in `Running` and resets to zero on the
//!   way back to `Idle`.
//! - At most one ticker thread exists per controller; dropping the
//!   controller (or the ticker) stops and joins it.
//! - A stale tick from a just-released ticker never counts.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;

/// Wall-clock gap between autonomous ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Where tick events come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickMode {
    /// A background thread emits one event per second while running.
    #[default]
    Interval,
    /// No thread; the caller injects ticks. Meant for tests and scripted
    /// runs.
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Nothing running, nothing accrued.
    Idle,
    /// Accruing time and cost.
    Running,
    /// Suspended; elapsed time is retained.
    Paused,
    /// Ended with accrued cost; waiting for save or discard.
    AwaitingDisposition,
}

impl Display for TimerPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::AwaitingDisposition => "awaiting-disposition",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    InvalidTransition {
        from: TimerPhase,
        operation: &'static str,
    },
}

impl Display for TimerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerError::InvalidTransition { from, operation } => {
                write!(f, "cannot {operation} while the timer is {from}")
            }
        }
    }
}

impl Error for TimerError {}

/// What ending a meeting resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOutcome {
    /// Cost accrued; a save-or-discard decision is now pending.
    AwaitingDisposition,
    /// Nothing accrued; the timer reset straight back to idle.
    DiscardedSilently,
}

/// Phase machine plus tick source.
///
/// The controller itself is single-threaded; the only cross-thread traffic
/// is the ticker's event channel, drained via [`TimerController::poll_ticks`].
#[derive(Debug)]
pub struct TimerController {
    phase: TimerPhase,
    elapsed_seconds: u64,
    tick_mode: TickMode,
    ticker: Option<Ticker>,
}

impl TimerController {
    pub fn new(tick_mode: TickMode) -> Self {
        Self {
            phase: TimerPhase::Idle,
            elapsed_seconds: 0,
            tick_mode,
            ticker: None,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn is_active(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Starts or resumes accrual. Starting while already running is a
    /// no-op. Whether any participants exist is the session's concern, not
    /// the timer's.
    ///
    /// # Errors
    /// [`TimerError::InvalidTransition`] from `AwaitingDisposition`; the
    /// pending decision must be resolved or resumed first.
    pub fn start(&mut self) -> Result<(), TimerError> {
        match self.phase {
            TimerPhase::Running => Ok(()),
            TimerPhase::Idle | TimerPhase::Paused => {
                debug!(
                    "event=timer_start module=timer status=ok from={} elapsed={}",
                    self.phase, self.elapsed_seconds
                );
                self.phase = TimerPhase::Running;
                self.engage_ticker();
                Ok(())
            }
            TimerPhase::AwaitingDisposition => Err(TimerError::InvalidTransition {
                from: self.phase,
                operation: "start",
            }),
        }
    }

    /// Applies one elapsed second. Ignored outside `Running`.
    pub fn tick(&mut self) {
        if self.phase == TimerPhase::Running {
            self.elapsed_seconds += 1;
        }
    }

    /// Drains queued ticker events into elapsed time; returns how many
    /// seconds were applied.
    ///
    /// Interval-mode callers invoke this from their own loop; manual mode
    /// always returns zero.
    pub fn poll_ticks(&mut self) -> u32 {
        let pending = match &self.ticker {
            Some(ticker) => ticker.drain(),
            None => 0,
        };
        let mut applied = 0;
        for _ in 0..pending {
            if self.phase == TimerPhase::Running {
                self.elapsed_seconds += 1;
                applied += 1;
            }
        }
        applied
    }

    /// Suspends accrual, keeping elapsed time. No-op outside `Running`.
    pub fn pause(&mut self) {
        if self.phase == TimerPhase::Running {
            self.phase = TimerPhase::Paused;
            self.release_ticker();
            debug!(
                "event=timer_pause module=timer status=ok elapsed={}",
                self.elapsed_seconds
            );
        }
    }

    /// Stops the meeting. With accrued cost a disposition becomes pending;
    /// otherwise the timer resets silently.
    ///
    /// `accrued_cost` is the total computed by the session at the moment
    /// of ending; the timer only needs it to tell the two outcomes apart.
    ///
    /// # Errors
    /// [`TimerError::InvalidTransition`] unless the timer is `Running` or
    /// `Paused`.
    pub fn end(&mut self, accrued_cost: f64) -> Result<EndOutcome, TimerError> {
        match self.phase {
            TimerPhase::Running | TimerPhase::Paused => {
                self.release_ticker();
                let outcome = if self.elapsed_seconds > 0 && accrued_cost > 0.0 {
                    self.phase = TimerPhase::AwaitingDisposition;
                    EndOutcome::AwaitingDisposition
                } else {
                    self.reset();
                    EndOutcome::DiscardedSilently
                };
                debug!(
                    "event=timer_end module=timer status=ok outcome={outcome:?} elapsed={}",
                    self.elapsed_seconds
                );
                Ok(outcome)
            }
            from => Err(TimerError::InvalidTransition {
                from,
                operation: "end",
            }),
        }
    }

    /// Cancels a pending disposition and restarts accrual from the
    /// retained elapsed time.
    ///
    /// # Errors
    /// [`TimerError::InvalidTransition`] unless a disposition is pending.
    pub fn resume(&mut self) -> Result<(), TimerError> {
        match self.phase {
            TimerPhase::AwaitingDisposition => {
                self.phase = TimerPhase::Running;
                self.engage_ticker();
                Ok(())
            }
            from => Err(TimerError::InvalidTransition {
                from,
                operation: "resume",
            }),
        }
    }

    /// Resolves a pending disposition back to idle, after the caller has
    /// saved or discarded the meeting.
    ///
    /// # Errors
    /// [`TimerError::InvalidTransition`] unless a disposition is pending.
    pub fn resolve_disposition(&mut self) -> Result<(), TimerError> {
        match self.phase {
            TimerPhase::AwaitingDisposition => {
                self.reset();
                Ok(())
            }
            from => Err(TimerError::InvalidTransition {
                from,
                operation: "resolve the disposition",
            }),
        }
    }

    fn reset(&mut self) {
        self.phase = TimerPhase::Idle;
        self.elapsed_seconds = 0;
        self.release_ticker();
    }

    fn engage_ticker(&mut self) {
        if self.tick_mode == TickMode::Manual || self.ticker.is_some() {
            return;
        }
        self.ticker = Some(Ticker::spawn(TICK_INTERVAL));
    }

    fn release_ticker(&mut self) {
        // Dropping the handle stops and joins the thread.
        self.ticker = None;
    }
}

/// Background one-per-interval tick source.
///
/// The thread parks on a control channel with a timeout; every timeout
/// emits one tick event. Sending on the control channel (or dropping the
/// handle) wakes and ends the thread.
#[derive(Debug)]
struct Ticker {
    stop_tx: Sender<()>,
    ticks_rx: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    fn spawn(interval: Duration) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (ticks_tx, ticks_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if ticks_tx.send(()).is_err() {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        Self {
            stop_tx,
            ticks_rx,
            handle: Some(handle),
        }
    }

    /// Takes every queued tick event off the channel.
    fn drain(&self) -> u32 {
        let mut pending = 0;
        while self.ticks_rx.try_recv().is_ok() {
            pending += 1;
        }
        pending
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
