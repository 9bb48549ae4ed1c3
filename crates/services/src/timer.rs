//! Countdown scheduling. The controller owns countdown state; a scheduler only
//! reports the passage of time back to it as [`TimerEvent`]s.

use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Generation id of one countdown. Events carrying an older ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimerTicket(u64);

impl TimerTicket {
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { ticket: TimerTicket, remaining: Duration },
    Expired { ticket: TimerTicket },
}

impl TimerEvent {
    #[must_use]
    pub fn ticket(&self) -> TimerTicket {
        match self {
            TimerEvent::Tick { ticket, .. } | TimerEvent::Expired { ticket } => *ticket,
        }
    }
}

/// Runs countdowns on behalf of the controller.
pub trait CountdownScheduler: Send + Sync {
    /// Begin counting `duration` down for `ticket`.
    fn start(&self, ticket: TimerTicket, duration: Duration);

    /// Stop the countdown for `ticket`; no further events may be sent for it.
    fn cancel(&self, ticket: TimerTicket);
}

const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Countdown scheduler backed by tokio tasks.
///
/// At most one countdown task runs; starting a new one aborts the old one.
#[derive(Debug)]
pub struct TokioCountdownScheduler {
    events: mpsc::UnboundedSender<TimerEvent>,
    tick: Duration,
    running: Mutex<Option<(TimerTicket, JoinHandle<()>)>>,
}

impl TokioCountdownScheduler {
    #[must_use]
    pub fn new(events: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            events,
            tick: DEFAULT_TICK,
            running: Mutex::new(None),
        }
    }

    /// A scheduler together with the receiver its events arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    #[must_use]
    pub fn with_tick_interval(mut self, tick: Duration) -> Self {
        if !tick.is_zero() {
            self.tick = tick;
        }
        self
    }

    /// Ticket of the countdown task that has been started and not cancelled.
    #[must_use]
    pub fn running_ticket(&self) -> Option<TimerTicket> {
        self.slot()
            .as_ref()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(ticket, _)| *ticket)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<(TimerTicket, JoinHandle<()>)>> {
        match self.running.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl CountdownScheduler for TokioCountdownScheduler {
    fn start(&self, ticket: TimerTicket, duration: Duration) {
        let mut slot = self.slot();
        if let Some((previous, handle)) = slot.take() {
            handle.abort();
            log::debug!("countdown {} replaced by {}", previous.value(), ticket.value());
        }
        let task = tokio::spawn(run_countdown(ticket, duration, self.tick, self.events.clone()));
        *slot = Some((ticket, task));
    }

    fn cancel(&self, ticket: TimerTicket) {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|(running, _)| *running == ticket) {
            if let Some((_, handle)) = slot.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for TokioCountdownScheduler {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.slot().take() {
            handle.abort();
        }
    }
}

async fn run_countdown(
    ticket: TimerTicket,
    duration: Duration,
    tick: Duration,
    events: mpsc::UnboundedSender<TimerEvent>,
) {
    let mut remaining = duration;
    while !remaining.is_zero() {
        let step = remaining.min(tick);
        tokio::time::sleep(step).await;
        remaining = remaining.saturating_sub(step);
        if remaining.is_zero() {
            break;
        }
        if events.send(TimerEvent::Tick { ticket, remaining }).is_err() {
            return;
        }
    }
    let _ = events.send(TimerEvent::Expired { ticket });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_every_second_then_expires() {
        let (scheduler, mut rx) = TokioCountdownScheduler::channel();
        let ticket = TimerTicket::new(1);
        scheduler.start(ticket, Duration::from_secs(3));

        assert_eq!(
            rx.recv().await,
            Some(TimerEvent::Tick {
                ticket,
                remaining: Duration::from_secs(2)
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(TimerEvent::Tick {
                ticket,
                remaining: Duration::from_secs(1)
            })
        );
        assert_eq!(rx.recv().await, Some(TimerEvent::Expired { ticket }));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_expires_immediately() {
        let (scheduler, mut rx) = TokioCountdownScheduler::channel();
        let ticket = TimerTicket::new(4);
        scheduler.start(ticket, Duration::ZERO);
        assert_eq!(rx.recv().await, Some(TimerEvent::Expired { ticket }));
    }

    #[tokio::test(start_paused = true)]
    async fn starting_a_new_countdown_silences_the_old_one() {
        let (scheduler, mut rx) = TokioCountdownScheduler::channel();
        let first = TimerTicket::new(1);
        let second = first.next();
        scheduler.start(first, Duration::from_secs(1));
        scheduler.start(second, Duration::from_secs(2));
        assert_eq!(scheduler.running_ticket(), Some(second));

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            seen.push(event.ticket());
            if matches!(event, TimerEvent::Expired { .. }) {
                break;
            }
        }
        assert!(seen.iter().all(|t| *t == second));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_events() {
        let (scheduler, mut rx) = TokioCountdownScheduler::channel();
        let ticket = TimerTicket::new(7);
        scheduler.start(ticket, Duration::from_secs(5));
        scheduler.cancel(ticket);
        assert_eq!(scheduler.running_ticket(), None);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_a_stale_ticket_keeps_the_current_one() {
        let (scheduler, _rx) = TokioCountdownScheduler::channel();
        scheduler.start(TimerTicket::new(2), Duration::from_secs(5));
        scheduler.cancel(TimerTicket::new(1));
        assert_eq!(scheduler.running_ticket(), Some(TimerTicket::new(2)));
    }
}
