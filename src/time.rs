//! Host-side cadence timers for the time-driven actions.
//!
//! `draw_web()` calls at ~60fps. The reducer settles income from wall-clock
//! time, so the scheduler only decides *when* to dispatch: each cadence fires
//! at most once per poll no matter how long the tab was backgrounded.

use crate::miner::actions::Action;
use crate::miner::events;
use crate::miner::state::{GameState, Millis};

/// Dispatch periods in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchedulerConfig {
    pub income_ms: Millis,
    pub event_ms: Millis,
    pub leaderboard_ms: Millis,
    pub expiry_ms: Millis,
    pub autosave_ms: Millis,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            income_ms: 1_000,
            event_ms: 10_000,
            leaderboard_ms: 5_000,
            expiry_ms: 1_000,
            autosave_ms: 30_000,
        }
    }
}

/// One periodic timer.
#[derive(Clone, Debug)]
struct Cadence {
    period: Millis,
    next_due: Option<Millis>,
}

impl Cadence {
    fn new(period: Millis) -> Self {
        Self {
            period: period.max(1),
            next_due: None,
        }
    }

    /// Whether the timer fires at `now`. The first call only arms it.
    fn fire(&mut self, now: Millis) -> bool {
        match self.next_due {
            None => {
                self.next_due = Some(now + self.period);
                false
            }
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period);
                true
            }
            // Clock went backwards past a whole period: re-arm.
            Some(due) if due > now + self.period => {
                self.next_due = Some(now + self.period);
                false
            }
            Some(_) => false,
        }
    }
}

/// What the host should do after a poll.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tick {
    pub actions: Vec<Action>,
    pub autosave: bool,
}

pub struct Scheduler {
    income: Cadence,
    events: Cadence,
    leaderboard: Cadence,
    expiry: Cadence,
    autosave: Cadence,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            income: Cadence::new(config.income_ms),
            events: Cadence::new(config.event_ms),
            leaderboard: Cadence::new(config.leaderboard_ms),
            expiry: Cadence::new(config.expiry_ms),
            autosave: Cadence::new(config.autosave_ms),
        }
    }

    /// Actions due at `now`, in dispatch order.
    ///
    /// Expired events are resolved before income is collected so the
    /// modifier stops applying as early as possible.
    pub fn poll(&mut self, now: Millis, state: &GameState) -> Tick {
        let mut tick = Tick::default();

        if self.expiry.fire(now) {
            tick.actions.extend(
                events::expired(&state.active_events, now)
                    .into_iter()
                    .map(Action::ResolveEvent),
            );
        }
        if self.income.fire(now) {
            tick.actions.push(Action::CollectPassiveIncome);
        }
        if self.events.fire(now) {
            tick.actions.push(Action::TriggerRandomEvent);
        }
        if self.leaderboard.fire(now) {
            tick.actions.push(Action::UpdateLeaderboard);
        }
        tick.autosave = self.autosave.fire(now);
        tick
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
