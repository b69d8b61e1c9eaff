//! Random event lifecycle: cooldown gate, roll, instantiation, and effects.

use super::state::{
    EventEffect, EventInstance, EventInstanceId, EventTemplate, GameState, Millis,
    EVENT_CHANCE, EVENT_COOLDOWN_MS,
};

/// Outcome of a trigger attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum Trigger {
    /// Still inside the cooldown window; nothing changes.
    CoolingDown,
    /// Off cooldown but the roll failed; only the cooldown re-arms.
    Missed,
    /// A template was picked and instantiated.
    Fired(EventInstance),
}

pub fn on_cooldown(state: &GameState, now: Millis) -> bool {
    now.saturating_sub(state.last_event_time) < EVENT_COOLDOWN_MS
}

/// Roll for an event and pick a template, advancing the state's RNG.
pub fn roll(state: &mut GameState, templates: &[EventTemplate], now: Millis) -> Trigger {
    if on_cooldown(state, now) {
        return Trigger::CoolingDown;
    }
    if templates.is_empty() || state.next_unit() >= EVENT_CHANCE {
        return Trigger::Missed;
    }
    let idx = state.next_random() as usize % templates.len();
    Trigger::Fired(instantiate(&templates[idx], now))
}

pub fn instantiate(template: &EventTemplate, now: Millis) -> EventInstance {
    EventInstance {
        id: EventInstanceId {
            template_id: template.id,
            triggered_at: now,
        },
        title: template.title.to_string(),
        description: template.description.to_string(),
        tone: template.tone,
        effect: template.effect,
        value: template.value,
        duration_secs: template.duration_secs.unwrap_or(0),
    }
}

/// Stat changes of an instant event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatDelta {
    pub bitcoin: f64,
    pub cash: f64,
    pub experience: f64,
}

/// Resolve an instant event's value against the current stats.
///
/// Hashrate events only act while active, so instantly they change nothing.
pub fn instant_delta(state: &GameState, event: &EventInstance) -> StatDelta {
    let scaled = |current: f64| {
        if event.value < 1.0 {
            current * event.value
        } else {
            event.value
        }
    };
    match event.effect {
        EventEffect::Bitcoin => StatDelta {
            bitcoin: scaled(state.bitcoin),
            ..StatDelta::default()
        },
        EventEffect::Cash => StatDelta {
            cash: scaled(state.cash),
            ..StatDelta::default()
        },
        EventEffect::Experience => StatDelta {
            experience: event.value.max(0.0),
            ..StatDelta::default()
        },
        EventEffect::Hashrate => StatDelta::default(),
    }
}

/// Ids of active events whose duration has run out at `now`.
pub fn expired(events: &[EventInstance], now: Millis) -> Vec<EventInstanceId> {
    events
        .iter()
        .filter(|e| e.is_expired(now))
        .map(|e| e.id)
        .collect()
}
