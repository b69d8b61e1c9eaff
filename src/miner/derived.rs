//! Derived values: aggregates recomputed from state, and display formatting.

use super::state::{
    EventEffect, EventInstance, GameState, LeaderboardEntry, Millis, Rig, BITCOIN_VALUE, MINING_RATE,
};

/// Total hashrate of the owned rigs. Always computed fresh.
pub fn calculate_total_hashrate(rigs: &[Rig]) -> f64 {
    rigs.iter().map(Rig::contribution).sum()
}

/// Cash + bitcoin at the fixed rate + owned asset prices.
pub fn net_worth(state: &GameState) -> f64 {
    let assets: f64 = state
        .assets
        .iter()
        .filter(|a| a.owned)
        .map(|a| a.price)
        .sum();
    state.cash + state.bitcoin * BITCOIN_VALUE + assets
}

/// Summed fractional modifier of the hashrate events running at `at`.
///
/// An event runs from its trigger time up to, not including, `expires_at()`.
pub fn hashrate_modifier(events: &[EventInstance], at: Millis) -> f64 {
    events
        .iter()
        .filter(|e| e.effect == EventEffect::Hashrate)
        .filter(|e| e.id.triggered_at <= at && at < e.expires_at())
        .map(|e| e.value)
        .sum()
}

/// The cached hashrate scaled by the events running at `at`.
pub fn effective_hashrate(state: &GameState, at: Millis) -> f64 {
    (state.hashrate * (1.0 + hashrate_modifier(&state.active_events, at))).max(0.0)
}

/// Bitcoin mined over `[from, to)` at the current hashrate.
///
/// The window is cut at every event boundary inside it, so a modifier only
/// pays for the stretch its event actually ran, however late settlement happens.
pub fn mined_between(state: &GameState, from: Millis, to: Millis) -> f64 {
    if to <= from {
        return 0.0;
    }
    let mut cuts = vec![from, to];
    for event in &state.active_events {
        for t in [event.id.triggered_at, event.expires_at()] {
            if t > from && t < to {
                cuts.push(t);
            }
        }
    }
    cuts.sort_unstable();
    cuts.dedup();
    cuts.windows(2)
        .map(|w| effective_hashrate(state, w[0]) * MINING_RATE * (w[1] - w[0]) as f64 / 1000.0)
        .sum()
}

/// The first `limit` leaderboard entries.
pub fn top_entries(leaderboard: &[LeaderboardEntry], limit: usize) -> &[LeaderboardEntry] {
    &leaderboard[..limit.min(leaderboard.len())]
}

pub fn format_bitcoin(amount: f64) -> String {
    format!("{:.8}", amount)
}

/// US dollar formatting, e.g. `$1,234.50`.
pub fn format_cash(amount: f64) -> String {
    if amount < 0.0 {
        return format!("-{}", format_cash(-amount));
    }
    let cents = (amount * 100.0).round() as u64;
    format!("${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Format a number with commas and at most one decimal (e.g. 1234.56 → "1,234.6").
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    // Round first so a fraction like .96 carries into the integer part.
    let tenths = (n * 10.0).round() as u64;
    let result = group_thousands(tenths / 10);
    match tenths % 10 {
        0 => result,
        frac => format!("{}.{}", result, frac),
    }
}

fn group_thousands(value: u64) -> String {
    let s = value.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_format_number_commas_at_correct_positions(int_val in 0u64..1_000_000_000) {
            let s = format_number(int_val as f64);
            let stripped: String = s.chars().filter(|c| *c != ',').collect();
            prop_assert_eq!(stripped, int_val.to_string());
        }

        #[test]
        fn prop_format_cash_always_two_decimals(n in 0.0f64..1e12) {
            let s = format_cash(n);
            prop_assert!(s.starts_with('$'), "got: {}", s);
            let decimals = s.rsplit('.').next().unwrap_or_default();
            prop_assert_eq!(decimals.len(), 2, "got: {}", s);
        }

        #[test]
        fn prop_total_hashrate_matches_manual_sum(
            quantities in proptest::collection::vec(0u32..50, 4),
        ) {
            let mut state = GameState::new(0);
            for (rig, q) in state.mining_rigs.iter_mut().zip(&quantities) {
                rig.quantity = *q;
                rig.owned = *q > 0;
            }
            let expected: f64 = state
                .mining_rigs
                .iter()
                .map(|r| r.hashrate_per_unit * r.quantity as f64)
                .sum();
            prop_assert!((calculate_total_hashrate(&state.mining_rigs) - expected).abs() < 1e-9);
        }

        #[test]
        fn prop_net_worth_never_below_cash(cash in 0.0f64..1e9, btc in 0.0f64..100.0) {
            let mut state = GameState::new(0);
            state.cash = cash;
            state.bitcoin = btc;
            prop_assert!(net_worth(&state) >= cash);
        }
    }
}
