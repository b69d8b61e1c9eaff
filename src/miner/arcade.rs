//! Stand-ins for the three mini-games.
//!
//! Each round is simulated in one call and reported back as a
//! [`MiniGameResult`]. The arcade keeps its own RNG, separate from the
//! authoritative one inside `GameState`, so playing never perturbs event rolls.

use super::actions::MiniGameResult;
use super::state::{MiniGame, Millis};

pub use super::state::{CRYPTO_TRADER, HASH_PUZZLE, NETWORK_DEFENSE};

const HASH_PUZZLE_MULTIPLIER: f64 = 1.2;
const DEFENSE_MULTIPLIER: f64 = 1.45;

// ── Crypto Trader session ───────────────────────────────────────
const TRADER_BANKROLL: f64 = 10_000.0;
const TRADER_OPEN_PRICE: f64 = 30_000.0;
const TRADER_ROUNDS: u32 = 60;
/// Largest single-tick price move, as a fraction.
const TRADER_VOLATILITY: f64 = 0.02;
/// Take profit once the price is this far above entry.
const TRADER_TARGET: f64 = 1.03;
const TRADER_MAX_REWARD: f64 = 0.001;

pub struct Arcade {
    rng_state: u32,
}

impl Arcade {
    pub fn new(seed: u32) -> Self {
        Self {
            rng_state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    fn next_random(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    fn next_unit(&mut self) -> f64 {
        self.next_random() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Play one round of `game`.
    ///
    /// Returns `None` when the game is locked, still cooling down, or the
    /// round earned nothing worth reporting (a losing trade).
    pub fn play(&mut self, game: &MiniGame, level: u32, now: Millis) -> Option<MiniGameResult> {
        if !game.unlocked || game.is_on_cooldown(now) {
            return None;
        }
        match game.id {
            HASH_PUZZLE => Some(MiniGameResult {
                game_id: game.id,
                reward: self.hash_puzzle(),
                kills: None,
            }),
            CRYPTO_TRADER => self.crypto_trader(level).map(|reward| MiniGameResult {
                game_id: game.id,
                reward,
                kills: None,
            }),
            NETWORK_DEFENSE => {
                let (reward, kills) = self.network_defense();
                Some(MiniGameResult {
                    game_id: game.id,
                    reward,
                    kills: Some(kills),
                })
            }
            _ => None,
        }
    }

    fn hash_puzzle(&mut self) -> f64 {
        (0.0001 + self.next_unit() * 0.0005) * HASH_PUZZLE_MULTIPLIER
    }

    /// A buy-and-hold trade with a take-profit exit over a random walk.
    fn crypto_trader(&mut self, level: u32) -> Option<f64> {
        let holding = TRADER_BANKROLL / TRADER_OPEN_PRICE;
        let mut price = TRADER_OPEN_PRICE;
        for _ in 0..TRADER_ROUNDS {
            let swing = (self.next_unit() * 2.0 - 1.0) * TRADER_VOLATILITY;
            price = (price * (1.0 + swing)).max(1.0);
            if price >= TRADER_OPEN_PRICE * TRADER_TARGET {
                break;
            }
        }

        let profit = holding * price - TRADER_BANKROLL;
        if profit <= 0.0 {
            return None;
        }
        let profit_pct = profit / TRADER_BANKROLL;
        let reward = (0.0001 + 0.0001 * profit_pct * 10.0) * (1.0 + level as f64 * 0.1);
        Some(reward.min(TRADER_MAX_REWARD))
    }

    fn network_defense(&mut self) -> (f64, u32) {
        let reward = (0.0002 + self.next_unit() * 0.0006) * DEFENSE_MULTIPLIER;
        let kills = 5 + self.next_random() % 26;
        (reward, kills)
    }
}
