//! Save and load of the game snapshot.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current save format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest save that can still be read. Only bump
//!   on breaking changes (a field changes meaning or is removed). Purely
//!   additive changes keep old saves loadable: missing fields take their
//!   defaults through `#[serde(default)]` on `GameState`.
//!
//! History:
//! - v1: initial format.
//! - v2: added `stats` and `rng_state`.

use serde::{Deserialize, Serialize};

use super::derived::calculate_total_hashrate;
use super::state::GameState;

pub const SAVE_VERSION: u32 = 2;
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "bitcoin_miner_save";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Snapshot is not valid JSON for the save layout.
    #[error("corrupt save data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Snapshot could not be serialized.
    #[error("failed to encode save data: {0}")]
    Encode(serde_json::Error),

    /// Snapshot predates the oldest readable format.
    #[error("save version {saved} is older than the minimum supported {min}")]
    TooOld { saved: u32, min: u32 },
}

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameState,
}

/// Serialize the whole state into a versioned snapshot.
pub fn encode_snapshot(state: &GameState) -> Result<String, SnapshotError> {
    let save = SaveData {
        version: SAVE_VERSION,
        game: state.clone(),
    };
    serde_json::to_string(&save).map_err(SnapshotError::Encode)
}

/// Parse a snapshot, rejecting formats older than `MIN_COMPATIBLE_VERSION`.
///
/// Cached values are re-derived from the rig list so a hand-edited or stale
/// snapshot cannot break the hashrate invariant.
pub fn decode_snapshot(json: &str) -> Result<GameState, SnapshotError> {
    let save: SaveData = serde_json::from_str(json)?;
    if save.version < MIN_COMPATIBLE_VERSION {
        return Err(SnapshotError::TooOld {
            saved: save.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    Ok(repaired(save.game))
}

/// Version recorded in a snapshot, if it parses at all.
pub fn snapshot_version(json: &str) -> Option<u32> {
    #[derive(Deserialize)]
    struct Header {
        version: u32,
    }
    serde_json::from_str::<Header>(json).ok().map(|h| h.version)
}

fn repaired(mut state: GameState) -> GameState {
    for rig in &mut state.mining_rigs {
        rig.owned = rig.quantity > 0;
    }
    state.hashrate = calculate_total_hashrate(&state.mining_rigs);
    state.level = state.level.max(1);
    state.bitcoin = state.bitcoin.max(0.0);
    state.cash = state.cash.max(0.0);
    state.experience = state.experience.max(0.0);
    state
}

/// Browser localStorage, when available.
#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Persist the state to localStorage. Failures are logged, never raised.
#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &GameState) {
    let json = match encode_snapshot(state) {
        Ok(j) => j,
        Err(e) => {
            web_sys::console::warn_1(&format!("Bitcoin Miner: {e}").into());
            return;
        }
    };

    if let Some(storage) = get_storage() {
        if let Err(e) = storage.set_item(STORAGE_KEY, &json) {
            web_sys::console::warn_1(
                &format!("Bitcoin Miner: failed to write localStorage: {e:?}").into(),
            );
        }
    }
}

/// Restore the saved state, if any.
///
/// Corrupt or too-old data is removed and `None` returned, so the caller
/// starts a fresh game.
#[cfg(target_arch = "wasm32")]
pub fn load_game() -> Option<GameState> {
    let storage = get_storage()?;
    let json = storage.get_item(STORAGE_KEY).ok()??;

    match decode_snapshot(&json) {
        Ok(state) => {
            if let Some(version) = snapshot_version(&json).filter(|v| *v < SAVE_VERSION) {
                web_sys::console::log_1(
                    &format!(
                        "Bitcoin Miner: migrated save data (saved={version}, current={SAVE_VERSION})"
                    )
                    .into(),
                );
            }
            Some(state)
        }
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Bitcoin Miner: discarding save data: {e}").into(),
            );
            let _ = storage.remove_item(STORAGE_KEY);
            None
        }
    }
}
