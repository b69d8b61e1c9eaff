//! The closed set of commands the reducer accepts, the effect descriptors it
//! hands back, and the semantic click ids the renderer registers.

use super::state::{EventInstance, EventInstanceId};

/// What a mini-game reports when a round ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MiniGameResult {
    pub game_id: u32,
    /// Bitcoin earned. Non-negative.
    pub reward: f64,
    /// Hackers stopped, reported by Network Defense only.
    pub kills: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Tap to mine: settle elapsed time plus a click bonus.
    MineBitcoin,
    BuyRig(u32),
    SellRig(u32),
    BuyAsset(u32),
    SellBitcoin(f64),
    AddBitcoin(f64),
    CollectPassiveIncome,
    TriggerRandomEvent,
    ResolveEvent(EventInstanceId),
    PlayMiniGame(MiniGameResult),
    UpdateLeaderboard,
    ClaimQuestReward(u32),
    UnlockAchievement(u32),
    ResetDailyQuests,
    UpdateQuestProgress { quest_id: u32, delta: f64 },
    DismissFirstVisit,
}

/// Side effects for the host to interpret after applying a transition.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LevelUp { level: u32 },
    MiniGameUnlocked { game_id: u32 },
    /// A timed event became active.
    EventStarted(EventInstance),
    /// An instant event was applied and discarded.
    EventApplied(EventInstance),
    EventEnded(EventInstanceId),
    QuestCompleted { quest_id: u32 },
    QuestClaimed { quest_id: u32 },
    AchievementUnlocked { achievement_id: u32 },
    DailyQuestsReset,
}

// ── Core actions ────────────────────────────────────────────────
pub const MINE: u16 = 0;
pub const SELL_ALL_BITCOIN: u16 = 1;
pub const DISMISS_WELCOME: u16 = 2;

// ── Tab navigation ──────────────────────────────────────────────
pub const TAB_RIGS: u16 = 10;
pub const TAB_ASSETS: u16 = 11;
pub const TAB_QUESTS: u16 = 12;
pub const TAB_GAMES: u16 = 13;
pub const TAB_LEADERBOARD: u16 = 14;

// ── Per-entry actions (base + catalog index) ────────────────────
pub const BUY_RIG_BASE: u16 = 100;
pub const SELL_RIG_BASE: u16 = 200;
pub const BUY_ASSET_BASE: u16 = 300;
pub const CLAIM_QUEST_BASE: u16 = 400;
pub const PLAY_GAME_BASE: u16 = 500;
