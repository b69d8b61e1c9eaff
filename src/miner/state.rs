//! Bitcoin miner game state definitions.
//!
//! Everything here is plain data: the entities the reducer owns, the economy
//! constants, and the starting catalogs. Behavior lives in `logic`,
//! `progress`, `events` and `derived`.

use serde::{Deserialize, Serialize};

/// Wall-clock milliseconds since the Unix epoch, supplied by the host.
pub type Millis = u64;

// ── Economy ─────────────────────────────────────────────────────

/// Bitcoin mined per unit of hashrate per second.
pub const MINING_RATE: f64 = 0.00002;
/// Fixed exchange rate: cash per bitcoin.
pub const BITCOIN_VALUE: f64 = 30_000.0;
/// Fraction of the unit price refunded when a rig is sold.
pub const SELL_RIG_REFUND: f64 = 0.5;
pub const STARTING_CASH: f64 = 1_000.0;
/// A manual mine pays this many seconds of passive output on top of settlement.
pub const CLICK_BONUS_SECONDS: f64 = 1.0;

// ── Experience ──────────────────────────────────────────────────

/// Experience needed per level: the threshold is `level * XP_PER_LEVEL`.
pub const XP_PER_LEVEL: f64 = 10.0;
pub const MINE_XP: f64 = 1.0;
pub const ASSET_XP: f64 = 5.0;
pub const MINI_GAME_XP: f64 = 2.0;
/// Experience trickled in by passive settlement, per elapsed second.
pub const PASSIVE_XP_PER_SECOND: f64 = 0.01;

// ── Timers ──────────────────────────────────────────────────────

/// No random event may trigger within this window of the previous attempt.
pub const EVENT_COOLDOWN_MS: Millis = 120_000;
/// Probability that an off-cooldown trigger actually produces an event.
pub const EVENT_CHANCE: f64 = 0.25;
pub const DAILY_RESET_MS: Millis = 24 * 60 * 60 * 1000;

pub const PLAYER_ENTRY_ID: u32 = 0;
const RNG_SEED: u32 = 0x2545_F491;

/// A purchasable mining hardware line. Several units may be owned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rig {
    pub id: u32,
    pub name: String,
    pub hashrate_per_unit: f64,
    /// Watts per unit. Informational only.
    pub power_draw: f64,
    pub unit_price: f64,
    pub owned: bool,
    pub quantity: u32,
}

impl Rig {
    fn new(id: u32, name: &str, hashrate_per_unit: f64, power_draw: f64, unit_price: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            hashrate_per_unit,
            power_draw,
            unit_price,
            owned: false,
            quantity: 0,
        }
    }

    /// Hashrate this line adds to the total.
    pub fn contribution(&self) -> f64 {
        if self.owned {
            self.hashrate_per_unit * self.quantity as f64
        } else {
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Home,
    Car,
    Watch,
    Vacation,
    Luxury,
}

impl AssetCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AssetCategory::Home => "Home",
            AssetCategory::Car => "Car",
            AssetCategory::Watch => "Watch",
            AssetCategory::Vacation => "Vacation",
            AssetCategory::Luxury => "Luxury",
        }
    }
}

/// A one-time lifestyle purchase. Counts toward net worth, never sold back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: u32,
    pub name: String,
    pub category: AssetCategory,
    pub price: f64,
    pub owned: bool,
}

impl Asset {
    fn new(id: u32, name: &str, category: AssetCategory, price: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            category,
            price,
            owned: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: u32,
    pub name: String,
    pub net_worth: f64,
    pub is_player: bool,
}

impl LeaderboardEntry {
    fn npc(id: u32, name: &str, net_worth: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            net_worth,
            is_player: false,
        }
    }

    pub fn player(net_worth: f64) -> Self {
        Self {
            id: PLAYER_ENTRY_ID,
            name: "You".to_string(),
            net_worth,
            is_player: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTone {
    Positive,
    Negative,
    Neutral,
}

/// Which stat an event touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventEffect {
    Bitcoin,
    Cash,
    Hashrate,
    Experience,
}

/// Catalog entry for a random event.
///
/// `value < 1` is a fraction of the current stat, `value >= 1` an absolute delta.
#[derive(Clone, Debug, PartialEq)]
pub struct EventTemplate {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub tone: EventTone,
    pub effect: EventEffect,
    pub value: f64,
    /// Seconds the event stays active. `None` applies instantly.
    pub duration_secs: Option<u32>,
}

/// Globally unique id of one occurrence: the template plus the trigger time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventInstanceId {
    pub template_id: u32,
    pub triggered_at: Millis,
}

/// A timed event currently in effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventInstance {
    pub id: EventInstanceId,
    pub title: String,
    pub description: String,
    pub tone: EventTone,
    pub effect: EventEffect,
    pub value: f64,
    pub duration_secs: u32,
}

impl EventInstance {
    pub fn expires_at(&self) -> Millis {
        self.id.triggered_at + self.duration_secs as Millis * 1000
    }

    pub fn is_expired(&self, now: Millis) -> bool {
        now >= self.expires_at()
    }
}

/// Bookkeeping for one mini-game. The game's own simulation lives elsewhere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MiniGame {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub unlock_level: u32,
    pub unlocked: bool,
    pub played: bool,
    pub cooldown_secs: u32,
    pub last_played_at: Millis,
}

impl MiniGame {
    fn new(id: u32, name: &str, description: &str, unlock_level: u32, cooldown_secs: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            unlock_level,
            unlocked: unlock_level <= 1,
            played: false,
            cooldown_secs,
            last_played_at: 0,
        }
    }

    /// Seconds until the game can be played again (0 when ready).
    pub fn cooldown_remaining(&self, now: Millis) -> u64 {
        if !self.played {
            return 0;
        }
        let ends = self.last_played_at + self.cooldown_secs as Millis * 1000;
        ends.saturating_sub(now).div_ceil(1000)
    }

    pub fn is_on_cooldown(&self, now: Millis) -> bool {
        self.cooldown_remaining(now) > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Bitcoin,
    Cash,
    Experience,
    Hashrate,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub kind: RewardKind,
    pub amount: f64,
}

impl Reward {
    pub const fn new(kind: RewardKind, amount: f64) -> Self {
        Self { kind, amount }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestCategory {
    Daily,
    Mining,
    Games,
    Collection,
}

/// What moves a quest's progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestGoal {
    ManualMines,
    RigsBought,
    AssetsBought,
    BitcoinSales,
    GamesPlayed,
    DefenseKills,
    /// Only moved by explicit `UpdateQuestProgress` dispatches.
    Manual,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub category: QuestCategory,
    pub goal: QuestGoal,
    pub progress: f64,
    pub target: f64,
    pub completed: bool,
    pub claimed: bool,
    pub reward: Reward,
}

impl Quest {
    fn new(
        id: u32,
        name: &str,
        description: &str,
        category: QuestCategory,
        goal: QuestGoal,
        target: f64,
        reward: Reward,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            category,
            goal,
            progress: 0.0,
            target,
            completed: false,
            claimed: false,
            reward,
        }
    }

    pub fn is_claimable(&self) -> bool {
        self.completed && !self.claimed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Unlock predicate of an achievement, evaluated against the whole state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AchievementGoal {
    OwnRig(u32),
    HashrateAtLeast(f64),
    BitcoinAtLeast(f64),
    NetWorthAtLeast(f64),
    LevelAtLeast(u32),
    OwnAllRigs,
    OwnAllAssets,
    AllMiniGamesUnlocked,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    pub goal: AchievementGoal,
    pub unlocked: bool,
    pub reward: Reward,
}

impl Achievement {
    fn new(
        id: u32,
        name: &str,
        description: &str,
        rarity: Rarity,
        goal: AchievementGoal,
        reward: Reward,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            rarity,
            goal,
            unlocked: false,
            reward,
        }
    }
}

/// Lifetime counters. Quest progress and achievements read from these.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub manual_mines: u64,
    pub bitcoin_mined: f64,
    pub rigs_bought: u64,
    pub assets_bought: u64,
    pub bitcoin_sales: u64,
    pub mini_games_played: u64,
    pub defense_kills: u64,
}

/// The single source of truth. Replaced wholesale by every transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub bitcoin: f64,
    pub cash: f64,
    /// Cached sum of rig contributions. Only `logic` writes it.
    pub hashrate: f64,
    pub level: u32,
    pub experience: f64,
    pub last_mined: Millis,
    pub is_first_visit: bool,
    pub mining_rigs: Vec<Rig>,
    pub assets: Vec<Asset>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub player_rank: u32,
    pub active_events: Vec<EventInstance>,
    pub mini_games: Vec<MiniGame>,
    pub quests: Vec<Quest>,
    pub achievements: Vec<Achievement>,
    pub last_event_time: Millis,
    pub last_quest_reset: Millis,
    pub stats: Stats,
    /// xorshift32 state for event rolls.
    pub rng_state: u32,
}

impl GameState {
    /// Fresh game anchored at `now`.
    pub fn new(now: Millis) -> Self {
        let mut mining_rigs = initial_rigs();
        mining_rigs[0].owned = true;
        mining_rigs[0].quantity = 1;
        let hashrate = mining_rigs.iter().map(Rig::contribution).sum();

        let mut leaderboard = initial_leaderboard();
        leaderboard.push(LeaderboardEntry::player(STARTING_CASH));
        let player_rank = leaderboard.len() as u32;

        Self {
            bitcoin: 0.0,
            cash: STARTING_CASH,
            hashrate,
            level: 1,
            experience: 0.0,
            last_mined: now,
            is_first_visit: true,
            mining_rigs,
            assets: initial_assets(),
            leaderboard,
            player_rank,
            active_events: Vec::new(),
            mini_games: initial_mini_games(),
            quests: initial_quests(),
            achievements: initial_achievements(),
            last_event_time: now,
            last_quest_reset: now,
            stats: Stats::default(),
            rng_state: RNG_SEED,
        }
    }

    pub fn rig(&self, id: u32) -> Option<&Rig> {
        self.mining_rigs.iter().find(|r| r.id == id)
    }

    pub fn asset(&self, id: u32) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn mini_game(&self, id: u32) -> Option<&MiniGame> {
        self.mini_games.iter().find(|g| g.id == id)
    }

    pub fn quest(&self, id: u32) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub fn achievement(&self, id: u32) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    /// Experience at which the current level rolls over.
    pub fn level_threshold(&self) -> f64 {
        self.level as f64 * XP_PER_LEVEL
    }

    /// Advance the xorshift32 generator.
    pub fn next_random(&mut self) -> u32 {
        let mut x = if self.rng_state == 0 { RNG_SEED } else { self.rng_state };
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    /// Uniform roll in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.next_random() as f64 / (u32::MAX as f64 + 1.0)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(0)
    }
}

// ── Catalogs ────────────────────────────────────────────────────

pub fn initial_rigs() -> Vec<Rig> {
    vec![
        Rig::new(1, "Basic GPU", 1.0, 100.0, 500.0),
        Rig::new(2, "Mining GPU", 5.0, 250.0, 2_000.0),
        Rig::new(3, "ASIC Miner", 25.0, 500.0, 8_000.0),
        Rig::new(4, "Mining Farm", 100.0, 2_000.0, 30_000.0),
    ]
}

pub fn initial_assets() -> Vec<Asset> {
    use AssetCategory::*;
    vec![
        Asset::new(1, "Studio Apartment", Home, 50_000.0),
        Asset::new(2, "Compact Car", Car, 20_000.0),
        Asset::new(3, "Analog Watch", Watch, 5_000.0),
        Asset::new(4, "Weekend Trip", Vacation, 2_000.0),
        Asset::new(5, "Luxury Condo", Home, 500_000.0),
        Asset::new(6, "Sports Car", Car, 200_000.0),
        Asset::new(7, "Luxury Watch", Watch, 50_000.0),
        Asset::new(8, "Exotic Vacation", Vacation, 20_000.0),
        Asset::new(9, "Mansion", Home, 2_000_000.0),
        Asset::new(10, "Luxury Yacht", Luxury, 5_000_000.0),
        Asset::new(11, "Private Jet", Luxury, 20_000_000.0),
        Asset::new(12, "Island Retreat", Luxury, 50_000_000.0),
    ]
}

/// The fixed NPC field. The player entry is added by `GameState::new`.
pub fn initial_leaderboard() -> Vec<LeaderboardEntry> {
    vec![
        LeaderboardEntry::npc(1, "Elon Musk", 250_000_000_000.0),
        LeaderboardEntry::npc(2, "Jeff Bezos", 200_000_000_000.0),
        LeaderboardEntry::npc(3, "Bernard Arnault", 190_000_000_000.0),
        LeaderboardEntry::npc(4, "Bill Gates", 150_000_000_000.0),
        LeaderboardEntry::npc(5, "Mark Zuckerberg", 120_000_000_000.0),
        LeaderboardEntry::npc(6, "Warren Buffett", 110_000_000_000.0),
        LeaderboardEntry::npc(7, "Larry Ellison", 100_000_000_000.0),
        LeaderboardEntry::npc(8, "Larry Page", 90_000_000_000.0),
        LeaderboardEntry::npc(9, "Sergey Brin", 85_000_000_000.0),
        LeaderboardEntry::npc(10, "Steve Ballmer", 80_000_000_000.0),
    ]
}

pub const HASH_PUZZLE: u32 = 1;
pub const CRYPTO_TRADER: u32 = 2;
/// The only game that reports hackers stopped.
pub const NETWORK_DEFENSE: u32 = 3;

pub fn initial_mini_games() -> Vec<MiniGame> {
    vec![
        MiniGame::new(HASH_PUZZLE, "Hash Puzzle", "Solve a puzzle to earn Bitcoin.", 1, 300),
        MiniGame::new(CRYPTO_TRADER, "Crypto Trader", "Test your trading skills to earn Bitcoin.", 3, 600),
        MiniGame::new(NETWORK_DEFENSE, "Network Defense", "Defend your mining operation from hackers.", 5, 900),
    ]
}

pub fn initial_quests() -> Vec<Quest> {
    use QuestCategory::*;
    use RewardKind::*;
    vec![
        Quest::new(1, "Daily Grind", "Mine manually 50 times today.", Daily,
            QuestGoal::ManualMines, 50.0, Reward::new(Bitcoin, 0.0005)),
        Quest::new(2, "Daily Gamer", "Play a mini-game today.", Daily,
            QuestGoal::GamesPlayed, 1.0, Reward::new(Cash, 1_000.0)),
        Quest::new(3, "Daily Trader", "Sell bitcoin 3 times today.", Daily,
            QuestGoal::BitcoinSales, 3.0, Reward::new(Experience, 10.0)),
        Quest::new(4, "Expand Operations", "Buy 5 mining rigs.", Mining,
            QuestGoal::RigsBought, 5.0, Reward::new(Cash, 2_000.0)),
        Quest::new(5, "Tap Master", "Mine manually 500 times.", Mining,
            QuestGoal::ManualMines, 500.0, Reward::new(Hashrate, 5.0)),
        Quest::new(6, "Game Enthusiast", "Play 10 mini-games.", Games,
            QuestGoal::GamesPlayed, 10.0, Reward::new(Experience, 20.0)),
        Quest::new(7, "Network Defender", "Stop 50 hackers in Network Defense.", Games,
            QuestGoal::DefenseKills, 50.0, Reward::new(Bitcoin, 0.005)),
        Quest::new(8, "First Splurge", "Buy your first lifestyle asset.", Collection,
            QuestGoal::AssetsBought, 1.0, Reward::new(Experience, 10.0)),
        Quest::new(9, "Living Large", "Own 5 lifestyle assets.", Collection,
            QuestGoal::AssetsBought, 5.0, Reward::new(Cash, 10_000.0)),
    ]
}

pub fn initial_achievements() -> Vec<Achievement> {
    use AchievementGoal::*;
    use Rarity::*;
    use RewardKind::*;
    vec![
        Achievement::new(1, "Upgrade Path", "Buy a Mining GPU.", Common,
            OwnRig(2), Reward::new(Bitcoin, 0.0005)),
        Achievement::new(2, "Hash Hungry", "Reach 100 H/s.", Uncommon,
            HashrateAtLeast(100.0), Reward::new(Bitcoin, 0.002)),
        Achievement::new(3, "Gamer", "Unlock every mini-game.", Uncommon,
            AllMiniGamesUnlocked, Reward::new(Experience, 20.0)),
        Achievement::new(4, "HODLer", "Hold 1 BTC at once.", Rare,
            BitcoinAtLeast(1.0), Reward::new(Experience, 50.0)),
        Achievement::new(5, "Veteran Miner", "Reach level 10.", Rare,
            LevelAtLeast(10), Reward::new(Cash, 20_000.0)),
        Achievement::new(6, "Full Garage", "Own every kind of rig.", Epic,
            OwnAllRigs, Reward::new(Hashrate, 10.0)),
        Achievement::new(7, "Millionaire", "Reach a net worth of $1,000,000.", Epic,
            NetWorthAtLeast(1_000_000.0), Reward::new(Cash, 50_000.0)),
        Achievement::new(8, "Collector", "Own every lifestyle asset.", Legendary,
            OwnAllAssets, Reward::new(Bitcoin, 1.0)),
    ]
}

pub fn event_templates() -> Vec<EventTemplate> {
    vec![
        EventTemplate {
            id: 1,
            title: "Market Surge",
            description: "Bitcoin demand spiked! Your holdings grew by 20%.",
            tone: EventTone::Positive,
            effect: EventEffect::Bitcoin,
            value: 0.2,
            duration_secs: None,
        },
        EventTemplate {
            id: 2,
            title: "Power Outage",
            description: "A local outage slowed your mining by 30% for 30 seconds.",
            tone: EventTone::Negative,
            effect: EventEffect::Hashrate,
            value: -0.3,
            duration_secs: Some(30),
        },
        EventTemplate {
            id: 3,
            title: "Cooling Optimization",
            description: "Better cooling boosts mining by 25% for 45 seconds.",
            tone: EventTone::Positive,
            effect: EventEffect::Hashrate,
            value: 0.25,
            duration_secs: Some(45),
        },
        EventTemplate {
            id: 4,
            title: "Mining Pool Bonus",
            description: "Your pool found a block! You received a small bonus.",
            tone: EventTone::Positive,
            effect: EventEffect::Bitcoin,
            value: 0.001,
            duration_secs: None,
        },
        EventTemplate {
            id: 5,
            title: "New Mining Technique",
            description: "You learned a new technique! Gain 5 experience points.",
            tone: EventTone::Positive,
            effect: EventEffect::Experience,
            value: 5.0,
            duration_secs: None,
        },
    ]
}
