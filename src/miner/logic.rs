//! The game reducer: `(state, action, now) -> (state', effects)`.
//!
//! The reducer never touches the input state. It clones it into a [`Step`],
//! applies the action to that private copy, and hands the copy back together
//! with the effects the host should present. An action whose precondition
//! fails leaves the copy untouched, so the caller gets back an equal state
//! and no effects.

use super::actions::{Action, Effect, MiniGameResult};
use super::derived::{calculate_total_hashrate, effective_hashrate, mined_between, net_worth};
use super::events::{self, Trigger};
use super::progress;
use super::state::{
    event_templates, EventInstance, EventInstanceId, GameState, LeaderboardEntry, Millis,
    QuestGoal, Reward, RewardKind, ASSET_XP, BITCOIN_VALUE, CLICK_BONUS_SECONDS, DAILY_RESET_MS,
    MINE_XP, MINING_RATE, MINI_GAME_XP, NETWORK_DEFENSE, PASSIVE_XP_PER_SECOND, SELL_RIG_REFUND, Quest,
};

/// The result of one dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: GameState,
    pub effects: Vec<Effect>,
}

/// Apply `action` at wall-clock time `now`.
pub fn reduce(state: &GameState, action: &Action, now: Millis) -> Transition {
    let mut step = Step::new(state, now);
    step.daily_reset(now);

    let applied = match action {
        Action::MineBitcoin => step.mine(now),
        Action::BuyRig(id) => step.buy_rig(*id),
        Action::SellRig(id) => step.sell_rig(*id),
        Action::BuyAsset(id) => step.buy_asset(*id),
        Action::SellBitcoin(amount) => step.sell_bitcoin(*amount),
        Action::AddBitcoin(amount) => step.add_bitcoin(*amount),
        Action::CollectPassiveIncome => step.settle(now),
        Action::TriggerRandomEvent => step.trigger_event(now),
        Action::ResolveEvent(id) => step.resolve_event(*id, now),
        Action::PlayMiniGame(result) => step.play_mini_game(result, now),
        Action::UpdateLeaderboard => step.update_leaderboard(),
        Action::ClaimQuestReward(id) => step.claim_quest(*id),
        Action::UnlockAchievement(id) => step.unlock_achievement(*id),
        // The head-of-dispatch guard already performed any due reset.
        Action::ResetDailyQuests => false,
        Action::UpdateQuestProgress { quest_id, delta } => step.update_quest(*quest_id, *delta),
        Action::DismissFirstVisit => step.dismiss_first_visit(),
    };

    if applied {
        step.sweep_achievements();
    }
    step.finish()
}

/// Private working copy of the state for one transition.
struct Step {
    state: GameState,
    effects: Vec<Effect>,
    /// Dispatch time, for handlers that settle before changing the hashrate.
    now: Millis,
}

impl Step {
    fn new(state: &GameState, now: Millis) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
            now,
        }
    }

    fn finish(self) -> Transition {
        Transition {
            state: self.state,
            effects: self.effects,
        }
    }

    // ── Time ────────────────────────────────────────────────────

    /// Credit bitcoin and experience for the time elapsed since `last_mined`.
    ///
    /// The only code path that reads or advances `last_mined`. Anything that
    /// changes the hashrate calls this first, so the new rate never applies
    /// to time that already passed.
    fn settle(&mut self, now: Millis) -> bool {
        let elapsed_secs = now.saturating_sub(self.state.last_mined) as f64 / 1000.0;
        let mined = mined_between(&self.state, self.state.last_mined, now);
        self.state.bitcoin += mined;
        self.state.stats.bitcoin_mined += mined;
        self.state.last_mined = self.state.last_mined.max(now);
        self.grant_experience(elapsed_secs * PASSIVE_XP_PER_SECOND);
        true
    }

    fn daily_reset(&mut self, now: Millis) {
        if now.saturating_sub(self.state.last_quest_reset) <= DAILY_RESET_MS {
            return;
        }
        self.state.quests = progress::reset_daily(&self.state.quests);
        self.state.last_quest_reset = now;
        self.effects.push(Effect::DailyQuestsReset);
    }

    // ── Experience ──────────────────────────────────────────────

    /// Add experience; at the threshold level up and drop the remainder.
    fn grant_experience(&mut self, amount: f64) {
        if !(amount > 0.0) || !amount.is_finite() {
            return;
        }
        self.state.experience += amount;
        if self.state.experience >= self.state.level_threshold() {
            self.state.level += 1;
            self.state.experience = 0.0;
            self.effects.push(Effect::LevelUp {
                level: self.state.level,
            });
            self.unlock_mini_games();
        }
    }

    fn unlock_mini_games(&mut self) {
        let level = self.state.level;
        for game in &mut self.state.mini_games {
            if !game.unlocked && game.unlock_level <= level {
                game.unlocked = true;
                self.effects.push(Effect::MiniGameUnlocked { game_id: game.id });
            }
        }
    }

    // ── Mining ──────────────────────────────────────────────────

    fn mine(&mut self, now: Millis) -> bool {
        self.settle(now);
        let bonus = effective_hashrate(&self.state, now) * MINING_RATE * CLICK_BONUS_SECONDS;
        self.state.bitcoin += bonus;
        self.state.stats.bitcoin_mined += bonus;
        self.state.stats.manual_mines += 1;
        self.grant_experience(MINE_XP);
        self.advance_goal(QuestGoal::ManualMines, 1.0);
        true
    }

    // ── Hardware ────────────────────────────────────────────────

    fn buy_rig(&mut self, rig_id: u32) -> bool {
        let Some(idx) = self.state.mining_rigs.iter().position(|r| r.id == rig_id) else {
            return false;
        };
        let price = self.state.mining_rigs[idx].unit_price;
        if self.state.cash < price {
            return false;
        }
        self.settle(self.now);
        self.state.cash -= price;
        let rig = &mut self.state.mining_rigs[idx];
        rig.quantity += 1;
        rig.owned = true;
        self.refresh_hashrate();
        self.state.stats.rigs_bought += 1;
        self.advance_goal(QuestGoal::RigsBought, 1.0);
        true
    }

    fn sell_rig(&mut self, rig_id: u32) -> bool {
        let Some(idx) = self.state.mining_rigs.iter().position(|r| r.id == rig_id) else {
            return false;
        };
        let rig = &self.state.mining_rigs[idx];
        if !rig.owned || rig.quantity == 0 {
            return false;
        }
        self.settle(self.now);
        let rig = &mut self.state.mining_rigs[idx];
        rig.quantity -= 1;
        rig.owned = rig.quantity > 0;
        let refund = rig.unit_price * SELL_RIG_REFUND;
        self.state.cash += refund;
        self.refresh_hashrate();
        true
    }

    fn refresh_hashrate(&mut self) {
        self.state.hashrate = calculate_total_hashrate(&self.state.mining_rigs);
    }

    // ── Assets & currency ───────────────────────────────────────

    fn buy_asset(&mut self, asset_id: u32) -> bool {
        let Some(asset) = self.state.assets.iter_mut().find(|a| a.id == asset_id) else {
            return false;
        };
        if asset.owned || self.state.cash < asset.price {
            return false;
        }
        asset.owned = true;
        self.state.cash -= asset.price;
        self.state.stats.assets_bought += 1;
        self.grant_experience(ASSET_XP);
        self.advance_goal(QuestGoal::AssetsBought, 1.0);
        true
    }

    fn sell_bitcoin(&mut self, amount: f64) -> bool {
        if !(amount > 0.0 && amount <= self.state.bitcoin) {
            return false;
        }
        self.state.bitcoin -= amount;
        self.state.cash += amount * BITCOIN_VALUE;
        self.state.stats.bitcoin_sales += 1;
        self.advance_goal(QuestGoal::BitcoinSales, 1.0);
        true
    }

    fn add_bitcoin(&mut self, amount: f64) -> bool {
        if !(amount > 0.0) || !amount.is_finite() {
            return false;
        }
        self.state.bitcoin += amount;
        true
    }

    // ── Random events ───────────────────────────────────────────

    fn trigger_event(&mut self, now: Millis) -> bool {
        match events::roll(&mut self.state, &event_templates(), now) {
            Trigger::CoolingDown => false,
            Trigger::Missed => {
                self.state.last_event_time = now;
                true
            }
            Trigger::Fired(instance) => {
                self.state.last_event_time = now;
                self.start_event(instance, now);
                true
            }
        }
    }

    fn start_event(&mut self, instance: EventInstance, now: Millis) {
        if instance.duration_secs == 0 {
            let delta = events::instant_delta(&self.state, &instance);
            self.state.bitcoin = (self.state.bitcoin + delta.bitcoin).max(0.0);
            self.state.cash = (self.state.cash + delta.cash).max(0.0);
            self.grant_experience(delta.experience);
            self.effects.push(Effect::EventApplied(instance));
        } else {
            // Close out income at the old rate before the modifier kicks in.
            self.settle(now);
            self.state.active_events.push(instance.clone());
            self.effects.push(Effect::EventStarted(instance));
        }
    }

    fn resolve_event(&mut self, id: EventInstanceId, now: Millis) -> bool {
        if !self.state.active_events.iter().any(|e| e.id == id) {
            return false;
        }
        self.settle(now);
        self.state.active_events.retain(|e| e.id != id);
        self.effects.push(Effect::EventEnded(id));
        true
    }

    // ── Mini-games ──────────────────────────────────────────────

    fn play_mini_game(&mut self, result: &MiniGameResult, now: Millis) -> bool {
        if !(result.reward >= 0.0) || !result.reward.is_finite() {
            return false;
        }
        let Some(game) = self
            .state
            .mini_games
            .iter_mut()
            .find(|g| g.id == result.game_id)
        else {
            return false;
        };
        if !game.unlocked {
            return false;
        }
        game.played = true;
        game.last_played_at = now;

        self.state.bitcoin += result.reward;
        self.state.stats.mini_games_played += 1;
        self.grant_experience(MINI_GAME_XP);
        self.advance_goal(QuestGoal::GamesPlayed, 1.0);
        // Kills only count when Network Defense reports them.
        if let (NETWORK_DEFENSE, Some(kills)) = (result.game_id, result.kills) {
            self.state.stats.defense_kills += kills as u64;
            self.advance_goal(QuestGoal::DefenseKills, kills as f64);
        }
        true
    }

    // ── Leaderboard ─────────────────────────────────────────────

    fn update_leaderboard(&mut self) -> bool {
        let mut entries: Vec<LeaderboardEntry> = self
            .state
            .leaderboard
            .iter()
            .filter(|e| !e.is_player)
            .cloned()
            .collect();
        entries.push(LeaderboardEntry::player(net_worth(&self.state)));
        // Stable: on a tie the player stays below the NPC.
        entries.sort_by(|a, b| b.net_worth.total_cmp(&a.net_worth));

        let rank = entries.iter().position(|e| e.is_player).unwrap_or(entries.len() - 1) + 1;
        self.state.leaderboard = entries;
        self.state.player_rank = rank as u32;
        true
    }

    // ── Quests & achievements ───────────────────────────────────

    fn advance_goal(&mut self, goal: QuestGoal, delta: f64) {
        let updated = progress::progress_goal(&self.state.quests, goal, delta);
        self.replace_quests(updated);
    }

    fn replace_quests(&mut self, updated: Vec<Quest>) {
        for quest_id in progress::newly_completed(&self.state.quests, &updated) {
            self.effects.push(Effect::QuestCompleted { quest_id });
        }
        self.state.quests = updated;
    }

    fn update_quest(&mut self, quest_id: u32, delta: f64) -> bool {
        let updated = progress::progress_quest(&self.state.quests, quest_id, delta);
        if updated == self.state.quests {
            return false;
        }
        self.replace_quests(updated);
        true
    }

    fn claim_quest(&mut self, quest_id: u32) -> bool {
        let Some(quest) = self.state.quests.iter_mut().find(|q| q.id == quest_id) else {
            return false;
        };
        if !quest.is_claimable() {
            return false;
        }
        quest.claimed = true;
        let reward = quest.reward;
        self.apply_reward(reward);
        self.effects.push(Effect::QuestClaimed { quest_id });
        true
    }

    fn unlock_achievement(&mut self, achievement_id: u32) -> bool {
        let Some(achievement) = self
            .state
            .achievements
            .iter_mut()
            .find(|a| a.id == achievement_id)
        else {
            return false;
        };
        if achievement.unlocked {
            return false;
        }
        achievement.unlocked = true;
        let reward = achievement.reward;
        self.apply_reward(reward);
        self.effects
            .push(Effect::AchievementUnlocked { achievement_id });
        true
    }

    /// Unlock every achievement whose predicate now holds, crediting rewards.
    ///
    /// A reward can satisfy another predicate, so sweep until nothing changes.
    fn sweep_achievements(&mut self) {
        loop {
            let check = progress::check_achievements(&self.state);
            if check.unlocked.is_empty() {
                return;
            }
            self.state.achievements = check.achievements;
            for achievement_id in check.unlocked {
                if let Some(reward) = self.state.achievement(achievement_id).map(|a| a.reward) {
                    self.apply_reward(reward);
                }
                self.effects
                    .push(Effect::AchievementUnlocked { achievement_id });
            }
        }
    }

    fn apply_reward(&mut self, reward: Reward) {
        let amount = if reward.amount.is_finite() {
            reward.amount.max(0.0)
        } else {
            0.0
        };
        match reward.kind {
            RewardKind::Bitcoin => self.state.bitcoin += amount,
            RewardKind::Cash => self.state.cash += amount,
            RewardKind::Experience => self.grant_experience(amount),
            RewardKind::Hashrate => self.grant_free_rigs(amount),
        }
    }

    /// Hashrate rewards arrive as free units of the entry-level rig.
    fn grant_free_rigs(&mut self, hashrate: f64) {
        let per_unit = match self.state.mining_rigs.first() {
            Some(rig) if rig.hashrate_per_unit > 0.0 && hashrate > 0.0 => rig.hashrate_per_unit,
            _ => return,
        };
        self.settle(self.now);
        let Some(rig) = self.state.mining_rigs.first_mut() else {
            return;
        };
        let units = (hashrate / per_unit).ceil() as u32;
        rig.quantity += units;
        rig.owned = rig.quantity > 0;
        self.refresh_hashrate();
    }

    fn dismiss_first_visit(&mut self) -> bool {
        if !self.state.is_first_visit {
            return false;
        }
        self.state.is_first_visit = false;
        true
    }
}
