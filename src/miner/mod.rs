//! Bitcoin Miner: an idle game about growing a mining operation.

pub mod actions;
pub mod arcade;
pub mod derived;
pub mod events;
pub mod logic;
pub mod progress;
pub mod render;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};
use crate::time::{Scheduler, SchedulerConfig};

use actions::*;
use arcade::Arcade;
use derived::{format_bitcoin, format_cash};
use logic::Transition;
use state::{event_templates, GameState, Millis};

/// Most recent lines kept in the on-screen log.
pub const MAX_LOG_LINES: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Rigs,
    Assets,
    Quests,
    Games,
    Leaderboard,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub text: String,
    pub important: bool,
}

/// Owns the game state and everything the host needs around it.
pub struct MinerGame {
    pub state: GameState,
    pub tab: Tab,
    pub log: Vec<LogEntry>,
    /// Latest host time seen, for cooldown and event timers on screen.
    pub now: Millis,
    arcade: Arcade,
    scheduler: Scheduler,
}

impl MinerGame {
    pub fn new(now: Millis) -> Self {
        Self::with_state(GameState::new(now), now)
    }

    /// Resume from a loaded snapshot.
    pub fn with_state(state: GameState, now: Millis) -> Self {
        let seed = (now ^ (now >> 32)) as u32;
        let mut game = Self {
            state,
            tab: Tab::Rigs,
            log: Vec::new(),
            now,
            arcade: Arcade::new(seed),
            scheduler: Scheduler::new(SchedulerConfig::default()),
        };
        game.push_log("Welcome to Bitcoin Miner! Tap MINE to start.", false);
        game
    }

    /// Apply one action and present its effects. Returns whether the state changed.
    pub fn dispatch(&mut self, action: &Action, now: Millis) -> bool {
        self.now = self.now.max(now);
        let Transition { state, effects } = logic::reduce(&self.state, action, now);
        let changed = state != self.state;
        self.state = state;
        for effect in &effects {
            self.notify(effect);
        }
        changed
    }

    /// Run the time-driven actions that are due. Returns true when an autosave is due.
    pub fn tick(&mut self, now: Millis) -> bool {
        self.now = self.now.max(now);
        let due = self.scheduler.poll(now, &self.state);
        for action in &due.actions {
            self.dispatch(action, now);
        }
        due.autosave
    }

    pub fn push_log(&mut self, text: impl Into<String>, important: bool) {
        self.log.push(LogEntry {
            text: text.into(),
            important,
        });
        if self.log.len() > MAX_LOG_LINES {
            let excess = self.log.len() - MAX_LOG_LINES;
            self.log.drain(..excess);
        }
    }

    fn notify(&mut self, effect: &Effect) {
        let (text, important) = match effect {
            Effect::LevelUp { level } => (format!("Level up! You are now level {}.", level), true),
            Effect::MiniGameUnlocked { game_id } => {
                let name = self.state.mini_game(*game_id).map_or("", |g| g.name.as_str());
                (format!("New mini-game unlocked: {}", name), true)
            }
            Effect::EventStarted(event) | Effect::EventApplied(event) => {
                (format!("{}: {}", event.title, event.description), true)
            }
            Effect::EventEnded(id) => {
                let title = event_templates()
                    .into_iter()
                    .find(|t| t.id == id.template_id)
                    .map_or("Event", |t| t.title);
                (format!("{} has ended.", title), false)
            }
            Effect::QuestCompleted { quest_id } => {
                let name = self.state.quest(*quest_id).map_or("", |q| q.name.as_str());
                (format!("Quest complete: {}. Claim your reward!", name), true)
            }
            Effect::QuestClaimed { quest_id } => {
                let name = self.state.quest(*quest_id).map_or("", |q| q.name.as_str());
                (format!("Reward claimed: {}", name), false)
            }
            Effect::AchievementUnlocked { achievement_id } => {
                let name = self
                    .state
                    .achievement(*achievement_id)
                    .map_or("", |a| a.name.as_str());
                (format!("Achievement unlocked: {}", name), true)
            }
            Effect::DailyQuestsReset => ("Daily quests have been reset.".to_string(), false),
        };
        console_log(&text);
        self.push_log(text, important);
    }

    // ── Input ───────────────────────────────────────────────────

    /// Map a key or click to an action. Returns whether it was handled.
    pub fn handle_input(&mut self, event: &InputEvent, now: Millis) -> bool {
        // The welcome banner swallows the first input.
        if self.state.is_first_visit {
            self.dispatch(&Action::DismissFirstVisit, now);
            return true;
        }
        match event {
            InputEvent::Key(c) => self.handle_key(*c, now),
            InputEvent::Click(id) => self.handle_click(*id, now),
        }
    }

    fn handle_key(&mut self, key: char, now: Millis) -> bool {
        match key {
            'm' | ' ' => self.handle_click(MINE, now),
            's' => self.handle_click(SELL_ALL_BITCOIN, now),
            'r' => self.handle_click(TAB_RIGS, now),
            'a' => self.handle_click(TAB_ASSETS, now),
            'q' => self.handle_click(TAB_QUESTS, now),
            'g' => self.handle_click(TAB_GAMES, now),
            'l' => self.handle_click(TAB_LEADERBOARD, now),
            '1'..='9' => {
                let idx = (key as u8 - b'1') as u16;
                let base = match self.tab {
                    Tab::Rigs => BUY_RIG_BASE,
                    Tab::Assets => BUY_ASSET_BASE,
                    Tab::Quests => CLAIM_QUEST_BASE,
                    Tab::Games => PLAY_GAME_BASE,
                    Tab::Leaderboard => return false,
                };
                self.handle_click(base + idx, now)
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, id: u16, now: Millis) -> bool {
        match id {
            MINE => {
                self.dispatch(&Action::MineBitcoin, now);
            }
            SELL_ALL_BITCOIN => self.sell_all_bitcoin(now),
            DISMISS_WELCOME => {
                self.dispatch(&Action::DismissFirstVisit, now);
            }
            TAB_RIGS => self.tab = Tab::Rigs,
            TAB_ASSETS => self.tab = Tab::Assets,
            TAB_QUESTS => self.tab = Tab::Quests,
            TAB_GAMES => self.tab = Tab::Games,
            TAB_LEADERBOARD => self.tab = Tab::Leaderboard,
            _ if (BUY_RIG_BASE..SELL_RIG_BASE).contains(&id) => {
                return self.buy_rig((id - BUY_RIG_BASE) as usize, now);
            }
            _ if (SELL_RIG_BASE..BUY_ASSET_BASE).contains(&id) => {
                return self.sell_rig((id - SELL_RIG_BASE) as usize, now);
            }
            _ if (BUY_ASSET_BASE..CLAIM_QUEST_BASE).contains(&id) => {
                return self.buy_asset((id - BUY_ASSET_BASE) as usize, now);
            }
            _ if (CLAIM_QUEST_BASE..PLAY_GAME_BASE).contains(&id) => {
                return self.claim_quest((id - CLAIM_QUEST_BASE) as usize, now);
            }
            _ if (PLAY_GAME_BASE..PLAY_GAME_BASE + 100).contains(&id) => {
                return self.play_mini_game((id - PLAY_GAME_BASE) as usize, now);
            }
            _ => return false,
        }
        true
    }

    fn sell_all_bitcoin(&mut self, now: Millis) {
        let amount = self.state.bitcoin;
        if self.dispatch(&Action::SellBitcoin(amount), now) {
            self.push_log(
                format!("Sold {} BTC for {}", format_bitcoin(amount), format_cash(amount * state::BITCOIN_VALUE)),
                false,
            );
        } else {
            self.push_log("No bitcoin to sell.", false);
        }
    }

    fn buy_rig(&mut self, idx: usize, now: Millis) -> bool {
        let Some(rig) = self.state.mining_rigs.get(idx).cloned() else {
            return false;
        };
        if self.dispatch(&Action::BuyRig(rig.id), now) {
            self.push_log(format!("Bought a {}.", rig.name), false);
        } else {
            self.push_log(format!("Not enough cash for a {} ({}).", rig.name, format_cash(rig.unit_price)), false);
        }
        true
    }

    fn sell_rig(&mut self, idx: usize, now: Millis) -> bool {
        let Some(rig) = self.state.mining_rigs.get(idx).cloned() else {
            return false;
        };
        if self.dispatch(&Action::SellRig(rig.id), now) {
            let refund = rig.unit_price * state::SELL_RIG_REFUND;
            self.push_log(format!("Sold a {} for {}.", rig.name, format_cash(refund)), false);
        } else {
            self.push_log(format!("You don't own a {}.", rig.name), false);
        }
        true
    }

    fn buy_asset(&mut self, idx: usize, now: Millis) -> bool {
        let Some(asset) = self.state.assets.get(idx).cloned() else {
            return false;
        };
        if asset.owned {
            self.push_log(format!("You already own the {}.", asset.name), false);
        } else if self.dispatch(&Action::BuyAsset(asset.id), now) {
            self.push_log(format!("Purchased {}!", asset.name), true);
        } else {
            self.push_log(format!("Not enough cash for {} ({}).", asset.name, format_cash(asset.price)), false);
        }
        true
    }

    fn claim_quest(&mut self, idx: usize, now: Millis) -> bool {
        let Some(quest) = self.state.quests.get(idx).cloned() else {
            return false;
        };
        if !self.dispatch(&Action::ClaimQuestReward(quest.id), now) {
            let reason = if quest.claimed { "already claimed" } else { "not complete yet" };
            self.push_log(format!("{}: {}.", quest.name, reason), false);
        }
        true
    }

    fn play_mini_game(&mut self, idx: usize, now: Millis) -> bool {
        let Some(game) = self.state.mini_games.get(idx).cloned() else {
            return false;
        };
        if !game.unlocked {
            self.push_log(format!("{} unlocks at level {}.", game.name, game.unlock_level), false);
            return true;
        }
        if game.is_on_cooldown(now) {
            self.push_log(format!("{} is ready in {}s.", game.name, game.cooldown_remaining(now)), false);
            return true;
        }
        match self.arcade.play(&game, self.state.level, now) {
            Some(result) => {
                self.dispatch(&Action::PlayMiniGame(result), now);
                let mut text = format!("{}: earned {} BTC", game.name, format_bitcoin(result.reward));
                if let Some(kills) = result.kills {
                    text.push_str(&format!(", stopped {} hackers", kills));
                }
                self.push_log(text, true);
            }
            None => self.push_log(format!("{}: no profit this time. Try again!", game.name), false),
        }
        true
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}

#[cfg(target_arch = "wasm32")]
fn console_log(msg: &str) {
    web_sys::console::log_1(&format!("Bitcoin Miner: {msg}").into());
}

#[cfg(not(target_arch = "wasm32"))]
fn console_log(_msg: &str) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::state::EVENT_COOLDOWN_MS;

    const T0: Millis = 1_700_000_000_000;

    fn started() -> MinerGame {
        let mut game = MinerGame::new(T0);
        game.state.is_first_visit = false;
        game
    }

    #[test]
    fn first_input_dismisses_welcome() {
        let mut game = MinerGame::new(T0);
        assert!(game.state.is_first_visit);
        game.handle_input(&InputEvent::Key('m'), T0);
        assert!(!game.state.is_first_visit);
        assert_eq!(game.state.stats.manual_mines, 0);
        game.handle_input(&InputEvent::Key('m'), T0);
        assert_eq!(game.state.stats.manual_mines, 1);
    }

    #[test]
    fn mine_key_and_click_mine() {
        let mut game = started();
        game.handle_input(&InputEvent::Key('m'), T0);
        game.handle_input(&InputEvent::Click(MINE), T0);
        assert_eq!(game.state.stats.manual_mines, 2);
    }

    #[test]
    fn tab_keys_switch_tabs() {
        let mut game = started();
        game.handle_input(&InputEvent::Key('g'), T0);
        assert_eq!(game.tab, Tab::Games);
        game.handle_input(&InputEvent::Click(TAB_LEADERBOARD), T0);
        assert_eq!(game.tab, Tab::Leaderboard);
    }

    #[test]
    fn digit_buys_on_rigs_tab() {
        let mut game = started();
        game.handle_input(&InputEvent::Key('1'), T0);
        assert_eq!(game.state.rig(1).unwrap().quantity, 2);
        assert_eq!(game.state.cash, 500.0);
    }

    #[test]
    fn failed_purchase_is_logged() {
        let mut game = started();
        let before = game.log.len();
        game.handle_input(&InputEvent::Click(BUY_RIG_BASE + 3), T0);
        assert_eq!(game.state.rig(4).unwrap().quantity, 0);
        assert!(game.log.len() > before);
        assert!(game.log.last().unwrap().text.contains("Not enough cash"));
    }

    #[test]
    fn sell_all_converts_everything() {
        let mut game = started();
        game.state.bitcoin = 0.5;
        game.handle_input(&InputEvent::Key('s'), T0);
        assert_eq!(game.state.bitcoin, 0.0);
        assert_eq!(game.state.cash, 16_000.0);
    }

    #[test]
    fn locked_game_reports_unlock_level() {
        let mut game = started();
        game.handle_input(&InputEvent::Click(PLAY_GAME_BASE + 2), T0);
        assert_eq!(game.state.stats.mini_games_played, 0);
        assert!(game.log.last().unwrap().text.contains("level 5"));
    }

    #[test]
    fn hash_puzzle_plays_then_cools_down() {
        let mut game = started();
        game.handle_input(&InputEvent::Click(PLAY_GAME_BASE), T0);
        assert_eq!(game.state.stats.mini_games_played, 1);
        assert!(game.state.bitcoin > 0.0);
        game.handle_input(&InputEvent::Click(PLAY_GAME_BASE), T0 + 1_000);
        assert_eq!(game.state.stats.mini_games_played, 1);
        game.handle_input(&InputEvent::Click(PLAY_GAME_BASE), T0 + 300_000);
        assert_eq!(game.state.stats.mini_games_played, 2);
    }

    #[test]
    fn effects_land_in_log() {
        let mut game = started();
        game.state.experience = 9.0;
        game.dispatch(&Action::MineBitcoin, T0);
        assert!(game.log.iter().any(|e| e.important && e.text.contains("level 2")));
    }

    #[test]
    fn log_is_bounded() {
        let mut game = started();
        for i in 0..120 {
            game.push_log(format!("line {}", i), false);
        }
        assert_eq!(game.log.len(), MAX_LOG_LINES);
        assert_eq!(game.log.last().unwrap().text, "line 119");
    }

    #[test]
    fn tick_collects_income() {
        let mut game = started();
        assert!(!game.tick(T0));
        game.tick(T0 + 1_000);
        assert!((game.state.bitcoin - 0.00002).abs() < 1e-12);
    }

    #[test]
    fn tick_requests_autosave() {
        let mut game = started();
        game.tick(T0);
        assert!(game.tick(T0 + 30_000));
        assert!(!game.tick(T0 + 31_000));
    }

    #[test]
    fn ticks_drive_events_and_expiry() {
        let mut game = started();
        let mut now = T0;
        game.tick(now);
        let mut saw_event = false;
        for _ in 0..(40 * EVENT_COOLDOWN_MS / 1_000) {
            now += 1_000;
            game.tick(now);
            saw_event |= game.state.last_event_time > T0;
            for event in &game.state.active_events {
                assert!(!event.is_expired(now));
            }
        }
        assert!(saw_event);
    }
}
