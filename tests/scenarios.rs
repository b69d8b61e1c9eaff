//! End-to-end play sessions through the public API.

use hashrate_tycoon::input::InputEvent;
use hashrate_tycoon::miner::actions::{Action, Effect};
use hashrate_tycoon::miner::logic::reduce;
use hashrate_tycoon::miner::save::{decode_snapshot, encode_snapshot};
use hashrate_tycoon::miner::state::{GameState, Millis, BITCOIN_VALUE};
use hashrate_tycoon::miner::MinerGame;

const T0: Millis = 1_700_000_000_000;

fn run(state: &GameState, actions: &[Action], now: Millis) -> (GameState, Vec<Effect>) {
    let mut state = state.clone();
    let mut effects = Vec::new();
    for action in actions {
        let t = reduce(&state, action, now);
        state = t.state;
        effects.extend(t.effects);
    }
    (state, effects)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn tapping_session_levels_up_and_completes_daily_grind() {
    let start = GameState::new(T0);
    let mines = vec![Action::MineBitcoin; 50];
    let (state, effects) = run(&start, &mines, T0);

    assert!(approx(state.bitcoin, 0.001));
    assert_eq!(state.level, 3);
    assert_eq!(state.experience, 20.0);
    assert!(state.mini_game(2).unwrap().unlocked);
    assert!(!state.mini_game(3).unwrap().unlocked);
    assert!(effects.contains(&Effect::MiniGameUnlocked { game_id: 2 }));
    assert!(effects.contains(&Effect::QuestCompleted { quest_id: 1 }));

    let (claimed, _) = run(&state, &[Action::ClaimQuestReward(1)], T0);
    assert!(approx(claimed.bitcoin, 0.0015));
    assert!(claimed.quest(1).unwrap().claimed);
}

#[test]
fn saved_session_resumes_and_catches_up_offline_income() {
    let (state, _) = run(&GameState::new(T0), &vec![Action::MineBitcoin; 50], T0);

    let json = encode_snapshot(&state).unwrap();
    let restored = decode_snapshot(&json).unwrap();
    assert_eq!(restored, state);

    // An hour away at 1 H/s
    let later = T0 + 3_600_000;
    let t = reduce(&restored, &Action::CollectPassiveIncome, later);
    assert!(approx(t.state.bitcoin, state.bitcoin + 0.072));
    assert_eq!(t.state.last_mined, later);
    // 36 XP of passive experience grants a single level
    assert_eq!(t.state.level, 4);
    assert_eq!(t.state.experience, 0.0);
}

#[test]
fn windfall_funds_an_expansion() {
    let start = GameState::new(T0);
    let (state, effects) = run(&start, &[Action::AddBitcoin(1.0)], T0);
    assert!(state.achievement(4).unwrap().unlocked);
    assert!(effects.contains(&Effect::AchievementUnlocked { achievement_id: 4 }));

    let mut script = vec![Action::SellBitcoin(1.0)];
    script.extend(vec![Action::BuyRig(1); 5]);
    script.push(Action::ClaimQuestReward(4));
    let (state, _) = run(&state, &script, T0);

    assert_eq!(state.bitcoin, 0.0);
    assert_eq!(state.cash, 1_000.0 + BITCOIN_VALUE - 2_500.0 + 2_000.0);
    assert_eq!(state.rig(1).unwrap().quantity, 6);
    assert_eq!(state.hashrate, 6.0);
    assert!(state.quest(4).unwrap().claimed);
    assert_eq!(state.quest(3).unwrap().progress, 1.0);
}

#[test]
fn climbing_the_rich_list() {
    let mut state = GameState::new(T0);
    assert_eq!(state.player_rank, 11);

    state.cash = 95_000_000_000.0;
    let (state, _) = run(&state, &[Action::UpdateLeaderboard], T0);
    assert_eq!(state.player_rank, 8);
    assert_eq!(state.leaderboard.len(), 11);
    assert!(state.leaderboard[7].is_player);

    let mut richest = state.clone();
    richest.cash = 300_000_000_000.0;
    let (richest, _) = run(&richest, &[Action::UpdateLeaderboard], T0);
    assert_eq!(richest.player_rank, 1);
    assert!(richest.leaderboard[0].is_player);
}

#[test]
fn failed_actions_leave_the_snapshot_untouched() {
    let state = GameState::new(T0);
    let script = [
        Action::BuyRig(4),
        Action::BuyAsset(12),
        Action::SellRig(3),
        Action::SellBitcoin(0.5),
        Action::ClaimQuestReward(1),
        Action::ResolveEvent(hashrate_tycoon::miner::state::EventInstanceId {
            template_id: 2,
            triggered_at: T0,
        }),
    ];
    for action in &script {
        let t = reduce(&state, action, T0);
        assert_eq!(t.state, state, "{:?} changed state", action);
        assert!(t.effects.is_empty(), "{:?} produced effects", action);
    }
}

#[test]
fn arcade_session_through_the_game_handle() {
    let mut game = MinerGame::new(T0);

    // First input only dismisses the welcome banner
    assert!(game.handle_input(&InputEvent::Key('g'), T0));
    assert!(!game.state.is_first_visit);

    game.handle_input(&InputEvent::Key('g'), T0);
    game.handle_input(&InputEvent::Key('1'), T0 + 1_000);
    assert_eq!(game.state.stats.mini_games_played, 1);
    assert!(game.state.quest(2).unwrap().completed);
    assert!(game.state.bitcoin > 0.0);

    // Hash Puzzle is on a five-minute cooldown
    game.handle_input(&InputEvent::Key('1'), T0 + 60_000);
    assert_eq!(game.state.stats.mini_games_played, 1);

    game.handle_input(&InputEvent::Key('1'), T0 + 302_000);
    assert_eq!(game.state.stats.mini_games_played, 2);
}

#[test]
fn host_ticks_mine_while_idle() {
    let mut game = MinerGame::new(T0);
    game.tick(T0);
    for s in 1..=10 {
        game.tick(T0 + s * 1_000);
    }
    assert!(approx(game.state.bitcoin, 10.0 * 0.00002));
}
