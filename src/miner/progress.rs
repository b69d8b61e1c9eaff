//! Quest and achievement evaluation: pure functions over state snapshots.

use super::derived::net_worth;
use super::state::{Achievement, AchievementGoal, GameState, Quest, QuestCategory, QuestGoal};

/// Advance one quest by `delta`, clamped to its target.
///
/// Progress never decreases and a completed quest never un-completes, so a
/// non-positive `delta` or an unknown id leaves the list untouched.
pub fn progress_quest(quests: &[Quest], quest_id: u32, delta: f64) -> Vec<Quest> {
    quests
        .iter()
        .map(|q| if q.id == quest_id { advanced(q, delta) } else { q.clone() })
        .collect()
}

/// Advance every quest tracking `goal` by `delta`.
pub fn progress_goal(quests: &[Quest], goal: QuestGoal, delta: f64) -> Vec<Quest> {
    quests
        .iter()
        .map(|q| if q.goal == goal { advanced(q, delta) } else { q.clone() })
        .collect()
}

fn advanced(quest: &Quest, delta: f64) -> Quest {
    let mut next = quest.clone();
    if delta > 0.0 && delta.is_finite() {
        next.progress = quest.target.min(quest.progress + delta).max(quest.progress);
    }
    next.completed = quest.completed || next.progress >= next.target;
    next
}

/// Ids of quests that are completed in `after` but were not in `before`.
pub fn newly_completed(before: &[Quest], after: &[Quest]) -> Vec<u32> {
    after
        .iter()
        .filter(|q| q.completed)
        .filter(|q| !before.iter().any(|b| b.id == q.id && b.completed))
        .map(|q| q.id)
        .collect()
}

/// Daily quests back to their initial progress; others untouched.
pub fn reset_daily(quests: &[Quest]) -> Vec<Quest> {
    quests
        .iter()
        .map(|q| {
            if q.category == QuestCategory::Daily {
                Quest {
                    progress: 0.0,
                    completed: false,
                    claimed: false,
                    ..q.clone()
                }
            } else {
                q.clone()
            }
        })
        .collect()
}

/// Whether an achievement's predicate holds for `state`.
pub fn achievement_met(goal: &AchievementGoal, state: &GameState) -> bool {
    match goal {
        AchievementGoal::OwnRig(id) => state.rig(*id).is_some_and(|r| r.owned),
        AchievementGoal::HashrateAtLeast(threshold) => state.hashrate >= *threshold,
        AchievementGoal::BitcoinAtLeast(threshold) => state.bitcoin >= *threshold,
        AchievementGoal::NetWorthAtLeast(threshold) => net_worth(state) >= *threshold,
        AchievementGoal::LevelAtLeast(level) => state.level >= *level,
        AchievementGoal::OwnAllRigs => state.mining_rigs.iter().all(|r| r.owned),
        AchievementGoal::OwnAllAssets => state.assets.iter().all(|a| a.owned),
        AchievementGoal::AllMiniGamesUnlocked => state.mini_games.iter().all(|g| g.unlocked),
    }
}

/// Result of one achievement sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct AchievementCheck {
    pub achievements: Vec<Achievement>,
    /// Ids unlocked by this sweep, in catalog order.
    pub unlocked: Vec<u32>,
}

/// Unlock every locked achievement whose predicate holds for `state`.
///
/// Rewards are not applied here; the caller credits them for the ids in
/// `unlocked`. Running the check twice on the same state unlocks nothing
/// the second time.
pub fn check_achievements(state: &GameState) -> AchievementCheck {
    let mut unlocked = Vec::new();
    let achievements = state
        .achievements
        .iter()
        .map(|a| {
            if !a.unlocked && achievement_met(&a.goal, state) {
                unlocked.push(a.id);
                Achievement {
                    unlocked: true,
                    ..a.clone()
                }
            } else {
                a.clone()
            }
        })
        .collect();
    AchievementCheck {
        achievements,
        unlocked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_quest_clamps_to_target() {
        let state = GameState::new(0);
        let quests = progress_quest(&state.quests, 2, 5.0);
        let q = quests.iter().find(|q| q.id == 2).unwrap();
        assert_eq!(q.progress, 1.0);
        assert!(q.completed);
    }

    #[test]
    fn progress_quest_ignores_negative_delta() {
        let state = GameState::new(0);
        let quests = progress_quest(&state.quests, 1, 10.0);
        let quests = progress_quest(&quests, 1, -4.0);
        assert_eq!(quests.iter().find(|q| q.id == 1).unwrap().progress, 10.0);
    }

    #[test]
    fn progress_quest_unknown_id_is_noop() {
        let state = GameState::new(0);
        assert_eq!(progress_quest(&state.quests, 999, 1.0), state.quests);
    }

    #[test]
    fn progress_goal_moves_all_matching_quests() {
        let state = GameState::new(0);
        let quests = progress_goal(&state.quests, QuestGoal::ManualMines, 3.0);
        let moved: Vec<u32> = quests.iter().filter(|q| q.progress == 3.0).map(|q| q.id).collect();
        assert_eq!(moved, vec![1, 5]);
    }

    #[test]
    fn newly_completed_reports_only_transitions() {
        let state = GameState::new(0);
        let after = progress_goal(&state.quests, QuestGoal::AssetsBought, 1.0);
        assert_eq!(newly_completed(&state.quests, &after), vec![8]);
        let again = progress_goal(&after, QuestGoal::AssetsBought, 1.0);
        assert!(newly_completed(&after, &again).is_empty());
    }

    #[test]
    fn reset_daily_leaves_other_categories() {
        let state = GameState::new(0);
        let mut quests = progress_goal(&state.quests, QuestGoal::GamesPlayed, 1.0);
        quests.iter_mut().filter(|q| q.id == 2).for_each(|q| q.claimed = true);
        let reset = reset_daily(&quests);
        let daily = reset.iter().find(|q| q.id == 2).unwrap();
        assert_eq!(daily.progress, 0.0);
        assert!(!daily.completed && !daily.claimed);
        let games = reset.iter().find(|q| q.id == 6).unwrap();
        assert_eq!(games.progress, 1.0);
    }

    #[test]
    fn check_achievements_unlocks_when_predicate_holds() {
        let mut state = GameState::new(0);
        state.mining_rigs[1].owned = true;
        state.mining_rigs[1].quantity = 1;
        let check = check_achievements(&state);
        assert_eq!(check.unlocked, vec![1]);
        assert!(check.achievements[0].unlocked);
    }

    #[test]
    fn check_achievements_is_idempotent() {
        let mut state = GameState::new(0);
        state.bitcoin = 2.0;
        let first = check_achievements(&state);
        assert_eq!(first.unlocked, vec![4]);
        state.achievements = first.achievements;
        let second = check_achievements(&state);
        assert!(second.unlocked.is_empty());
        assert_eq!(second.achievements, state.achievements);
    }

    #[test]
    fn net_worth_goal_counts_assets() {
        let mut state = GameState::new(0);
        state.cash = 0.0;
        state.assets[4].owned = true; // 500k
        state.assets[8].owned = true; // 2M
        assert!(achievement_met(&AchievementGoal::NetWorthAtLeast(1_000_000.0), &state));
    }

    #[test]
    fn own_all_rigs_requires_every_line() {
        let mut state = GameState::new(0);
        assert!(!achievement_met(&AchievementGoal::OwnAllRigs, &state));
        for rig in &mut state.mining_rigs {
            rig.owned = true;
            rig.quantity = 1;
        }
        assert!(achievement_met(&AchievementGoal::OwnAllRigs, &state));
    }
}
