//! Bitcoin Miner rendering: stats header, mine panel, tabbed catalog, and log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::derived::{
    effective_hashrate, format_bitcoin, format_cash, format_number, hashrate_modifier,
    net_worth, top_entries,
};
use super::state::{EventTone, GameState, Reward, RewardKind, MINING_RATE};
use super::{MinerGame, Tab};

const LEADERBOARD_ROWS: usize = 10;
/// Width reserved at the right of each rig row for the sell button.
const SELL_BUTTON_WIDTH: u16 = 8;

pub fn render(game: &MinerGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let state = &game.state;

    let (main_area, side_log) = if area.width >= 80 {
        let h = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);
        (h[0], Some(h[1]))
    } else {
        (area, None)
    };

    let event_rows = state.active_events.len().min(3) as u16;
    let narrow = is_narrow_layout(area.width);
    let mut constraints = vec![
        Constraint::Length(4),              // stats
        Constraint::Length(4 + event_rows), // mine panel
        Constraint::Length(3),              // tab bar
        Constraint::Min(5),                 // content
    ];
    if side_log.is_none() {
        constraints.push(Constraint::Length(if narrow { 5 } else { 7 }));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(main_area);

    render_stats(game, f, chunks[0]);
    render_mine_panel(game, f, chunks[1], click_state);
    render_tab_bar(game, f, chunks[2], click_state);
    match game.tab {
        Tab::Rigs => render_rigs(state, f, chunks[3], click_state),
        Tab::Assets => render_assets(state, f, chunks[3], click_state),
        Tab::Quests => render_quests(state, f, chunks[3], click_state),
        Tab::Games => render_games(game, f, chunks[3], click_state),
        Tab::Leaderboard => render_leaderboard(state, f, chunks[3]),
    }

    match side_log {
        Some(log_area) => render_log(game, f, log_area),
        None => render_log(game, f, chunks[4]),
    }

    if state.is_first_visit {
        render_welcome(f, area, click_state);
    }
}

fn render_stats(game: &MinerGame, f: &mut Frame, area: Rect) {
    let state = &game.state;
    let modifier = hashrate_modifier(&state.active_events, game.now);
    let rate_style = if modifier > 0.0 {
        Style::default().fg(Color::Green)
    } else if modifier < 0.0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("₿ ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format_bitcoin(state.bitcoin),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format_cash(state.cash), Style::default().fg(Color::Green)),
            Span::styled(
                format!("  net {}", format_cash(net_worth(state))),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{} H/s", format_number(effective_hashrate(state, game.now))),
                rate_style,
            ),
            Span::styled(
                format!(
                    "  Lv {} ({}/{} XP)",
                    state.level,
                    format_number(state.experience),
                    format_number(state.level_threshold())
                ),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("  Rank #{}", state.player_rank),
                Style::default().fg(Color::Magenta),
            ),
        ]),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Bitcoin Miner "),
    );
    f.render_widget(widget, area);
}

fn render_mine_panel(
    game: &MinerGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let state = &game.state;
    let per_click = effective_hashrate(state, game.now) * MINING_RATE;

    let mut cl = ClickableList::new();
    cl.push_clickable(
        Line::from(vec![
            Span::styled(
                " ▶ [M] MINE ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  +{} BTC", format_bitcoin(per_click)),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        MINE,
    );
    let sell_style = if state.bitcoin > 0.0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    cl.push_clickable(
        Line::from(Span::styled(
            format!(
                " ▶ [S] Sell all bitcoin (≈ {})",
                format_cash(state.bitcoin * super::state::BITCOIN_VALUE)
            ),
            sell_style,
        )),
        SELL_ALL_BITCOIN,
    );

    for event in state.active_events.iter().take(3) {
        let color = match event.tone {
            EventTone::Positive => Color::Green,
            EventTone::Negative => Color::Red,
            EventTone::Neutral => Color::Gray,
        };
        let left = event.expires_at().saturating_sub(game.now).div_ceil(1000);
        cl.push(Line::from(Span::styled(
            format!(" ⚡ {} ({:+.0}% hashrate) {}s", event.title, event.value * 100.0, left),
            Style::default().fg(color),
        )));
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(widget, area);
}

fn render_tab_bar(game: &MinerGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let state = &game.state;
    let claimable = state.quests.iter().filter(|q| q.is_claimable()).count();
    let playable = state
        .mini_games
        .iter()
        .filter(|g| g.unlocked && !g.is_on_cooldown(game.now))
        .count();
    let active = match game.tab {
        Tab::Rigs => TAB_RIGS,
        Tab::Assets => TAB_ASSETS,
        Tab::Quests => TAB_QUESTS,
        Tab::Games => TAB_GAMES,
        Tab::Leaderboard => TAB_LEADERBOARD,
    };

    let mut cs = click_state.borrow_mut();
    TabBar::new("│")
        .tab("Rigs", Color::Green, TAB_RIGS)
        .tab("Assets", Color::Magenta, TAB_ASSETS)
        .tab_with_badge("Quests", Color::Cyan, TAB_QUESTS, claimable)
        .tab_with_badge("Games", Color::Yellow, TAB_GAMES, playable)
        .tab("Ranks", Color::Blue, TAB_LEADERBOARD)
        .active(active)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .render(f, area, &mut cs);
}

/// `[1]`..`[9]` for the first nine rows, blank after.
fn key_label(idx: usize) -> String {
    if idx < 9 {
        format!("[{}] ", idx + 1)
    } else {
        "    ".to_string()
    }
}

fn affordable_style(can_afford: bool) -> Style {
    if can_afford {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_rigs(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Mining rigs [1-4] buy ");
    let inner = block.inner(area);
    let text_width = inner.width.saturating_sub(SELL_BUTTON_WIDTH) as usize;

    let mut cl = ClickableList::new();
    for (i, rig) in state.mining_rigs.iter().enumerate() {
        let can_afford = state.cash >= rig.unit_price;
        let text = format!(
            "{}{:<12} x{:<3} {:>6} H/s  {}",
            key_label(i),
            rig.name,
            rig.quantity,
            format_number(rig.hashrate_per_unit),
            format_cash(rig.unit_price)
        );
        let mut spans = vec![Span::styled(
            format!("{:<w$}", text, w = text_width),
            affordable_style(can_afford),
        )];
        if rig.owned {
            spans.push(Span::styled(" [sell]", Style::default().fg(Color::Red)));
        }
        cl.push_clickable(Line::from(spans), BUY_RIG_BASE + i as u16);
    }

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1, 0);
    // Sell buttons sit on top of the row-wide buy targets.
    for (i, rig) in state.mining_rigs.iter().enumerate() {
        let row = inner.y + i as u16;
        if rig.owned && row < inner.y + inner.height && inner.width > SELL_BUTTON_WIDTH {
            let x = inner.x + inner.width - SELL_BUTTON_WIDTH;
            cs.add_click_target(Rect::new(x, row, SELL_BUTTON_WIDTH, 1), SELL_RIG_BASE + i as u16);
        }
    }
    drop(cs);

    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_assets(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cl = ClickableList::new();
    for (i, asset) in state.assets.iter().enumerate() {
        let line = if asset.owned {
            Line::from(vec![
                Span::styled(key_label(i), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:<18} {:<9} ✓ owned", asset.name, asset.category.label()),
                    Style::default().fg(Color::Green),
                ),
            ])
        } else {
            let can_afford = state.cash >= asset.price;
            Line::from(Span::styled(
                format!(
                    "{}{:<18} {:<9} {}",
                    key_label(i),
                    asset.name,
                    asset.category.label(),
                    format_cash(asset.price)
                ),
                affordable_style(can_afford),
            ))
        };
        cl.push_clickable(line, BUY_ASSET_BASE + i as u16);
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" Lifestyle "),
    );
    f.render_widget(widget, area);
}

pub fn reward_label(reward: &Reward) -> String {
    match reward.kind {
        RewardKind::Bitcoin => format!("{} BTC", format_bitcoin(reward.amount)),
        RewardKind::Cash => format_cash(reward.amount),
        RewardKind::Experience => format!("{} XP", format_number(reward.amount)),
        RewardKind::Hashrate => format!("+{} H/s", format_number(reward.amount)),
    }
}

fn render_quests(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cl = ClickableList::new();
    for (i, quest) in state.quests.iter().enumerate() {
        let (status, style) = if quest.claimed {
            ("done".to_string(), Style::default().fg(Color::DarkGray))
        } else if quest.completed {
            (
                "CLAIM".to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )
        } else {
            (
                format!("{}/{}", format_number(quest.progress), format_number(quest.target)),
                Style::default().fg(Color::White),
            )
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(key_label(i), style),
                Span::styled(format!("{:<18} {:>9}  ", quest.name, status), style),
                Span::styled(reward_label(&quest.reward), Style::default().fg(Color::Cyan)),
            ]),
            CLAIM_QUEST_BASE + i as u16,
        );
    }

    let unlocked = state.achievements.iter().filter(|a| a.unlocked).count();
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        format!("Achievements {}/{}", unlocked, state.achievements.len()),
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    )));
    for achievement in &state.achievements {
        let (mark, style) = if achievement.unlocked {
            ("★", Style::default().fg(Color::Yellow))
        } else {
            ("☆", Style::default().fg(Color::DarkGray))
        };
        cl.push(Line::from(Span::styled(
            format!(
                " {} {:<14} {:?}  {}",
                mark, achievement.name, achievement.rarity, achievement.description
            ),
            style,
        )));
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Quests [1-9] claim "),
    );
    f.render_widget(widget, area);
}

fn render_games(game: &MinerGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let state = &game.state;
    let mut cl = ClickableList::new();
    for (i, mini) in state.mini_games.iter().enumerate() {
        let (status, style) = if !mini.unlocked {
            (format!("locked (Lv {})", mini.unlock_level), Style::default().fg(Color::DarkGray))
        } else if mini.is_on_cooldown(game.now) {
            let secs = mini.cooldown_remaining(game.now);
            (
                format!("ready in {}m {:02}s", secs / 60, secs % 60),
                Style::default().fg(Color::Gray),
            )
        } else {
            ("PLAY".to_string(), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(key_label(i), style),
                Span::styled(format!("{:<16} {}", mini.name, status), style),
            ]),
            PLAY_GAME_BASE + i as u16,
        );
        cl.push(Line::from(Span::styled(
            format!("    {}", mini.description),
            Style::default().fg(Color::DarkGray),
        )));
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Mini-games "),
    );
    f.render_widget(widget, area);
}

fn render_leaderboard(state: &GameState, f: &mut Frame, area: Rect) {
    let entry_line = |rank: usize, name: &str, worth: f64, is_player: bool| {
        let style = if is_player {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(Span::styled(
            format!("#{:<3} {:<18} {}", rank, name, format_cash(worth)),
            style,
        ))
    };

    let top = top_entries(&state.leaderboard, LEADERBOARD_ROWS);
    let mut lines: Vec<Line> = top
        .iter()
        .enumerate()
        .map(|(i, e)| entry_line(i + 1, &e.name, e.net_worth, e.is_player))
        .collect();
    if !top.iter().any(|e| e.is_player) {
        if let Some(player) = state.leaderboard.iter().find(|e| e.is_player) {
            lines.push(Line::from(Span::styled("  ...", Style::default().fg(Color::DarkGray))));
            lines.push(entry_line(
                state.player_rank as usize,
                &player.name,
                player.net_worth,
                true,
            ));
        }
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Richest people "),
    );
    f.render_widget(widget, area);
}

fn render_log(game: &MinerGame, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    // Newest first.
    let lines: Vec<Line> = game
        .log
        .iter()
        .rev()
        .take(visible)
        .enumerate()
        .map(|(i, entry)| {
            let style = match (entry.important, i < 3) {
                (true, true) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Yellow),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Log "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_welcome(f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let width = area.width.min(52);
    let height = area.height.min(10);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let lines = vec![
        Line::from(Span::styled(
            "Welcome to Bitcoin Miner!",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Tap MINE to earn bitcoin. Your rigs keep mining"),
        Line::from("while you watch. Sell bitcoin for cash, buy better"),
        Line::from("hardware, and climb the rich list."),
        Line::from(""),
        Line::from(Span::styled("Tap anywhere to start", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            ),
        popup,
    );

    // Last registered, so it covers every other target.
    click_state.borrow_mut().add_click_target(area, DISMISS_WELCOME);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_labels_stop_after_nine() {
        assert_eq!(key_label(0), "[1] ");
        assert_eq!(key_label(8), "[9] ");
        assert_eq!(key_label(9), "    ");
    }

    #[test]
    fn reward_labels() {
        assert_eq!(reward_label(&Reward::new(RewardKind::Cash, 1_000.0)), "$1,000.00");
        assert_eq!(reward_label(&Reward::new(RewardKind::Bitcoin, 0.0005)), "0.00050000 BTC");
        assert_eq!(reward_label(&Reward::new(RewardKind::Experience, 20.0)), "20 XP");
        assert_eq!(reward_label(&Reward::new(RewardKind::Hashrate, 5.0)), "+5 H/s");
    }
}
