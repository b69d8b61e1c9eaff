//! Clickable UI building blocks.
//!
//! - [`TabBar`] renders a row of tabs and registers a target per tab.
//! - [`ClickableList`] pairs lines with action ids so targets follow the rows.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── TabBar ──────────────────────────────────────────────────────

/// A horizontal tab bar whose click targets match the rendered labels.
///
/// The active tab is drawn inverted in its own color; a tab may carry a
/// badge count (claimable quests, playable games) shown after its label.
pub struct TabBar<'a> {
    tabs: Vec<Tab>,
    active: Option<u16>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

struct Tab {
    label: String,
    color: Color,
    action_id: u16,
    badge: usize,
}

impl Tab {
    fn text(&self) -> String {
        if self.badge > 0 {
            format!(" {} ({}) ", self.label, self.badge)
        } else {
            format!(" {} ", self.label)
        }
    }
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            separator,
            block: None,
        }
    }

    pub fn tab(self, label: impl Into<String>, color: Color, action_id: u16) -> Self {
        self.tab_with_badge(label, color, action_id, 0)
    }

    pub fn tab_with_badge(
        mut self,
        label: impl Into<String>,
        color: Color,
        action_id: u16,
        badge: usize,
    ) -> Self {
        self.tabs.push(Tab {
            label: label.into(),
            color,
            action_id,
            badge,
        });
        self
    }

    /// Mark the tab bound to `action_id` as selected.
    pub fn active(mut self, action_id: u16) -> Self {
        self.active = Some(action_id);
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn style(&self, tab: &Tab) -> Style {
        if self.active == Some(tab.action_id) {
            Style::default()
                .fg(Color::Black)
                .bg(tab.color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(tab.color)
        }
    }

    /// Label widths as `(width, action_id)`, padding and badge included.
    fn widths(&self) -> Vec<(u16, u16)> {
        self.tabs
            .iter()
            .map(|t| (Line::from(t.text()).width() as u16, t.action_id))
            .collect()
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let separator_width = Line::from(self.separator).width() as u16;
        let widths = self.widths();

        let mut spans = Vec::with_capacity(self.tabs.len() * 2);
        for (i, tab) in self.tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.separator, Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(tab.text(), self.style(tab)));
        }

        let (inner, paragraph) = match self.block {
            Some(block) => (block.inner(area), Paragraph::new(Line::from(spans)).block(block)),
            None => (area, Paragraph::new(Line::from(spans))),
        };
        f.render_widget(paragraph, area);

        // Full outer height for a forgiving tap area.
        cs.register_tab_targets(&widths, separator_width, inner.x, area.y, inner.width, area.height.max(1));
    }
}

// ── ClickableList ───────────────────────────────────────────────

/// Lines for a paragraph, some of them bound to an action id.
///
/// Targets are tied to line indices, so inserting a header shifts them along.
#[derive(Default)]
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len() as u16, action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register a row target for every visible clickable line.
    ///
    /// `top_offset`/`bottom_offset` are the border rows of `area`; `scroll`
    /// is the number of lines scrolled off the top. Lines are assumed not to wrap.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);
        for &(line_idx, action_id) in &self.actions {
            if line_idx < scroll {
                continue;
            }
            let row = content_y + (line_idx - scroll);
            if row < content_end {
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::actions::{BUY_ASSET_BASE, CLAIM_QUEST_BASE, TAB_GAMES, TAB_QUESTS, TAB_RIGS};

    #[test]
    fn tab_bar_widths_include_padding_and_badges() {
        let bar = TabBar::new(" │ ")
            .tab("Rigs", Color::Green, TAB_RIGS)
            .tab_with_badge("Quests", Color::Cyan, TAB_QUESTS, 2)
            .tab_with_badge("Games", Color::Yellow, TAB_GAMES, 0);
        assert_eq!(
            bar.widths(),
            vec![(6, TAB_RIGS), (12, TAB_QUESTS), (7, TAB_GAMES)]
        );
    }

    #[test]
    fn only_the_active_tab_is_inverted() {
        let bar = TabBar::new("│")
            .tab("Rigs", Color::Green, TAB_RIGS)
            .tab("Games", Color::Yellow, TAB_GAMES)
            .active(TAB_GAMES);
        assert_eq!(bar.style(&bar.tabs[0]).bg, None);
        assert_eq!(bar.style(&bar.tabs[1]).bg, Some(Color::Yellow));
    }

    #[test]
    fn clickable_lines_map_to_rows() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("Lifestyle"));
        cl.push_clickable(Line::from("Studio Apartment"), BUY_ASSET_BASE);
        cl.push_clickable(Line::from("Compact Car"), BUY_ASSET_BASE + 1);
        cl.push(Line::from("footer"));
        assert_eq!(cl.len(), 4);

        // Bordered block at y=5
        let area = Rect::new(0, 5, 80, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0);
        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(10, 6), None);
        assert_eq!(cs.hit_test(10, 7), Some(BUY_ASSET_BASE));
        assert_eq!(cs.hit_test(10, 8), Some(BUY_ASSET_BASE + 1));
        assert_eq!(cs.hit_test(10, 9), None);
    }

    #[test]
    fn scrolled_lines_are_skipped() {
        let mut cl = ClickableList::new();
        for i in 0..4 {
            cl.push_clickable(Line::from(format!("quest {}", i)), CLAIM_QUEST_BASE + i);
        }
        let area = Rect::new(0, 10, 80, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 0, 1, 2);
        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(0, 10), Some(CLAIM_QUEST_BASE + 2));
        assert_eq!(cs.hit_test(0, 11), Some(CLAIM_QUEST_BASE + 3));
    }

    #[test]
    fn lines_past_the_border_are_clipped() {
        let mut cl = ClickableList::new();
        for i in 0..20 {
            cl.push_clickable(Line::from(format!("row {}", i)), 500 + i);
        }
        let area = Rect::new(0, 0, 80, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0);
        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(0, 4), None);
    }

    #[test]
    fn empty_list() {
        let cl = ClickableList::new();
        assert!(cl.is_empty());
        let mut cs = ClickState::new();
        cl.register_targets(Rect::new(0, 0, 80, 10), &mut cs, 1, 1, 0);
        assert!(cs.targets.is_empty());
    }
}
