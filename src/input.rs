//! Input plumbing: normalized events, click targets, and pixel-to-cell mapping.

use ratzilla::ratatui::layout::Rect;

/// Keyboard and pointer input, normalized for the game.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// A click/tap on a registered target, carrying its action id
    /// (see `miner::actions`).
    Click(u16),
}

/// A screen region that triggers an action when tapped.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Terminal cell coordinates.
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets registered by the last frame, plus the terminal size.
///
/// Rebuilt on every draw; the mouse handler hit-tests against it.
#[derive(Debug, Default)]
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame of the given size.
    pub fn begin_frame(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Register a full-width target on `row`, ignored if the row lies outside `area`.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Register targets for a horizontal tab bar.
    ///
    /// `tab_widths` holds `(label_width, action_id)` per tab. Each target
    /// covers its label plus half of the neighbouring separators; the first
    /// and last tabs stretch to the edges so the bar has no dead zones.
    pub fn register_tab_targets(
        &mut self,
        tab_widths: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        if tab_widths.is_empty() || total_width == 0 {
            return;
        }

        let mut starts = Vec::with_capacity(tab_widths.len());
        let mut cursor = 0u16;
        for (i, &(w, _)) in tab_widths.iter().enumerate() {
            if i > 0 {
                cursor += separator_width;
            }
            starts.push(cursor);
            cursor += w;
        }

        let last = tab_widths.len() - 1;
        for (i, &(width, action_id)) in tab_widths.iter().enumerate() {
            let left = if i == 0 {
                0
            } else {
                let prev_end = starts[i - 1] + tab_widths[i - 1].0;
                prev_end + (starts[i] - prev_end) / 2
            };
            let right = if i == last {
                total_width
            } else {
                let end = starts[i] + width;
                end + (starts[i + 1] - end) / 2
            };
            let w = right.saturating_sub(left);
            if w > 0 {
                self.add_click_target(Rect::new(x + left, y, w, height), action_id);
            }
        }
    }

    /// Action id at a cell. Later targets sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }
}

/// Phones get the stacked layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Convert a pixel Y offset within the grid to a terminal row.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    pixel_to_cell(click_y, grid_height, terminal_rows)
}

/// Convert a pixel X offset within the grid to a terminal column.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    pixel_to_cell(click_x, grid_width, terminal_cols)
}

fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}
