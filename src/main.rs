use std::{cell::RefCell, io, rc::Rc};

use hashrate_tycoon::input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use hashrate_tycoon::miner::state::Millis;
use hashrate_tycoon::miner::MinerGame;
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

fn now_ms() -> Millis {
    js_sys::Date::now() as Millis
}

/// Query the grid container's bounding rect and convert pixel coordinates to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();

    let col = pixel_x_to_col(click_x, rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(click_y, rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let now = now_ms();

    #[cfg(target_arch = "wasm32")]
    let game = match hashrate_tycoon::miner::save::load_game() {
        Some(state) => {
            let mut game = MinerGame::with_state(state, now);
            game.push_log("Welcome back! Your rigs kept mining while you were away.", true);
            game
        }
        None => MinerGame::new(now),
    };
    #[cfg(not(target_arch = "wasm32"))]
    let game = MinerGame::new(now);

    let game = Rc::new(RefCell::new(game));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let target = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                .and_then(|(col, row)| cs.hit_test(col, row));
            drop(cs);

            if let Some(id) = target {
                let mut g = game.borrow_mut();
                if g.handle_input(&InputEvent::Click(id), now_ms()) {
                    #[cfg(target_arch = "wasm32")]
                    hashrate_tycoon::miner::save::save_game(&g.state);
                }
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                let mut g = game.borrow_mut();
                if g.handle_input(&InputEvent::Key(c.to_ascii_lowercase()), now_ms()) {
                    #[cfg(target_arch = "wasm32")]
                    hashrate_tycoon::miner::save::save_game(&g.state);
                }
            }
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let size = f.area();
            {
                let mut g = game.borrow_mut();
                let autosave = g.tick(now_ms());
                if autosave {
                    #[cfg(target_arch = "wasm32")]
                    hashrate_tycoon::miner::save::save_game(&g.state);
                }
            }

            click_state.borrow_mut().begin_frame(size.width, size.height);
            game.borrow().render(f, size, &click_state);
        }
    });

    Ok(())
}
