mod game;
mod host;
mod input;
mod session;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use chrono::NaiveDate;
use ratzilla::event::{MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use tachyonfx::SimpleRng;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use game::state::GameState;
use game::CheetahGame;
use input::{key_to_input, pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use session::Session;

/// Query the grid container's bounding rect and convert pixel coordinates to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();

    let col = pixel_x_to_col(click_x, rect.width(), cs.terminal_cols);
    let row = pixel_y_to_row(click_y, rect.height(), cs.terminal_rows);

    host::console_log(&format!(
        "click: pixel=({}, {}), cell=({:?}, {:?}), targets={}",
        mouse_x,
        mouse_y,
        col,
        row,
        cs.targets.len()
    ));

    Some((col?, row?))
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// The player's local calendar date.
fn local_date() -> NaiveDate {
    let d = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(d.get_full_year() as i32, d.get_month() + 1, d.get_date())
        .unwrap_or_default()
}

/// Tear the session down when the page goes away.
fn on_page_hide(session: Rc<RefCell<Session>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::<dyn FnMut()>::new(move || session.borrow_mut().teardown());
    if let Err(err) = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref()) {
        host::console_warn(&format!("pagehide listener failed: {:?}", err));
    }
    closure.forget();
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let host = host::detect();
    let mut state = GameState::with_seed(SimpleRng::default().gen());
    state.player.name = host.user_name();
    state.player.photo_url = host.user_profile_photo();

    let session = Rc::new(RefCell::new(Session::new(CheetahGame::with_state(state), host)));
    on_page_hide(session.clone());
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let session = session.clone();
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

            let (col, row) = match dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs) {
                Some(cell) => cell,
                None => return,
            };

            let action = cs.hit_test(col, row);
            drop(cs);

            if let Some(id) = action {
                session.borrow_mut().handle_input(&InputEvent::Click(id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let session = session.clone();
        move |key_event| {
            if let Some(event) = key_to_input(&key_event.code) {
                session.borrow_mut().handle_input(&event);
            }
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let size = f.area();

            // Update terminal dimensions and clear click targets
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            let mut s = session.borrow_mut();
            s.advance(now_ms(), local_date());
            s.render(f, size, &click_state);
        }
    });

    Ok(())
}
