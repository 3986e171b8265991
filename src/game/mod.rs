//! Baby Cheetah: tap the coin, buy upgrades, claim rewards.
//!
//! Taps on registered targets arrive as `InputEvent::Click(action_id)`.
//! Keyboard play mirrors the main buttons:
//! `space`/`c` tap, `b` booster, `p` claim profit, `1`-`6` footer pages,
//! `t`/`l`/`d`/`s` header pages, `f` friends, `j`/`k` scroll, `x` close a popup.

pub mod actions;
pub mod logic;
pub mod render;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::host::ConfirmAction;
use crate::input::{ClickState, InputEvent};

use actions::*;
use state::{GameState, Page, PopupKind, SharePlatform};

pub struct CheetahGame {
    pub state: GameState,
    /// Local calendar date, refreshed by the session every frame.
    today: Option<NaiveDate>,
}

impl CheetahGame {
    pub fn new() -> Self {
        Self::with_state(GameState::new())
    }

    pub fn with_state(state: GameState) -> Self {
        Self { state, today: None }
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = Some(today);
    }

    /// Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(ch) => self.handle_key(*ch),
            InputEvent::Click(id) => self.handle_click(*id),
        }
    }

    pub fn tick(&mut self, delta_ticks: u32) {
        logic::tick(&mut self.state, delta_ticks);
    }

    pub fn confirm_result(&mut self, action: ConfirmAction, confirmed: bool) {
        logic::resolve_confirm(&mut self.state, action, confirmed);
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, f, area, click_state);
    }

    // ── Input Handling ──────────────────────────────────────────

    fn handle_key(&mut self, ch: char) -> bool {
        let state = &mut self.state;
        if state.popups.active.is_some() {
            return match ch {
                'x' | 'X' | ' ' | '\n' => logic::dismiss_popup(state),
                _ => false,
            };
        }
        match ch {
            ' ' | 'c' => logic::tap(state),
            'b' => logic::activate_booster(state),
            'p' => logic::claim_profit(state),
            '1'..='6' => {
                let idx = (ch as u8 - b'1') as usize;
                go_to(state, Page::FOOTER[idx]);
                true
            }
            't' => {
                go_to(state, Page::Trophies);
                true
            }
            'l' => {
                go_to(state, Page::Levels);
                true
            }
            'd' => {
                go_to(state, Page::DailyReward);
                true
            }
            's' => {
                go_to(state, Page::Settings);
                true
            }
            'f' => {
                go_to(state, Page::FriendsActivity);
                true
            }
            'j' => scroll_by(state, 1),
            'k' => scroll_by(state, -1),
            _ => false,
        }
    }

    fn handle_click(&mut self, id: u16) -> bool {
        let today = self.today;
        let state = &mut self.state;

        // A popup swallows everything behind it.
        if let Some(kind) = state.popups.active {
            return match (id, kind) {
                (CLAIM_LEVEL_UP, PopupKind::LevelUp { .. }) => logic::claim_level_up(state),
                (CLAIM_PROFIT, PopupKind::ProfitAccumulated) => logic::claim_profit_and_close(state),
                (DISMISS_POPUP, _) => logic::dismiss_popup(state),
                _ => false,
            };
        }

        match id {
            TAP_COIN => logic::tap(state),
            TOGGLE_BOOSTER => logic::activate_booster(state),
            CLAIM_PROFIT => logic::claim_profit(state),
            CONNECT_WALLET => logic::connect_wallet(state),
            CLAIM_DAILY => match today {
                Some(day) => logic::claim_daily_reward(state, day),
                None => false,
            },
            COPY_INVITE => logic::copy_invite_link(state),
            TOGGLE_VIBRATION => {
                logic::toggle_vibration(state);
                true
            }
            TOGGLE_MUSIC => {
                logic::toggle_music(state);
                true
            }
            TOGGLE_SOUND => {
                logic::toggle_sound(state);
                true
            }
            SCROLL_UP => scroll_by(state, -1),
            SCROLL_DOWN => scroll_by(state, 1),
            id if (NAV_BASE..NAV_BASE + Page::ALL.len() as u16).contains(&id) => {
                match Page::from_index((id - NAV_BASE) as usize) {
                    Some(page) => {
                        go_to(state, page);
                        true
                    }
                    None => false,
                }
            }
            id if (BUY_ITEM_BASE..BUY_PREMIUM_BASE).contains(&id) => {
                logic::buy_item(state, (id - BUY_ITEM_BASE) as usize)
            }
            id if (BUY_PREMIUM_BASE..START_TASK_BASE).contains(&id) => {
                logic::buy_premium(state, (id - BUY_PREMIUM_BASE) as usize)
            }
            id if (START_TASK_BASE..CLAIM_TASK_BASE).contains(&id) => {
                logic::start_task(state, (id - START_TASK_BASE) as usize)
            }
            id if (CLAIM_TASK_BASE..CLAIM_TROPHY_BASE).contains(&id) => {
                logic::claim_task(state, (id - CLAIM_TASK_BASE) as usize)
            }
            id if (CLAIM_TROPHY_BASE..USE_SKIN_BASE).contains(&id) => {
                logic::claim_trophy(state, (id - CLAIM_TROPHY_BASE) as usize)
            }
            id if (USE_SKIN_BASE..CONNECT_WALLET).contains(&id) => {
                logic::use_skin(state, (id - USE_SKIN_BASE) as u32 + 1)
            }
            id if (SHARE_BASE..SHARE_BASE + SharePlatform::ALL.len() as u16).contains(&id) => {
                logic::share(state, SharePlatform::ALL[(id - SHARE_BASE) as usize])
            }
            _ => false,
        }
    }
}

fn go_to(state: &mut GameState, page: Page) {
    state.button_sound();
    logic::navigate(state, page);
}

fn scroll_by(state: &mut GameState, delta: i32) -> bool {
    let next = (state.scroll as i32 + delta).max(0) as u16;
    if next == state.scroll {
        return false;
    }
    state.scroll = next;
    true
}
