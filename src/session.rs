//! One play session: the game, its host, its clock and its timers.
//!
//! The draw loop calls [`Session::advance`] every frame; input handlers call
//! [`Session::handle_input`]. Both drain the game's outbox into the host, so
//! game logic never touches the browser directly.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::game::{logic, CheetahGame};
use crate::host::{console_log, ConfirmAction, Host, HostCall};
use crate::input::{ClickState, InputEvent};
use crate::time::{GameTime, RecurringTask, TaskKind, TICKS_PER_SEC};

/// Answers from confirm dialogs, applied on the next frame.
type ConfirmInbox = Rc<RefCell<Vec<(ConfirmAction, bool)>>>;

pub struct Session {
    pub game: CheetahGame,
    host: Box<dyn Host>,
    clock: GameTime,
    timers: Vec<RecurringTask>,
    confirms: ConfirmInbox,
    closed: bool,
}

impl Session {
    pub fn new(game: CheetahGame, host: Box<dyn Host>) -> Self {
        Self {
            game,
            host,
            clock: GameTime::new(TICKS_PER_SEC),
            timers: vec![
                RecurringTask::every(TaskKind::EnergyRegen, TICKS_PER_SEC),
                RecurringTask::every(TaskKind::ProfitAccrual, TICKS_PER_SEC),
            ],
            confirms: Rc::new(RefCell::new(Vec::new())),
            closed: false,
        }
    }

    /// Feed a frame timestamp (ms) and the player's local date.
    pub fn advance(&mut self, now_ms: f64, today: NaiveDate) {
        self.game.set_today(today);

        let answers: Vec<(ConfirmAction, bool)> = self.confirms.borrow_mut().drain(..).collect();
        for (action, confirmed) in answers {
            self.game.confirm_result(action, confirmed);
        }

        let ticks = self.clock.update(now_ms);
        for _ in 0..ticks {
            self.game.tick(1);
            for timer in &mut self.timers {
                if timer.step() {
                    run_timer(&mut self.game, timer.kind);
                }
            }
        }

        self.flush();
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let consumed = self.game.handle_input(event);
        self.flush();
        consumed
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        self.game.render(f, area, click_state);
    }

    /// Stop the timers and the music. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        for timer in &mut self.timers {
            timer.cancel();
        }
        if self.game.state.settings.music {
            self.host.set_music(false);
        }
        console_log("session: timers stopped");
    }

    /// Hand every queued side effect to the host, in order.
    fn flush(&mut self) {
        for call in self.game.state.take_outbox() {
            match call {
                HostCall::Alert(message) => self.host.show_alert(&message),
                HostCall::Haptic(style) => self.host.haptic_feedback(style),
                HostCall::Sound(cue) => self.host.play_sound(cue),
                HostCall::Send(event) => self.host.send_data(&event),
                HostCall::OpenLink(url) => self.host.open_link(&url),
                HostCall::OpenTelegramLink(url) => self.host.open_telegram_link(&url),
                HostCall::Confirm { message, action } => {
                    let inbox = self.confirms.clone();
                    self.host.show_confirm(
                        &message,
                        Box::new(move |confirmed| inbox.borrow_mut().push((action, confirmed))),
                    );
                }
                HostCall::Music(on) => self.host.set_music(on),
                HostCall::CopyText(text) => self.host.copy_text(&text),
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn run_timer(game: &mut CheetahGame, kind: TaskKind) {
    match kind {
        TaskKind::EnergyRegen => logic::regen_energy(&mut game.state),
        TaskKind::ProfitAccrual => logic::accrue_profit(&mut game.state),
    }
}
