//! Baby Cheetah rendering: header, page body, footer tabs and popups.
//!
//! Every tappable row is pushed through `ClickableList` or `TabBar` so the
//! target always sits on the row that shows it. Popups are drawn and
//! registered last, which puts their targets on top.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{popup_area, ClickableList, TabBar};

use super::actions::*;
use super::logic::{current_level, format_number, next_level_requirement, player_rank};
use super::state::{
    invite_link, Booster, GameState, Page, PopupKind, SharePlatform, Wallet, DAILY_CYCLE_DAYS,
    DAILY_REWARDS, INVITE_CODE, LEVEL_THRESHOLDS,
};

/// Coin art, 5 rows x 11 cols. Two idle frames for a slow shimmer.
const COIN_ART: &[&[&str]] = &[
    &[
        "  ▄▀▀▀▀▀▄  ",
        " █ ▄▀▀▀▄ █ ",
        " █ █ ₿ █ █ ",
        " █ ▀▄▄▄▀ █ ",
        "  ▀▄▄▄▄▄▀  ",
    ],
    &[
        "  ▄▀▀▀▀▀▄  ",
        " █ ▄▀▀▀▄ █ ",
        " █ █ ✦ █ █ ",
        " █ ▀▄▄▄▀ █ ",
        "  ▀▄▄▄▄▄▀  ",
    ],
];

/// Squashed coin while a tap is flashing.
const COIN_PRESSED_ART: &[&str] = &[
    "           ",
    "  ▄▀▀▀▀▀▄  ",
    " █ ▀▄₿▄▀ █ ",
    "  ▀▄▄▄▄▄▀  ",
    "           ",
];

/// Coin colour per unlocked level skin (1-based).
const SKIN_COLORS: [Color; 10] = [
    Color::Yellow,
    Color::LightYellow,
    Color::LightRed,
    Color::Magenta,
    Color::Cyan,
    Color::LightBlue,
    Color::Green,
    Color::LightGreen,
    Color::Red,
    Color::White,
];

const SPINNER: &[char] = &['◐', '◓', '◑', '◒'];

pub fn render(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // player header
            Constraint::Length(1), // header tabs
            Constraint::Min(6),    // page
            Constraint::Length(3), // footer
        ])
        .split(area);

    render_header(state, f, chunks[0]);
    render_header_tabs(state, f, chunks[1], click_state);
    match state.page {
        Page::Home => render_home(state, f, chunks[2], click_state),
        Page::Shop => render_shop(state, f, chunks[2], click_state),
        Page::Tasks => render_tasks(state, f, chunks[2], click_state),
        Page::Rating => render_rating(state, f, chunks[2], click_state),
        Page::Wallet => render_wallet(state, f, chunks[2], click_state),
        Page::Invite => render_invite(state, f, chunks[2], click_state),
        Page::Levels => render_levels(state, f, chunks[2], click_state),
        Page::Settings => render_settings(state, f, chunks[2], click_state),
        Page::Trophies => render_trophies(state, f, chunks[2], click_state),
        Page::DailyReward => render_daily(state, f, chunks[2], click_state),
        Page::FriendsActivity => render_friends(state, f, chunks[2], click_state),
    }
    render_footer(state, f, chunks[3], click_state);

    if let Some(kind) = state.popups.active {
        render_popup(state, kind, f, area, click_state);
    }
}

fn borders_for(area_width: u16) -> Borders {
    if is_narrow_layout(area_width) { Borders::TOP | Borders::BOTTOM } else { Borders::ALL }
}

fn bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

// ── Header / Footer ─────────────────────────────────────────

fn render_header(state: &GameState, f: &mut Frame, area: Rect) {
    let p = &state.player;
    let level = current_level(state);

    let mut top = vec![
        Span::styled(
            format!(" 🐆 {}", p.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  Lv {}", level), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("  💰 {}", format_number(p.coins.floor())),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Booster::Active { .. } = state.booster {
        let blink = (state.anim_frame / 3) % 2 == 0;
        top.push(Span::styled(
            " ⚡x2",
            Style::default()
                .fg(if blink { Color::Yellow } else { Color::Magenta })
                .add_modifier(Modifier::BOLD),
        ));
    }

    let energy_width = (area.width as usize).saturating_sub(24).clamp(6, 30);
    let energy_frac = p.energy / p.max_energy;
    let energy_color = if energy_frac > 0.5 {
        Color::Green
    } else if energy_frac > 0.1 {
        Color::Yellow
    } else {
        Color::Red
    };
    let bottom = Line::from(vec![
        Span::styled(" ⚡ ", Style::default().fg(energy_color)),
        Span::styled(bar(energy_frac, energy_width), Style::default().fg(energy_color)),
        Span::styled(
            format!(" {}/{}", p.energy.floor(), p.max_energy),
            Style::default().fg(Color::White),
        ),
    ]);

    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(vec![Line::from(top), bottom]).block(block), area);
}

fn render_header_tabs(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut tabs = TabBar::new("│");
    for page in Page::HEADER {
        let label = match page {
            Page::Trophies => "🏆 Trophies",
            Page::Levels => "⭐ Levels",
            Page::DailyReward => "📅 Daily",
            _ => "⚙ Settings",
        };
        let style = if state.page == page {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        tabs = tabs.tab(label, style, NAV_BASE + page.index() as u16);
    }
    let mut cs = click_state.borrow_mut();
    tabs.render(f, area, &mut cs);
}

fn render_footer(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let narrow = is_narrow_layout(area.width);
    let mut tabs = TabBar::new("│");
    for page in Page::FOOTER {
        let icon = match page {
            Page::Home => "🏠",
            Page::Shop => "🛒",
            Page::Tasks => "📋",
            Page::Rating => "📊",
            Page::Wallet => "👛",
            _ => "👥",
        };
        let label = if narrow { icon.to_string() } else { format!("{} {}", icon, page.title()) };
        let style = if state.page == page {
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        tabs = tabs.tab(label, style, NAV_BASE + page.index() as u16);
    }
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let mut cs = click_state.borrow_mut();
    tabs.block(block).render(f, area, &mut cs);
}

// ── Home ────────────────────────────────────────────────────

fn render_home(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    // Activity log on the right when wide enough.
    let (main_area, log_area) = if area.width >= 80 {
        let h = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        (h[0], Some(h[1]))
    } else {
        (area, None)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(4)])
        .split(main_area);

    render_coin(state, f, chunks[0], click_state);
    render_home_actions(state, f, chunks[1], click_state, log_area.is_none());

    if let Some(log_area) = log_area {
        render_log(state, f, log_area);
    }
}

fn render_coin(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let skin = state.selected_skin.clamp(1, SKIN_COLORS.len() as u32) as usize;
    let coin_color = if state.tap_flash > 0 { Color::White } else { SKIN_COLORS[skin - 1] };
    let border_color = if state.purchase_flash > 0 { Color::White } else { Color::Yellow };
    let title = if state.purchase_flash > 0 { " ✦ Baby Cheetah ✦ " } else { " Baby Cheetah " };

    let art = if state.tap_flash > 0 {
        COIN_PRESSED_ART
    } else {
        COIN_ART[(state.anim_frame / 8) as usize % COIN_ART.len()]
    };

    let mut lines: Vec<Line> = art
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(coin_color))))
        .collect();
    let tap_label = if state.player.energy > 0.0 {
        format!("TAP! +{}", state.player.click_power * state.multiplier())
    } else {
        "No energy".to_string()
    };
    lines.push(Line::from(Span::styled(
        tap_label,
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));

    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(title, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let inner = block.inner(area);
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), area);

    render_effects(state, f, inner);

    // The whole coin panel is the tap button.
    click_state.borrow_mut().add_click_target(area, TAP_COIN);
}

/// Floating "+N" numbers rising from the bottom of the coin panel.
fn render_effects(state: &GameState, f: &mut Frame, inner: Rect) {
    if inner.width == 0 || inner.height == 0 {
        return;
    }
    let centre = inner.x as i32 + inner.width as i32 / 2;
    for effect in &state.effects {
        let max_life = effect.max_life.max(1);
        let rise = (inner.height as u32 - 1) * effect.life / max_life;
        let row = inner.y + rise as u16;
        let text_width = Line::from(effect.text.as_str()).width() as i32;
        let col = (centre + effect.col_offset as i32 - text_width / 2)
            .clamp(inner.x as i32, (inner.x + inner.width) as i32 - 1) as u16;
        let width = (text_width as u16).min(inner.x + inner.width - col);

        let fading = effect.life * 3 < max_life;
        let style = if fading {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::LightYellow).add_modifier(Modifier::BOLD)
        };
        f.render_widget(
            Paragraph::new(Span::styled(effect.text.as_str(), style)),
            Rect::new(col, row, width, 1),
        );
    }
}

fn render_home_actions(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    show_log: bool,
) {
    let mut cl = ClickableList::new();

    cl.push(Line::from(vec![
        Span::styled(" Profit/h ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format_number(state.player.profit_per_hour),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    ]));

    let claim_style = if state.pph_accumulated > 0.0 {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    cl.push_clickable(
        Line::from(Span::styled(
            format!(" ▶ Claim {} coins", format_number(state.pph_accumulated)),
            claim_style,
        )),
        CLAIM_PROFIT,
    );

    let remaining = state.booster.remaining_secs(state.now_tick);
    let booster_line = match state.booster {
        Booster::Idle => Line::from(Span::styled(
            " ▶ Activate 2x booster",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Booster::Active { .. } => Line::from(Span::styled(
            format!(" ⚡ 2x active: {}s", remaining),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Booster::Cooldown { .. } => Line::from(Span::styled(
            format!(" ⏳ Booster cooldown: {}s", remaining),
            Style::default().fg(Color::DarkGray),
        )),
    };
    cl.push_clickable(booster_line, TOGGLE_BOOSTER);

    let level = current_level(state);
    let floor = LEVEL_THRESHOLDS
        .get(level as usize - 1)
        .copied()
        .unwrap_or_else(|| next_level_requirement(level - 1));
    let next = next_level_requirement(level);
    let progress = (state.player.coins - floor) / (next - floor).max(1.0);
    cl.push(Line::from(vec![
        Span::styled(format!(" Lv {} ", level), Style::default().fg(Color::Cyan)),
        Span::styled(bar(progress, 12), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!(" next {}", format_number(next)),
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    if show_log {
        cl.push(Line::from(""));
        let visible = area.height.saturating_sub(2) as usize;
        let room = visible.saturating_sub(cl.len());
        let start = state.log.len().saturating_sub(room);
        for entry in &state.log[start..] {
            let style = if entry.is_important {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            cl.push(Line::from(Span::styled(format!(" > {}", entry.text), style)));
        }
    }

    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::DarkGray));

    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0, 0);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_log(state: &GameState, f: &mut Frame, area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize;

    // Newest first.
    let lines: Vec<Line> = state
        .log
        .iter()
        .rev()
        .take(visible_height)
        .enumerate()
        .map(|(i, entry)| {
            let style = match (entry.is_important, i < 3) {
                (true, true) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Yellow),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Activity ");
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

// ── Scrollable pages ────────────────────────────────────────

/// Render a list page with scrolling. The top border row scrolls up and
/// the bottom border row scrolls down.
fn render_scrolled(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    cl: ClickableList,
    title: String,
    color: Color,
) {
    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(color))
        .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)))
        .title_bottom(Span::styled(" ▲ / ▼ scroll ", Style::default().fg(Color::DarkGray)));

    let max_scroll = (cl.len() as u16).saturating_sub(area.height.saturating_sub(2));
    let scroll = state.scroll.min(max_scroll);

    let mut cs = click_state.borrow_mut();
    cs.add_row_target(area, area.y, SCROLL_UP);
    cs.add_row_target(area, area.y + area.height.saturating_sub(1), SCROLL_DOWN);
    cl.register_targets_with_block(area, &block, &mut cs, scroll, 0);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block).scroll((scroll, 0)), area);
}

fn section(cl: &mut ClickableList, title: &str, color: Color) {
    cl.push(Line::from(Span::styled(
        format!(" ┄┄ {} ┄┄", title),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
}

// ── Shop ────────────────────────────────────────────────────

fn render_shop(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let coins = state.player.coins;
    let mut cl = ClickableList::new();

    section(&mut cl, "Passive income", Color::Green);
    for (i, item) in state.shop_items.iter().enumerate() {
        let price = item.price();
        let affordable = coins >= price;
        let price_style = if affordable {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!(" {} ", item.name), Style::default().fg(Color::White)),
                Span::styled(format!("Lv{} ", item.level), Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("+{}/h ", format_number(item.profit())),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("▶ {}", format_number(price)), price_style),
            ]),
            BUY_ITEM_BASE + i as u16,
        );
    }

    cl.push(Line::from(""));
    section(&mut cl, "Tap power", Color::Magenta);
    for (i, item) in state.premium_items.iter().enumerate() {
        let price = item.price();
        let price_style = if coins >= price {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!(" {} ", item.name), Style::default().fg(Color::White)),
                Span::styled(format!("Lv{} ", item.level), Style::default().fg(Color::Cyan)),
                Span::styled(format!("▶ {}", format_number(price)), price_style),
            ]),
            BUY_PREMIUM_BASE + i as u16,
        );
        cl.push(Line::from(Span::styled(
            format!("   {}", item.effect),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = format!(" Shop 💰{} ", format_number(coins.floor()));
    render_scrolled(state, f, area, click_state, cl, title, Color::Green);
}

// ── Tasks ───────────────────────────────────────────────────

fn render_tasks(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cl = ClickableList::new();
    for (i, task) in state.tasks.iter().enumerate() {
        let mut spans = vec![
            Span::styled(format!(" {} ", task.description), Style::default().fg(Color::White)),
            Span::styled(
                format!("{}/{} ", task.progress, task.max_progress),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("+{} ", format_number(task.reward)),
                Style::default().fg(Color::Yellow),
            ),
        ];
        if task.claimed {
            spans.push(Span::styled("✓ Claimed", Style::default().fg(Color::DarkGray)));
            cl.push(Line::from(spans));
        } else if task.completed {
            spans.push(Span::styled(
                "▶ Claim",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
            cl.push_clickable(Line::from(spans), CLAIM_TASK_BASE + i as u16);
        } else if task.trigger.is_automatic() {
            spans.push(Span::styled("⋯", Style::default().fg(Color::DarkGray)));
            cl.push(Line::from(spans));
        } else {
            spans.push(Span::styled(
                "▶ Start",
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ));
            cl.push_clickable(Line::from(spans), START_TASK_BASE + i as u16);
        }
    }
    render_scrolled(state, f, area, click_state, cl, " Tasks ".to_string(), Color::Magenta);
}

// ── Rating ──────────────────────────────────────────────────

fn render_rating(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled(
            format!(" You: #{} ", player_rank(state)),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} 💰{}", state.player.name, format_number(state.player.coins.floor())),
            Style::default().fg(Color::White),
        ),
    ]));
    cl.push(Line::from(""));
    for entry in &state.leaderboard {
        let rank_style = match entry.rank {
            1 => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            2 => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            3 => Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            _ => Style::default().fg(Color::DarkGray),
        };
        cl.push(Line::from(vec![
            Span::styled(format!(" #{:<4}", entry.rank), rank_style),
            Span::styled(format!("{:<10}", entry.name), Style::default().fg(Color::White)),
            Span::styled(
                format!(" 💰{}", format_number(entry.coins)),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!(" +{}/h", format_number(entry.profit_per_hour)),
                Style::default().fg(Color::Green),
            ),
        ]));
    }
    render_scrolled(state, f, area, click_state, cl, " Rating ".to_string(), Color::Yellow);
}

// ── Wallet ──────────────────────────────────────────────────

fn render_wallet(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        format!(" Balance: {} coins", format_number(state.player.coins.floor())),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(""));
    match &state.wallet {
        Wallet::Disconnected => {
            cl.push(Line::from(Span::styled(
                " No wallet connected.",
                Style::default().fg(Color::DarkGray),
            )));
            cl.push_clickable(
                Line::from(Span::styled(
                    " ▶ Connect Tonkeeper",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
                CONNECT_WALLET,
            );
        }
        Wallet::Connecting { .. } => {
            let spinner = SPINNER[(state.anim_frame / 2) as usize % SPINNER.len()];
            cl.push(Line::from(Span::styled(
                format!(" {} Connecting to Tonkeeper...", spinner),
                Style::default().fg(Color::Cyan),
            )));
        }
        Wallet::Connected(address) => {
            cl.push(Line::from(Span::styled(
                " ✓ Connected with Tonkeeper",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
            cl.push(Line::from(Span::styled(
                format!(" {}", address),
                Style::default().fg(Color::White),
            )));
        }
    }

    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(" Wallet ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)));
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0, 0);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

// ── Invite ──────────────────────────────────────────────────

fn render_invite(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled(" Invite code: ", Style::default().fg(Color::DarkGray)),
        Span::styled(INVITE_CODE, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  friends: {}", state.friends.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    cl.push(Line::from(Span::styled(
        format!(" {}", invite_link()),
        Style::default().fg(Color::White),
    )));
    cl.push_clickable(
        Line::from(Span::styled(
            " ▶ Copy invite link",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        COPY_INVITE,
    );
    cl.push(Line::from(""));
    section(&mut cl, "Share", Color::Magenta);
    for (i, platform) in SharePlatform::ALL.iter().enumerate() {
        cl.push_clickable(
            Line::from(Span::styled(
                format!(" ▶ Share on {}", platform.name()),
                Style::default().fg(Color::Magenta),
            )),
            SHARE_BASE + i as u16,
        );
    }
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(
            " ▶ Friends activity",
            Style::default().fg(Color::Green),
        )),
        NAV_BASE + Page::FriendsActivity.index() as u16,
    );

    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::Magenta))
        .title(Span::styled(" Invite ", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)));
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0, 0);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_friends(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cl = ClickableList::new();
    if state.friends.is_empty() {
        cl.push(Line::from(Span::styled(
            " No friend activity yet. Invite some friends to get started!",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for (name, coins) in &state.friends {
            cl.push(Line::from(vec![
                Span::styled(format!(" {} ", name), Style::default().fg(Color::White)),
                Span::styled(
                    format!("earned {} coins", format_number(*coins)),
                    Style::default().fg(Color::Yellow),
                ),
            ]));
        }
    }
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(" ◀ Back to Invite", Style::default().fg(Color::Cyan))),
        NAV_BASE + Page::Invite.index() as u16,
    );

    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::Green))
        .title(" Friends ");
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0, 0);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block).wrap(Wrap { trim: false }), area);
}

// ── Levels ──────────────────────────────────────────────────

fn render_levels(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cl = ClickableList::new();
    for (i, requirement) in LEVEL_THRESHOLDS.iter().enumerate() {
        let level = i as u32 + 1;
        let color = SKIN_COLORS[i];
        let coin = Span::styled(" ● ", Style::default().fg(color));
        if state.unlocked_levels.contains(&level) {
            let in_use = state.selected_skin == level;
            let action = if in_use {
                Span::styled("✓ In use", Style::default().fg(Color::DarkGray))
            } else {
                Span::styled("▶ Use", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            };
            cl.push_clickable(
                Line::from(vec![
                    coin,
                    Span::styled(format!("Level {:<3}", level), Style::default().fg(Color::White)),
                    Span::styled("Unlocked ", Style::default().fg(Color::Green)),
                    action,
                ]),
                USE_SKIN_BASE + i as u16,
            );
        } else {
            cl.push(Line::from(vec![
                coin,
                Span::styled(format!("Level {:<3}", level), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("Unlock at {} coins", format_number(*requirement)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }
    render_scrolled(state, f, area, click_state, cl, " Levels ".to_string(), Color::Cyan);
}

// ── Trophies ────────────────────────────────────────────────

fn render_trophies(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let coins = state.player.coins;
    let mut cl = ClickableList::new();
    for (i, trophy) in state.trophies.iter().enumerate() {
        let head = Span::styled(
            format!(" 🏆 {} ", trophy.name),
            Style::default().fg(if trophy.claimed { Color::DarkGray } else { Color::Yellow }),
        );
        if trophy.claimed {
            cl.push(Line::from(vec![
                head,
                Span::styled("✓ Claimed", Style::default().fg(Color::DarkGray)),
            ]));
        } else if coins >= trophy.requirement {
            cl.push_clickable(
                Line::from(vec![
                    head,
                    Span::styled(
                        format!("▶ Claim {}", format_number(trophy.prize)),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                ]),
                CLAIM_TROPHY_BASE + i as u16,
            );
        } else {
            cl.push(Line::from(vec![
                head,
                Span::styled(bar(coins / trophy.requirement, 8), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!(" 🔒 {}", format_number(trophy.requirement)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
        cl.push(Line::from(Span::styled(
            format!("    {}", trophy.description),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let title = format!(" Trophies {}/{} ", state.claimed_trophy_count(), state.trophies.len());
    render_scrolled(state, f, area, click_state, cl, title, Color::Yellow);
}

// ── Daily reward ────────────────────────────────────────────

fn render_daily(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let daily = &state.daily;
    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled(
            format!(" Day {}/{} ", daily.day, DAILY_CYCLE_DAYS),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" Streak: {} days", daily.streak),
            Style::default().fg(Color::Yellow),
        ),
    ]));
    if let Some(last) = daily.last_claimed {
        cl.push(Line::from(Span::styled(
            format!(" Last claimed {}", last.format("%Y-%m-%d")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    cl.push(Line::from(""));

    if daily.completed {
        cl.push(Line::from(Span::styled(
            " ✓ 30-day cycle complete",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    } else {
        cl.push_clickable(
            Line::from(Span::styled(
                " ▶ Claim daily reward",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            CLAIM_DAILY,
        );
    }
    cl.push(Line::from(""));

    section(&mut cl, "Rewards by streak", Color::Yellow);
    let current = daily.streak as usize % DAILY_REWARDS.len();
    for (i, reward) in DAILY_REWARDS.iter().enumerate().skip(1).chain(std::iter::once((0, &DAILY_REWARDS[0]))) {
        let streak_day = if i == 0 { DAILY_REWARDS.len() } else { i };
        let style = if i == current && daily.streak > 0 {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        cl.push(Line::from(Span::styled(
            format!(" Streak {:>2}: {}", streak_day, format_number(*reward)),
            style,
        )));
    }

    render_scrolled(state, f, area, click_state, cl, " Daily Reward ".to_string(), Color::Yellow);
}

// ── Settings ────────────────────────────────────────────────

fn render_settings(state: &GameState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let toggle = |label: &str, on: bool| -> Line<'static> {
        let (text, style) = if on {
            ("ON ", Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            ("OFF", Style::default().fg(Color::White).bg(Color::DarkGray))
        };
        Line::from(vec![
            Span::styled(format!(" {:<16}", label), Style::default().fg(Color::White)),
            Span::styled(format!(" {} ", text), style),
        ])
    };

    let s = state.settings;
    let mut cl = ClickableList::new();
    cl.push_clickable(toggle("Vibration", s.vibration), TOGGLE_VIBRATION);
    cl.push_clickable(toggle("Background music", s.music), TOGGLE_MUSIC);
    cl.push_clickable(toggle("Sound effects", s.sound_effects), TOGGLE_SOUND);

    cl.push(Line::from(""));
    section(&mut cl, "Profile", Color::Cyan);
    let p = &state.player;
    cl.push(Line::from(vec![
        Span::styled(" Name  ", Style::default().fg(Color::DarkGray)),
        Span::styled(p.name.clone(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    ]));
    let photo = if p.photo_url.is_empty() { "none".to_string() } else { p.photo_url.clone() };
    cl.push(Line::from(vec![
        Span::styled(" Photo ", Style::default().fg(Color::DarkGray)),
        Span::styled(photo, Style::default().fg(Color::Blue)),
    ]));

    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Settings ");
    let inner_width = block.inner(area).width;
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0, inner_width);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block).wrap(Wrap { trim: false }), area);
}

// ── Popups ──────────────────────────────────────────────────

fn render_popup(
    state: &GameState,
    kind: PopupKind,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    let (title, color) = match kind {
        PopupKind::ProfitAccumulated => {
            cl.push(Line::from(Span::styled(
                format!(" You've accumulated {} coins!", format_number(state.pph_accumulated)),
                Style::default().fg(Color::White),
            )));
            cl.push(Line::from(""));
            cl.push_clickable(
                Line::from(Span::styled(
                    " ▶ Claim Profits",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )),
                CLAIM_PROFIT,
            );
            (" Profit Accumulated! ", Color::Green)
        }
        PopupKind::LevelUp { level } => {
            cl.push(Line::from(Span::styled(
                format!(" Congratulations! You've reached Level {}!", level),
                Style::default().fg(Color::White),
            )));
            cl.push(Line::from(""));
            cl.push_clickable(
                Line::from(Span::styled(
                    " ▶ Claim Rewards",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )),
                CLAIM_LEVEL_UP,
            );
            (" Level Up! ", Color::Yellow)
        }
        PopupKind::Congratulation { item } => {
            cl.push(Line::from(Span::styled(
                format!(" You've purchased {}!", item),
                Style::default().fg(Color::White),
            )));
            cl.push(Line::from(Span::styled(
                " This will boost your crypto earnings!",
                Style::default().fg(Color::DarkGray),
            )));
            cl.push(Line::from(""));
            cl.push_clickable(
                Line::from(Span::styled(
                    " ▶ Awesome!",
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                )),
                DISMISS_POPUP,
            );
            (" Congratulations! ", Color::Magenta)
        }
    };
    cl.push_clickable(
        Line::from(Span::styled(" ✕ Close", Style::default().fg(Color::DarkGray))),
        DISMISS_POPUP,
    );

    let width = area.width.saturating_sub(4).min(50);
    let height = cl.len() as u16 + 2;
    let rect = popup_area(area, width, height);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)));

    f.render_widget(Clear, rect);
    let mut cs = click_state.borrow_mut();
    cs.add_click_target(area, POPUP_BACKDROP);
    cl.register_targets_with_block(rect, &block, &mut cs, 0, 0);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratzilla::ratatui::backend::TestBackend;
    use ratzilla::ratatui::Terminal;

    fn draw(state: &GameState, width: u16, height: u16) -> (String, ClickState) {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        let cs = Rc::new(RefCell::new(ClickState::new()));
        terminal
            .draw(|f| {
                let area = f.area();
                render(state, f, area, &cs);
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<Vec<_>>()
            .join("");
        let cs = Rc::try_unwrap(cs).ok().unwrap().into_inner();
        (text, cs)
    }

    fn has_target(cs: &ClickState, id: u16) -> bool {
        cs.targets.iter().any(|t| t.action_id == id)
    }

    #[test]
    fn every_page_renders_at_both_widths() {
        let mut state = GameState::new();
        for page in Page::ALL {
            state.page = page;
            for width in [40, 100] {
                let (_, cs) = draw(&state, width, 30);
                assert!(!cs.targets.is_empty(), "{:?} at {}", page, width);
            }
        }
    }

    #[test]
    fn footer_registers_every_footer_page() {
        let state = GameState::new();
        let (_, cs) = draw(&state, 100, 30);
        for page in Page::FOOTER.iter().chain(Page::HEADER.iter()) {
            assert!(has_target(&cs, NAV_BASE + page.index() as u16), "{:?}", page);
        }
    }

    #[test]
    fn home_shows_coin_target_and_balance() {
        let mut state = GameState::new();
        state.player.coins = 1_500.0;
        let (text, cs) = draw(&state, 100, 30);
        assert!(text.contains("1.50k"));
        assert!(has_target(&cs, TAP_COIN));
        assert!(has_target(&cs, CLAIM_PROFIT));
        assert!(has_target(&cs, TOGGLE_BOOSTER));
    }

    #[test]
    fn shop_rows_are_buy_targets() {
        let mut state = GameState::new();
        state.page = Page::Shop;
        let (text, cs) = draw(&state, 100, 40);
        assert!(text.contains("Crypto Cave"));
        assert!(has_target(&cs, BUY_ITEM_BASE));
        assert!(has_target(&cs, BUY_PREMIUM_BASE));
    }

    #[test]
    fn completed_task_offers_claim() {
        let mut state = GameState::new();
        state.page = Page::Tasks;
        state.tasks[0].progress = 1;
        state.tasks[0].completed = true;
        let (_, cs) = draw(&state, 100, 30);
        assert!(has_target(&cs, CLAIM_TASK_BASE));
        assert!(!has_target(&cs, START_TASK_BASE));
        assert!(has_target(&cs, START_TASK_BASE + 1));
        // automatic tasks have no start button
        assert!(!has_target(&cs, START_TASK_BASE + 7));
    }

    #[test]
    fn locked_levels_are_not_clickable() {
        let mut state = GameState::new();
        state.page = Page::Levels;
        let (text, cs) = draw(&state, 100, 30);
        assert!(has_target(&cs, USE_SKIN_BASE));
        assert!(!has_target(&cs, USE_SKIN_BASE + 1));
        assert!(text.contains("Unlock at 25.00k coins"));
    }

    #[test]
    fn trophy_claim_only_when_affordable() {
        let mut state = GameState::new();
        state.page = Page::Trophies;
        state.player.coins = 60_000.0;
        let (_, cs) = draw(&state, 100, 40);
        assert!(has_target(&cs, CLAIM_TROPHY_BASE));
        assert!(has_target(&cs, CLAIM_TROPHY_BASE + 1));
        assert!(!has_target(&cs, CLAIM_TROPHY_BASE + 2));
    }

    #[test]
    fn popup_targets_win_hit_test() {
        let mut state = GameState::new();
        state.popups.open(PopupKind::LevelUp { level: 2 });
        let (text, cs) = draw(&state, 60, 30);
        assert!(text.contains("Level Up!"));
        let target = cs
            .targets
            .iter()
            .find(|t| t.action_id == CLAIM_LEVEL_UP)
            .map(|t| t.rect)
            .unwrap();
        assert_eq!(cs.hit_test(target.x + 1, target.y), Some(CLAIM_LEVEL_UP));
    }

    #[test]
    fn popup_covers_the_page_beneath() {
        let mut state = GameState::new();
        state.popups.open(PopupKind::Congratulation { item: "Baby Cheetah Vault" });
        let (_, cs) = draw(&state, 100, 30);
        let claim_row = cs
            .targets
            .iter()
            .find(|t| t.action_id == CLAIM_PROFIT)
            .map(|t| t.rect)
            .unwrap();
        assert_eq!(cs.hit_test(claim_row.x + 1, claim_row.y), Some(POPUP_BACKDROP));
        assert_eq!(cs.hit_test(0, 0), Some(POPUP_BACKDROP));
    }

    #[test]
    fn settings_show_profile_photo() {
        let mut state = GameState::new();
        state.page = Page::Settings;
        state.player.name = "cheetah_fan".into();
        state.player.photo_url = "https://t.me/i/userpic/1.jpg".into();
        let (text, cs) = draw(&state, 100, 30);
        assert!(text.contains("cheetah_fan"));
        assert!(text.contains("https://t.me/i/userpic/1.jpg"));
        assert!(has_target(&cs, TOGGLE_SOUND));
    }

    #[test]
    fn friends_page_empty_message() {
        let mut state = GameState::new();
        state.page = Page::FriendsActivity;
        let (text, _) = draw(&state, 100, 30);
        assert!(text.contains("No friend activity yet."));
    }

    #[test]
    fn effects_render_inside_coin_panel() {
        let mut state = GameState::new();
        state.player.click_power = 3;
        super::super::logic::tap(&mut state);
        state.player.click_power = 1;
        let (text, _) = draw(&state, 100, 30);
        assert!(text.contains("+3"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut state = GameState::new();
        state.popups.open(PopupKind::ProfitAccumulated);
        super::super::logic::tap(&mut state);
        for page in Page::ALL {
            state.page = page;
            let _ = draw(&state, 10, 8);
        }
    }
}
