//! Semantic action IDs for click targets.
//!
//! Render code registers these per frame; `CheetahGame::handle_input`
//! dispatches them when a tap lands on the target.

// ── Home ────────────────────────────────────────────────────────
pub const TAP_COIN: u16 = 0;
pub const TOGGLE_BOOSTER: u16 = 1;
pub const CLAIM_PROFIT: u16 = 2;

// ── Page navigation (base + Page::index) ────────────────────────
pub const NAV_BASE: u16 = 20;

// ── Popups ──────────────────────────────────────────────────────
pub const DISMISS_POPUP: u16 = 50;
pub const CLAIM_LEVEL_UP: u16 = 51;
/// Covers the whole screen under an open popup; clicks on it do nothing.
pub const POPUP_BACKDROP: u16 = 52;

// ── Shop (base + catalog index) ─────────────────────────────────
pub const BUY_ITEM_BASE: u16 = 100;
pub const BUY_PREMIUM_BASE: u16 = 150;

// ── Tasks (base + task index) ───────────────────────────────────
pub const START_TASK_BASE: u16 = 200;
pub const CLAIM_TASK_BASE: u16 = 250;

// ── Trophies (base + trophy index) ──────────────────────────────
pub const CLAIM_TROPHY_BASE: u16 = 300;

// ── Levels: pick an unlocked coin skin (base + level index) ─────
pub const USE_SKIN_BASE: u16 = 350;

// ── Wallet / daily reward / invite ──────────────────────────────
pub const CONNECT_WALLET: u16 = 400;
pub const CLAIM_DAILY: u16 = 401;
pub const COPY_INVITE: u16 = 402;
/// Share buttons on the invite page (base + SharePlatform index).
pub const SHARE_BASE: u16 = 410;

// ── Settings ────────────────────────────────────────────────────
pub const TOGGLE_VIBRATION: u16 = 450;
pub const TOGGLE_MUSIC: u16 = 451;
pub const TOGGLE_SOUND: u16 = 452;

// ── List scrolling (rating / tasks / trophies) ──────────────────
pub const SCROLL_UP: u16 = 500;
pub const SCROLL_DOWN: u16 = 501;
