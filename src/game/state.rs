//! Baby Cheetah game state: player, catalogs, timers and one-shot UI flags.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chrono::NaiveDate;

use crate::host::{HostCall, SoundCue};
use crate::time::TICKS_PER_SEC;

// ── Balance constants ───────────────────────────────────────────

/// Coins needed for levels 1..=10. Beyond the table the step is `T[9]`.
pub const LEVEL_THRESHOLDS: [f64; 10] = [
    0.0,
    25_000.0,
    300_000.0,
    500_000.0,
    1_000_000.0,
    10_000_000.0,
    50_000_000.0,
    100_000_000.0,
    500_000_000.0,
    1_000_000_000.0,
];

pub const MAX_ENERGY: f64 = 5_000.0;
/// Energy regained per second.
pub const ENERGY_REGEN: f64 = 0.5;

pub const BOOSTER_MULTIPLIER: u64 = 2;
pub const BOOSTER_ACTIVE_TICKS: u64 = 120 * TICKS_PER_SEC as u64;
pub const BOOSTER_COOLDOWN_TICKS: u64 = 600 * TICKS_PER_SEC as u64;

/// Daily reward by streak, indexed `streak % 16`.
pub const DAILY_REWARDS: [f64; 16] = [
    100.0,
    250.0,
    350.0,
    650.0,
    10_000.0,
    2_500.0,
    5_000.0,
    15_000.0,
    25_000.0,
    50_000.0,
    100_000.0,
    250_000.0,
    500_000.0,
    1_000_000.0,
    2_500_000.0,
    5_000_000.0,
];
pub const DAILY_CYCLE_DAYS: u32 = 30;

/// Simulated Tonkeeper handshake: 2 seconds.
pub const WALLET_CONNECT_TICKS: u32 = 2 * TICKS_PER_SEC;

pub const MAX_EFFECTS: usize = 20;
pub const MAX_LOG: usize = 50;
pub const LEADERBOARD_SIZE: usize = 200;

pub const INVITE_CODE: &str = "CRYPTO123";
pub const INVITE_LINK_BASE: &str = "https://babycheetah.com/invite/";

pub const SHARE_MESSAGE: &str = "🏆 Just claimed some coins in Baby Cheetah! 🚀 Join me in this exciting crypto game and start earning too! 🤑 Complete tasks, invite friends, and rise in the ranks. Let's get those coins together! 💰🐾";
pub const YOUTUBE_URL: &str = "https://www.youtube.com/channel/UC-pGiivNfXNXS3DQLblwisg";
pub const TELEGRAM_CHANNEL_URL: &str = "https://t.me/babycheetahcrypto";

// ── Pages ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Home,
    Shop,
    Tasks,
    Rating,
    Wallet,
    Invite,
    Levels,
    Settings,
    Trophies,
    DailyReward,
    FriendsActivity,
}

impl Page {
    pub const ALL: [Page; 11] = [
        Page::Home,
        Page::Shop,
        Page::Tasks,
        Page::Rating,
        Page::Wallet,
        Page::Invite,
        Page::Levels,
        Page::Settings,
        Page::Trophies,
        Page::DailyReward,
        Page::FriendsActivity,
    ];

    /// Pages reachable from the footer bar, in footer order.
    pub const FOOTER: [Page; 6] = [
        Page::Home,
        Page::Shop,
        Page::Tasks,
        Page::Rating,
        Page::Wallet,
        Page::Invite,
    ];

    /// Pages reachable from the header row.
    pub const HEADER: [Page; 4] = [
        Page::Trophies,
        Page::Levels,
        Page::DailyReward,
        Page::Settings,
    ];

    pub fn index(&self) -> usize {
        Page::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn from_index(i: usize) -> Option<Page> {
        Page::ALL.get(i).copied()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Shop => "Shop",
            Page::Tasks => "Tasks",
            Page::Rating => "Rating",
            Page::Wallet => "Wallet",
            Page::Invite => "Invite",
            Page::Levels => "Levels",
            Page::Settings => "Settings",
            Page::Trophies => "Trophies",
            Page::DailyReward => "Daily",
            Page::FriendsActivity => "Friends",
        }
    }
}

// ── Player ──────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub name: String,
    pub photo_url: String,
    pub coins: f64,
    /// Tap counter, wraps at 100.
    pub experience: u32,
    pub energy: f64,
    pub max_energy: f64,
    pub click_power: u64,
    pub profit_per_hour: f64,
}

impl Player {
    pub fn new() -> Self {
        Self {
            name: "Player".into(),
            photo_url: String::new(),
            coins: 0.0,
            experience: 0,
            energy: MAX_ENERGY,
            max_energy: MAX_ENERGY,
            click_power: 1,
            profit_per_hour: 0.0,
        }
    }
}

// ── Shop ────────────────────────────────────────────────────────

/// A passive-income upgrade. Price doubles per level.
#[derive(Clone, Debug)]
pub struct ShopItem {
    pub id: u32,
    pub name: &'static str,
    pub base_price: f64,
    pub base_profit: f64,
    pub level: u32,
}

impl ShopItem {
    pub fn price(&self) -> f64 {
        self.base_price * 2f64.powi(self.level as i32 - 1)
    }

    /// Profit per hour this item contributes at its current level.
    pub fn profit(&self) -> f64 {
        self.base_profit * self.level as f64
    }
}

/// A tap-power upgrade. Price grows fivefold per level.
#[derive(Clone, Debug)]
pub struct PremiumItem {
    pub id: u32,
    pub name: &'static str,
    pub base_price: f64,
    pub effect: String,
    pub level: u32,
}

impl PremiumItem {
    pub fn price(&self) -> f64 {
        self.base_price * 5f64.powi(self.level as i32 - 1)
    }
}

pub fn shop_catalog() -> Vec<ShopItem> {
    let entries: [(&'static str, f64, f64); 10] = [
        ("Cheetah's Crypto Cave", 1_000.0, 500.0),
        ("Baby Cheetah Vault", 2_000.0, 1_000.0),
        ("Cheetah Coin Corner", 4_000.0, 2_000.0),
        ("Cheetah's Stellar Fleet", 8_000.0, 4_000.0),
        ("Bugatti Crypto Orbit", 16_000.0, 8_000.0),
        ("Speedy Coin Shop", 32_000.0, 16_000.0),
        ("SpaceXcelerate Crypto", 64_000.0, 32_000.0),
        ("Lunar Cruiser Exchange", 128_000.0, 64_000.0),
        ("Hyperdrive Coin Garage", 256_000.0, 128_000.0),
        ("MoonShip Hangar", 512_000.0, 256_000.0),
    ];
    entries
        .iter()
        .enumerate()
        .map(|(i, &(name, base_price, base_profit))| ShopItem {
            id: i as u32 + 1,
            name,
            base_price,
            base_profit,
            level: 1,
        })
        .collect()
}

pub fn premium_catalog() -> Vec<PremiumItem> {
    vec![PremiumItem {
        id: 6,
        name: "Quantum Coin Accelerator",
        base_price: 2_000.0,
        effect: "Doubles coin button taps".into(),
        level: 1,
    }]
}

// ── Tasks ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SharePlatform {
    Facebook,
    X,
    Instagram,
    WhatsApp,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 4] = [
        SharePlatform::Facebook,
        SharePlatform::X,
        SharePlatform::Instagram,
        SharePlatform::WhatsApp,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SharePlatform::Facebook => "Facebook",
            SharePlatform::X => "X",
            SharePlatform::Instagram => "Instagram",
            SharePlatform::WhatsApp => "WhatsApp",
        }
    }

    /// Link that opens the platform's share dialog with [`SHARE_MESSAGE`].
    pub fn share_url(&self) -> String {
        let message = encode_component(SHARE_MESSAGE);
        let page = encode_component(&invite_link());
        match self {
            SharePlatform::Facebook => format!(
                "https://www.facebook.com/sharer/sharer.php?u={}&quote={}",
                page, message
            ),
            SharePlatform::X => format!("https://x.com/intent/tweet?text={}&url={}", message, page),
            SharePlatform::Instagram => "https://www.instagram.com/".to_string(),
            SharePlatform::WhatsApp => format!("https://api.whatsapp.com/send?text={}", message),
        }
    }

    /// The team's profile or channel on this platform.
    pub fn follow_url(&self) -> &'static str {
        match self {
            SharePlatform::Facebook => "https://www.facebook.com/",
            SharePlatform::X => "https://x.com/BabyCheetahTeam",
            SharePlatform::Instagram => "https://www.instagram.com/babycheetahcrypto/",
            SharePlatform::WhatsApp => "https://whatsapp.com/channel/0029VasnzUPAO7RJkehdu43p",
        }
    }
}

/// What advances a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskTrigger {
    Share(SharePlatform),
    YoutubeSubscribe,
    YoutubeWatch,
    TelegramJoin,
    Invite,
    Follow(SharePlatform),
    /// Progress mirrors `min(level, 10)`.
    LevelReached,
    /// Progress mirrors the number of claimed trophies.
    TrophyCount,
}

impl TaskTrigger {
    /// Tracked from game state instead of started by the player.
    pub fn is_automatic(&self) -> bool {
        matches!(self, TaskTrigger::LevelReached | TaskTrigger::TrophyCount)
    }
}

#[derive(Clone, Debug)]
pub struct Task {
    pub id: u32,
    pub description: &'static str,
    pub reward: f64,
    pub progress: u32,
    pub max_progress: u32,
    pub completed: bool,
    pub claimed: bool,
    pub trigger: TaskTrigger,
}

pub fn task_catalog() -> Vec<Task> {
    use SharePlatform::*;
    let entries: [(&'static str, f64, u32, TaskTrigger); 12] = [
        ("Share on Facebook", 500.0, 1, TaskTrigger::Share(Facebook)),
        ("Share on X", 500.0, 1, TaskTrigger::Share(X)),
        ("Share on Instagram", 500.0, 1, TaskTrigger::Share(Instagram)),
        ("Subscribe to YouTube", 2_000.0, 1, TaskTrigger::YoutubeSubscribe),
        ("Watch YouTube videos", 1_500.0, 10, TaskTrigger::YoutubeWatch),
        ("Join TG News", 1_000.0, 1, TaskTrigger::TelegramJoin),
        ("Invite 10 friends", 2_000.0, 10, TaskTrigger::Invite),
        ("Reach level 10", 1_000_000.0, 10, TaskTrigger::LevelReached),
        ("Trophy's Level", 100_000.0, 10, TaskTrigger::TrophyCount),
        ("Follow X", 1_000.0, 1, TaskTrigger::Follow(X)),
        ("Follow Instagram", 1_000.0, 1, TaskTrigger::Follow(Instagram)),
        ("Follow WhatsApp", 1_000.0, 1, TaskTrigger::Follow(WhatsApp)),
    ];
    entries
        .iter()
        .enumerate()
        .map(|(i, &(description, reward, max_progress, trigger))| Task {
            id: i as u32 + 1,
            description,
            reward,
            progress: 0,
            max_progress,
            completed: false,
            claimed: false,
            trigger,
        })
        .collect()
}

// ── Trophies ────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Trophy {
    pub name: &'static str,
    pub description: &'static str,
    pub requirement: f64,
    pub prize: f64,
    pub claimed: bool,
}

pub fn trophy_catalog() -> Vec<Trophy> {
    let entries: [(&'static str, &'static str, f64, f64); 10] = [
        ("Crypto Novice", "First steps into the digital realm", 5_000.0, 20_000.0),
        ("Blockchain Pioneer", "Exploring the foundations of crypto", 50_000.0, 50_000.0),
        ("DeFi Explorer", "Venturing into decentralized finance", 100_000.0, 100_000.0),
        ("NFT Collector", "Embracing the world of digital art", 250_000.0, 250_000.0),
        ("Hodl Master", "Showing true diamond hands", 500_000.0, 500_000.0),
        ("Altcoin Adventurer", "Diversifying beyond Bitcoin", 1_000_000.0, 1_000_000.0),
        ("Smart Contract Sage", "Mastering the art of crypto automation", 2_500_000.0, 2_500_000.0),
        ("Crypto Whale", "Making waves in the digital ocean", 5_000_000.0, 5_000_000.0),
        ("Metaverse Mogul", "Conquering virtual worlds", 7_500_000.0, 7_500_000.0),
        ("Crypto Legend", "Achieving legendary status in the crypto world", 10_000_000.0, 10_000_000.0),
    ];
    entries
        .iter()
        .map(|&(name, description, requirement, prize)| Trophy {
            name,
            description,
            requirement,
            prize,
            claimed: false,
        })
        .collect()
}

// ── Daily reward ────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct DailyReward {
    pub last_claimed: Option<NaiveDate>,
    pub streak: u32,
    /// Position in the 30-day cycle, 1-based.
    pub day: u32,
    pub completed: bool,
}

impl DailyReward {
    pub fn new() -> Self {
        Self {
            last_claimed: None,
            streak: 0,
            day: 1,
            completed: false,
        }
    }
}

// ── Booster ─────────────────────────────────────────────────────

/// The 2x tap multiplier. Timestamps are absolute game ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Booster {
    Idle,
    Active { ends_at: u64 },
    Cooldown { ends_at: u64 },
}

impl Booster {
    pub fn multiplier(&self) -> u64 {
        match self {
            Booster::Active { .. } => BOOSTER_MULTIPLIER,
            _ => 1,
        }
    }

    /// Whole seconds left in the current phase, rounded up. Zero when idle.
    pub fn remaining_secs(&self, now: u64) -> u64 {
        let ends_at = match self {
            Booster::Idle => return 0,
            Booster::Active { ends_at } | Booster::Cooldown { ends_at } => *ends_at,
        };
        ends_at.saturating_sub(now).div_ceil(TICKS_PER_SEC as u64)
    }
}

// ── Leaderboard ─────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct LeaderboardEntry {
    pub id: u32,
    pub name: String,
    pub coins: f64,
    pub profit_per_hour: f64,
    pub rank: u32,
}

// ── Wallet ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Wallet {
    Disconnected,
    Connecting { ticks_left: u32 },
    Connected(String),
}

// ── Settings ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub vibration: bool,
    pub music: bool,
    pub sound_effects: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vibration: true,
            music: false,
            sound_effects: true,
        }
    }
}

// ── Popups ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopupKind {
    ProfitAccumulated,
    LevelUp { level: u32 },
    /// First purchase of the session.
    Congratulation { item: &'static str },
}

/// One-shot dialogs. Each kind opens at most once per session and only one
/// is on screen; later ones wait in `queue`.
#[derive(Clone, Debug, Default)]
pub struct Popups {
    pub active: Option<PopupKind>,
    pub queue: VecDeque<PopupKind>,
    shown_profit: bool,
    shown_level_up: bool,
    shown_congratulation: bool,
}

impl Popups {
    fn shown_flag(&mut self, kind: PopupKind) -> &mut bool {
        match kind {
            PopupKind::ProfitAccumulated => &mut self.shown_profit,
            PopupKind::LevelUp { .. } => &mut self.shown_level_up,
            PopupKind::Congratulation { .. } => &mut self.shown_congratulation,
        }
    }

    pub fn was_shown(&self, kind: PopupKind) -> bool {
        match kind {
            PopupKind::ProfitAccumulated => self.shown_profit,
            PopupKind::LevelUp { .. } => self.shown_level_up,
            PopupKind::Congratulation { .. } => self.shown_congratulation,
        }
    }

    /// Returns false if this kind was already shown this session.
    pub fn open(&mut self, kind: PopupKind) -> bool {
        let flag = self.shown_flag(kind);
        if *flag {
            return false;
        }
        *flag = true;
        if self.active.is_none() {
            self.active = Some(kind);
        } else {
            self.queue.push_back(kind);
        }
        true
    }

    /// Level of a level-up popup that is open or waiting.
    pub fn pending_level_up(&self) -> Option<u32> {
        self.active.iter().chain(self.queue.iter()).find_map(|k| match k {
            PopupKind::LevelUp { level } => Some(*level),
            _ => None,
        })
    }

    /// Close the visible popup and bring up the next queued one.
    pub fn close(&mut self) -> Option<PopupKind> {
        let closed = self.active.take();
        self.active = self.queue.pop_front();
        closed
    }
}

// ── Visual effects ──────────────────────────────────────────────

/// A floating "+N" that rises from the coin and fades.
#[derive(Clone, Debug)]
pub struct VisualEffect {
    pub id: u64,
    pub text: String,
    /// Column offset from the centre of the coin.
    pub col_offset: i16,
    /// Remaining lifetime in ticks.
    pub life: u32,
    pub max_life: u32,
}

// ── Log ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

// ── Game state ──────────────────────────────────────────────────

pub struct GameState {
    pub player: Player,
    /// Passive income waiting to be claimed.
    pub pph_accumulated: f64,
    pub shop_items: Vec<ShopItem>,
    pub premium_items: Vec<PremiumItem>,
    pub tasks: Vec<Task>,
    pub trophies: Vec<Trophy>,
    pub daily: DailyReward,
    pub booster: Booster,
    /// Game ticks since the session started.
    pub now_tick: u64,
    /// Levels the player has reached. Never shrinks.
    pub unlocked_levels: BTreeSet<u32>,
    /// Coin art shown on Home (a level, 1-based).
    pub selected_skin: u32,
    pub popups: Popups,
    pub effects: Vec<VisualEffect>,
    pub next_effect_id: u64,
    pub wallet: Wallet,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub settings: Settings,
    /// Friend name → coins earned.
    pub friends: BTreeMap<String, f64>,
    pub page: Page,
    /// Scroll offset of the current page's list.
    pub scroll: u16,
    pub log: Vec<LogEntry>,
    /// Host side effects queued by logic, drained by the session.
    pub outbox: Vec<HostCall>,
    pub anim_frame: u32,
    /// Ticks of coin highlight after a tap.
    pub tap_flash: u32,
    /// Ticks of border highlight after a purchase.
    pub purchase_flash: u32,
    pub rng_state: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    pub fn with_seed(seed: u32) -> Self {
        let mut unlocked_levels = BTreeSet::new();
        unlocked_levels.insert(1);
        Self {
            player: Player::new(),
            pph_accumulated: 0.0,
            shop_items: shop_catalog(),
            premium_items: premium_catalog(),
            tasks: task_catalog(),
            trophies: trophy_catalog(),
            daily: DailyReward::new(),
            booster: Booster::Idle,
            now_tick: 0,
            unlocked_levels,
            selected_skin: 1,
            popups: Popups::default(),
            effects: Vec::new(),
            next_effect_id: 0,
            wallet: Wallet::Disconnected,
            leaderboard: Vec::new(),
            settings: Settings::default(),
            friends: BTreeMap::new(),
            page: Page::Home,
            scroll: 0,
            log: vec![LogEntry {
                text: "Welcome to Baby Cheetah!".into(),
                is_important: true,
            }],
            outbox: Vec::new(),
            anim_frame: 0,
            tap_flash: 0,
            purchase_flash: 0,
            // xorshift state must be non-zero
            rng_state: if seed == 0 { 42 } else { seed },
        }
    }

    pub fn multiplier(&self) -> u64 {
        self.booster.multiplier()
    }

    pub fn highest_unlocked_level(&self) -> u32 {
        self.unlocked_levels.iter().next_back().copied().unwrap_or(1)
    }

    pub fn claimed_trophy_count(&self) -> usize {
        self.trophies.iter().filter(|t| t.claimed).count()
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    /// Queue a user-facing alert; it also lands in the activity log.
    pub fn alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.add_log(&message, true);
        self.outbox.push(HostCall::Alert(message));
    }

    pub fn host_call(&mut self, call: HostCall) {
        self.outbox.push(call);
    }

    /// Button click sound, when sound effects are on.
    pub fn button_sound(&mut self) {
        if self.settings.sound_effects {
            self.outbox.push(HostCall::Sound(SoundCue::Button));
        }
    }

    pub fn take_outbox(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.outbox)
    }

    /// xorshift32.
    pub fn next_random(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    /// Uniform in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.next_random() as f64 / (u32::MAX as f64 + 1.0)
    }
}

pub fn invite_link() -> String {
    format!("{}{}", INVITE_LINK_BASE, INVITE_CODE)
}

/// Percent-encode like JavaScript's `encodeURIComponent`.
///
/// `js_sys::encode_uri_component` calls into the JS engine and panics in
/// native test builds, so share links are encoded here instead.
pub fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
