//! Baby Cheetah economy rules: pure functions over `GameState`.
//!
//! Each action returns `true` when it changed the game. Feedback for the
//! player (alerts, haptics, sounds, analytics) is queued in `state.outbox`.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::host::{ConfirmAction, HapticStyle, HostCall, HostEvent, SoundCue};

use super::state::{
    invite_link, Booster, GameState, LeaderboardEntry, Page, PopupKind, SharePlatform,
    TaskTrigger, VisualEffect, Wallet, BOOSTER_ACTIVE_TICKS, BOOSTER_COOLDOWN_TICKS,
    DAILY_CYCLE_DAYS, DAILY_REWARDS, ENERGY_REGEN, INVITE_CODE, LEADERBOARD_SIZE,
    LEVEL_THRESHOLDS, MAX_EFFECTS, TELEGRAM_CHANNEL_URL, WALLET_CONNECT_TICKS, YOUTUBE_URL,
};

// ── Levels ──────────────────────────────────────────────────────

/// Level for a coin balance. Inside the table: index of the first threshold
/// above `coins`. Past the last threshold: one level per `T[9]` coins.
pub fn level_for_coins(coins: f64) -> u32 {
    let top = LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1];
    if coins < top {
        LEVEL_THRESHOLDS
            .iter()
            .position(|&t| t > coins)
            .unwrap_or(LEVEL_THRESHOLDS.len()) as u32
    } else {
        9 + ((coins - top) / top).floor() as u32 + 1
    }
}

/// Coins at which `level + 1` begins.
pub fn next_level_requirement(level: u32) -> f64 {
    let top = LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1];
    match LEVEL_THRESHOLDS.get(level as usize) {
        Some(&t) => t,
        None => top * (level as f64 - 9.0 + 1.0),
    }
}

pub fn current_level(state: &GameState) -> u32 {
    level_for_coins(state.player.coins)
}

// ── Tick ────────────────────────────────────────────────────────

/// Advance the game by `delta_ticks` ticks (at 10 ticks/sec).
///
/// Energy and passive income are not here: the session runs them as
/// once-per-second tasks.
pub fn tick(state: &mut GameState, delta_ticks: u32) {
    if delta_ticks == 0 {
        return;
    }
    state.now_tick += delta_ticks as u64;
    state.anim_frame = state.anim_frame.wrapping_add(delta_ticks);
    state.tap_flash = state.tap_flash.saturating_sub(delta_ticks);
    state.purchase_flash = state.purchase_flash.saturating_sub(delta_ticks);

    for e in &mut state.effects {
        e.life = e.life.saturating_sub(delta_ticks);
    }
    state.effects.retain(|e| e.life > 0);

    tick_booster(state);
    tick_wallet(state, delta_ticks);
    check_level_up(state);
    sync_tracked_tasks(state);
}

fn tick_booster(state: &mut GameState) {
    loop {
        match state.booster {
            Booster::Active { ends_at } if state.now_tick >= ends_at => {
                state.booster = Booster::Cooldown {
                    ends_at: ends_at + BOOSTER_COOLDOWN_TICKS,
                };
                state.add_log("2x multiplier ended. Booster cooling down.", false);
            }
            Booster::Cooldown { ends_at } if state.now_tick >= ends_at => {
                state.booster = Booster::Idle;
                state.add_log("Booster ready!", true);
            }
            _ => break,
        }
    }
}

fn tick_wallet(state: &mut GameState, delta_ticks: u32) {
    if let Wallet::Connecting { ticks_left } = state.wallet {
        let left = ticks_left.saturating_sub(delta_ticks);
        if left > 0 {
            state.wallet = Wallet::Connecting { ticks_left: left };
            return;
        }
        let address = mock_address(state);
        state.wallet = Wallet::Connected(address);
        state.alert("Wallet connected successfully with Tonkeeper!");
    }
}

/// First level gain opens the level-up dialog; later gains unlock quietly.
fn check_level_up(state: &mut GameState) {
    let level = current_level(state);
    if level <= state.highest_unlocked_level() {
        return;
    }
    if !state.popups.was_shown(PopupKind::LevelUp { level }) {
        state.popups.open(PopupKind::LevelUp { level });
    } else if state.popups.pending_level_up().is_none() {
        unlock_levels_up_to(state, level);
        state.add_log(&format!("Reached level {}!", level), true);
    }
}

fn unlock_levels_up_to(state: &mut GameState, level: u32) {
    state.unlocked_levels.extend(1..=level);
}

/// Level and trophy tasks follow the game state. Progress never goes back.
fn sync_tracked_tasks(state: &mut GameState) {
    let level = current_level(state);
    let trophies = state.claimed_trophy_count() as u32;
    for task in &mut state.tasks {
        let value = match task.trigger {
            TaskTrigger::LevelReached => level,
            TaskTrigger::TrophyCount => trophies,
            _ => continue,
        };
        if task.completed {
            continue;
        }
        task.progress = task.progress.max(value.min(task.max_progress));
        if task.progress >= task.max_progress {
            task.completed = true;
        }
    }
}

// ── Recurring tasks ─────────────────────────────────────────────

/// One second of energy regeneration.
pub fn regen_energy(state: &mut GameState) {
    let p = &mut state.player;
    p.energy = (p.energy + ENERGY_REGEN).min(p.max_energy);
}

/// One second of passive income.
pub fn accrue_profit(state: &mut GameState) {
    let gain = state.player.profit_per_hour / 3600.0;
    if gain <= 0.0 {
        return;
    }
    state.pph_accumulated += gain;
    state.popups.open(PopupKind::ProfitAccumulated);
}

// ── Tap ─────────────────────────────────────────────────────────

/// Tap the coin. Needs any energy at all; fractions count.
pub fn tap(state: &mut GameState) -> bool {
    if state.player.energy <= 0.0 {
        return false;
    }
    let amount = state.player.click_power * state.multiplier();
    let p = &mut state.player;
    p.coins += amount as f64;
    p.experience = (p.experience + 1) % 100;
    p.energy = (p.energy - 1.0).max(0.0);

    if state.settings.vibration {
        state.host_call(HostCall::Haptic(HapticStyle::Medium));
    }
    if state.settings.sound_effects {
        state.host_call(HostCall::Sound(SoundCue::Coin));
    }
    state.host_call(HostCall::Send(HostEvent::Tap { amount }));

    state.tap_flash = 3;
    spawn_effect(state, amount);
    true
}

fn spawn_effect(state: &mut GameState, amount: u64) {
    let col_offset = (state.next_random() % 13) as i16 - 6;
    let life = 8 + state.next_random() % 5;
    let text = if amount >= 1_000 {
        format!("+{}", format_number(amount as f64))
    } else {
        format!("+{}", amount)
    };
    let id = state.next_effect_id;
    state.next_effect_id += 1;
    state.effects.push(VisualEffect {
        id,
        text,
        col_offset,
        life,
        max_life: life,
    });
    if state.effects.len() > MAX_EFFECTS {
        state.effects.remove(0);
    }
}

// ── Shop ────────────────────────────────────────────────────────

/// Buy the next level of a passive-income item.
pub fn buy_item(state: &mut GameState, index: usize) -> bool {
    let price = match state.shop_items.get(index) {
        Some(item) => item.price(),
        None => return false,
    };
    if state.player.coins < price {
        state.alert("Not enough coins!");
        return false;
    }
    state.player.coins -= price;

    let item = &mut state.shop_items[index];
    let old_profit = item.profit();
    item.level += 1;
    let gained = item.profit() - old_profit;
    let (name, level) = (item.name, item.level);
    state.player.profit_per_hour += gained;

    state.add_log(&format!("{} upgraded to Lv {} (+{}/h)", name, level, format_number(gained)), false);
    finish_purchase(state, name, price, false);
    true
}

/// Buy the next level of a tap-power item. Each level doubles click power.
pub fn buy_premium(state: &mut GameState, index: usize) -> bool {
    let price = match state.premium_items.get(index) {
        Some(item) => item.price(),
        None => return false,
    };
    if state.player.coins < price {
        state.alert("Not enough coins!");
        return false;
    }
    state.player.coins -= price;

    let item = &mut state.premium_items[index];
    item.level += 1;
    item.effect = format!("Multiplies coin button taps by {}x", item.level + 1);
    let name = item.name;
    state.player.click_power = state.player.click_power.saturating_mul(2);

    state.add_log(&format!("{}: tap power now {}", name, state.player.click_power), false);
    finish_purchase(state, name, price, true);
    true
}

fn finish_purchase(state: &mut GameState, name: &'static str, price: f64, is_premium: bool) {
    state.purchase_flash = 5;
    state.popups.open(PopupKind::Congratulation { item: name });
    state.host_call(HostCall::Send(HostEvent::Purchase {
        item: name.to_string(),
        cost: price,
        is_premium,
    }));
}

// ── Passive income ──────────────────────────────────────────────

pub fn claim_profit(state: &mut GameState) -> bool {
    if state.pph_accumulated <= 0.0 {
        state.alert("No profits to claim yet!");
        return false;
    }
    let amount = state.pph_accumulated;
    state.player.coins += amount;
    state.pph_accumulated = 0.0;
    state.alert(format!("Claimed {} coins!", format_number(amount)));
    state.host_call(HostCall::Send(HostEvent::Claim { amount }));
    true
}

/// The "Claim Profits" button on the profit popup.
pub fn claim_profit_and_close(state: &mut GameState) -> bool {
    let claimed = claim_profit(state);
    if state.popups.active == Some(PopupKind::ProfitAccumulated) {
        state.popups.close();
    }
    claimed
}

// ── Booster ─────────────────────────────────────────────────────

pub fn activate_booster(state: &mut GameState) -> bool {
    let remaining = state.booster.remaining_secs(state.now_tick);
    match state.booster {
        Booster::Idle => {
            state.booster = Booster::Active {
                ends_at: state.now_tick + BOOSTER_ACTIVE_TICKS,
            };
            state.alert("Activated 2x multiplier for 2 minutes!");
            true
        }
        Booster::Active { .. } => {
            state.alert(format!("Multiplier active for {} more seconds.", remaining));
            false
        }
        Booster::Cooldown { .. } => {
            state.alert(format!("Booster on cooldown. Available in {} seconds.", remaining));
            false
        }
    }
}

// ── Daily reward ────────────────────────────────────────────────

/// Claim today's reward. `today` is the player's local calendar date.
pub fn claim_daily_reward(state: &mut GameState, today: NaiveDate) -> bool {
    if state.daily.completed {
        state.alert("You have completed the 30-day reward cycle!");
        return false;
    }
    if state.daily.last_claimed == Some(today) {
        state.alert("You have already claimed your daily reward today!");
        return false;
    }

    let consecutive = state
        .daily
        .last_claimed
        .is_some_and(|last| (today - last).num_days() == 1);
    let streak = if consecutive { state.daily.streak + 1 } else { 1 };
    let reward = DAILY_REWARDS[streak as usize % DAILY_REWARDS.len()];

    state.player.coins += reward;
    let day = state.daily.day % DAILY_CYCLE_DAYS + 1;
    state.daily.last_claimed = Some(today);
    state.daily.streak = streak;
    state.daily.day = day;
    state.daily.completed = day == 1;

    state.alert(format!(
        "Claimed daily reward: {} coins! Streak: {} days",
        format_number(reward),
        streak
    ));
    true
}

// ── Tasks ───────────────────────────────────────────────────────

/// Add one step to the task driven by `trigger`. Completed tasks stay put.
pub fn advance_task(state: &mut GameState, trigger: TaskTrigger) -> bool {
    let task = match state.tasks.iter_mut().find(|t| t.trigger == trigger) {
        Some(t) => t,
        None => return false,
    };
    if task.completed {
        return false;
    }
    task.progress = (task.progress + 1).min(task.max_progress);
    if task.progress >= task.max_progress {
        task.completed = true;
        let text = format!("Task complete: {}", task.description);
        state.add_log(&text, true);
    }
    true
}

/// The Start button on a task: open its link (or ask to invite) and count it.
pub fn start_task(state: &mut GameState, index: usize) -> bool {
    let (trigger, completed) = match state.tasks.get(index) {
        Some(t) => (t.trigger, t.completed),
        None => return false,
    };
    if completed || trigger.is_automatic() {
        return false;
    }
    state.button_sound();
    match trigger {
        TaskTrigger::Share(platform) => share(state, platform),
        TaskTrigger::YoutubeSubscribe | TaskTrigger::YoutubeWatch => {
            state.host_call(HostCall::OpenLink(YOUTUBE_URL.into()));
            advance_task(state, trigger)
        }
        TaskTrigger::TelegramJoin => {
            state.host_call(HostCall::OpenTelegramLink(TELEGRAM_CHANNEL_URL.into()));
            advance_task(state, trigger)
        }
        TaskTrigger::Invite => {
            state.host_call(HostCall::Confirm {
                message: format!("Share your invite code: {}", INVITE_CODE),
                action: ConfirmAction::InviteFriend,
            });
            true
        }
        TaskTrigger::Follow(platform) => {
            state.host_call(HostCall::OpenLink(platform.follow_url().into()));
            advance_task(state, trigger)
        }
        TaskTrigger::LevelReached | TaskTrigger::TrophyCount => false,
    }
}

/// Open a platform's share dialog. WhatsApp shares count toward the
/// WhatsApp follow task; there is no separate WhatsApp share task.
pub fn share(state: &mut GameState, platform: SharePlatform) -> bool {
    state.host_call(HostCall::OpenLink(platform.share_url()));
    if platform == SharePlatform::Instagram {
        state.alert("Copy and paste the message to your Instagram post!");
    }
    let trigger = match platform {
        SharePlatform::WhatsApp => TaskTrigger::Follow(SharePlatform::WhatsApp),
        p => TaskTrigger::Share(p),
    };
    advance_task(state, trigger);
    true
}

/// Apply the answer to a confirmation dialog.
pub fn resolve_confirm(state: &mut GameState, action: ConfirmAction, confirmed: bool) -> bool {
    match action {
        ConfirmAction::InviteFriend if confirmed => advance_task(state, TaskTrigger::Invite),
        ConfirmAction::InviteFriend => false,
    }
}

/// Pay out a completed task, once.
pub fn claim_task(state: &mut GameState, index: usize) -> bool {
    let task = match state.tasks.get_mut(index) {
        Some(t) if t.completed && !t.claimed => t,
        _ => return false,
    };
    task.claimed = true;
    let reward = task.reward;
    state.player.coins += reward;
    state.alert(format!("Claimed {} coins!", reward));
    true
}

// ── Trophies ────────────────────────────────────────────────────

pub fn claim_trophy(state: &mut GameState, index: usize) -> bool {
    let coins = state.player.coins;
    let trophy = match state.trophies.get_mut(index) {
        Some(t) if !t.claimed && coins >= t.requirement => t,
        _ => return false,
    };
    trophy.claimed = true;
    let (name, prize) = (trophy.name, trophy.prize);
    state.player.coins += prize;
    state.alert(format!(
        "Congratulations! You've claimed the {} trophy and earned {} coins!",
        name,
        format_number(prize)
    ));
    state.button_sound();
    sync_tracked_tasks(state);
    true
}

// ── Popups ──────────────────────────────────────────────────────

/// Accept the level-up dialog: unlock everything up to the new level.
pub fn claim_level_up(state: &mut GameState) -> bool {
    let level = match state.popups.active {
        Some(PopupKind::LevelUp { level }) => level,
        _ => return false,
    };
    state.alert(format!("Congratulations! You've advanced to Level {}!", level));
    unlock_levels_up_to(state, level);
    state.popups.close();
    true
}

/// Close the visible popup. The level-up dialog is accepted, not discarded.
pub fn dismiss_popup(state: &mut GameState) -> bool {
    match state.popups.active {
        Some(PopupKind::LevelUp { .. }) => claim_level_up(state),
        Some(_) => {
            state.popups.close();
            true
        }
        None => false,
    }
}

// ── Levels page ─────────────────────────────────────────────────

/// Show an unlocked level's coin art on Home.
pub fn use_skin(state: &mut GameState, level: u32) -> bool {
    if !state.unlocked_levels.contains(&level) {
        return false;
    }
    state.selected_skin = level;
    state.button_sound();
    navigate(state, Page::Home);
    true
}

// ── Wallet ──────────────────────────────────────────────────────

pub fn connect_wallet(state: &mut GameState) -> bool {
    if state.wallet != Wallet::Disconnected {
        return false;
    }
    state.wallet = Wallet::Connecting {
        ticks_left: WALLET_CONNECT_TICKS,
    };
    state.add_log("Connecting to Tonkeeper...", false);
    true
}

/// `"EQ"` followed by 64 random hex digits.
fn mock_address(state: &mut GameState) -> String {
    let mut address = String::with_capacity(66);
    address.push_str("EQ");
    for _ in 0..64 {
        let nibble = state.next_random() % 16;
        address.push(std::char::from_digit(nibble, 16).unwrap_or('0'));
    }
    address
}

// ── Rating ──────────────────────────────────────────────────────

/// Fresh random leaderboard, sorted by coins with ranks 1..=200.
pub fn regenerate_leaderboard(state: &mut GameState) {
    let mut rows: Vec<LeaderboardEntry> = (1..=LEADERBOARD_SIZE as u32)
        .map(|id| {
            let coins = (state.next_unit() * 1_000_000.0).floor() + 500_000.0;
            let profit_per_hour = (state.next_unit() * 50_000.0).floor() + 25_000.0;
            LeaderboardEntry {
                id,
                name: format!("Player{}", id),
                coins,
                profit_per_hour,
                rank: 0,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.coins.partial_cmp(&a.coins).unwrap_or(Ordering::Equal));
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }
    state.leaderboard = rows;
}

/// Where the player would sit in the current leaderboard.
pub fn player_rank(state: &GameState) -> usize {
    state
        .leaderboard
        .iter()
        .filter(|e| e.coins > state.player.coins)
        .count()
        + 1
}

// ── Navigation ──────────────────────────────────────────────────

pub fn navigate(state: &mut GameState, page: Page) {
    if page == Page::Rating {
        regenerate_leaderboard(state);
    }
    state.page = page;
    state.scroll = 0;
}

// ── Settings / invite ───────────────────────────────────────────

pub fn toggle_vibration(state: &mut GameState) {
    state.settings.vibration = !state.settings.vibration;
    if state.settings.vibration {
        state.host_call(HostCall::Haptic(HapticStyle::Light));
    }
}

pub fn toggle_music(state: &mut GameState) {
    state.settings.music = !state.settings.music;
    let on = state.settings.music;
    state.host_call(HostCall::Music(on));
}

pub fn toggle_sound(state: &mut GameState) {
    state.settings.sound_effects = !state.settings.sound_effects;
}

pub fn copy_invite_link(state: &mut GameState) -> bool {
    state.host_call(HostCall::CopyText(invite_link()));
    state.alert("Referral link copied to clipboard!");
    true
}

// ── Formatting ──────────────────────────────────────────────────

/// `1234.5` → `"1.23k"`, up to `Q` (1e18). Below 1000: two decimals.
pub fn format_number(n: f64) -> String {
    const SCALES: [(f64, &str); 6] = [
        (1e18, "Q"),
        (1e15, "P"),
        (1e12, "T"),
        (1e9, "B"),
        (1e6, "M"),
        (1e3, "k"),
    ];
    for (scale, suffix) in SCALES {
        if n >= scale {
            return format!("{:.2}{}", n / scale, suffix);
        }
    }
    format!("{:.2}", n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{MAX_ENERGY, WALLET_CONNECT_TICKS};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn alerts(state: &mut GameState) -> Vec<String> {
        state
            .take_outbox()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Alert(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    // ── Levels ──────────────────────────────────────────────

    #[test]
    fn level_table_boundaries() {
        assert_eq!(level_for_coins(0.0), 1);
        assert_eq!(level_for_coins(24_999.0), 1);
        assert_eq!(level_for_coins(25_000.0), 2);
        assert_eq!(level_for_coins(299_999.0), 2);
        assert_eq!(level_for_coins(300_000.0), 3);
        assert_eq!(level_for_coins(999_999_999.0), 9);
    }

    #[test]
    fn level_extrapolates_past_table() {
        assert_eq!(level_for_coins(1_000_000_000.0), 10);
        assert_eq!(level_for_coins(1_999_999_999.0), 10);
        assert_eq!(level_for_coins(2_000_000_000.0), 11);
        assert_eq!(level_for_coins(5_500_000_000.0), 14);
    }

    #[test]
    fn next_requirement_matches_level_function() {
        assert_eq!(next_level_requirement(1), 25_000.0);
        assert_eq!(next_level_requirement(9), 1_000_000_000.0);
        assert_eq!(next_level_requirement(10), 2_000_000_000.0);
        for level in 1..15 {
            let req = next_level_requirement(level);
            assert_eq!(level_for_coins(req), level + 1, "level {}", level);
        }
    }

    // ── Tap ─────────────────────────────────────────────────

    #[test]
    fn tap_adds_coins_and_spends_energy() {
        let mut s = GameState::new();
        assert!(tap(&mut s));
        assert_eq!(s.player.coins, 1.0);
        assert_eq!(s.player.energy, MAX_ENERGY - 1.0);
        assert_eq!(s.player.experience, 1);
        assert_eq!(s.effects.len(), 1);
    }

    #[test]
    fn tap_side_effects_follow_settings() {
        let mut s = GameState::new();
        tap(&mut s);
        let out = s.take_outbox();
        assert_eq!(
            out,
            vec![
                HostCall::Haptic(HapticStyle::Medium),
                HostCall::Sound(SoundCue::Coin),
                HostCall::Send(HostEvent::Tap { amount: 1 }),
            ]
        );

        s.settings.vibration = false;
        s.settings.sound_effects = false;
        tap(&mut s);
        assert_eq!(s.take_outbox(), vec![HostCall::Send(HostEvent::Tap { amount: 1 })]);
    }

    #[test]
    fn tap_with_no_energy_is_a_noop() {
        let mut s = GameState::new();
        s.player.energy = 0.0;
        s.player.coins = 10.0;
        assert!(!tap(&mut s));
        assert_eq!(s.player.coins, 10.0);
        assert_eq!(s.player.experience, 0);
        assert!(s.outbox.is_empty());
        assert!(s.effects.is_empty());
    }

    #[test]
    fn fractional_energy_still_taps_and_floors_at_zero() {
        let mut s = GameState::new();
        s.player.energy = 0.5;
        assert!(tap(&mut s));
        assert_eq!(s.player.energy, 0.0);
        assert!(!tap(&mut s));
    }

    #[test]
    fn experience_wraps_without_changing_level() {
        let mut s = GameState::new();
        s.player.experience = 99;
        tap(&mut s);
        assert_eq!(s.player.experience, 0);
        assert_eq!(current_level(&s), 1);
    }

    #[test]
    fn tap_during_booster_doubles() {
        let mut s = GameState::new();
        s.player.click_power = 4;
        activate_booster(&mut s);
        s.take_outbox();
        tap(&mut s);
        assert_eq!(s.player.coins, 8.0);
        assert!(s.outbox.contains(&HostCall::Send(HostEvent::Tap { amount: 8 })));
    }

    #[test]
    fn effects_have_increasing_ids_and_cap() {
        let mut s = GameState::new();
        for _ in 0..25 {
            tap(&mut s);
        }
        assert_eq!(s.effects.len(), MAX_EFFECTS);
        let ids: Vec<u64> = s.effects.iter().map(|e| e.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids.last(), Some(&24));
    }

    #[test]
    fn effects_expire_on_tick() {
        let mut s = GameState::new();
        tap(&mut s);
        let life = s.effects[0].life;
        tick(&mut s, life - 1);
        assert_eq!(s.effects.len(), 1);
        tick(&mut s, 1);
        assert!(s.effects.is_empty());
    }

    // ── Shop ────────────────────────────────────────────────

    #[test]
    fn buy_item_success() {
        let mut s = GameState::new();
        s.player.coins = 2_000.0;
        assert!(buy_item(&mut s, 1));
        assert_eq!(s.player.coins, 0.0);
        assert_eq!(s.shop_items[1].level, 2);
        assert_eq!(s.player.profit_per_hour, 1_000.0);
        assert_eq!(s.shop_items[1].price(), 4_000.0);
        assert!(s.outbox.contains(&HostCall::Send(HostEvent::Purchase {
            item: "Baby Cheetah Vault".into(),
            cost: 2_000.0,
            is_premium: false,
        })));
    }

    #[test]
    fn buy_item_insufficient_funds() {
        let mut s = GameState::new();
        s.player.coins = 999.0;
        assert!(!buy_item(&mut s, 0));
        assert_eq!(s.player.coins, 999.0);
        assert_eq!(s.shop_items[0].level, 1);
        assert_eq!(alerts(&mut s), vec!["Not enough coins!".to_string()]);
        assert_eq!(s.popups.active, None);
    }

    #[test]
    fn buy_item_out_of_range() {
        let mut s = GameState::new();
        s.player.coins = 1e12;
        assert!(!buy_item(&mut s, 10));
        assert!(!buy_premium(&mut s, 1));
        assert_eq!(s.player.coins, 1e12);
    }

    #[test]
    fn repeat_purchases_add_base_profit_each_time() {
        let mut s = GameState::new();
        s.player.coins = 1_000.0 + 2_000.0 + 4_000.0;
        assert!(buy_item(&mut s, 0));
        assert!(buy_item(&mut s, 0));
        assert!(buy_item(&mut s, 0));
        assert_eq!(s.player.coins, 0.0);
        assert_eq!(s.shop_items[0].level, 4);
        assert_eq!(s.player.profit_per_hour, 1_500.0);
    }

    #[test]
    fn buy_premium_doubles_click_power() {
        let mut s = GameState::new();
        s.player.coins = 12_000.0;
        assert!(buy_premium(&mut s, 0));
        assert_eq!(s.player.click_power, 2);
        assert_eq!(s.premium_items[0].level, 2);
        assert_eq!(s.premium_items[0].effect, "Multiplies coin button taps by 3x");
        assert_eq!(s.premium_items[0].price(), 10_000.0);
        assert!(buy_premium(&mut s, 0));
        assert_eq!(s.player.click_power, 4);
        assert_eq!(s.player.coins, 0.0);
    }

    #[test]
    fn first_purchase_opens_congratulation_once() {
        let mut s = GameState::new();
        s.player.coins = 1e6;
        buy_item(&mut s, 0);
        assert_eq!(
            s.popups.active,
            Some(PopupKind::Congratulation { item: "Cheetah's Crypto Cave" })
        );
        dismiss_popup(&mut s);
        buy_item(&mut s, 2);
        assert_eq!(s.popups.active, None);
    }

    // ── Passive income / energy ─────────────────────────────

    #[test]
    fn accrual_adds_one_second_of_profit() {
        let mut s = GameState::new();
        s.player.profit_per_hour = 3_600.0;
        accrue_profit(&mut s);
        accrue_profit(&mut s);
        assert!((s.pph_accumulated - 2.0).abs() < 1e-9);
        assert_eq!(s.popups.active, Some(PopupKind::ProfitAccumulated));
    }

    #[test]
    fn accrual_without_income_does_nothing() {
        let mut s = GameState::new();
        accrue_profit(&mut s);
        assert_eq!(s.pph_accumulated, 0.0);
        assert_eq!(s.popups.active, None);
    }

    #[test]
    fn profit_popup_only_once() {
        let mut s = GameState::new();
        s.player.profit_per_hour = 3_600.0;
        accrue_profit(&mut s);
        dismiss_popup(&mut s);
        accrue_profit(&mut s);
        assert_eq!(s.popups.active, None);
    }

    #[test]
    fn claim_profit_moves_accumulated_into_coins() {
        let mut s = GameState::new();
        s.pph_accumulated = 12.5;
        assert!(claim_profit(&mut s));
        assert_eq!(s.player.coins, 12.5);
        assert_eq!(s.pph_accumulated, 0.0);
        let out = s.take_outbox();
        assert!(out.contains(&HostCall::Alert("Claimed 12.50 coins!".into())));
        assert!(out.contains(&HostCall::Send(HostEvent::Claim { amount: 12.5 })));
    }

    #[test]
    fn claim_profit_with_nothing_accumulated() {
        let mut s = GameState::new();
        assert!(!claim_profit(&mut s));
        assert_eq!(s.player.coins, 0.0);
        assert_eq!(alerts(&mut s), vec!["No profits to claim yet!".to_string()]);
    }

    #[test]
    fn energy_regen_caps_at_max() {
        let mut s = GameState::new();
        s.player.energy = MAX_ENERGY - 0.25;
        regen_energy(&mut s);
        assert_eq!(s.player.energy, MAX_ENERGY);
        s.player.energy = 10.0;
        regen_energy(&mut s);
        assert_eq!(s.player.energy, 10.5);
    }

    // ── Booster ─────────────────────────────────────────────

    #[test]
    fn booster_lifecycle() {
        let mut s = GameState::new();
        assert!(activate_booster(&mut s));
        assert_eq!(s.multiplier(), 2);
        assert_eq!(alerts(&mut s), vec!["Activated 2x multiplier for 2 minutes!".to_string()]);

        tick(&mut s, 1_199);
        assert_eq!(s.multiplier(), 2);
        tick(&mut s, 1);
        assert_eq!(s.multiplier(), 1);
        assert!(matches!(s.booster, Booster::Cooldown { .. }));

        tick(&mut s, 5_999);
        assert!(matches!(s.booster, Booster::Cooldown { .. }));
        tick(&mut s, 1);
        assert_eq!(s.booster, Booster::Idle);
        assert!(activate_booster(&mut s));
    }

    #[test]
    fn booster_reports_remaining_time_without_changing_state() {
        let mut s = GameState::new();
        activate_booster(&mut s);
        s.take_outbox();
        tick(&mut s, 305); // 30.5 s in: 89.5 s left
        let before = s.booster;
        assert!(!activate_booster(&mut s));
        assert_eq!(s.booster, before);
        assert_eq!(alerts(&mut s), vec!["Multiplier active for 90 more seconds.".to_string()]);

        tick(&mut s, 895 + 10); // 1 s into cooldown
        let before = s.booster;
        assert!(matches!(before, Booster::Cooldown { .. }));
        assert!(!activate_booster(&mut s));
        assert_eq!(s.booster, before);
        assert_eq!(s.multiplier(), 1);
        assert_eq!(
            alerts(&mut s),
            vec!["Booster on cooldown. Available in 599 seconds.".to_string()]
        );
    }

    #[test]
    fn large_tick_runs_through_both_phases() {
        let mut s = GameState::new();
        activate_booster(&mut s);
        tick(&mut s, 10_000);
        assert_eq!(s.booster, Booster::Idle);
    }

    // ── Daily reward ────────────────────────────────────────

    #[test]
    fn daily_first_claim() {
        let mut s = GameState::new();
        assert!(claim_daily_reward(&mut s, date(2024, 3, 1)));
        assert_eq!(s.daily.streak, 1);
        assert_eq!(s.daily.day, 2);
        assert_eq!(s.player.coins, 250.0);
        assert_eq!(
            alerts(&mut s),
            vec!["Claimed daily reward: 250.00 coins! Streak: 1 days".to_string()]
        );
    }

    #[test]
    fn daily_same_day_rejected() {
        let mut s = GameState::new();
        claim_daily_reward(&mut s, date(2024, 3, 1));
        s.take_outbox();
        let coins = s.player.coins;
        assert!(!claim_daily_reward(&mut s, date(2024, 3, 1)));
        assert_eq!(s.player.coins, coins);
        assert_eq!(
            alerts(&mut s),
            vec!["You have already claimed your daily reward today!".to_string()]
        );
    }

    #[test]
    fn daily_streak_continues_across_month_boundary() {
        let mut s = GameState::new();
        claim_daily_reward(&mut s, date(2024, 2, 29));
        assert!(claim_daily_reward(&mut s, date(2024, 3, 1)));
        assert_eq!(s.daily.streak, 2);
        assert_eq!(s.player.coins, 250.0 + 350.0);
    }

    #[test]
    fn daily_gap_resets_streak() {
        let mut s = GameState::new();
        claim_daily_reward(&mut s, date(2024, 3, 1));
        claim_daily_reward(&mut s, date(2024, 3, 2));
        assert!(claim_daily_reward(&mut s, date(2024, 3, 5)));
        assert_eq!(s.daily.streak, 1);
        assert_eq!(s.daily.day, 4);
    }

    #[test]
    fn daily_cycle_completes_after_thirty_claims() {
        let mut s = GameState::new();
        let start = date(2024, 1, 1);
        for i in 0..29 {
            assert!(claim_daily_reward(&mut s, start + chrono::Days::new(i)));
        }
        assert_eq!(s.daily.day, 30);
        assert!(!s.daily.completed);
        assert!(claim_daily_reward(&mut s, start + chrono::Days::new(29)));
        assert_eq!(s.daily.day, 1);
        assert!(s.daily.completed);
        s.take_outbox();

        assert!(!claim_daily_reward(&mut s, start + chrono::Days::new(30)));
        assert_eq!(
            alerts(&mut s),
            vec!["You have completed the 30-day reward cycle!".to_string()]
        );
    }

    #[test]
    fn daily_reward_wraps_at_sixteen() {
        let mut s = GameState::new();
        s.daily.streak = 15;
        s.daily.last_claimed = Some(date(2024, 5, 1));
        claim_daily_reward(&mut s, date(2024, 5, 2));
        assert_eq!(s.daily.streak, 16);
        assert_eq!(s.player.coins, 100.0);
    }

    // ── Tasks ───────────────────────────────────────────────

    #[test]
    fn share_task_completes_then_claims_once() {
        let mut s = GameState::new();
        assert!(start_task(&mut s, 0));
        assert!(s.tasks[0].completed);
        assert!(s
            .take_outbox()
            .iter()
            .any(|c| matches!(c, HostCall::OpenLink(u) if u.starts_with("https://www.facebook.com/sharer"))));

        assert!(claim_task(&mut s, 0));
        assert_eq!(s.player.coins, 500.0);
        assert_eq!(alerts(&mut s), vec!["Claimed 500 coins!".to_string()]);
        assert!(!claim_task(&mut s, 0));
        assert_eq!(s.player.coins, 500.0);
    }

    #[test]
    fn claim_before_completion_is_rejected() {
        let mut s = GameState::new();
        assert!(!claim_task(&mut s, 4));
        assert_eq!(s.player.coins, 0.0);
    }

    #[test]
    fn watch_task_needs_ten_steps_and_saturates() {
        let mut s = GameState::new();
        for i in 1..=9 {
            assert!(start_task(&mut s, 4));
            assert_eq!(s.tasks[4].progress, i);
        }
        assert!(!s.tasks[4].completed);
        assert!(start_task(&mut s, 4));
        assert!(s.tasks[4].completed);
        assert!(!start_task(&mut s, 4));
        assert!(!advance_task(&mut s, TaskTrigger::YoutubeWatch));
        assert_eq!(s.tasks[4].progress, 10);
    }

    #[test]
    fn telegram_task_uses_telegram_link() {
        let mut s = GameState::new();
        start_task(&mut s, 5);
        assert!(s
            .outbox
            .contains(&HostCall::OpenTelegramLink("https://t.me/babycheetahcrypto".into())));
    }

    #[test]
    fn instagram_share_alerts() {
        let mut s = GameState::new();
        start_task(&mut s, 2);
        assert_eq!(
            alerts(&mut s),
            vec!["Copy and paste the message to your Instagram post!".to_string()]
        );
        assert!(s.tasks[2].completed);
    }

    #[test]
    fn invite_task_advances_only_on_confirm() {
        let mut s = GameState::new();
        assert!(start_task(&mut s, 6));
        assert!(s.outbox.contains(&HostCall::Confirm {
            message: "Share your invite code: CRYPTO123".into(),
            action: ConfirmAction::InviteFriend,
        }));
        assert_eq!(s.tasks[6].progress, 0);

        assert!(!resolve_confirm(&mut s, ConfirmAction::InviteFriend, false));
        assert_eq!(s.tasks[6].progress, 0);
        assert!(resolve_confirm(&mut s, ConfirmAction::InviteFriend, true));
        assert_eq!(s.tasks[6].progress, 1);
    }

    #[test]
    fn whatsapp_share_counts_toward_follow_task() {
        let mut s = GameState::new();
        share(&mut s, SharePlatform::WhatsApp);
        assert!(s.tasks[11].completed);
    }

    #[test]
    fn automatic_tasks_cannot_be_started() {
        let mut s = GameState::new();
        assert!(!start_task(&mut s, 7));
        assert!(!start_task(&mut s, 8));
        assert!(s.outbox.is_empty());
    }

    #[test]
    fn level_task_tracks_level_without_paying() {
        let mut s = GameState::new();
        s.player.coins = 600_000.0; // level 4
        tick(&mut s, 1);
        assert_eq!(s.tasks[7].progress, 4);
        assert!(!s.tasks[7].completed);

        s.player.coins = 1_000_000_000.0;
        tick(&mut s, 1);
        assert_eq!(s.tasks[7].progress, 10);
        assert!(s.tasks[7].completed);
        assert!(!s.tasks[7].claimed);
        assert_eq!(s.player.coins, 1_000_000_000.0);

        s.player.coins = 0.0;
        tick(&mut s, 1);
        assert_eq!(s.tasks[7].progress, 10);
    }

    // ── Trophies ────────────────────────────────────────────

    #[test]
    fn trophy_claim_once() {
        let mut s = GameState::new();
        s.player.coins = 5_000.0;
        assert!(claim_trophy(&mut s, 0));
        assert_eq!(s.player.coins, 25_000.0);
        assert!(s.trophies[0].claimed);
        assert_eq!(
            alerts(&mut s),
            vec![
                "Congratulations! You've claimed the Crypto Novice trophy and earned 20.00k coins!"
                    .to_string()
            ]
        );
        assert!(!claim_trophy(&mut s, 0));
        assert_eq!(s.player.coins, 25_000.0);
    }

    #[test]
    fn trophy_below_requirement_is_locked() {
        let mut s = GameState::new();
        s.player.coins = 4_999.0;
        assert!(!claim_trophy(&mut s, 0));
        assert_eq!(s.player.coins, 4_999.0);
        assert!(s.outbox.is_empty());
        assert!(!claim_trophy(&mut s, 99));
    }

    #[test]
    fn trophy_task_counts_claimed_trophies() {
        let mut s = GameState::new();
        s.player.coins = 60_000.0;
        claim_trophy(&mut s, 0);
        claim_trophy(&mut s, 1);
        assert_eq!(s.tasks[8].progress, 2);
    }

    // ── Level up ────────────────────────────────────────────

    #[test]
    fn level_up_popup_then_claim_unlocks() {
        let mut s = GameState::new();
        s.player.coins = 300_000.0; // level 3
        tick(&mut s, 1);
        assert_eq!(s.popups.active, Some(PopupKind::LevelUp { level: 3 }));
        assert_eq!(s.highest_unlocked_level(), 1);

        assert!(claim_level_up(&mut s));
        assert_eq!(
            alerts(&mut s),
            vec!["Congratulations! You've advanced to Level 3!".to_string()]
        );
        assert!(s.unlocked_levels.contains(&2));
        assert!(s.unlocked_levels.contains(&3));
        assert_eq!(s.popups.active, None);
        assert!(!claim_level_up(&mut s));
    }

    #[test]
    fn later_levels_unlock_silently() {
        let mut s = GameState::new();
        s.player.coins = 25_000.0;
        tick(&mut s, 1);
        claim_level_up(&mut s);

        s.player.coins = 1_000_000.0; // level 5
        tick(&mut s, 1);
        assert_eq!(s.popups.active, None);
        assert_eq!(s.highest_unlocked_level(), 5);
    }

    #[test]
    fn unlocked_levels_never_shrink() {
        let mut s = GameState::new();
        s.player.coins = 600_000.0;
        tick(&mut s, 1);
        claim_level_up(&mut s);
        s.player.coins = 0.0;
        tick(&mut s, 1);
        assert_eq!(s.highest_unlocked_level(), 4);
    }

    #[test]
    fn use_skin_requires_unlock() {
        let mut s = GameState::new();
        s.page = Page::Levels;
        assert!(!use_skin(&mut s, 3));
        assert_eq!(s.page, Page::Levels);
        s.unlocked_levels.insert(3);
        assert!(use_skin(&mut s, 3));
        assert_eq!(s.selected_skin, 3);
        assert_eq!(s.page, Page::Home);
    }

    // ── Wallet ──────────────────────────────────────────────

    #[test]
    fn wallet_connects_after_delay() {
        let mut s = GameState::new();
        assert!(connect_wallet(&mut s));
        assert!(!connect_wallet(&mut s));
        tick(&mut s, WALLET_CONNECT_TICKS - 1);
        assert!(matches!(s.wallet, Wallet::Connecting { ticks_left: 1 }));
        tick(&mut s, 1);
        match &s.wallet {
            Wallet::Connected(addr) => {
                assert_eq!(addr.len(), 66);
                assert!(addr.starts_with("EQ"));
                assert!(addr[2..].chars().all(|c| c.is_ascii_hexdigit()));
            }
            other => panic!("expected connected, got {:?}", other),
        }
        assert_eq!(
            alerts(&mut s),
            vec!["Wallet connected successfully with Tonkeeper!".to_string()]
        );
        assert!(!connect_wallet(&mut s));
    }

    // ── Rating ──────────────────────────────────────────────

    #[test]
    fn leaderboard_sorted_and_ranked() {
        let mut s = GameState::new();
        navigate(&mut s, Page::Rating);
        assert_eq!(s.leaderboard.len(), 200);
        for (i, row) in s.leaderboard.iter().enumerate() {
            assert_eq!(row.rank, i as u32 + 1);
            assert!((500_000.0..1_500_000.0).contains(&row.coins));
            assert!((25_000.0..75_000.0).contains(&row.profit_per_hour));
        }
        assert!(s.leaderboard.windows(2).all(|w| w[0].coins >= w[1].coins));
        assert_eq!(player_rank(&s), 201);
    }

    #[test]
    fn leaderboard_regenerates_each_visit() {
        let mut s = GameState::new();
        navigate(&mut s, Page::Rating);
        let first: Vec<f64> = s.leaderboard.iter().map(|e| e.coins).collect();
        navigate(&mut s, Page::Home);
        navigate(&mut s, Page::Rating);
        let second: Vec<f64> = s.leaderboard.iter().map(|e| e.coins).collect();
        assert_ne!(first, second);
    }

    // ── Settings / invite ───────────────────────────────────

    #[test]
    fn settings_toggles() {
        let mut s = GameState::new();
        toggle_vibration(&mut s);
        assert!(!s.settings.vibration);
        assert!(s.outbox.is_empty());
        toggle_vibration(&mut s);
        assert_eq!(s.take_outbox(), vec![HostCall::Haptic(HapticStyle::Light)]);

        toggle_music(&mut s);
        assert_eq!(s.take_outbox(), vec![HostCall::Music(true)]);
        toggle_music(&mut s);
        assert_eq!(s.take_outbox(), vec![HostCall::Music(false)]);

        toggle_sound(&mut s);
        assert!(!s.settings.sound_effects);
        tap(&mut s);
        assert!(!s.outbox.contains(&HostCall::Sound(SoundCue::Coin)));
    }

    #[test]
    fn copy_invite_link_alerts() {
        let mut s = GameState::new();
        assert!(copy_invite_link(&mut s));
        let out = s.take_outbox();
        assert_eq!(
            out,
            vec![
                HostCall::CopyText("https://babycheetah.com/invite/CRYPTO123".into()),
                HostCall::Alert("Referral link copied to clipboard!".into()),
            ]
        );
    }

    // ── format_number ───────────────────────────────────────

    #[test]
    fn format_number_suffixes() {
        assert_eq!(format_number(0.0), "0.00");
        assert_eq!(format_number(999.0), "999.00");
        assert_eq!(format_number(1_000.0), "1.00k");
        assert_eq!(format_number(1_234_567.0), "1.23M");
        assert_eq!(format_number(2.5e9), "2.50B");
        assert_eq!(format_number(1e12), "1.00T");
        assert_eq!(format_number(1e15), "1.00P");
        assert_eq!(format_number(3e18), "3.00Q");
    }

    // ── Scenario ────────────────────────────────────────────

    #[test]
    fn fresh_player_taps_buys_and_claims() {
        let mut s = GameState::new();
        s.player.coins = 999.0;
        tap(&mut s);
        assert_eq!(s.player.coins, 1_000.0);
        assert!(buy_item(&mut s, 0));
        assert_eq!(s.player.profit_per_hour, 500.0);
        for _ in 0..36 {
            accrue_profit(&mut s);
        }
        assert!((s.pph_accumulated - 5.0).abs() < 1e-9);
        assert!(claim_profit(&mut s));
        assert!((s.player.coins - 5.0).abs() < 1e-9);
    }
}
