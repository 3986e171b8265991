//! Host capabilities: the Telegram Mini App bridge when the page runs inside
//! Telegram, plain browser APIs otherwise.
//!
//! Game logic never touches the host directly. It queues [`HostCall`]s in
//! its outbox and the session hands them to whichever [`Host`] was picked
//! by [`detect`] at start-up.

use std::cell::RefCell;

use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlAudioElement;

pub const COIN_SOUND_URL: &str = "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/Coin%20Button%20Sound-vLxAEYrnFJ4W4ZNzInbVnZpsMhwZLa.mp3";
pub const BUTTON_SOUND_URL: &str = "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/All%20Button%20Sound-NecLnCIFTmsT5rZXNgDaGNLmKdTxNO.mp3";
pub const MUSIC_URL: &str = "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/Riches%20in%20the%20Shadows-8jIfTBhDiLVL55LWoh4M55lq2PNpf9.MP3";

const PLACEHOLDER_NAME: &str = "Player";
const PLACEHOLDER_PHOTO: &str = "https://example.com/user_profile_photo.jpg";

/// Strength of a haptic pulse (`HapticFeedback.impactOccurred` styles).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HapticStyle {
    /// Settings confirmation.
    Light,
    /// Coin taps.
    Medium,
}

impl HapticStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            HapticStyle::Light => "light",
            HapticStyle::Medium => "medium",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Coin,
    Button,
}

impl SoundCue {
    pub fn url(&self) -> &'static str {
        match self {
            SoundCue::Coin => COIN_SOUND_URL,
            SoundCue::Button => BUTTON_SOUND_URL,
        }
    }
}

/// Outbound analytics event, serialised as `{"action": "...", ...}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HostEvent {
    Tap {
        amount: u64,
    },
    Purchase {
        item: String,
        cost: f64,
        #[serde(rename = "isPremium")]
        is_premium: bool,
    },
    Claim {
        amount: f64,
    },
}

impl HostEvent {
    pub fn to_json(&self) -> String {
        // Only plain numbers and strings: serialisation cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// What to do once a confirmation dialog is answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    InviteFriend,
}

/// A side effect requested by game logic, executed by the session.
#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    Alert(String),
    Haptic(HapticStyle),
    Sound(SoundCue),
    Send(HostEvent),
    OpenLink(String),
    OpenTelegramLink(String),
    Confirm {
        message: String,
        action: ConfirmAction,
    },
    Music(bool),
    CopyText(String),
}

/// The capabilities the game needs from its surroundings.
pub trait Host {
    fn send_data(&self, event: &HostEvent);
    fn show_alert(&self, message: &str);
    /// `on_result` may run later (Telegram) or before returning (browser).
    fn show_confirm(&self, message: &str, on_result: Box<dyn FnOnce(bool)>);
    fn haptic_feedback(&self, style: HapticStyle);
    fn open_link(&self, url: &str);
    fn open_telegram_link(&self, url: &str);
    fn user_name(&self) -> String;
    fn user_profile_photo(&self) -> String;
    fn play_sound(&self, cue: SoundCue);
    fn set_music(&self, on: bool);
    fn copy_text(&self, text: &str);
}

/// Pick the host once: Telegram if the WebApp bridge is live, browser otherwise.
pub fn detect() -> Box<dyn Host> {
    match TelegramHost::detect() {
        Some(host) => {
            console_log("host: Telegram WebApp");
            Box::new(host)
        }
        None => {
            console_log("host: browser fallback");
            Box::new(BrowserHost::new())
        }
    }
}

pub fn console_log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

pub fn console_warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

// ── Audio (shared by both hosts) ───────────────────────────────

struct AudioPlayer {
    music: RefCell<Option<HtmlAudioElement>>,
}

impl AudioPlayer {
    fn new() -> Self {
        Self {
            music: RefCell::new(None),
        }
    }

    fn play_once(&self, url: &str) {
        match HtmlAudioElement::new_with_src(url) {
            Ok(audio) => {
                if let Err(e) = audio.play() {
                    console_warn(&format!("audio: play failed: {:?}", e));
                }
            }
            Err(e) => console_warn(&format!("audio: cannot load {}: {:?}", url, e)),
        }
    }

    fn set_music(&self, on: bool) {
        let mut music = self.music.borrow_mut();
        if music.is_none() && on {
            match HtmlAudioElement::new_with_src(MUSIC_URL) {
                Ok(audio) => {
                    audio.set_loop(true);
                    *music = Some(audio);
                }
                Err(e) => {
                    console_warn(&format!("audio: cannot load music: {:?}", e));
                    return;
                }
            }
        }
        if let Some(audio) = music.as_ref() {
            if on {
                if let Err(e) = audio.play() {
                    console_warn(&format!("audio: music failed: {:?}", e));
                }
            } else {
                if let Err(e) = audio.pause() {
                    console_warn(&format!("audio: pause failed: {:?}", e));
                }
                audio.set_current_time(0.0);
            }
        }
    }
}

// ── Telegram ───────────────────────────────────────────────────

/// `window.Telegram.WebApp`, driven through `Reflect`.
pub struct TelegramHost {
    web_app: JsValue,
    audio: AudioPlayer,
}

impl TelegramHost {
    /// `None` when the bridge script is missing or reports platform "unknown"
    /// (page opened outside Telegram).
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let telegram = Reflect::get(&window, &JsValue::from_str("Telegram")).ok()?;
        if !telegram.is_object() {
            return None;
        }
        let web_app = Reflect::get(&telegram, &JsValue::from_str("WebApp")).ok()?;
        if !web_app.is_object() {
            return None;
        }
        let platform = get_string(&web_app, &["platform"]).unwrap_or_default();
        if platform.is_empty() || platform == "unknown" {
            return None;
        }

        let host = Self {
            web_app,
            audio: AudioPlayer::new(),
        };
        call_method(&host.web_app, "ready", &[]);
        call_method(&host.web_app, "expand", &[]);
        Some(host)
    }
}

impl Host for TelegramHost {
    fn send_data(&self, event: &HostEvent) {
        call_method(&self.web_app, "sendData", &[JsValue::from_str(&event.to_json())]);
    }

    fn show_alert(&self, message: &str) {
        call_method(&self.web_app, "showAlert", &[JsValue::from_str(message)]);
    }

    fn show_confirm(&self, message: &str, on_result: Box<dyn FnOnce(bool)>) {
        let callback = Closure::once_into_js(move |confirmed: JsValue| {
            on_result(confirmed.as_bool().unwrap_or(false));
        });
        call_method(
            &self.web_app,
            "showConfirm",
            &[JsValue::from_str(message), callback],
        );
    }

    fn haptic_feedback(&self, style: HapticStyle) {
        match Reflect::get(&self.web_app, &JsValue::from_str("HapticFeedback")) {
            Ok(haptic) if haptic.is_object() => {
                call_method(&haptic, "impactOccurred", &[JsValue::from_str(style.as_str())]);
            }
            _ => console_warn("Telegram.WebApp.HapticFeedback unavailable"),
        }
    }

    fn open_link(&self, url: &str) {
        call_method(&self.web_app, "openLink", &[JsValue::from_str(url)]);
    }

    fn open_telegram_link(&self, url: &str) {
        call_method(&self.web_app, "openTelegramLink", &[JsValue::from_str(url)]);
    }

    fn user_name(&self) -> String {
        get_string(&self.web_app, &["initDataUnsafe", "user", "username"])
            .or_else(|| get_string(&self.web_app, &["initDataUnsafe", "user", "first_name"]))
            .unwrap_or_else(|| PLACEHOLDER_NAME.to_string())
    }

    fn user_profile_photo(&self) -> String {
        get_string(&self.web_app, &["initDataUnsafe", "user", "photo_url"])
            .unwrap_or_else(|| PLACEHOLDER_PHOTO.to_string())
    }

    fn play_sound(&self, cue: SoundCue) {
        self.audio.play_once(cue.url());
    }

    fn set_music(&self, on: bool) {
        self.audio.set_music(on);
    }

    fn copy_text(&self, text: &str) {
        write_clipboard(text);
    }
}

/// `navigator.clipboard.writeText`, looked up dynamically: older WebViews
/// inside Telegram do not expose it.
fn write_clipboard(text: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    match Reflect::get(&window.navigator(), &JsValue::from_str("clipboard")) {
        Ok(clipboard) if clipboard.is_object() => {
            call_method(&clipboard, "writeText", &[JsValue::from_str(text)]);
        }
        _ => console_warn("navigator.clipboard unavailable"),
    }
}

/// Call `target[name](...args)`, logging instead of failing.
fn call_method(target: &JsValue, name: &str, args: &[JsValue]) {
    let func = match Reflect::get(target, &JsValue::from_str(name)) {
        Ok(f) if f.is_function() => f.unchecked_into::<Function>(),
        _ => {
            console_warn(&format!("{} unavailable", name));
            return;
        }
    };
    let result = match args {
        [] => func.call0(target),
        [a] => func.call1(target, a),
        [a, b] => func.call2(target, a, b),
        _ => func.apply(target, &args.iter().collect::<Array>()),
    };
    if let Err(e) = result {
        console_warn(&format!("{} threw: {:?}", name, e));
    }
}

/// Walk `path` through nested JS objects and return the string at the end.
fn get_string(root: &JsValue, path: &[&str]) -> Option<String> {
    let mut cur = root.clone();
    for key in path {
        cur = Reflect::get(&cur, &JsValue::from_str(key)).ok()?;
        if cur.is_undefined() || cur.is_null() {
            return None;
        }
    }
    cur.as_string().filter(|s| !s.is_empty())
}

// ── Browser fallback ───────────────────────────────────────────

/// Plain browser: `alert`, `confirm`, `window.open`, `navigator.vibrate`.
pub struct BrowserHost {
    audio: AudioPlayer,
}

impl BrowserHost {
    pub fn new() -> Self {
        Self {
            audio: AudioPlayer::new(),
        }
    }
}

impl Host for BrowserHost {
    fn send_data(&self, event: &HostEvent) {
        console_log(&format!("sendData (no Telegram): {}", event.to_json()));
    }

    fn show_alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.alert_with_message(message) {
                console_warn(&format!("alert failed: {:?}", e));
            }
        }
    }

    fn show_confirm(&self, message: &str, on_result: Box<dyn FnOnce(bool)>) {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false);
        on_result(confirmed);
    }

    fn haptic_feedback(&self, style: HapticStyle) {
        if let Some(window) = web_sys::window() {
            window.navigator().vibrate_with_duration(50);
        }
        console_log(&format!("haptic: {}", style.as_str()));
    }

    fn open_link(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.open_with_url_and_target(url, "_blank") {
                console_warn(&format!("open {} failed: {:?}", url, e));
            }
        }
    }

    fn open_telegram_link(&self, url: &str) {
        self.open_link(url);
    }

    fn user_name(&self) -> String {
        PLACEHOLDER_NAME.to_string()
    }

    fn user_profile_photo(&self) -> String {
        PLACEHOLDER_PHOTO.to_string()
    }

    fn play_sound(&self, cue: SoundCue) {
        self.audio.play_once(cue.url());
    }

    fn set_music(&self, on: bool) {
        self.audio.set_music(on);
    }

    fn copy_text(&self, text: &str) {
        write_clipboard(text);
    }
}
