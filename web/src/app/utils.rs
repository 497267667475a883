use toupeira_core as game;
use wasm_bindgen::{JsCast, JsValue};

/// Accessible name for a hole, matching its visible 1-based number.
pub(in crate::app) fn hole_aria_label(cell: game::CellId) -> String {
    format!("Hole {} - whack the mole", game::display_index(cell))
}

/// Keys that activate a focused hole like a button press.
///
/// Older engines report the space bar as "Spacebar" instead of " ".
pub(in crate::app) fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " " | "Spacebar")
}

/// Helper function to use JavaScript's Math.random
pub(in crate::app) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Total game duration in milliseconds.
///
/// The hosting page may define a `GAME_DURATION` global (ms); anything missing
/// or unusable falls back to the stock duration.
pub(in crate::app) fn game_duration_ms() -> game::Millis {
    let window: JsValue = gloo::utils::window().into();
    js_sys::Reflect::get(&window, &JsValue::from_str("GAME_DURATION"))
        .ok()
        .and_then(|value| value.as_f64())
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .map(|ms| ms as game::Millis)
        .unwrap_or(game::DEFAULT_GAME_DURATION)
}

/// Whether keyboard focus is inside a text-entry control, in which case the
/// game's keyboard shortcuts must stay out of the way.
pub(in crate::app) fn focus_in_text_entry() -> bool {
    let Some(active) = gloo::utils::document().active_element() else {
        return false;
    };
    match active.tag_name().to_ascii_uppercase().as_str() {
        "INPUT" | "TEXTAREA" => true,
        _ => active
            .dyn_ref::<web_sys::HtmlElement>()
            .is_some_and(|element| element.is_content_editable()),
    }
}

pub(in crate::app) fn load_pop_sound() -> Option<web_sys::HtmlAudioElement> {
    web_sys::HtmlAudioElement::new_with_src("sounds/pop.mp3").ok()
}

/// Fire-and-forget pop sound; autoplay restrictions and missing files are
/// swallowed, never surfaced to the game flow.
pub(in crate::app) fn play_pop_sound(sound: &Option<web_sys::HtmlAudioElement>) {
    if let Some(sound) = sound {
        sound.set_current_time(0.0);
        let _ = sound.play();
    }
}
