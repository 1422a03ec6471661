use deepchat_core::WidgetConfig;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

mod dom;
mod http;
mod speech;
mod utils;
mod view;
mod widget;

/// Initialize the WASM application
/// This sets up panic hooks and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    log::info!("deepchat WASM initialized");
}

/// Bind the chat widget to the current page.
///
/// `config_json` is an optional JSON object overriding [`WidgetConfig`]
/// defaults, e.g. `{"base_url": "/api", "reveal_interval_ms": 10}`.
#[wasm_bindgen]
pub fn init_chat_widget(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) if !json.trim().is_empty() => {
            WidgetConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?
        }
        _ => WidgetConfig::default(),
    };
    log::info!("Initializing chat widget (backend: {:?})", config.base_url);
    widget::ChatWidget::new(config)?.start()
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))
}
