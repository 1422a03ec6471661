//! Web Speech API recognizer
//!
//! Chrome only exposes the prefixed `webkitSpeechRecognition`, and web-sys
//! has no binding for it, so the constructor is looked up on `window` and
//! the few members we need are declared here.

use deepchat_core::{ChatError, Recognizer};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = web_sys::EventTarget)]
    #[derive(Debug, Clone)]
    pub type SpeechRecognition;

    #[wasm_bindgen(method, setter)]
    fn set_lang(this: &SpeechRecognition, lang: &str);

    #[wasm_bindgen(method, setter = interimResults)]
    fn set_interim_results(this: &SpeechRecognition, interim: bool);

    #[wasm_bindgen(method, catch, js_name = start)]
    fn begin(this: &SpeechRecognition) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = stop)]
    fn finish(this: &SpeechRecognition);

    #[wasm_bindgen(method, setter)]
    fn set_onstart(this: &SpeechRecognition, handler: Option<&Function>);

    #[wasm_bindgen(method, setter)]
    fn set_onend(this: &SpeechRecognition, handler: Option<&Function>);

    #[wasm_bindgen(method, setter)]
    fn set_onresult(this: &SpeechRecognition, handler: Option<&Function>);

    #[wasm_bindgen(method, setter)]
    fn set_onerror(this: &SpeechRecognition, handler: Option<&Function>);
}

const CONSTRUCTORS: [&str; 2] = ["SpeechRecognition", "webkitSpeechRecognition"];

#[derive(Clone)]
pub struct WebRecognizer {
    inner: SpeechRecognition,
}

impl WebRecognizer {
    /// Construct a recognizer, or `None` if this browser has none.
    pub fn detect(lang: &str, interim_results: bool) -> Option<Self> {
        let window = web_sys::window()?;
        let inner = CONSTRUCTORS.iter().find_map(|name| {
            let ctor = Reflect::get(&window, &JsValue::from_str(name)).ok()?;
            let ctor = ctor.dyn_into::<Function>().ok()?;
            Reflect::construct(&ctor, &Array::new()).ok()
        })?;

        let inner: SpeechRecognition = inner.unchecked_into();
        inner.set_lang(lang);
        inner.set_interim_results(interim_results);
        Some(Self { inner })
    }

    /// Install event handlers. The closures live as long as the page.
    pub fn on_events(
        &self,
        on_start: impl FnMut() + 'static,
        on_end: impl FnMut() + 'static,
        mut on_transcript: impl FnMut(String) + 'static,
    ) {
        let start = Closure::wrap(Box::new(on_start) as Box<dyn FnMut()>);
        self.inner.set_onstart(Some(start.as_ref().unchecked_ref()));
        start.forget();

        let end = Closure::wrap(Box::new(on_end) as Box<dyn FnMut()>);
        self.inner.set_onend(Some(end.as_ref().unchecked_ref()));
        end.forget();

        let result = Closure::wrap(Box::new(move |event: JsValue| {
            match transcript_from_event(&event) {
                Ok(text) if !text.is_empty() => on_transcript(text),
                Ok(_) => {}
                Err(e) => log::warn!("Unreadable recognition result: {:?}", e),
            }
        }) as Box<dyn FnMut(JsValue)>);
        self.inner.set_onresult(Some(result.as_ref().unchecked_ref()));
        result.forget();

        // `end` always follows an error, so only log here.
        let error = Closure::wrap(Box::new(|event: JsValue| {
            let reason = Reflect::get(&event, &JsValue::from_str("error"))
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default();
            log::warn!("Speech recognition error: {}", reason);
        }) as Box<dyn FnMut(JsValue)>);
        self.inner.set_onerror(Some(error.as_ref().unchecked_ref()));
        error.forget();
    }
}

impl Recognizer for WebRecognizer {
    fn start(&self) -> Result<(), ChatError> {
        self.inner
            .begin()
            .map_err(|e| ChatError::Speech(format!("{:?}", e)))
    }

    fn stop(&self) {
        self.inner.finish();
    }
}

/// Concatenate the best alternative of every result in a `result` event.
fn transcript_from_event(event: &JsValue) -> Result<String, JsValue> {
    let results = Reflect::get(event, &JsValue::from_str("results"))?;
    let length = Reflect::get(&results, &JsValue::from_str("length"))?
        .as_f64()
        .unwrap_or(0.0) as u32;

    let mut text = String::new();
    for i in 0..length {
        let result = Reflect::get_u32(&results, i)?;
        let best = Reflect::get_u32(&result, 0)?;
        if let Some(transcript) = Reflect::get(&best, &JsValue::from_str("transcript"))?.as_string() {
            text.push_str(&transcript);
        }
    }
    Ok(text)
}
