//! Event wiring between the host page and the chat controller

use std::cell::RefCell;
use std::rc::Rc;

use deepchat_core::speech::append_transcript;
use deepchat_core::{ChatController, ChatError, MicIndicator, SpeechBridge, WidgetConfig};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlTextAreaElement, KeyboardEvent};

use crate::dom;
use crate::http::HttpBackend;
use crate::speech::WebRecognizer;
use crate::utils::{self, TimeoutTicker};
use crate::view::DomView;

type Controller = ChatController<HttpBackend, DomView, TimeoutTicker>;

pub struct ChatWidget {
    document: Document,
    config: WidgetConfig,
    controller: Rc<Controller>,
    speech: Rc<RefCell<SpeechBridge<WebRecognizer>>>,
}

impl ChatWidget {
    pub fn new(config: WidgetConfig) -> Result<Self, JsValue> {
        let document = crate::document()?;
        let view = DomView::new(document.clone(), &config.elements)?;
        let controller = ChatController::new(
            HttpBackend::new(config.clone()),
            view,
            TimeoutTicker,
            config.clone(),
        );
        let recognizer = WebRecognizer::detect(&config.speech_lang, config.interim_results);

        Ok(Self {
            document,
            config,
            controller: Rc::new(controller),
            speech: Rc::new(RefCell::new(SpeechBridge::new(recognizer))),
        })
    }

    pub fn start(self) -> Result<(), JsValue> {
        self.setup_message_input()?;
        self.setup_file_panel()?;
        self.setup_speech()?;
        self.setup_toolbar()?;

        log::info!("Chat widget ready");
        Ok(())
    }

    fn input(&self) -> Result<HtmlTextAreaElement, JsValue> {
        dom::get_textarea_by_id(&self.document, &self.config.elements.user_input)
    }

    fn setup_message_input(&self) -> Result<(), JsValue> {
        let ids = &self.config.elements;

        // Send button
        let send_btn = dom::get_element_by_id(&self.document, &ids.send_button)?;
        let input = self.input()?;
        let controller = self.controller.clone();
        dom::add_click_listener(&send_btn, move || {
            submit(&controller, &input);
        })?;

        // Enter sends, Shift+Enter inserts a newline
        let input = self.input()?;
        let controller = self.controller.clone();
        let target: Element = input.clone().into();
        dom::add_event_listener(&target, "keydown", move |event: Event| {
            let Ok(event) = event.dyn_into::<KeyboardEvent>() else {
                return;
            };
            if event.key() == "Enter" && !event.shift_key() {
                event.prevent_default();
                submit(&controller, &input);
            }
        })?;

        Ok(())
    }

    fn setup_file_panel(&self) -> Result<(), JsValue> {
        let ids = &self.config.elements;

        let upload_btn = dom::get_element_by_id(&self.document, &ids.upload_button)?;
        let file_input = dom::get_input_by_id(&self.document, &ids.file_input)?;
        let controller = self.controller.clone();
        dom::add_click_listener(&upload_btn, move || {
            let Some(file) = file_input.files().and_then(|files| files.get(0)) else {
                log::debug!("No file selected");
                return;
            };
            let controller = controller.clone();
            let file_input = file_input.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match controller.upload(file).await {
                    Ok(_) => {}
                    Err(ChatError::Reset) => log::debug!("Upload outlived a reset"),
                    Err(e) => log::error!("Upload failed: {}", e),
                }
                file_input.set_value("");
            });
        })?;

        // One delegated listener for every "View text" / "Remove" button.
        let file_list = dom::get_element_by_id(&self.document, &ids.file_list)?;
        let controller = self.controller.clone();
        dom::add_event_listener(&file_list, "click", move |event: Event| {
            let Some((action, index)) = file_action(&event) else {
                return;
            };
            let controller = controller.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = match action.as_str() {
                    "view" => controller.view_file(index).await.map(|_| ()),
                    "remove" => controller.remove_file(index).await.map(|_| ()),
                    other => {
                        log::warn!("Unknown file action: {}", other);
                        Ok(())
                    }
                };
                match result {
                    Ok(()) => {}
                    Err(ChatError::Reset) => log::debug!("File {} outlived a reset", action),
                    Err(e) => log::error!("File {} {} failed: {}", action, index, e),
                }
            });
        })?;

        Ok(())
    }

    fn setup_speech(&self) -> Result<(), JsValue> {
        let ids = &self.config.elements;
        let mic_btn = dom::get_button_by_id(&self.document, &ids.mic_button)?;
        let mic_status = dom::get_element_by_id(&self.document, &ids.mic_status)?;

        let render = {
            let mic_btn = mic_btn.clone();
            move |indicator: MicIndicator| {
                mic_btn.set_text_content(Some(indicator.button));
                mic_btn.set_disabled(!indicator.enabled);
                mic_status.set_text_content(Some(indicator.status));
            }
        };
        render(self.speech.borrow().indicator());

        let recognizer = self.speech.borrow().recognizer().cloned();
        let Some(recognizer) = recognizer else {
            log::info!("Speech recognition unavailable; mic disabled");
            return Ok(());
        };

        let speech = self.speech.clone();
        let on_start = {
            let render = render.clone();
            move || render(speech.borrow_mut().on_start())
        };
        let speech = self.speech.clone();
        let on_end = {
            let render = render.clone();
            move || render(speech.borrow_mut().on_end())
        };
        let input = self.input()?;
        recognizer.on_events(on_start, on_end, move |heard: String| {
            input.set_value(&append_transcript(&input.value(), &heard));
        });

        let speech = self.speech.clone();
        let button: Element = mic_btn.into();
        dom::add_click_listener(&button, move || {
            let state = speech.borrow_mut().toggle();
            log::debug!("Mic toggled: {:?}", state);
            render(speech.borrow().indicator());
        })?;

        Ok(())
    }

    fn setup_toolbar(&self) -> Result<(), JsValue> {
        let ids = &self.config.elements;

        let reset_btn = dom::get_element_by_id(&self.document, &ids.reset_button)?;
        let controller = self.controller.clone();
        dom::add_click_listener(&reset_btn, move || {
            let controller = controller.clone();
            wasm_bindgen_futures::spawn_local(async move {
                controller.reset().await;
            });
        })?;

        let export_btn = dom::get_element_by_id(&self.document, &ids.export_button)?;
        let controller = self.controller.clone();
        let document = self.document.clone();
        dom::add_click_listener(&export_btn, move || {
            if let Err(e) = utils::download_text(&document, "chat.txt", &controller.export_text()) {
                log::error!("Export failed: {:?}", e);
            }
        })?;

        let theme_btn = dom::get_element_by_id(&self.document, &ids.theme_button)?;
        let document = self.document.clone();
        dom::add_click_listener(&theme_btn, move || match utils::toggle_theme(&document) {
            Ok(light) => log::debug!("Light theme: {}", light),
            Err(e) => log::error!("Theme toggle failed: {:?}", e),
        })?;

        Ok(())
    }
}

/// Read the input, clear it, and send in the background.
fn submit(controller: &Rc<Controller>, input: &HtmlTextAreaElement) {
    let text = input.value();
    if text.trim().is_empty() {
        return;
    }
    input.set_value("");

    let controller = controller.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = controller.send(&text).await {
            log::error!("Failed to send message: {}", e);
        }
    });
}

/// `data-action` and `data-index` of the file button that was clicked.
fn file_action(event: &Event) -> Option<(String, usize)> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let button = target.closest("button[data-action]").ok()??;
    let action = button.get_attribute("data-action")?;
    let index = button.get_attribute("data-index")?.parse().ok()?;
    Some((action, index))
}
