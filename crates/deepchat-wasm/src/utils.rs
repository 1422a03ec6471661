use std::time::Duration;

use async_trait::async_trait;
use deepchat_core::Ticker;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Url};

/// Reveal ticker backed by `setTimeout`.
pub struct TimeoutTicker;

#[async_trait(?Send)]
impl Ticker for TimeoutTicker {
    async fn tick(&self, period: Duration) {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}

/// Offer `text` to the user as a downloaded plain-text file.
pub fn download_text(document: &Document, filename: &str, text: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(text));
    let options = BlobPropertyBag::new();
    options.set_type("text/plain");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| JsValue::from_str("Failed to create download link"))?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    Url::revoke_object_url(&url)
}

/// Flip between the dark and light themes.
pub fn toggle_theme(document: &Document) -> Result<bool, JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("No body element"))?;
    body.class_list().toggle("light")
}
