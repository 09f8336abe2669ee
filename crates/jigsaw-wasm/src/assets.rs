//! Image loading and bundle download

use gloo::net::http::Request;
use jigsaw_core::{BundleRequest, DownloadFailure, ImageInfo};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlImageElement, Url};

const BUNDLE_MIME: &str = "application/zip";

/// Best-effort human readable text for a thrown JS value
pub fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Load and decode an image; the error is the cause text for the notice
pub async fn load_image(path: &str) -> Result<ImageInfo, String> {
    let image = HtmlImageElement::new().map_err(|e| js_message(&e))?;
    image.set_src(path);
    JsFuture::from(image.decode())
        .await
        .map_err(|e| format!("Failed to load image: {} ({})", path, js_message(&e)))?;

    Ok(ImageInfo {
        width: image.natural_width(),
        height: image.natural_height(),
        src: path.to_string(),
    })
}

fn create_object_url(bytes: &[u8], mime: &str) -> Result<String, JsValue> {
    let array = js_sys::Array::new();
    let u8_array = js_sys::Uint8Array::from(bytes);
    array.push(&u8_array.buffer());
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &options)?;
    Url::create_object_url_with_blob(&blob)
}

/// Hand the bytes to the browser as a file download
fn save_file(bytes: &[u8], filename: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?;
    let body = document.body().ok_or("No body")?;

    let url = create_object_url(bytes, BUNDLE_MIME)?;
    let link = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()?;
    link.set_href(&url);
    link.set_download(filename);

    body.append_child(&link)?;
    link.click();
    body.remove_child(&link)?;
    Url::revoke_object_url(&url)?;
    Ok(())
}

pub async fn download_bundle(request: &BundleRequest) -> Result<(), DownloadFailure> {
    let response = Request::get(&request.url)
        .send()
        .await
        .map_err(|e| DownloadFailure::Network(e.to_string()))?;

    if !response.ok() {
        return Err(DownloadFailure::Status {
            code: response.status(),
            text: response.status_text(),
        });
    }

    let bytes = response
        .binary()
        .await
        .map_err(|e| DownloadFailure::Network(e.to_string()))?;
    save_file(&bytes, &request.filename).map_err(|e| DownloadFailure::Network(js_message(&e)))
}
