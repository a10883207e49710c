//! Shader fetching through `window.fetch`.

use async_trait::async_trait;
use point_demo_core::{FetchError, SourceFetcher, SourceLocator};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlScriptElement, Response};

/// Fetches shader text over HTTP. Element locators are resolved through the
/// `src` attribute of a `<script>` element in the current document.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebFetcher;

fn describe(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[async_trait(?Send)]
impl SourceFetcher for WebFetcher {
    fn resolve(&self, locator: &SourceLocator) -> Result<String, FetchError> {
        match locator {
            SourceLocator::Uri(uri) => Ok(uri.clone()),
            SourceLocator::Element(id) => web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(id))
                .and_then(|e| e.dyn_into::<HtmlScriptElement>().ok())
                .map(|script| script.src())
                .filter(|src| !src.is_empty())
                .ok_or_else(|| FetchError::Unresolved(locator.to_string())),
        }
    }

    async fn fetch_text(&self, uri: &str) -> Result<String, FetchError> {
        let transport = |message: String| FetchError::Transport {
            uri: uri.to_owned(),
            message,
        };

        let window = web_sys::window().ok_or_else(|| transport("no window".into()))?;
        let response: Response = JsFuture::from(window.fetch_with_str(uri))
            .await
            .map_err(|e| transport(describe(e)))?
            .dyn_into()
            .map_err(|e| transport(describe(e)))?;

        if !response.ok() {
            return Err(FetchError::Status {
                uri: uri.to_owned(),
                status: response.status(),
            });
        }

        let text = response.text().map_err(|e| transport(describe(e)))?;
        JsFuture::from(text)
            .await
            .map_err(|e| transport(describe(e)))?
            .as_string()
            .ok_or_else(|| transport("response body is not text".into()))
    }
}
