//! JavaScript bindings. Every function takes the presentation and the request
//! as JSON strings and returns `{"presentation": ..., "result": ...}`.

use std::sync::OnceLock;
use wasm_bindgen::prelude::*;

use crate::api::{self, LayoutEngine};
use crate::config::LayoutConfig;

static ENGINE: OnceLock<LayoutEngine> = OnceLock::new();

fn engine() -> &'static LayoutEngine {
    ENGINE.get_or_init(|| LayoutEngine::new(LayoutConfig::default()))
}

/// Installs the panic hook and routes `log` output to the browser console
/// (or to `env_logger` outside the browser). Safe to call more than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log::Level::Info);

    #[cfg(not(target_arch = "wasm32"))]
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

/// Sets the engine configuration. Returns false when the engine was already
/// created by an earlier call, in which case the configuration is unchanged.
/// Unusable values are rejected.
#[wasm_bindgen(js_name = configureEngine)]
pub fn configure_engine(config_json: &str) -> Result<bool, JsError> {
    let config: LayoutConfig = serde_json::from_str(config_json)?;
    config.validate()?;
    Ok(ENGINE.set(LayoutEngine::new(config)).is_ok())
}

#[wasm_bindgen(js_name = addElements)]
pub fn add_elements(presentation_json: &str, request_json: &str) -> Result<String, JsError> {
    Ok(api::add_elements_json(engine(), presentation_json, request_json)?)
}

#[wasm_bindgen(js_name = getSlideElements)]
pub fn get_slide_elements(presentation_json: &str, request_json: &str) -> Result<String, JsError> {
    Ok(api::get_slide_elements_json(presentation_json, request_json)?)
}

#[wasm_bindgen(js_name = repositionElement)]
pub fn reposition_element(presentation_json: &str, request_json: &str) -> Result<String, JsError> {
    Ok(api::reposition_element_json(presentation_json, request_json)?)
}

#[wasm_bindgen(js_name = findAndReplace)]
pub fn find_and_replace(presentation_json: &str, request_json: &str) -> Result<String, JsError> {
    Ok(api::find_and_replace_json(engine(), presentation_json, request_json)?)
}
