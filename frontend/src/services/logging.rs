use gloo::net::http::Request;
use serde::Serialize;
use wasm_bindgen_futures::spawn_local;

use crate::services::api::DEFAULT_BASE_URL;

#[derive(Debug, Serialize)]
struct LogRequest {
    level: String,
    message: String,
    component: Option<String>,
}

/// Component-scoped logger. Messages go to the browser console and are
/// forwarded to the server's log endpoint.
pub struct Logger;

impl Logger {
    pub fn debug_with_component(component: &str, message: &str) {
        gloo::console::debug!(format!("[{}] {}", component, message));
        Self::log("debug", message, Some(component.to_string()));
    }

    pub fn info_with_component(component: &str, message: &str) {
        gloo::console::info!(format!("[{}] {}", component, message));
        Self::log("info", message, Some(component.to_string()));
    }

    pub fn warn_with_component(component: &str, message: &str) {
        gloo::console::warn!(format!("[{}] {}", component, message));
        Self::log("warn", message, Some(component.to_string()));
    }

    pub fn error_with_component(component: &str, message: &str) {
        gloo::console::error!(format!("[{}] {}", component, message));
        Self::log("error", message, Some(component.to_string()));
    }

    fn log(level: &str, message: &str, component: Option<String>) {
        let request = LogRequest {
            level: level.to_string(),
            message: message.to_string(),
            component,
        };

        // Fire and forget; a failed log post is not worth reporting
        spawn_local(async move {
            let url = format!("{}/api/logs", DEFAULT_BASE_URL);
            if let Ok(request) = Request::post(&url).json(&request) {
                let _ = request.send().await;
            }
        });
    }
}
