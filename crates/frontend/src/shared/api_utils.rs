//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs.

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path (should start with "/api/")
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Absolute URL of a stored receipt
///
/// The backend returns receipts as `/public/...`; absolute URLs pass through.
pub fn file_url(raw: &str) -> String {
    resolve_against(&api_base(), raw)
}

fn resolve_against(base: &str, raw: &str) -> String {
    if raw.starts_with('/') {
        format!("{}{}", base, raw)
    } else {
        raw.to_string()
    }
}
