//! Builds the [`SessionInfo`] posted back on a redirect event.

use evc_protocol::{RedirectCapture, SessionInfo};

use crate::host::{CookieAccessor, PageBodyAccessor};

/// Harvests what `capture` asks for from the page at `navigated_url`.
///
/// Nothing beyond what the capture asks for is read: the body accessor is only awaited
/// when the body is requested, and only named cookies are kept.
pub async fn extract<P, C>(capture: &RedirectCapture, navigated_url: &str, page: &P, cookies: &C) -> SessionInfo
where
	P: PageBodyAccessor + ?Sized,
	C: CookieAccessor + ?Sized,
{
	let body = if capture.include_body { page.page_body().await } else { None };

	let cookies = if capture.include_cookies.is_empty() {
		Default::default()
	} else {
		let raw = cookies.cookies_for(navigated_url).unwrap_or_default();
		parse_cookies(&raw)
			.filter(|(name, _)| capture.include_cookies.iter().any(|wanted| wanted == name))
			.map(|(name, value)| (name.to_string(), value.to_string()))
			.collect()
	};

	SessionInfo {
		body,
		cookies,
		redirect_url: capture.include_redirect_url.then(|| navigated_url.to_string()),
	}
}

/// Splits a raw cookie string into trimmed `(name, value)` pairs.
///
/// Empty fragments are skipped; a fragment without `=` is both name and value.
pub fn parse_cookies(raw: &str) -> impl Iterator<Item = (&str, &str)> {
	raw.split(';').filter_map(|fragment| {
		let (name, value) = fragment.split_once('=').unwrap_or((fragment, fragment));
		let name = name.trim();
		(!name.is_empty()).then(|| (name, value.trim()))
	})
}

/// Unwraps a JavaScript evaluation result.
///
/// Web views hand back evaluated strings as JSON literals (`"<html>..."`)
/// and `null` for undefined results. Anything else is returned unchanged.
pub fn decode_js_string(raw: &str) -> Option<String> {
	let trimmed = raw.trim();
	if trimmed.is_empty() || trimmed == "null" || trimmed == "undefined" {
		return None;
	}
	if trimmed.starts_with('"') {
		if let Ok(decoded) = serde_json::from_str::<String>(trimmed) {
			return Some(decoded);
		}
	}
	Some(raw.to_string())
}
