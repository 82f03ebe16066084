//! README content decoding with ordered fallback strategies.
//!
//! GitHub's README endpoint reports `encoding: "base64"` but is inconsistent
//! about the exact shape: sometimes strict base64, usually base64 folded
//! with newlines every 60 characters, and for link-file READMEs the
//! `content` field is absent entirely while `download_url` still resolves.
//! Each strategy is attempted in order and the first success wins.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::client::GitHubClient;
use super::types::ReadmeResponse;

/// Decode a base64 README body into UTF-8 text.
///
/// Tries a line-folded decode first (CR/LF removed, the common GitHub
/// shape), then a strict decode with all whitespace stripped. Returns `None`
/// when neither yields valid base64/UTF-8.
pub fn decode_base64_text(encoded: &str) -> Option<String> {
    let unfolded: String = encoded.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    if let Some(text) = decode_strict(&unfolded) {
        return Some(text);
    }

    let stripped: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    decode_strict(&stripped)
}

fn decode_strict(cleaned: &str) -> Option<String> {
    let bytes = STANDARD.decode(cleaned).ok()?;
    String::from_utf8(bytes).ok()
}

/// Run the full decode fallback chain for a README document.
///
/// 1. Skip inline decoding unless the encoding tag is (case-insensitively)
///    `base64` and a `content` field is present.
/// 2./3. [`decode_base64_text`] - line-folded, then whitespace-stripped.
/// 4. Raw GET of `download_url` if one is present, body used verbatim.
///
/// A final `None` is accepted behavior: the caller still records the new
/// `sha` and ETag from the outer response.
pub async fn decode(client: &GitHubClient, readme: &ReadmeResponse) -> Option<String> {
    let is_base64 = readme
        .encoding
        .as_deref()
        .is_some_and(|e| e.eq_ignore_ascii_case("base64"));

    if is_base64
        && let Some(content) = readme.content.as_deref()
        && let Some(text) = decode_base64_text(content)
    {
        return Some(text);
    }

    let url = readme.download_url.as_deref()?;
    match client.download_raw(url).await {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("raw README download failed: {e}");
            None
        }
    }
}
