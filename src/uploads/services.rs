//! Signed-direct upload authorization.
//!
//! The server only hands out a short-lived cryptographic proof; the binary
//! payload goes from the client straight to the media host and never passes
//! through this process. The resulting URLs come back attached to a ticket
//! creation request.

use sha2::{Digest, Sha256};

use crate::config::CloudinaryConfig;

use super::dto::SignatureRequest;

/// Assemble the parameter set that will be signed. Blank values are
/// dropped; tags collapse to a single comma-joined parameter, mirroring
/// the media host's upload API.
pub fn build_upload_params(
    request: &SignatureRequest,
    default_folder: &str,
    timestamp: i64,
) -> Vec<(String, String)> {
    let mut params = vec![("timestamp".to_string(), timestamp.to_string())];

    let folder = request
        .folder
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(default_folder);
    if !folder.is_empty() {
        params.push(("folder".to_string(), folder.to_string()));
    }

    if let Some(public_id) = request
        .public_id
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        params.push(("public_id".to_string(), public_id.to_string()));
    }

    let tags: Vec<&str> = request
        .tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if !tags.is_empty() {
        params.push(("tags".to_string(), tags.join(",")));
    }

    params
}

/// The canonical string-to-sign: parameters sorted by key, `k=v` pairs
/// joined with `&`.
pub fn string_to_sign(params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// SHA-256 hex digest of the canonical string concatenated with the API
/// secret (the media host's sha256 signature algorithm).
pub fn sign_params(params: &[(String, String)], api_secret: &str) -> String {
    let payload = format!("{}{}", string_to_sign(params), api_secret);
    hex::encode(Sha256::digest(payload.as_bytes()))
}

pub fn folder_for(request: &SignatureRequest, config: &CloudinaryConfig) -> String {
    request
        .folder
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(&config.upload_folder)
        .to_string()
}
