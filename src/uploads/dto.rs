use serde::{Deserialize, Serialize};

/// Optional knobs for the upload authorization request.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRequest {
    pub folder: Option<String>,
    pub public_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Everything the client needs to upload straight to the media host. The
/// API secret itself never appears here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSignature {
    pub timestamp: i64,
    pub signature: String,
    pub api_key: String,
    pub cloud_name: String,
    pub folder: String,
}
