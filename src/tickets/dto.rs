use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Price as submitted by the form: either a JSON number or a numeric
/// string, matching what clients actually send.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PriceInput::Number(n) => Some(*n),
            PriceInput::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkTicketRequest {
    pub price: Option<PriceInput>,
    pub worker_name: Option<String>,
    pub description: Option<String>,
    pub occurred_at: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Partial update. Status arrives as a raw string so an invalid value can
/// be answered with the store's own validation error instead of a
/// deserialization failure.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkTicketRequest {
    pub status: Option<String>,
    pub price: Option<PriceInput>,
    pub worker_name: Option<String>,
    pub description: Option<String>,
    pub occurred_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: Uuid,
}
