//! Boundary validation for ticket submissions. Everything here runs before
//! any persistence attempt; a request that fails validation never reaches
//! the database.

use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, Time,
};

use super::dto::{CreateWorkTicketRequest, UpdateWorkTicketRequest};
use super::repo::WorkStatus;
use crate::error::ApiError;

pub const MAX_IMAGES: usize = 5;

/// A validated creation payload, ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub price: f64,
    pub worker_name: String,
    pub description: Option<String>,
    pub occurred_at: Option<OffsetDateTime>,
    pub image_urls: Vec<String>,
}

/// A validated partial update. None means "leave the field alone".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketPatch {
    pub status: Option<WorkStatus>,
    pub price: Option<f64>,
    pub worker_name: Option<String>,
    pub description: Option<String>,
    pub occurred_at: Option<OffsetDateTime>,
}

impl TicketPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.price.is_none()
            && self.worker_name.is_none()
            && self.description.is_none()
            && self.occurred_at.is_none()
    }
}

pub fn validate_create(payload: CreateWorkTicketRequest) -> Result<NewTicket, ApiError> {
    let price = payload
        .price
        .as_ref()
        .and_then(|p| p.as_f64())
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| ApiError::validation("Invalid price received"))?;

    let worker_name = payload
        .worker_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::validation("Worker name is required"))?
        .to_string();

    let description = normalize_text(payload.description);

    let occurred_at = payload
        .occurred_at
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(parse_occurred_at)
        .transpose()?;

    let image_urls: Vec<String> = payload
        .image_urls
        .iter()
        .map(|url| url.trim().to_string())
        .collect();
    if image_urls.len() > MAX_IMAGES {
        return Err(ApiError::validation(
            "A maximum of 5 images is allowed per ticket",
        ));
    }
    if image_urls.iter().any(|url| url.is_empty()) {
        return Err(ApiError::validation("Image URLs must be non-empty strings"));
    }

    Ok(NewTicket {
        price,
        worker_name,
        description,
        occurred_at,
        image_urls,
    })
}

pub fn validate_update(payload: UpdateWorkTicketRequest) -> Result<TicketPatch, ApiError> {
    let status = payload
        .status
        .as_deref()
        .map(|raw| WorkStatus::parse(raw).ok_or_else(|| ApiError::validation("Invalid status")))
        .transpose()?;

    let price = payload
        .price
        .as_ref()
        .map(|p| {
            p.as_f64()
                .filter(|p| p.is_finite() && *p > 0.0)
                .ok_or_else(|| ApiError::validation("Invalid price received"))
        })
        .transpose()?;

    let worker_name = payload
        .worker_name
        .as_deref()
        .map(|name| {
            let name = name.trim();
            if name.is_empty() {
                Err(ApiError::validation("Worker name is required"))
            } else {
                Ok(name.to_string())
            }
        })
        .transpose()?;

    let description = normalize_text(payload.description);

    let occurred_at = payload
        .occurred_at
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(parse_occurred_at)
        .transpose()?;

    let patch = TicketPatch {
        status,
        price,
        worker_name,
        description,
        occurred_at,
    };
    if patch.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }
    Ok(patch)
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Accepts RFC 3339, a bare calendar date, or the datetime-local form the
/// submission page produces. Bare forms are taken as UTC.
pub fn parse_occurred_at(raw: &str) -> Result<OffsetDateTime, ApiError> {
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(dt);
    }

    let date_format = format_description!("[year]-[month]-[day]");
    if let Ok(date) = Date::parse(raw, &date_format) {
        return Ok(PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc());
    }

    let local_format = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    if let Ok(dt) = PrimitiveDateTime::parse(raw, &local_format) {
        return Ok(dt.assume_utc());
    }

    Err(ApiError::validation("Invalid occurredAt date"))
}
