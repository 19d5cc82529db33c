//! Extract a record body from a JSON object or a urlencoded form.
//! A missing body, or one in any other content type, reads as an empty record.

use crate::error::AppError;
use crate::resource::Document;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use serde_json::Value;
use std::collections::HashMap;

/// Request body as an untyped field map. Form values arrive as strings.
#[derive(Clone, Debug)]
pub struct RecordBody(pub Document);

#[derive(Debug, PartialEq, Eq)]
enum BodyFormat {
    Json,
    Form,
    Other,
}

fn rejected(status: StatusCode, text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(text)
    }
}

fn body_format(req: &Request) -> BodyFormat {
    let Some(ct) = req.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return BodyFormat::Other;
    };
    let essence = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    if essence == "application/x-www-form-urlencoded" {
        BodyFormat::Form
    } else if essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json")) {
        BodyFormat::Json
    } else {
        BodyFormat::Other
    }
}

#[async_trait]
impl<S> FromRequest<S> for RecordBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_format(&req) {
            BodyFormat::Form => {
                let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                    .await
                    .map_err(|e| rejected(e.status(), e.body_text()))?;
                Ok(RecordBody(
                    fields.into_iter().map(|(k, v)| (k, Value::String(v))).collect(),
                ))
            }
            BodyFormat::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| rejected(e.status(), e.body_text()))?;
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(RecordBody(Document::new()));
                }
                let Json(value) = Json::<Value>::from_bytes(&bytes)
                    .map_err(|e| rejected(e.status(), e.body_text()))?;
                match value {
                    Value::Object(m) => Ok(RecordBody(m)),
                    _ => Err(AppError::BadRequest("body must be a JSON object".into())),
                }
            }
            BodyFormat::Other => Ok(RecordBody(Document::new())),
        }
    }
}
