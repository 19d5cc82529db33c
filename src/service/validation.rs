//! Request validation. Only identifiers are checked; record fields are not.

use crate::error::AppError;
use uuid::Uuid;

/// Parse a path identifier. Anything `Uuid::parse_str` rejects is a client error.
pub fn parse_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str).map_err(|_| AppError::InvalidId(id_str.to_string()))
}
