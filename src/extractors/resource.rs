//! Resolve the resource kind (and optional id) from the matched path, ahead of any body extraction.

use crate::error::AppError;
use crate::resource::ResourceKind;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::collections::HashMap;

/// Route parameter naming the resource kind.
pub const KIND_PARAM: &str = "path_segment";
/// Route parameter holding the record identifier.
pub const ID_PARAM: &str = "id";

#[derive(Clone, Debug)]
pub struct ResourcePath {
    pub kind: ResourceKind,
    id: Option<String>,
}

impl ResourcePath {
    /// Raw identifier from the path; empty when the route has none, which fails id parsing.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ResourcePath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(mut params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let segment = params.remove(KIND_PARAM).unwrap_or_default();
        let kind = ResourceKind::from_path(&segment)
            .ok_or_else(|| AppError::NotFound(format!("resource '{}'", segment)))?;
        Ok(ResourcePath {
            kind,
            id: params.remove(ID_PARAM),
        })
    }
}
