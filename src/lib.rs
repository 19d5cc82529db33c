//! Tienda API: REST CRUD for products and users over a document store.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod resource;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use resource::{Document, ResourceKind};
pub use routes::{app, common_routes, resource_routes};
pub use service::CrudService;
pub use state::AppState;
pub use store::{connect_pool, DocumentStore, MemoryDocumentStore, PgDocumentStore, StoredDocument};
