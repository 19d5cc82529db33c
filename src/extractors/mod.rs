//! Request extractors.

mod record;
mod resource;
pub use record::RecordBody;
pub use resource::{ResourcePath, ID_PARAM, KIND_PARAM};
