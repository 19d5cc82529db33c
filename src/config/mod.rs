//! Process configuration read from the environment at startup.

mod settings;

pub use settings::{Settings, DEFAULT_BODY_LIMIT, DEFAULT_PORT, DEFAULT_SCHEMA};
