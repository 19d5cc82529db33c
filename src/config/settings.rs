//! `Settings` from environment variables, with defaults for everything except the database URL.

use crate::error::ConfigError;
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SCHEMA: &str = "tienda";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
/// Matches the 100kb default of common JSON body parsers.
pub const DEFAULT_BODY_LIMIT: usize = 100 * 1024;

#[derive(Clone, Debug)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    /// Schema holding one table per collection. Must be a plain PostgreSQL identifier.
    pub schema: String,
    pub max_connections: u32,
    pub body_limit: usize,
}

impl Settings {
    /// Load from the process environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DB")
            .or_else(|| get("DATABASE_URL"))
            .ok_or(ConfigError::Missing("DB"))?;

        let schema = get("TIENDA_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        let ident = Regex::new(r"^[a-z_][a-z0-9_]*$").map_err(|_| ConfigError::InvalidSchema(schema.clone()))?;
        if !ident.is_match(&schema) {
            return Err(ConfigError::InvalidSchema(schema));
        }

        Ok(Settings {
            host: parse_or("HOST", get("HOST"), IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
            database_url,
            schema,
            max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?,
            body_limit: parse_or("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), DEFAULT_BODY_LIMIT)?,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_only_db_is_set() {
        let s = load(&[("DB", "postgres://localhost/tienda")]).unwrap();
        assert_eq!(s.port, DEFAULT_PORT);
        assert_eq!(s.schema, DEFAULT_SCHEMA);
        assert_eq!(s.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(s.body_limit, DEFAULT_BODY_LIMIT);
        assert_eq!(s.bind_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn database_url_is_a_fallback_for_db() {
        let s = load(&[("DATABASE_URL", "postgres://db/x")]).unwrap();
        assert_eq!(s.database_url, "postgres://db/x");

        let s = load(&[("DB", "postgres://a/1"), ("DATABASE_URL", "postgres://b/2")]).unwrap();
        assert_eq!(s.database_url, "postgres://a/1");
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(matches!(load(&[("PORT", "8080")]), Err(ConfigError::Missing("DB"))));
        assert!(matches!(load(&[("DB", "  ")]), Err(ConfigError::Missing("DB"))));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let s = load(&[
            ("DB", "postgres://localhost/tienda"),
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("TIENDA_SCHEMA", "shop_v2"),
            ("DB_MAX_CONNECTIONS", "12"),
        ])
        .unwrap();
        assert_eq!(s.bind_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(s.schema, "shop_v2");
        assert_eq!(s.max_connections, 12);
    }

    #[test]
    fn rejects_bad_port_and_schema() {
        let err = load(&[("DB", "postgres://x"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));

        let err = load(&[("DB", "postgres://x"), ("TIENDA_SCHEMA", "drop table;")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSchema(_)));
    }
}
