// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub rust_log: String,
    pub log_dir: String,
    /// Upper bound on request bodies, in bytes.
    pub max_body_bytes: usize,
    /// Upper bound on a single form field, in characters.
    pub max_field_chars: usize,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Loads configuration from the environment (and `.env`, if present).
    ///
    /// Unparsable values fall back to their defaults. The returned warnings
    /// describe each fallback; log them once tracing is up.
    pub fn from_env() -> (Self, Vec<String>) {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        let bind_addr = parse_or(
            &lookup,
            &mut warnings,
            "BIND_ADDR",
            SocketAddr::from(([0, 0, 0, 0], 3000)),
        );

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let log_dir = lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string());

        let max_body_bytes = parse_or(&lookup, &mut warnings, "MAX_BODY_BYTES", 256 * 1024);

        let max_field_chars = parse_or(&lookup, &mut warnings, "MAX_FIELD_CHARS", 10_000);

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let config = Self {
            bind_addr,
            rust_log,
            log_dir,
            max_body_bytes,
            max_field_chars,
            allowed_origins,
        };
        (config, warnings)
    }
}

/// Reads `key`, falling back to `default` when unset or unparsable.
fn parse_or<T>(
    lookup: impl Fn(&str) -> Option<String>,
    warnings: &mut Vec<String>,
    key: &str,
    default: T,
) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warnings.push(format!("Invalid value {:?} for {}, using {}", raw, key, default));
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> (Config, Vec<String>) {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_warnings() {
        let (config, warnings) = load(&[]);
        assert!(warnings.is_empty());
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert_eq!(config.max_body_bytes, 256 * 1024);
        assert_eq!(config.max_field_chars, 10_000);
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn unparsable_values_fall_back_with_a_warning() {
        let (config, warnings) = load(&[
            ("BIND_ADDR", "not-an-addr"),
            ("MAX_BODY_BYTES", "lots"),
            ("MAX_FIELD_CHARS", " 500 "),
        ]);
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert_eq!(config.max_body_bytes, 256 * 1024);
        assert_eq!(config.max_field_chars, 500);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("BIND_ADDR"));
        assert!(warnings[1].contains("MAX_BODY_BYTES"));
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let (config, _) = load(&[("ALLOWED_ORIGINS", " https://a.example , ,*")]);
        assert_eq!(config.allowed_origins, vec!["https://a.example", "*"]);
    }
}
