//! # Server Configuration
//!
//! Environment-variable configuration for the server process.
//!
//! ## Environment Variables
//!
//! ### `GHOST_ADDR`
//!
//! Address the HTTP server binds to. Default: `0.0.0.0:8080`.
//!
//! ### `GHOST_STACK_SIZE`
//!
//! Stack size for the coroutines that serve connections. Accepts decimal
//! (`32768`) or hexadecimal (`0x8000`). Default: `0x8000` (32 KB).
//!
//! Every connection runs on its own coroutine, so memory use is roughly
//! `stack_size × open connections`. Raise it when stages recurse deeply or
//! keep large values on the stack.
//!
//! ```bash
//! export GHOST_ADDR=127.0.0.1:3000
//! export GHOST_STACK_SIZE=0x10000
//! cargo run
//! ```

use std::env;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_STACK_SIZE: usize = 0x8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address, `host:port`
    pub addr: String,
    /// Coroutine stack size in bytes
    pub stack_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            addr: lookup("GHOST_ADDR")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.addr),
            stack_size: lookup("GHOST_STACK_SIZE")
                .and_then(|v| parse_size(&v))
                .unwrap_or(defaults.stack_size),
        }
    }

    /// Apply process-wide runtime settings. Call before starting the server.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
    }
}

fn parse_size(value: &str) -> Option<usize> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), ServerConfig::default());
        assert_eq!(ServerConfig::default().addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_stack_size_hex_and_decimal() {
        assert_eq!(config(&[("GHOST_STACK_SIZE", "0x4000")]).stack_size, 0x4000);
        assert_eq!(config(&[("GHOST_STACK_SIZE", "65536")]).stack_size, 65536);
        assert_eq!(
            config(&[("GHOST_STACK_SIZE", "lots")]).stack_size,
            DEFAULT_STACK_SIZE
        );
    }

    #[test]
    fn test_addr_override() {
        assert_eq!(config(&[("GHOST_ADDR", "127.0.0.1:3000")]).addr, "127.0.0.1:3000");
        assert_eq!(config(&[("GHOST_ADDR", "  ")]).addr, DEFAULT_ADDR);
    }
}
