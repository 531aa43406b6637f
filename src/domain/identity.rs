//! Caller identity used as the rate-limit key.
//!
//! Both translation services derive identity the same way: first entry of a
//! forwarded-for style address list, else a configured default. Every caller
//! without an address shares the default's bucket.

use std::fmt;

/// Fallback identity when no caller address is available.
pub const DEFAULT_IDENTITY: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// Resolve from an optional `X-Forwarded-For`-style value.
    ///
    /// `"203.0.113.7, 10.0.0.1"` resolves to `203.0.113.7`. Absent or blank input
    /// resolves to `default`.
    pub fn resolve(forwarded_for: Option<&str>, default: &str) -> Self {
        let first = forwarded_for
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        match first {
            Some(addr) => Self(addr.to_string()),
            None => Self(default.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
