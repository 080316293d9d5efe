//! Engine configuration.
//!
//! A single struct resolved once, either from defaults or from the
//! environment. The installer reads it without further lookups.
//!
//! # Environment
//!
//! | Variable | Field |
//! |---|---|
//! | `SWIZZLE_DEFAULT_MODE` | `default_mode`: a mode name or `0`/`1`/`2` |
//! | `SWIZZLE_TRACE_INSTALLS` | `trace_installs` (non-empty and not `0`) |

use crate::mode::SwizzleMode;

/// Environment variable selecting the default mode for keyed installs.
pub const ENV_DEFAULT_MODE: &str = "SWIZZLE_DEFAULT_MODE";

/// Environment variable raising install events to `info`.
pub const ENV_TRACE_INSTALLS: &str = "SWIZZLE_TRACE_INSTALLS";

/// Installer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Mode used by `Swizzler::intercept_keyed`.
    pub default_mode: SwizzleMode,

    /// Log successful installs at `info` instead of `debug`.
    pub trace_installs: bool,
}

impl EngineConfig {
    /// Resolve configuration from the process environment.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_mode = match lookup(ENV_DEFAULT_MODE) {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(%err, "ignoring {}", ENV_DEFAULT_MODE);
                SwizzleMode::Always
            }),
            None => SwizzleMode::Always,
        };

        let trace_installs = lookup(ENV_TRACE_INSTALLS)
            .map(|v| !v.is_empty() && v != "0")
            .unwrap_or(false);

        Self {
            default_mode,
            trace_installs,
        }
    }
}
