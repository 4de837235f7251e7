//! # Error Types
//!
//! Error types for the time-switch core. There are deliberately few of them:
//! transient connectivity failures are handled by the reconnect state machine
//! and malformed inbound messages are dropped where they arrive, so the only
//! errors surfaced to callers are configuration-time validation failures and
//! payload codec failures.

/// A configuration value was rejected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The value exceeds the capacity bound of its field. Fields are
    /// fixed-capacity strings; over-long values are rejected here instead of
    /// being silently truncated.
    ValueTooLong,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ValueTooLong => write!(f, "configuration value too long"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// A payload could not be encoded or decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// The payload is not a well-formed command/status document, or carries
    /// fields outside the expected set.
    Malformed,
    /// The output buffer is too small for the encoded payload.
    BufferTooSmall,
}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodecError::Malformed => write!(f, "malformed payload"),
            CodecError::BufferTooSmall => write!(f, "payload buffer too small"),
        }
    }
}

impl core::error::Error for CodecError {}

impl From<serde_json_core::de::Error> for CodecError {
    fn from(_err: serde_json_core::de::Error) -> Self {
        CodecError::Malformed
    }
}

impl From<serde_json_core::ser::Error> for CodecError {
    fn from(_err: serde_json_core::ser::Error) -> Self {
        CodecError::BufferTooSmall
    }
}
