//! # Command and Status Payloads
//!
//! The compact JSON documents exchanged with the broker, modeled as serde
//! types over `serde-json-core`. Three shapes exist on the wire:
//!
//! - inbound command: `{"data":{"status":"ON","time":{"min":3,"sec":30}}}`
//!   (the manager service wraps commands in a `data` envelope);
//! - outbound status snapshot: `{"status":"ON","time":210}`, also used as the
//!   will payload with off/0;
//! - outbound identity report: the status snapshot extended with the static
//!   device descriptor fields.
//!
//! Decoding rejects documents that carry fields outside the expected set, so
//! a command that grew extra structure upstream is dropped rather than
//! half-applied.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// The on/off literal carried in `status` fields.
///
/// Only the exact `"ON"` literal switches on; anything else, including a
/// missing field, reads as off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchStatus {
    On,
    Off,
}

impl SwitchStatus {
    /// Wire form of the status literal.
    pub fn as_str(self) -> &'static str {
        match self {
            SwitchStatus::On => "ON",
            SwitchStatus::Off => "OFF",
        }
    }

    fn from_wire(value: &str) -> Self {
        if value == "ON" {
            SwitchStatus::On
        } else {
            SwitchStatus::Off
        }
    }
}

/// A decoded inbound command. Lives only for the duration of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    pub status: SwitchStatus,
    pub minutes: u16,
    pub seconds: u16,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandEnvelope<'a> {
    #[serde(borrow, default)]
    data: CommandData<'a>,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandData<'a> {
    #[serde(borrow, default)]
    status: Option<&'a str>,
    #[serde(default)]
    time: TimeSpec,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimeSpec {
    #[serde(default)]
    min: u16,
    #[serde(default)]
    sec: u16,
}

/// Decode an inbound command payload.
///
/// Missing fields take their documented defaults (off, 0:00); malformed or
/// over-structured payloads fail as [`CodecError::Malformed`].
pub fn decode_command(payload: &[u8]) -> Result<Command, CodecError> {
    let (envelope, _consumed) = serde_json_core::from_slice::<CommandEnvelope<'_>>(payload)?;

    Ok(Command {
        status: envelope
            .data
            .status
            .map_or(SwitchStatus::Off, SwitchStatus::from_wire),
        minutes: envelope.data.time.min,
        seconds: envelope.data.time.sec,
    })
}

/// The status snapshot published on the state topic: current status and
/// remaining whole seconds.
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    status: &'a str,
    time: u32,
}

/// Encode a status snapshot into `buf`, returning the encoded length.
pub fn encode_status(
    status: SwitchStatus,
    remaining_secs: u32,
    buf: &mut [u8],
) -> Result<usize, CodecError> {
    let report = StatusReport {
        status: status.as_str(),
        time: remaining_secs,
    };
    Ok(serde_json_core::to_slice(&report, buf)?)
}

/// Encode the will payload: always the off snapshot, so the broker announces
/// an off device on ungraceful disconnect. Computed per connect attempt
/// rather than stored, so it always reflects current encoding rules.
pub fn will_payload(buf: &mut [u8]) -> Result<usize, CodecError> {
    encode_status(SwitchStatus::Off, 0, buf)
}

/// The full-identity report: the status snapshot plus the static device
/// descriptor fields the manager service validates on state reports.
#[derive(Debug, Serialize)]
pub struct IdentityReport<'a> {
    pub status: &'a str,
    pub code: &'a str,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub version: &'a str,
    pub time: u32,
}

/// Encode a full-identity report into `buf`, returning the encoded length.
pub fn encode_identity(report: &IdentityReport<'_>, buf: &mut [u8]) -> Result<usize, CodecError> {
    Ok(serde_json_core::to_slice(report, buf)?)
}
