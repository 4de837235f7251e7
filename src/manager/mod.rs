//! # Connection Manager
//!
//! The core of the crate: the reconnect/backoff state machine, will
//! configuration, inbound command dispatch, and status publication.
//!
//! The manager owns the broker session and its configuration, and holds
//! non-owning handles to the two peripherals it drives: the connecting
//! indicator output (shared with whatever else signals on it) and the
//! countdown timer (shared with the periodic driver that advances it). It is
//! entirely tick-driven and synchronous — the scheduling loop calls
//! [`keep_connected`](ConnectionManager::keep_connected) and
//! [`handle`](ConnectionManager::handle) once per tick, and every operation
//! runs to completion on the calling thread.

mod backoff;
mod config;

pub use backoff::Backoff;
pub use config::{ConnectionConfig, DeviceDescriptor, MAX_FIELD_LEN, MAX_TOPIC_LEN};

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Instant};
use embedded_hal::digital::OutputPin;
use heapless::{String, Vec};

use crate::output::DigitalOutput;
use crate::payload::{self, IdentityReport, SwitchStatus};
use crate::session::{BrokerSession, ConnectRequest, InboundMessage, OutboundMessage, Will};
use crate::timer::{Countdown, TimerStatus};

/// A peripheral shared between the manager and one other driver on the same
/// logical thread of execution.
pub type Shared<T> = Mutex<CriticalSectionRawMutex, RefCell<T>>;

/// Scratch size for encoded outbound payloads.
const PAYLOAD_BUF: usize = 128;

/// Largest inbound payload the manager will dispatch; anything bigger is
/// dropped with a diagnostic.
const MAX_INBOUND_LEN: usize = 128;

/// An inbound message copied out of the session's receive buffer so dispatch
/// can publish a response through the same session.
struct OwnedInbound {
    topic: String<MAX_TOPIC_LEN>,
    payload: Vec<u8, MAX_INBOUND_LEN>,
}

impl OwnedInbound {
    fn copy_from(message: &InboundMessage<'_>) -> Option<Self> {
        let mut topic = String::new();
        topic.push_str(message.topic).ok()?;

        let mut payload = Vec::new();
        payload.extend_from_slice(message.payload).ok()?;

        Some(Self { topic, payload })
    }
}

/// The connection-resilience core: keeps a session to the broker alive with
/// exponential backoff, maps inbound commands onto the countdown timer, and
/// publishes status snapshots.
pub struct ConnectionManager<'a, S, P, T>
where
    S: BrokerSession,
    P: OutputPin,
    T: Countdown,
{
    session: S,
    config: ConnectionConfig,
    backoff: Backoff,
    connecting_light: &'a Shared<DigitalOutput<P>>,
    timer: &'a Shared<T>,
}

impl<'a, S, P, T> ConnectionManager<'a, S, P, T>
where
    S: BrokerSession,
    P: OutputPin,
    T: Countdown,
{
    /// Create a manager over `session` with a fixed configuration. The
    /// indicator output and countdown timer are borrowed, never owned.
    pub fn new(
        session: S,
        config: ConnectionConfig,
        connecting_light: &'a Shared<DigitalOutput<P>>,
        timer: &'a Shared<T>,
    ) -> Self {
        let backoff = Backoff::new(config.report_interval, config.max_retry_interval);
        Self {
            session,
            config,
            backoff,
            connecting_light,
            timer,
        }
    }

    /// Re-arm the reconnect state machine. Call once before the first
    /// scheduler tick; the configuration is fixed from this point on.
    pub fn begin(&mut self) {
        self.backoff = Backoff::new(self.config.report_interval, self.config.max_retry_interval);
    }

    /// Per-tick connection watchdog: if the session reports disconnected,
    /// run a (possibly throttled) reconnect attempt.
    pub fn keep_connected(&mut self, now: Instant) {
        if !self.session.is_connected() {
            self.reconnect(now);
        }
    }

    /// Attempt session establishment, throttled by the backoff state.
    ///
    /// A no-op while the elapsed time since the last attempt is inside the
    /// current retry interval. Failures are never escalated: they grow the
    /// retry interval, light the indicator, and wait for the next tick.
    pub fn reconnect(&mut self, now: Instant) {
        if !self.backoff.is_due(now) {
            return;
        }

        debug!("attempting broker connection");

        let mut will_buf = [0u8; PAYLOAD_BUF];
        let will_len = payload::will_payload(&mut will_buf).unwrap_or_default();

        let request = ConnectRequest {
            client_id: &self.config.client_id,
            username: non_empty(&self.config.username),
            password: non_empty(&self.config.password),
            host: &self.config.host,
            port: self.config.port,
            clean_session: self.config.clean_session,
            will: Will {
                topic: &self.config.will_topic,
                qos: self.config.will_qos,
                retain: self.config.will_retain,
                payload: &will_buf[..will_len],
            },
        };

        match self.session.connect(&request) {
            Ok(()) => {
                info!(
                    "connected to broker, subscribing to {}",
                    self.config.subscribe_topic.as_str()
                );
                if self
                    .session
                    .subscribe(&self.config.subscribe_topic, self.config.qos)
                    .is_err()
                {
                    warn!("command topic subscription failed");
                }
                self.backoff.on_success();
                self.connecting_light.lock(|light| {
                    let _ = light.borrow_mut().off();
                });
            }
            Err(_) => {
                self.backoff.on_failure(now);
                warn!(
                    "broker connection failed, retrying in {} ms",
                    self.backoff.interval().as_millis()
                );
                self.connecting_light.lock(|light| {
                    let _ = light.borrow_mut().on();
                });
            }
        }
    }

    /// Service the session once, dispatching every pending inbound message
    /// through [`on_message`](Self::on_message). Call on every scheduler
    /// tick.
    pub fn handle(&mut self) {
        while let Some(message) = self.next_message() {
            self.on_message(&message.topic, &message.payload);
        }
    }

    /// Handle one inbound command.
    ///
    /// A payload that fails to decode is dropped here: no state is mutated
    /// and nothing is published. An accepted command always (re)loads the
    /// countdown — last command wins — and triggers exactly one status
    /// publish reflecting the post-command state.
    pub fn on_message(&mut self, topic: &str, payload: &[u8]) {
        debug!("message arrived on {}", topic);

        let command = match payload::decode_command(payload) {
            Ok(command) => command,
            Err(_) => {
                warn!("dropping malformed command on {}", topic);
                return;
            }
        };

        self.timer.lock(|timer| {
            let mut timer = timer.borrow_mut();
            match command.status {
                SwitchStatus::On => {
                    timer.set(command.minutes, command.seconds);
                    timer.start();
                }
                SwitchStatus::Off => timer.reset(),
            }
        });

        self.emit_current_state();
    }

    /// Publish the current status snapshot to the publish topic.
    ///
    /// Called after every accepted command; the scheduling loop may also call
    /// it on a periodic cadence or when the countdown expires — the manager
    /// owns no publish timer of its own.
    pub fn emit_current_state(&mut self) {
        let (status, remaining) = self.snapshot();

        let mut buf = [0u8; PAYLOAD_BUF];
        let Ok(len) = payload::encode_status(status, remaining_secs(remaining), &mut buf) else {
            return;
        };

        self.publish_state(&buf[..len]);
    }

    /// Publish the full-identity report (status snapshot plus the static
    /// device descriptor). Not part of the periodic path; useful as a
    /// connect-time announce.
    pub fn emit_identity(&mut self) {
        let (status, remaining) = self.snapshot();
        let device = &self.config.device;
        let report = IdentityReport {
            status: status.as_str(),
            code: &device.code,
            name: &device.name,
            kind: &device.kind,
            version: &device.version,
            time: remaining_secs(remaining),
        };

        let mut buf = [0u8; PAYLOAD_BUF];
        let Ok(len) = payload::encode_identity(&report, &mut buf) else {
            warn!("identity report exceeds the encode buffer");
            return;
        };

        self.publish_state(&buf[..len]);
    }

    fn next_message(&mut self) -> Option<OwnedInbound> {
        loop {
            let message = self.session.poll()?;
            match OwnedInbound::copy_from(&message) {
                Some(owned) => return Some(owned),
                None => warn!("dropping oversized message on {}", message.topic),
            }
        }
    }

    fn snapshot(&self) -> (SwitchStatus, Duration) {
        self.timer.lock(|timer| {
            let timer = timer.borrow();
            let status = match timer.status() {
                TimerStatus::Running => SwitchStatus::On,
                TimerStatus::Stopped | TimerStatus::Expired => SwitchStatus::Off,
            };
            (status, timer.remaining())
        })
    }

    fn publish_state(&mut self, encoded: &[u8]) {
        let message = OutboundMessage {
            topic: &self.config.publish_topic,
            payload: encoded,
            qos: self.config.qos,
            retain: self.config.retain,
        };
        if self.session.publish(&message).is_err() {
            warn!(
                "status publish failed on {}",
                self.config.publish_topic.as_str()
            );
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

fn remaining_secs(remaining: Duration) -> u32 {
    remaining.as_secs() as u32
}
