//! # Broker Session Abstraction
//!
//! This module defines the [`BrokerSession`] trait, which abstracts the
//! underlying MQTT session library (socket I/O, keep-alive pings, and
//! subscription mechanics live behind it), allowing the connection manager to
//! be transport and network-stack agnostic — and trivially testable with a
//! recording substitute.
//!
//! All operations are synchronous and expected to be non-blocking per
//! invocation: the manager drives the session once per scheduler tick and
//! never suspends.

/// Delivery-guarantee tier for published and subscribed messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum QoS {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

/// The last-will descriptor handed to the broker on connect: the message the
/// broker publishes on the device's behalf if it disconnects uncleanly.
#[derive(Debug, Clone, Copy)]
pub struct Will<'a> {
    pub topic: &'a str,
    pub qos: QoS,
    pub retain: bool,
    pub payload: &'a [u8],
}

/// Everything a session needs to establish itself with the broker.
///
/// Borrowed from the manager's configuration for the duration of one connect
/// attempt; the will payload is computed freshly for each attempt.
#[derive(Debug, Clone, Copy)]
pub struct ConnectRequest<'a> {
    pub client_id: &'a str,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub host: &'a str,
    pub port: u16,
    pub clean_session: bool,
    pub will: Will<'a>,
}

/// An outbound publish.
#[derive(Debug, Clone, Copy)]
pub struct OutboundMessage<'a> {
    pub topic: &'a str,
    pub payload: &'a [u8],
    pub qos: QoS,
    pub retain: bool,
}

/// An inbound publish on a subscribed topic, borrowed from the session's
/// receive buffer.
#[derive(Debug, Clone, Copy)]
pub struct InboundMessage<'a> {
    pub topic: &'a str,
    pub payload: &'a [u8],
}

/// A connection-oriented publish/subscribe session.
///
/// Errors are opaque to the manager: a failed connect feeds the backoff state
/// machine, a failed subscribe or publish is logged and the session is left
/// to self-heal on subsequent ticks.
pub trait BrokerSession {
    /// The error type returned by the session library.
    type Error: core::fmt::Debug;

    /// Attempt session establishment. Expected to complete (success or
    /// failure) within the call, subject only to the library's own timeouts.
    fn connect(&mut self, request: &ConnectRequest<'_>) -> Result<(), Self::Error>;

    /// Whether the session currently considers itself connected.
    fn is_connected(&self) -> bool;

    /// Subscribe to a topic at the given quality-of-service level.
    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), Self::Error>;

    /// Publish a message.
    fn publish(&mut self, message: &OutboundMessage<'_>) -> Result<(), Self::Error>;

    /// Service the session and yield the next pending inbound message, if
    /// any. Called in a drain loop once per scheduler tick; returning `None`
    /// ends the drain for this tick.
    fn poll(&mut self) -> Option<InboundMessage<'_>>;
}
