//! Test doubles shared across the unit-test modules: an infallible recording
//! pin and a scripted broker session that logs every call.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::digital::{OutputPin, PinState};

use crate::session::{BrokerSession, ConnectRequest, InboundMessage, OutboundMessage, QoS};

/// An output pin that records the last level driven onto it.
#[derive(Debug, Default)]
pub(crate) struct MockPin {
    pub(crate) level: Option<PinState>,
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level = Some(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level = Some(PinState::High);
        Ok(())
    }
}

/// One recorded connect attempt.
#[derive(Debug, Clone)]
pub(crate) struct ConnectRecord {
    pub(crate) client_id: String,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) clean_session: bool,
    pub(crate) will_topic: String,
    pub(crate) will_qos: QoS,
    pub(crate) will_retain: bool,
    pub(crate) will_payload: Vec<u8>,
}

/// One recorded publish.
#[derive(Debug, Clone)]
pub(crate) struct PublishRecord {
    pub(crate) topic: String,
    pub(crate) payload: Vec<u8>,
    pub(crate) qos: QoS,
    pub(crate) retain: bool,
}

/// Scripted inputs and recorded outputs of a [`MockSession`]. Tests keep a
/// handle to this log while the session itself is owned by the manager.
#[derive(Debug, Default)]
pub(crate) struct SessionLog {
    /// Outcomes for upcoming connect attempts; an unscripted attempt fails.
    pub(crate) connect_results: VecDeque<bool>,
    pub(crate) connected: bool,
    pub(crate) connects: Vec<ConnectRecord>,
    pub(crate) subscriptions: Vec<(String, QoS)>,
    pub(crate) publishes: Vec<PublishRecord>,
    /// Messages handed out one per `poll` call.
    pub(crate) inbound: VecDeque<(String, Vec<u8>)>,
}

/// A broker session double backed by a shared [`SessionLog`].
pub(crate) struct MockSession {
    log: Rc<RefCell<SessionLog>>,
    current: Option<(String, Vec<u8>)>,
}

impl MockSession {
    pub(crate) fn new() -> (Self, Rc<RefCell<SessionLog>>) {
        let log = Rc::new(RefCell::new(SessionLog::default()));
        (
            Self {
                log: Rc::clone(&log),
                current: None,
            },
            log,
        )
    }
}

impl BrokerSession for MockSession {
    type Error = ();

    fn connect(&mut self, request: &ConnectRequest<'_>) -> Result<(), Self::Error> {
        let mut log = self.log.borrow_mut();
        log.connects.push(ConnectRecord {
            client_id: request.client_id.to_string(),
            username: request.username.map(str::to_string),
            password: request.password.map(str::to_string),
            host: request.host.to_string(),
            port: request.port,
            clean_session: request.clean_session,
            will_topic: request.will.topic.to_string(),
            will_qos: request.will.qos,
            will_retain: request.will.retain,
            will_payload: request.will.payload.to_vec(),
        });

        if log.connect_results.pop_front().unwrap_or(false) {
            log.connected = true;
            Ok(())
        } else {
            Err(())
        }
    }

    fn is_connected(&self) -> bool {
        self.log.borrow().connected
    }

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), Self::Error> {
        self.log
            .borrow_mut()
            .subscriptions
            .push((topic.to_string(), qos));
        Ok(())
    }

    fn publish(&mut self, message: &OutboundMessage<'_>) -> Result<(), Self::Error> {
        self.log.borrow_mut().publishes.push(PublishRecord {
            topic: message.topic.to_string(),
            payload: message.payload.to_vec(),
            qos: message.qos,
            retain: message.retain,
        });
        Ok(())
    }

    fn poll(&mut self) -> Option<InboundMessage<'_>> {
        self.current = self.log.borrow_mut().inbound.pop_front();
        self.current
            .as_ref()
            .map(|(topic, payload)| InboundMessage { topic, payload })
    }
}
