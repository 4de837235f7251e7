//! Connection manager configuration.
//!
//! All fields are plain values assembled before the manager is constructed;
//! there is no runtime reconfiguration surface. String fields are
//! fixed-capacity and validated at configuration time — an over-long value is
//! rejected with [`ConfigError::ValueTooLong`] instead of being truncated.

use embassy_time::Duration;
use heapless::String;

use crate::error::ConfigError;
use crate::session::QoS;

/// Capacity bound for identity and credential fields (client id, username,
/// password, device descriptor fields).
pub const MAX_FIELD_LEN: usize = 32;

/// Capacity bound for the broker host name and topic strings.
pub const MAX_TOPIC_LEN: usize = 64;

fn bounded<const N: usize>(value: &str) -> Result<String<N>, ConfigError> {
    let mut owned = String::new();
    owned
        .push_str(value)
        .map_err(|_| ConfigError::ValueTooLong)?;
    Ok(owned)
}

/// Static device identity embedded in full-state reports. Set once, never
/// mutated afterwards.
#[derive(Debug, Default, Clone)]
pub struct DeviceDescriptor {
    pub(crate) code: String<MAX_FIELD_LEN>,
    pub(crate) name: String<MAX_FIELD_LEN>,
    pub(crate) kind: String<MAX_FIELD_LEN>,
    pub(crate) version: String<MAX_FIELD_LEN>,
}

impl DeviceDescriptor {
    pub fn new(code: &str, name: &str, kind: &str, version: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            code: bounded(code)?,
            name: bounded(name)?,
            kind: bounded(kind)?,
            version: bounded(version)?,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Configuration for the connection manager: connection identity, topic set,
/// will settings, publish options, and the backoff intervals.
///
/// Built with the fallible `with_*` methods and then handed to
/// [`ConnectionManager::new`](crate::manager::ConnectionManager::new), which
/// fixes it for the life of the manager.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub(crate) client_id: String<MAX_FIELD_LEN>,
    pub(crate) username: String<MAX_FIELD_LEN>,
    pub(crate) password: String<MAX_FIELD_LEN>,
    pub(crate) host: String<MAX_TOPIC_LEN>,
    pub(crate) port: u16,
    pub(crate) publish_topic: String<MAX_TOPIC_LEN>,
    pub(crate) subscribe_topic: String<MAX_TOPIC_LEN>,
    pub(crate) will_topic: String<MAX_TOPIC_LEN>,
    pub(crate) will_qos: QoS,
    pub(crate) will_retain: bool,
    pub(crate) clean_session: bool,
    pub(crate) report_interval: Duration,
    pub(crate) max_retry_interval: Duration,
    pub(crate) retain: bool,
    pub(crate) qos: QoS,
    pub(crate) device: DeviceDescriptor,
}

impl ConnectionConfig {
    /// Create a configuration with the given client identifier and defaults:
    /// report interval 5 s, max retry interval 30 s, QoS at-least-once,
    /// retained status publishes, retained at-least-once will, clean session
    /// off.
    pub fn new(client_id: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: bounded(client_id)?,
            username: String::new(),
            password: String::new(),
            host: String::new(),
            port: 1883,
            publish_topic: String::new(),
            subscribe_topic: String::new(),
            will_topic: String::new(),
            will_qos: QoS::AtLeastOnce,
            will_retain: true,
            clean_session: false,
            report_interval: Duration::from_millis(5000),
            max_retry_interval: Duration::from_millis(30_000),
            retain: true,
            qos: QoS::AtLeastOnce,
            device: DeviceDescriptor::default(),
        })
    }

    /// Set the broker host and port.
    pub fn with_broker(mut self, host: &str, port: u16) -> Result<Self, ConfigError> {
        self.host = bounded(host)?;
        self.port = port;
        Ok(self)
    }

    /// Set the session credentials. Empty strings mean no authentication.
    pub fn with_credentials(mut self, username: &str, password: &str) -> Result<Self, ConfigError> {
        self.username = bounded(username)?;
        self.password = bounded(password)?;
        Ok(self)
    }

    /// Set the topic set: status out, commands in, and the will topic.
    pub fn with_topics(
        mut self,
        publish: &str,
        subscribe: &str,
        will: &str,
    ) -> Result<Self, ConfigError> {
        self.publish_topic = bounded(publish)?;
        self.subscribe_topic = bounded(subscribe)?;
        self.will_topic = bounded(will)?;
        Ok(self)
    }

    /// Override the will quality-of-service level and retain flag.
    pub fn with_will(mut self, qos: QoS, retain: bool) -> Self {
        self.will_qos = qos;
        self.will_retain = retain;
        self
    }

    /// Set the clean-session flag passed on connect.
    pub fn with_clean_session(mut self, clean_session: bool) -> Self {
        self.clean_session = clean_session;
        self
    }

    /// Set the base report interval, which is also the initial retry
    /// interval of the backoff sequence.
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Set the ceiling for the retry interval.
    pub fn with_max_retry_interval(mut self, interval: Duration) -> Self {
        self.max_retry_interval = interval;
        self
    }

    /// Override the quality-of-service level and retain flag for status
    /// publishes (the subscribe QoS follows the same level).
    pub fn with_publish_options(mut self, qos: QoS, retain: bool) -> Self {
        self.qos = qos;
        self.retain = retain;
        self
    }

    /// Attach the static device descriptor.
    pub fn with_device(mut self, device: DeviceDescriptor) -> Self {
        self.device = device;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_device_profile() {
        let config = ConnectionConfig::new("ts-001").unwrap();
        assert_eq!(config.client_id.as_str(), "ts-001");
        assert_eq!(config.report_interval, Duration::from_millis(5000));
        assert_eq!(config.max_retry_interval, Duration::from_millis(30_000));
        assert_eq!(config.qos, QoS::AtLeastOnce);
        assert!(config.retain);
        assert!(!config.clean_session);
        assert!(config.will_retain);
    }

    #[test]
    fn over_long_values_are_rejected_not_truncated() {
        let long = "x".repeat(MAX_FIELD_LEN + 1);
        assert!(matches!(
            ConnectionConfig::new(&long),
            Err(ConfigError::ValueTooLong)
        ));

        let config = ConnectionConfig::new("ts-001").unwrap();
        let long_topic = "t".repeat(MAX_TOPIC_LEN + 1);
        assert!(matches!(
            config.with_topics(&long_topic, "in", "will"),
            Err(ConfigError::ValueTooLong)
        ));
    }

    #[test]
    fn values_at_the_bound_are_accepted() {
        let exact = "x".repeat(MAX_FIELD_LEN);
        let config = ConnectionConfig::new(&exact).unwrap();
        assert_eq!(config.client_id.len(), MAX_FIELD_LEN);
    }

    #[test]
    fn builder_chain_assembles_all_fields() {
        let device = DeviceDescriptor::new("ts-001", "garden pump", "time-switch", "1").unwrap();
        let config = ConnectionConfig::new("ts-001")
            .unwrap()
            .with_broker("broker.local", 8883)
            .unwrap()
            .with_credentials("device", "secret")
            .unwrap()
            .with_topics(
                "home/devices/ts-001/state",
                "home/devices/ts-001/set",
                "home/devices/ts-001/state",
            )
            .unwrap()
            .with_clean_session(true)
            .with_publish_options(QoS::AtMostOnce, false)
            .with_device(device);

        assert_eq!(config.host.as_str(), "broker.local");
        assert_eq!(config.port, 8883);
        assert_eq!(config.subscribe_topic.as_str(), "home/devices/ts-001/set");
        assert!(config.clean_session);
        assert_eq!(config.qos, QoS::AtMostOnce);
        assert!(!config.retain);
        assert_eq!(config.device.code(), "ts-001");
    }
}
