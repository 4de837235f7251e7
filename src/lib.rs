//! # MQTT Time-Switch Core for Embedded Systems
//!
//! `timeswitch` is a `no_std` compatible device core that keeps a persistent
//! connection to a publish/subscribe broker, reports device state, and drives
//! a countdown-timer/relay peripheral from remote commands.
//!
//! ## Core Features
//!
//! - **`no_std` & `no_alloc`:** Designed to run on bare-metal
//!   microcontrollers. Configuration fields and message copies use `heapless`
//!   fixed-capacity buffers with documented bounds.
//! - **Tick-driven & non-blocking:** There is no async machinery and no
//!   preemptive concurrency. The scheduling loop calls into the manager once
//!   per tick and every operation runs to completion on the calling thread.
//! - **Session agnostic:** The [`BrokerSession`](session::BrokerSession)
//!   trait abstracts the underlying MQTT session library (socket I/O,
//!   keep-alive, subscription mechanics), so the core runs over any stack and
//!   tests run against a recording substitute.
//! - **Self-healing:** Connection loss is handled by an exponential-backoff
//!   reconnect state machine with a hard interval ceiling. There are no fatal
//!   errors; the core is built to run unattended indefinitely.
//!
//! ## Architecture
//!
//! Leaf peripherals first: [`DigitalOutput`] is a polarity-aware binary
//! signal (the "still connecting" indicator), and [`CountdownTimer`] is a
//! countdown advanced by an external periodic driver. The
//! [`ConnectionManager`] owns the broker session and its configuration,
//! borrows the two peripherals, and maps inbound commands
//! (`{"data":{"status":"ON","time":{"min":3,"sec":30}}}`) onto the countdown,
//! re-publishing a status snapshot (`{"status":"ON","time":210}`) after every
//! accepted command.
//!
//! ```ignore
//! use timeswitch::{ConnectionConfig, ConnectionManager, CountdownTimer, DigitalOutput, Shared};
//!
//! let config = ConnectionConfig::new("ts-001")?
//!     .with_broker("broker.local", 1883)?
//!     .with_credentials("device", "secret")?
//!     .with_topics(
//!         "home/devices/ts-001/state",
//!         "home/devices/ts-001/set",
//!         "home/devices/ts-001/state",
//!     )?;
//!
//! static LIGHT: Shared<DigitalOutput<Pin>> = Shared::new(RefCell::new(light));
//! static TIMER: Shared<CountdownTimer> = Shared::new(RefCell::new(CountdownTimer::new()));
//!
//! let mut manager = ConnectionManager::new(session, config, &LIGHT, &TIMER);
//! manager.begin();
//!
//! loop {
//!     let now = Instant::now();
//!     manager.keep_connected(now);
//!     manager.handle();
//!     if TIMER.lock(|t| t.borrow_mut().tick(elapsed)) {
//!         manager.emit_current_state();
//!     }
//!     // ... sleep until the next scheduler tick
//! }
//! ```
//!
//! ## Diagnostics
//!
//! Enable the `defmt` or `log` feature for structured diagnostics. Logging is
//! never load-bearing: dropped messages and failed connection attempts are
//! observable only through these hooks and the indicator output.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod error;
pub mod manager;
pub mod output;
pub mod payload;
pub mod session;
#[cfg(test)]
mod testutil;
pub mod timer;

// Re-export key types for easier access at the crate root.
pub use error::{CodecError, ConfigError};
pub use manager::{ConnectionConfig, ConnectionManager, DeviceDescriptor, Shared};
pub use output::DigitalOutput;
pub use payload::SwitchStatus;
pub use session::QoS;
pub use timer::{Countdown, CountdownTimer, TimerStatus};
