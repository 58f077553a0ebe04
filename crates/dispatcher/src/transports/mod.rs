//! Transport implementations
//!
//! Contains NetworkTransport and LogTransport.

mod log;
mod network;

pub use self::log::LogTransport;
pub use self::network::{NetworkTransport, NetworkTransportConfig};
