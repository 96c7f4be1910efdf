//! Live log stream: a reconnecting WebSocket feed of backend log events.

mod client;
pub mod machine;

pub use client::{LogStream, StreamUpdate};
pub use machine::{ConnectionMachine, ConnectionState, TransportEffect, TransportInput};
