//! Hook protocol spoken with the test engine.
//!
//! Newline-delimited JSON over TCP. The engine connects, sends one
//! [`HookMessage`](contract_hooks_types::HookMessage) per lifecycle event and
//! waits for the same envelope to come back before continuing.

mod codec;
mod server;


pub use codec::{decode_message, encode_message, MessageReader, MAX_FRAME_BYTES, MESSAGE_DELIMITER};
pub use server::{handle_connection, HookServer};
