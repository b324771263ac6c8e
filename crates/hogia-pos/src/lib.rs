//! Vehicle position telemetry encoding library.
//!
//! A [`sample::PositionSample`] describes one position report from a vehicle. *Protocols*
//! turn samples into wire messages by implementing [`protocol::TelemMsg`]; the Hogia Extended
//! Position Message lives in [`protocol::extended_position`].
use std::sync::Once;

use thiserror::Error;

pub mod config;
pub mod protocol;
pub mod sample;

pub use protocol::string_field::StringField;

/// Result type for this library
pub type HPResult<T> = std::result::Result<T, Error>;

/// Error type for this library
#[derive(Debug, Error)]
pub enum Error {
    #[error("{field} is {len} bytes when ASCII encoded, max {max}", max = protocol::MAX_STRING_LEN)]
    FieldTooLong { field: StringField, len: usize },
    #[error("{field} has non-ASCII character {ch:?} at char {index}")]
    NonAscii {
        field: StringField,
        ch: char,
        index: usize,
    },
}

/// Test binary helper to init tracing. This is usually the responsibility of the consumer of the
/// library crate.
pub fn lazy_init_tracing() {
    {
        static INIT: Once = Once::new();
        &INIT
    }
    .call_once(|| {
        tracing_subscriber::fmt::init();
    });
}
