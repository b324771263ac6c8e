pub mod extended_position;
pub mod string_field;

use crate::HPResult;

/// Longest identifier string, in ASCII bytes, that fits the one byte length prefix.
pub const MAX_STRING_LEN: usize = u8::MAX as usize;

/// Trait implemented by protocols for generating telemetry messages.
pub trait TelemMsg {
    fn from_coords(lat: f32, lon: f32) -> Self;
    fn with_agent_id(self, agent_id: &str) -> Self;
    fn to_bytes(&self) -> HPResult<Vec<u8>>;
}
