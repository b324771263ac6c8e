//! Hogia Extended Position Message, from the TransitCloud Vehicle Interface Specification 1.9.
//!
//! All values are little endian. The message is a fixed 34 byte header followed by four
//! length-prefixed ASCII strings (see [`string_field`]):
//!
//! ```text
//!  offset  size  field
//!       0     1  message type, always 2
//!       1     1  priority, always 127 (reserved for future use)
//!       2     8  unit id, 0 if absent
//!      10     2  sequence number, 0 if absent
//!      12     4  milliseconds since UTC midnight
//!      16     4  latitude, f32 degrees
//!      20     4  longitude, f32 degrees
//!      24     2  speed, m/s * 100
//!      26     2  heading, degrees * 100, 0 <= value < 36000
//!      28     1  fix type (low nibble) and fix quality (high nibble)
//!      29     1  signals: power on, door released, stop requested, in service (2 bits each)
//!      30     4  distance, always 0
//!      34     -  vehicle ref, driver ref, task ref, account ref
//! ```
//!
//! Either the unit id or the vehicle ref must be provided for the message to be accepted by the
//! receiver. Senders normally leave the distance field empty.
use chrono::{DateTime, TimeZone, Timelike, Utc};
use tracing::{debug, trace};

use super::{
    string_field::{self, write_string, StringField},
    TelemMsg,
};
use crate::{
    config::EncoderConfig,
    sample::{FixQuality, PositionSample, TypeOfFix},
    HPResult,
};

pub const MESSAGE_TYPE: u8 = 0x02;

pub const PRIORITY: u8 = 127;

pub const HEADER_LEN: usize = 34;

const DISTANCE: u32 = 0;

/// Encode `sample` with the default [`EncoderConfig`].
pub fn encode(sample: &PositionSample) -> HPResult<Vec<u8>> {
    encode_with(sample, &EncoderConfig::default())
}

/// Encode `sample` as an extended position message.
///
/// Fails if an identifier string does not fit its length byte, or contains non-ASCII characters
/// under [`crate::config::NonAsciiPolicy::Reject`]. No bytes are returned on failure.
pub fn encode_with(sample: &PositionSample, config: &EncoderConfig) -> HPResult<Vec<u8>> {
    let strings = [
        (StringField::VehicleRef, sample.vehicle_ref.as_deref()),
        (StringField::DriverRef, sample.driver_ref.as_deref()),
        (StringField::TaskRef, sample.task_ref.as_deref()),
        (StringField::AccountRef, sample.account_ref.as_deref()),
    ];
    let capacity = HEADER_LEN
        + strings
            .iter()
            .map(|(_, value)| string_field::encoded_len(*value))
            .sum::<usize>();

    let mut out = Vec::with_capacity(capacity);
    out.push(MESSAGE_TYPE);
    out.push(PRIORITY);
    out.extend_from_slice(&sample.unit_id.unwrap_or(0).to_le_bytes());
    out.extend_from_slice(&sample.sequence_number.unwrap_or(0).to_le_bytes());
    out.extend_from_slice(&time_of_day_ms(&sample.timestamp).to_le_bytes());
    out.extend_from_slice(&sample.latitude.to_le_bytes());
    out.extend_from_slice(&sample.longitude.to_le_bytes());
    out.extend_from_slice(&speed_field(sample.speed).to_le_bytes());
    out.extend_from_slice(&heading_field(sample.heading).to_le_bytes());
    out.push(fix_byte(sample.fix_type, sample.fix_quality));
    out.push(sample.signals.to_byte());
    out.extend_from_slice(&DISTANCE.to_le_bytes());
    debug_assert_eq!(out.len(), HEADER_LEN);

    for (field, value) in strings {
        write_string(&mut out, field, value, config.non_ascii)?;
    }

    if !is_identified(sample) {
        debug!("position message has neither unit id nor vehicle ref");
    }
    trace!("encoded {} byte position message: {:02x?}", out.len(), out);
    Ok(out)
}

/// Whether the receiver can tell which vehicle sent `sample`, judged on the encoded values: a
/// non-zero unit id or a non-blank vehicle ref.
fn is_identified(sample: &PositionSample) -> bool {
    sample.unit_id.unwrap_or(0) != 0 || !string_field::is_blank(sample.vehicle_ref.as_deref())
}

/// Milliseconds since midnight, UTC.
pub fn time_of_day_ms<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> u32 {
    let time = timestamp.naive_utc().time();
    // nanosecond() runs past 1e9 during a leap second, which lands in the last second of the day
    time.num_seconds_from_midnight() * 1000 + time.nanosecond() / 1_000_000
}

/// Speed in m/s * 100. Truncates toward zero; negative or NaN input is 0 and anything above
/// 655.35 m/s saturates.
pub fn speed_field(speed_mps: f32) -> u16 {
    (speed_mps * 100.0) as u16
}

/// Heading in degrees * 100, wrapped after scaling so 360 encodes as 0. Truncates toward zero
/// like [`speed_field`].
pub fn heading_field(heading_deg: f32) -> u16 {
    ((heading_deg * 100.0) % 36000.0) as u16
}

pub fn fix_byte(fix_type: TypeOfFix, fix_quality: FixQuality) -> u8 {
    fix_type as u8 + fix_quality as u8 * 16
}

impl TelemMsg for PositionSample {
    fn from_coords(lat: f32, lon: f32) -> Self {
        PositionSample::new(Utc::now().fixed_offset(), lat, lon)
    }

    fn with_agent_id(self, agent_id: &str) -> Self {
        self.with_vehicle_ref(agent_id)
    }

    fn to_bytes(&self) -> HPResult<Vec<u8>> {
        encode(self)
    }
}
