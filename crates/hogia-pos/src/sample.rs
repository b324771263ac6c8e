//! Position sample model: one report from a vehicle, as handed to a protocol encoder.
use chrono::{DateTime, FixedOffset};

//  _____
// |_   _|   _ _ __   ___  ___
//   | || | | | '_ \ / _ \/ __|
//   | || |_| | |_) |  __/\__ \
//   |_| \__, | .__/ \___||___/
//       |___/|_|

/// Positioning method used to obtain the fix. Encoded in the low nibble of the fix byte.
///
/// Value 9 is not assigned by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TypeOfFix {
    #[default]
    InvalidFix = 0,
    Fix = 1,
    DifferentialFix = 2,
    PpsFix = 3,
    RealTimeKinematicFix = 4,
    FloatRealTimeKinematicFix = 5,
    EstimatedFix = 6,
    ManualFix = 7,
    SimulatedFix = 8,
    WiFi = 10,
    HandsetFingerprinting = 11,
    HandsetCellIdentification = 12,
    CellularNetworkForwardLink = 13,
    CellularNetworkTriangulation = 14,
    Other = 15,
}

/// Accuracy bucket of the reported position. Encoded in the high nibble of the fix byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum FixQuality {
    #[default]
    Undefined = 0,
    Within1Meter = 1,
    Within2Meters = 2,
    Within5Meters = 3,
    Within10Meters = 4,
    Within20Meters = 5,
    Within50Meters = 6,
    Within100Meters = 7,
    Within200Meters = 8,
    Within500Meters = 9,
    Within1000Meters = 10,
    Within2000Meters = 11,
    Within5000Meters = 12,
    Over5000Meters = 13,
}

/// Two bit status of a vehicle subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Signal {
    #[default]
    Undefined = 0b00,
    Error = 0b01,
    Off = 0b10,
    On = 0b11,
}

impl Signal {
    pub const ALL: [Signal; 4] = [Signal::Undefined, Signal::Error, Signal::Off, Signal::On];

    /// Decode the two lowest bits of `bits`; higher bits are ignored.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Signal::Undefined,
            0b01 => Signal::Error,
            0b10 => Signal::Off,
            _ => Signal::On,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}

impl From<bool> for Signal {
    fn from(on: bool) -> Self {
        if on {
            Signal::On
        } else {
            Signal::Off
        }
    }
}

/// The four status signals carried in one byte of the position message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signals {
    pub power_on: Signal,
    pub door_released: Signal,
    pub stop_requested: Signal,
    pub in_service: Signal,
}

impl Signals {
    pub fn new(
        power_on: Signal,
        door_released: Signal,
        stop_requested: Signal,
        in_service: Signal,
    ) -> Self {
        Self {
            power_on,
            door_released,
            stop_requested,
            in_service,
        }
    }

    /// Pack as `power_on + door_released * 4 + stop_requested * 16 + in_service * 64`.
    pub fn to_byte(self) -> u8 {
        self.power_on.bits()
            | (self.door_released.bits() << 2)
            | (self.stop_requested.bits() << 4)
            | (self.in_service.bits() << 6)
    }

    pub fn from_byte(byte: u8) -> Self {
        Self {
            power_on: Signal::from_bits(byte),
            door_released: Signal::from_bits(byte >> 2),
            stop_requested: Signal::from_bits(byte >> 4),
            in_service: Signal::from_bits(byte >> 6),
        }
    }
}

/// One position report.
///
/// Identifiers are optional here and only collapse to the protocol's `0` / empty-string
/// sentinels when encoded, so "not supplied" stays distinguishable from "supplied as zero".
/// The protocol expects either `unit_id` or `vehicle_ref` to be set; that is left to the
/// caller.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSample {
    /// Only the UTC time of day is sent.
    pub timestamp: DateTime<FixedOffset>,
    /// Degrees. `(0, 0)` is treated as an invalid position by receivers.
    pub latitude: f32,
    pub longitude: f32,
    /// Meters per second.
    pub speed: f32,
    /// Degrees, `0 <= heading < 360`.
    pub heading: f32,
    pub fix_type: TypeOfFix,
    pub fix_quality: FixQuality,
    pub vehicle_ref: Option<String>,
    pub driver_ref: Option<String>,
    pub task_ref: Option<String>,
    pub account_ref: Option<String>,
    pub unit_id: Option<u64>,
    pub sequence_number: Option<u16>,
    pub signals: Signals,
}

impl PositionSample {
    pub fn new(timestamp: DateTime<FixedOffset>, latitude: f32, longitude: f32) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            speed: 0.0,
            heading: 0.0,
            fix_type: TypeOfFix::default(),
            fix_quality: FixQuality::default(),
            vehicle_ref: None,
            driver_ref: None,
            task_ref: None,
            account_ref: None,
            unit_id: None,
            sequence_number: None,
            signals: Signals::default(),
        }
    }

    pub fn with_motion(mut self, speed_mps: f32, heading_deg: f32) -> Self {
        self.speed = speed_mps;
        self.heading = heading_deg;
        self
    }

    pub fn with_fix(mut self, fix_type: TypeOfFix, fix_quality: FixQuality) -> Self {
        self.fix_type = fix_type;
        self.fix_quality = fix_quality;
        self
    }

    pub fn with_vehicle_ref(mut self, vehicle_ref: impl Into<String>) -> Self {
        self.vehicle_ref = Some(vehicle_ref.into());
        self
    }

    pub fn with_driver_ref(mut self, driver_ref: impl Into<String>) -> Self {
        self.driver_ref = Some(driver_ref.into());
        self
    }

    pub fn with_task_ref(mut self, task_ref: impl Into<String>) -> Self {
        self.task_ref = Some(task_ref.into());
        self
    }

    pub fn with_account_ref(mut self, account_ref: impl Into<String>) -> Self {
        self.account_ref = Some(account_ref.into());
        self
    }

    pub fn with_unit_id(mut self, unit_id: u64) -> Self {
        self.unit_id = Some(unit_id);
        self
    }

    pub fn with_sequence_number(mut self, sequence_number: u16) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    pub fn with_signals(mut self, signals: Signals) -> Self {
        self.signals = signals;
        self
    }
}
