//! # Packet Structures
//!
//! Typed representations of the DSU header and the payload of each
//! message variant, in both directions. The set of message kinds is a
//! closed sum (`MessageType` plus these structs) so dispatch can match
//! exhaustively; encode/decode live in [`super::encoder`] and
//! [`super::decoder`].

use super::protocol::{
    BatteryLevel, ConnectionType, DeviceModel, MacAddress, MessageType, RegistrationType,
    SlotState,
};

/// Frame header, present at the start of every frame in both directions.
///
/// `payload_length` counts the bytes following the fixed 20-byte leading
/// portion. `crc32` is computed over the whole frame with the field
/// itself zeroed, and must be stamped last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// `"DSUC"` on client frames, `"DSUS"` on server frames
    pub magic: [u8; 4],
    /// Protocol version of the sender
    pub protocol_version: u16,
    /// Bytes following the fixed header portion
    pub payload_length: u16,
    /// CRC-32 over the whole frame, field zeroed during computation
    pub crc32: u32,
    /// Random per-process identifier of the sender
    pub sender_id: u32,
    /// Message variant carried after the header
    pub message_type: MessageType,
}

/// Fixed 11-byte descriptor of one virtual controller slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerResponseHead {
    /// Slot index being reported
    pub reporting_slot: u8,
    /// Connection state of the slot
    pub slot_state: SlotState,
    /// Motion capability of the device
    pub device_model: DeviceModel,
    /// Physical connection of the device
    pub connection_type: ConnectionType,
    /// Hardware identifier (or a stand-in when none exists)
    pub mac_address: MacAddress,
    /// Current battery level
    pub battery_level: BatteryLevel,
}

/// One touch point within a ControllerData report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchPoint {
    /// Whether the point is currently pressed
    pub active: bool,
    /// Identifier distinguishing concurrent touches
    pub id: u8,
    /// Horizontal position
    pub x: u16,
    /// Vertical position
    pub y: u16,
}

/// Analog stick position, one byte per axis (0x80 is center)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StickPosition {
    pub x: u8,
    pub y: u8,
}

/// Synthesized per-direction analog values for the dpad.
///
/// Each byte is 255 if the matching bit is set in button mask 1, else 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalogDpad {
    pub left: u8,
    pub down: u8,
    pub right: u8,
    pub up: u8,
}

/// Synthesized per-button analog values for the face buttons.
///
/// Each byte is 255 if the matching bit is set in button mask 2, else 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalogFace {
    pub y: u8,
    pub b: u8,
    pub a: u8,
    pub x: u8,
}

/// Left/right analog pair for bumpers or triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalogPair {
    pub left: u8,
    pub right: u8,
}

/// Accelerometer reading in g
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Accelerometer {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Gyroscope reading in degrees per second
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Gyroscope {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// ControllerData response payload: the full 80-byte input report
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerData {
    /// Slot descriptor this report belongs to
    pub head: ControllerResponseHead,
    /// Whether the controller is attached
    pub connected: bool,
    /// Per-client sequence number, incremented once per response sent
    pub packet_number: u32,
    /// Dpad, options/share, and stick-click bits
    pub button_mask_1: u8,
    /// Face button, shoulder, and trigger bits
    pub button_mask_2: u8,
    /// Home/PS button
    pub home_button: bool,
    /// Touchpad click
    pub touch_button: bool,
    /// Left analog stick
    pub left_stick: StickPosition,
    /// Right analog stick
    pub right_stick: StickPosition,
    /// Derived dpad analog bytes
    pub analog_dpad: AnalogDpad,
    /// Derived face-button analog bytes
    pub analog_face: AnalogFace,
    /// Derived bumper (R1/L1) analog bytes
    pub analog_bumper: AnalogPair,
    /// Derived trigger (R2/L2) analog bytes
    pub analog_trigger: AnalogPair,
    /// First touch point
    pub first_touch: TouchPoint,
    /// Second touch point
    pub second_touch: TouchPoint,
    /// Motion sample timestamp in microseconds
    pub motion_timestamp_us: u64,
    /// Accelerometer sample
    pub accelerometer: Accelerometer,
    /// Gyroscope sample
    pub gyroscope: Gyroscope,
}

/// Inbound ControllerInfo request payload: the slots the client asks about
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerInfoRequest {
    /// Slot indices the client wants reported
    pub ports: Vec<u8>,
}

/// Inbound ControllerData request payload: how the client registers for
/// input reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerDataRequest {
    /// Subscription filter kind
    pub registration: RegistrationType,
    /// Slot filter, meaningful for slot-based registration
    pub reporting_slot: u8,
    /// MAC filter, meaningful for MAC-based registration
    pub mac_address: MacAddress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_head_defaults_to_disconnected() {
        let head = ControllerResponseHead::default();
        assert_eq!(head.slot_state, SlotState::Disconnected);
        assert_eq!(head.battery_level, BatteryLevel::NotApplicable);
        assert_eq!(head.mac_address.as_bytes(), &[0; 6]);
    }

    #[test]
    fn test_controller_data_defaults_are_neutral() {
        let data = ControllerData::default();
        assert!(!data.connected);
        assert_eq!(data.packet_number, 0);
        assert_eq!(data.button_mask_1, 0);
        assert_eq!(data.button_mask_2, 0);
        assert!(!data.first_touch.active);
        assert_eq!(data.accelerometer, Accelerometer::default());
    }

    #[test]
    fn test_data_request_default_subscribes_all() {
        let req = ControllerDataRequest::default();
        assert_eq!(req.registration, RegistrationType::SubscribeAll);
    }
}
