//! # DSU Protocol Constants and Types
//!
//! Core protocol definitions for DSU (cemuhook) communication.

/// Magic string on frames originated by clients
pub const MAGIC_CLIENT: [u8; 4] = *b"DSUC";

/// Magic string on frames originated by this server
pub const MAGIC_SERVER: [u8; 4] = *b"DSUS";

/// Protocol version this server reports and accepts
pub const PROTOCOL_VERSION: u16 = 1001;

/// Fixed leading portion of every frame: magic(4) + version(2) + length(2)
/// + crc32(4) + sender_id(4) + message_type(4)
///
/// The `payload_length` header field counts bytes following this portion.
pub const HEADER_SIZE: usize = 20;

/// Offset of the payload_length field within the header
pub const LENGTH_OFFSET: usize = 6;

/// Offset of the crc32 field within the header
pub const CRC_OFFSET: usize = 8;

/// ProtocolVersion response payload size (u16 max version)
pub const VERSION_PAYLOAD_SIZE: usize = 2;

/// Per-slot descriptor size: slot + state + model + connection + mac(6) + battery
pub const RESPONSE_HEAD_SIZE: usize = 11;

/// ControllerInfo response payload size (descriptor + trailing zero byte)
pub const CONTROLLER_INFO_PAYLOAD_SIZE: usize = 12;

/// ControllerData response payload size
pub const CONTROLLER_DATA_PAYLOAD_SIZE: usize = 80;

/// Message types carried in the header.
///
/// Values are shared between requests and responses; direction is told
/// apart by the magic string. Anything outside this set is dropped
/// without a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageType {
    /// Version handshake request/response
    ProtocolVersion = 0x10_0000,
    /// Slot/port information request/response
    ControllerInfo = 0x10_0001,
    /// Streamed input report request/response
    ControllerData = 0x10_0002,
}

impl MessageType {
    /// Parse a wire value into a known message type
    pub fn from_wire(value: u32) -> Option<Self> {
        match value {
            0x10_0000 => Some(MessageType::ProtocolVersion),
            0x10_0001 => Some(MessageType::ControllerInfo),
            0x10_0002 => Some(MessageType::ControllerData),
            _ => None,
        }
    }

    /// Wire representation of this message type
    pub fn to_wire(self) -> u32 {
        self as u32
    }
}

/// Connection state of a reported slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SlotState {
    /// No controller attached to the slot
    #[default]
    Disconnected = 0,
    /// Slot reserved but not currently active
    Reserved = 1,
    /// Controller attached and reporting
    Connected = 2,
}

impl SlotState {
    /// Parse a wire byte, mapping unknown values to `Disconnected`
    pub fn from_wire(value: u8) -> Self {
        match value {
            1 => SlotState::Reserved,
            2 => SlotState::Connected,
            _ => SlotState::Disconnected,
        }
    }
}

/// Motion capability of the reported device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DeviceModel {
    /// Capability not reported
    #[default]
    NotApplicable = 0,
    /// Partial motion sensing (no full gyroscope)
    NonFullGyro = 1,
    /// Full accelerometer + gyroscope
    FullGyro = 2,
}

impl DeviceModel {
    /// Parse a wire byte, mapping unknown values to `NotApplicable`
    pub fn from_wire(value: u8) -> Self {
        match value {
            1 => DeviceModel::NonFullGyro,
            2 => DeviceModel::FullGyro,
            _ => DeviceModel::NotApplicable,
        }
    }
}

/// Physical connection of the reported device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ConnectionType {
    /// Connection not reported
    #[default]
    NotApplicable = 0,
    /// Wired USB
    Usb = 1,
    /// Bluetooth
    Bluetooth = 2,
}

impl ConnectionType {
    /// Parse a wire byte, mapping unknown values to `NotApplicable`
    pub fn from_wire(value: u8) -> Self {
        match value {
            1 => ConnectionType::Usb,
            2 => ConnectionType::Bluetooth,
            _ => ConnectionType::NotApplicable,
        }
    }
}

/// Battery level of the reported device.
///
/// Ordinal levels occupy 0x00-0x05; charging states use the two special
/// high values from the reference protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BatteryLevel {
    /// No battery information available
    #[default]
    NotApplicable = 0x00,
    /// Nearly empty
    Dying = 0x01,
    /// Low charge
    Low = 0x02,
    /// Medium charge
    Medium = 0x03,
    /// High charge
    High = 0x04,
    /// Fully charged
    Full = 0x05,
    /// Plugged in and charging
    Charging = 0xEE,
    /// Plugged in and fully charged
    Charged = 0xEF,
}

impl BatteryLevel {
    /// Parse a wire byte into a battery level, mapping unknown values to
    /// `NotApplicable`
    pub fn from_wire(value: u8) -> Self {
        match value {
            0x01 => BatteryLevel::Dying,
            0x02 => BatteryLevel::Low,
            0x03 => BatteryLevel::Medium,
            0x04 => BatteryLevel::High,
            0x05 => BatteryLevel::Full,
            0xEE => BatteryLevel::Charging,
            0xEF => BatteryLevel::Charged,
            _ => BatteryLevel::NotApplicable,
        }
    }
}

/// How a client asked to be registered for input reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum RegistrationType {
    /// Report every slot
    #[default]
    SubscribeAll = 0x0,
    /// Report only the named slot
    SlotBased = 0x1,
    /// Report only the controller with the named MAC
    MacBased = 0x2,
}

impl RegistrationType {
    /// Parse a wire byte, mapping unknown values to `SubscribeAll`
    pub fn from_wire(value: u8) -> Self {
        match value {
            0x1 => RegistrationType::SlotBased,
            0x2 => RegistrationType::MacBased,
            _ => RegistrationType::SubscribeAll,
        }
    }
}

/// Button group 1 bit assignments: dpad, options/share, stick clicks
pub mod button_group_1 {
    pub const DPAD_LEFT: u8 = 1 << 0;
    pub const DPAD_DOWN: u8 = 1 << 1;
    pub const DPAD_RIGHT: u8 = 1 << 2;
    pub const DPAD_UP: u8 = 1 << 3;
    pub const OPTIONS: u8 = 1 << 4;
    pub const R3: u8 = 1 << 5;
    pub const L3: u8 = 1 << 6;
    pub const SHARE: u8 = 1 << 7;
}

/// Button group 2 bit assignments: face buttons, shoulders, triggers
pub mod button_group_2 {
    pub const Y: u8 = 1 << 0;
    pub const B: u8 = 1 << 1;
    pub const A: u8 = 1 << 2;
    pub const X: u8 = 1 << 3;
    pub const R1: u8 = 1 << 4;
    pub const L1: u8 = 1 << 5;
    pub const R2: u8 = 1 << 6;
    pub const L2: u8 = 1 << 7;
}

/// Fixed 6-byte hardware identifier reported per slot.
///
/// Used both as a stand-in device id when no real hardware address is
/// available and as the filter in MAC-based registration requests. The
/// bytes cross the wire verbatim; `reverse()` flips byte order in place
/// for producers whose native representation is reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Construct from raw bytes
    pub fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Construct from the low 48 bits of an integer (little-endian byte order)
    pub fn from_u48(value: u64) -> Self {
        let le = value.to_le_bytes();
        Self([le[0], le[1], le[2], le[3], le[4], le[5]])
    }

    /// Construct from a (32-bit, 16-bit) pair, each in little-endian byte order
    pub fn from_parts(high: u32, low: u16) -> Self {
        let h = high.to_le_bytes();
        let l = low.to_le_bytes();
        Self([h[0], h[1], h[2], h[3], l[0], l[1]])
    }

    /// Reverse the byte order in place
    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    /// Raw bytes as they appear on the wire
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}
