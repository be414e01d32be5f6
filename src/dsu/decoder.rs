//! # DSU Frame Decoder
//!
//! Parses headers and payloads out of received datagrams.
//!
//! Decoding mirrors the encoder field-for-field. Trailing bytes beyond a
//! recognized payload are ignored — one datagram carries exactly one
//! logical frame in this protocol, never a second message.

use super::cursor::Reader;
use super::packet::{
    Accelerometer, AnalogDpad, AnalogFace, AnalogPair, ControllerData, ControllerDataRequest,
    ControllerInfoRequest, ControllerResponseHead, Gyroscope, Header, StickPosition, TouchPoint,
};
use super::protocol::{
    BatteryLevel, ConnectionType, DeviceModel, MacAddress, MessageType, RegistrationType,
    SlotState, MAGIC_CLIENT, MAGIC_SERVER,
};
use crate::error::{DsuServerError, Result};

/// Decode a frame header from the start of a datagram.
///
/// # Errors
///
/// - `TruncatedFrame` if fewer than 20 bytes are available
/// - `InvalidMagic` if the frame starts with neither `"DSUC"` nor `"DSUS"`
/// - `UnknownMessageType` if the type field is outside the known set;
///   the caller must drop the datagram without responding
pub fn decode_header(reader: &mut Reader<'_>) -> Result<Header> {
    let mut magic = [0u8; 4];
    reader.get_bytes(&mut magic)?;
    if magic != MAGIC_CLIENT && magic != MAGIC_SERVER {
        return Err(DsuServerError::InvalidMagic(magic));
    }

    let protocol_version = reader.get_u16()?;
    let payload_length = reader.get_u16()?;
    let crc32 = reader.get_u32()?;
    let sender_id = reader.get_u32()?;
    let raw_type = reader.get_u32()?;
    let message_type =
        MessageType::from_wire(raw_type).ok_or(DsuServerError::UnknownMessageType(raw_type))?;

    Ok(Header {
        magic,
        protocol_version,
        payload_length,
        crc32,
        sender_id,
        message_type,
    })
}

/// Decode an inbound ControllerInfo request payload: a slot count
/// followed by that many slot indices
pub fn decode_controller_info_request(reader: &mut Reader<'_>) -> Result<ControllerInfoRequest> {
    let count = reader.get_i32()?;
    // A hostile count must not drive allocation past the datagram itself
    if count < 0 || count as usize > reader.remaining() {
        return Err(DsuServerError::TruncatedFrame {
            offset: reader.position(),
            needed: count.max(0) as usize,
            available: reader.remaining(),
        });
    }
    let mut ports = vec![0u8; count as usize];
    reader.get_bytes(&mut ports)?;
    Ok(ControllerInfoRequest { ports })
}

/// Decode an inbound ControllerData request payload: the registration
/// filter a client subscribes with
pub fn decode_controller_data_request(reader: &mut Reader<'_>) -> Result<ControllerDataRequest> {
    let registration = RegistrationType::from_wire(reader.get_u8()?);
    let reporting_slot = reader.get_u8()?;
    let mut mac = [0u8; 6];
    reader.get_bytes(&mut mac)?;
    Ok(ControllerDataRequest {
        registration,
        reporting_slot,
        mac_address: MacAddress::from_bytes(mac),
    })
}

/// Decode a ProtocolVersion response payload
pub fn decode_version_response(reader: &mut Reader<'_>) -> Result<u16> {
    reader.get_u16()
}

/// Decode an 11-byte slot descriptor
pub fn decode_response_head(reader: &mut Reader<'_>) -> Result<ControllerResponseHead> {
    let reporting_slot = reader.get_u8()?;
    let slot_state = SlotState::from_wire(reader.get_u8()?);
    let device_model = DeviceModel::from_wire(reader.get_u8()?);
    let connection_type = ConnectionType::from_wire(reader.get_u8()?);
    let mut mac = [0u8; 6];
    reader.get_bytes(&mut mac)?;
    let battery_level = BatteryLevel::from_wire(reader.get_u8()?);

    Ok(ControllerResponseHead {
        reporting_slot,
        slot_state,
        device_model,
        connection_type,
        mac_address: MacAddress::from_bytes(mac),
        battery_level,
    })
}

/// Decode a ControllerInfo response payload (descriptor + trailing zero)
pub fn decode_controller_info_response(
    reader: &mut Reader<'_>,
) -> Result<ControllerResponseHead> {
    let head = decode_response_head(reader)?;
    let _tail = reader.get_u8()?;
    Ok(head)
}

/// Decode a full ControllerData response payload
pub fn decode_controller_data_response(reader: &mut Reader<'_>) -> Result<ControllerData> {
    let head = decode_response_head(reader)?;
    let connected = reader.get_u8()? != 0;
    let packet_number = reader.get_u32()?;
    let button_mask_1 = reader.get_u8()?;
    let button_mask_2 = reader.get_u8()?;
    let home_button = reader.get_u8()? != 0;
    let touch_button = reader.get_u8()? != 0;
    let left_stick = StickPosition {
        x: reader.get_u8()?,
        y: reader.get_u8()?,
    };
    let right_stick = StickPosition {
        x: reader.get_u8()?,
        y: reader.get_u8()?,
    };
    let analog_dpad = AnalogDpad {
        left: reader.get_u8()?,
        down: reader.get_u8()?,
        right: reader.get_u8()?,
        up: reader.get_u8()?,
    };
    let analog_face = AnalogFace {
        y: reader.get_u8()?,
        b: reader.get_u8()?,
        a: reader.get_u8()?,
        x: reader.get_u8()?,
    };
    let analog_bumper = AnalogPair {
        left: reader.get_u8()?,
        right: reader.get_u8()?,
    };
    let analog_trigger = AnalogPair {
        left: reader.get_u8()?,
        right: reader.get_u8()?,
    };
    let first_touch = decode_touch_point(reader)?;
    let second_touch = decode_touch_point(reader)?;
    let motion_timestamp_us = reader.get_u64()?;
    let accelerometer = Accelerometer {
        x: reader.get_f32()?,
        y: reader.get_f32()?,
        z: reader.get_f32()?,
    };
    let gyroscope = Gyroscope {
        pitch: reader.get_f32()?,
        yaw: reader.get_f32()?,
        roll: reader.get_f32()?,
    };

    Ok(ControllerData {
        head,
        connected,
        packet_number,
        button_mask_1,
        button_mask_2,
        home_button,
        touch_button,
        left_stick,
        right_stick,
        analog_dpad,
        analog_face,
        analog_bumper,
        analog_trigger,
        first_touch,
        second_touch,
        motion_timestamp_us,
        accelerometer,
        gyroscope,
    })
}

fn decode_touch_point(reader: &mut Reader<'_>) -> Result<TouchPoint> {
    let active = reader.get_u8()? != 0;
    let id = reader.get_u8()?;
    let x = reader.get_u16()?;
    let y = reader.get_u16()?;
    Ok(TouchPoint { active, id, x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsu::encoder::{
        encode_controller_data_response, encode_controller_info_response, encode_version_response,
    };
    use crate::dsu::protocol::{HEADER_SIZE, PROTOCOL_VERSION};

    fn client_request_frame(message_type: u32, payload: &[u8]) -> Vec<u8> {
        let mut frame = Vec::new();
        frame.extend_from_slice(b"DSUC");
        frame.extend_from_slice(&PROTOCOL_VERSION.to_le_bytes());
        frame.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        frame.extend_from_slice(&[0u8; 4]);
        frame.extend_from_slice(&0x1234u32.to_le_bytes());
        frame.extend_from_slice(&message_type.to_le_bytes());
        frame.extend_from_slice(payload);
        crate::dsu::crc::stamp_frame(&mut frame).unwrap();
        frame
    }

    #[test]
    fn test_decode_client_header() {
        let frame = client_request_frame(0x10_0000, &[]);
        let mut reader = Reader::new(&frame);
        let header = decode_header(&mut reader).unwrap();

        assert_eq!(header.magic, *b"DSUC");
        assert_eq!(header.protocol_version, 1001);
        assert_eq!(header.payload_length, 0);
        assert_eq!(header.sender_id, 0x1234);
        assert_eq!(header.message_type, MessageType::ProtocolVersion);
        assert_eq!(reader.position(), HEADER_SIZE);
    }

    #[test]
    fn test_decode_header_truncated() {
        let frame = client_request_frame(0x10_0000, &[]);
        let mut reader = Reader::new(&frame[..10]);
        assert!(matches!(
            decode_header(&mut reader),
            Err(DsuServerError::TruncatedFrame { .. })
        ));
    }

    #[test]
    fn test_decode_header_bad_magic() {
        let mut frame = client_request_frame(0x10_0000, &[]);
        frame[0..4].copy_from_slice(b"NOPE");
        let mut reader = Reader::new(&frame);
        assert!(matches!(
            decode_header(&mut reader),
            Err(DsuServerError::InvalidMagic(_))
        ));
    }

    #[test]
    fn test_decode_header_unknown_message_type() {
        let frame = client_request_frame(0xFFFF_FFFF, &[]);
        let mut reader = Reader::new(&frame);
        assert!(matches!(
            decode_header(&mut reader),
            Err(DsuServerError::UnknownMessageType(0xFFFF_FFFF))
        ));
    }

    #[test]
    fn test_version_response_round_trip() {
        let mut buf = [0u8; 64];
        let len = encode_version_response(&mut buf, 9).unwrap();

        let mut reader = Reader::new(&buf[..len]);
        let header = decode_header(&mut reader).unwrap();
        assert_eq!(header.magic, *b"DSUS");
        assert_eq!(header.message_type, MessageType::ProtocolVersion);

        let version = decode_version_response(&mut reader).unwrap();
        assert_eq!(version, 1001);
    }

    #[test]
    fn test_controller_info_round_trip_boundary_values() {
        let head = ControllerResponseHead {
            reporting_slot: 0,
            slot_state: SlotState::Connected,
            device_model: DeviceModel::FullGyro,
            connection_type: ConnectionType::Bluetooth,
            mac_address: MacAddress::from_bytes([0, 0, 0, 0, 0, 0]),
            battery_level: BatteryLevel::Charged,
        };

        let mut buf = [0u8; 64];
        let len = encode_controller_info_response(&mut buf, 9, &head).unwrap();

        let mut reader = Reader::new(&buf[..len]);
        decode_header(&mut reader).unwrap();
        let decoded = decode_controller_info_response(&mut reader).unwrap();
        assert_eq!(decoded, head);
    }

    #[test]
    fn test_controller_data_round_trip() {
        let data = ControllerData {
            head: ControllerResponseHead {
                reporting_slot: 0,
                slot_state: SlotState::Connected,
                device_model: DeviceModel::FullGyro,
                connection_type: ConnectionType::Usb,
                mac_address: MacAddress::from_u48(0xA1B2_C3D4_E5F6),
                battery_level: BatteryLevel::High,
            },
            connected: true,
            packet_number: u32::MAX,
            button_mask_1: 0xFF,
            button_mask_2: 0xFF,
            home_button: true,
            touch_button: true,
            left_stick: StickPosition { x: 0, y: 255 },
            right_stick: StickPosition { x: 128, y: 128 },
            analog_dpad: AnalogDpad {
                left: 255,
                down: 255,
                right: 255,
                up: 255,
            },
            analog_face: AnalogFace {
                y: 255,
                b: 255,
                a: 255,
                x: 255,
            },
            analog_bumper: AnalogPair {
                left: 255,
                right: 255,
            },
            analog_trigger: AnalogPair {
                left: 255,
                right: 255,
            },
            first_touch: TouchPoint {
                active: true,
                id: 1,
                x: 960,
                y: 470,
            },
            second_touch: TouchPoint::default(),
            motion_timestamp_us: u64::MAX,
            accelerometer: Accelerometer {
                x: -1.0,
                y: 0.5,
                z: 9.81,
            },
            gyroscope: Gyroscope {
                pitch: 180.0,
                yaw: -90.0,
                roll: 0.25,
            },
        };

        let mut buf = [0u8; 128];
        let len = encode_controller_data_response(&mut buf, 9, &data).unwrap();

        let mut reader = Reader::new(&buf[..len]);
        decode_header(&mut reader).unwrap();
        let decoded = decode_controller_data_response(&mut reader).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_decode_controller_info_request() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&2i32.to_le_bytes());
        payload.extend_from_slice(&[0, 1]);

        let mut reader = Reader::new(&payload);
        let request = decode_controller_info_request(&mut reader).unwrap();
        assert_eq!(request.ports, vec![0, 1]);
    }

    #[test]
    fn test_decode_controller_info_request_hostile_count() {
        // Count claims more slots than the datagram carries
        let mut payload = Vec::new();
        payload.extend_from_slice(&1000i32.to_le_bytes());
        payload.push(0);

        let mut reader = Reader::new(&payload);
        assert!(decode_controller_info_request(&mut reader).is_err());

        // Negative counts are rejected as well
        let mut payload = Vec::new();
        payload.extend_from_slice(&(-1i32).to_le_bytes());
        let mut reader = Reader::new(&payload);
        assert!(decode_controller_info_request(&mut reader).is_err());
    }

    #[test]
    fn test_decode_controller_data_request() {
        let mut payload = vec![0x02, 0x00];
        payload.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01]);

        let mut reader = Reader::new(&payload);
        let request = decode_controller_data_request(&mut reader).unwrap();
        assert_eq!(request.registration, RegistrationType::MacBased);
        assert_eq!(request.reporting_slot, 0);
        assert_eq!(
            request.mac_address.as_bytes(),
            &[0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01]
        );
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut buf = [0u8; 64];
        let len = encode_version_response(&mut buf, 9).unwrap();

        // Extra garbage past the recognized payload must not disturb decode
        let mut extended = buf[..len].to_vec();
        extended.extend_from_slice(&[0xAB; 8]);

        let mut reader = Reader::new(&extended);
        decode_header(&mut reader).unwrap();
        assert_eq!(decode_version_response(&mut reader).unwrap(), 1001);
    }
}
