//! # DSU Frame Encoder
//!
//! Builds outbound frames: header first, then the type-specific payload,
//! then the payload_length patch, and the CRC stamp last.
//!
//! [`FrameBuilder`] enforces that order. Payload bytes are appended at the
//! cursor, the length field is patched via a seek/write/seek sequence
//! (cursor position minus the fixed header size), and `finish` stamps the
//! CRC over the completed frame.

use super::crc::stamp_frame;
use super::cursor::Writer;
use super::packet::{ControllerData, ControllerResponseHead, TouchPoint};
use super::protocol::{
    MessageType, HEADER_SIZE, LENGTH_OFFSET, MAGIC_SERVER, PROTOCOL_VERSION,
};
use crate::error::Result;

/// Builder for one outbound frame in a caller-owned buffer.
///
/// Constructing the builder writes the header with zeroed length and crc
/// fields; payload methods append and keep the length field current;
/// [`finish`](FrameBuilder::finish) stamps the CRC and returns the total
/// frame length.
#[derive(Debug)]
pub struct FrameBuilder<'a> {
    writer: Writer<'a>,
}

impl<'a> FrameBuilder<'a> {
    /// Start a frame: write the server header with length and crc zeroed
    pub fn new(buf: &'a mut [u8], sender_id: u32, message_type: MessageType) -> Result<Self> {
        let mut writer = Writer::new(buf);
        writer.put_bytes(&MAGIC_SERVER)?;
        writer.put_u16(PROTOCOL_VERSION)?;
        writer.put_u16(0)?; // payload_length, patched as payload is appended
        writer.put_u32(0)?; // crc32, stamped in finish
        writer.put_u32(sender_id)?;
        writer.put_u32(message_type.to_wire())?;
        Ok(Self { writer })
    }

    /// Patch payload_length to the bytes written past the fixed header,
    /// leaving the cursor where it was
    fn patch_length(&mut self) -> Result<()> {
        let end = self.writer.position();
        self.writer.seek(LENGTH_OFFSET)?;
        self.writer.put_u16((end - HEADER_SIZE) as u16)?;
        self.writer.seek(end)?;
        Ok(())
    }

    /// Append a ProtocolVersion response payload
    pub fn put_version_response(&mut self, max_version: u16) -> Result<()> {
        self.writer.put_u16(max_version)?;
        self.patch_length()
    }

    /// Append a ControllerInfo response payload: one slot descriptor plus
    /// the trailing zero byte
    pub fn put_controller_info(&mut self, head: &ControllerResponseHead) -> Result<()> {
        self.put_response_head(head)?;
        self.writer.put_u8(0)?;
        self.patch_length()
    }

    /// Append a full ControllerData response payload
    pub fn put_controller_data(&mut self, data: &ControllerData) -> Result<()> {
        self.put_response_head(&data.head)?;
        self.writer.put_u8(data.connected as u8)?;
        self.writer.put_u32(data.packet_number)?;
        self.writer.put_u8(data.button_mask_1)?;
        self.writer.put_u8(data.button_mask_2)?;
        self.writer.put_u8(data.home_button as u8)?;
        self.writer.put_u8(data.touch_button as u8)?;
        self.writer.put_u8(data.left_stick.x)?;
        self.writer.put_u8(data.left_stick.y)?;
        self.writer.put_u8(data.right_stick.x)?;
        self.writer.put_u8(data.right_stick.y)?;
        self.writer.put_u8(data.analog_dpad.left)?;
        self.writer.put_u8(data.analog_dpad.down)?;
        self.writer.put_u8(data.analog_dpad.right)?;
        self.writer.put_u8(data.analog_dpad.up)?;
        self.writer.put_u8(data.analog_face.y)?;
        self.writer.put_u8(data.analog_face.b)?;
        self.writer.put_u8(data.analog_face.a)?;
        self.writer.put_u8(data.analog_face.x)?;
        self.writer.put_u8(data.analog_bumper.left)?;
        self.writer.put_u8(data.analog_bumper.right)?;
        self.writer.put_u8(data.analog_trigger.left)?;
        self.writer.put_u8(data.analog_trigger.right)?;
        self.put_touch_point(&data.first_touch)?;
        self.put_touch_point(&data.second_touch)?;
        self.writer.put_u64(data.motion_timestamp_us)?;
        self.writer.put_f32(data.accelerometer.x)?;
        self.writer.put_f32(data.accelerometer.y)?;
        self.writer.put_f32(data.accelerometer.z)?;
        self.writer.put_f32(data.gyroscope.pitch)?;
        self.writer.put_f32(data.gyroscope.yaw)?;
        self.writer.put_f32(data.gyroscope.roll)?;
        self.patch_length()
    }

    fn put_response_head(&mut self, head: &ControllerResponseHead) -> Result<()> {
        self.writer.put_u8(head.reporting_slot)?;
        self.writer.put_u8(head.slot_state as u8)?;
        self.writer.put_u8(head.device_model as u8)?;
        self.writer.put_u8(head.connection_type as u8)?;
        self.writer.put_bytes(head.mac_address.as_bytes())?;
        self.writer.put_u8(head.battery_level as u8)
    }

    fn put_touch_point(&mut self, touch: &TouchPoint) -> Result<()> {
        self.writer.put_u8(touch.active as u8)?;
        self.writer.put_u8(touch.id)?;
        self.writer.put_u16(touch.x)?;
        self.writer.put_u16(touch.y)
    }

    /// Stamp the CRC over the completed frame and return its length
    pub fn finish(mut self) -> Result<usize> {
        stamp_frame(self.writer.written_mut())?;
        Ok(self.writer.position())
    }
}

/// Encode a complete ProtocolVersion response frame into `buf`
///
/// # Returns
///
/// Total frame length in bytes.
pub fn encode_version_response(buf: &mut [u8], sender_id: u32) -> Result<usize> {
    let mut builder = FrameBuilder::new(buf, sender_id, MessageType::ProtocolVersion)?;
    builder.put_version_response(PROTOCOL_VERSION)?;
    builder.finish()
}

/// Encode a complete ControllerInfo response frame into `buf`
pub fn encode_controller_info_response(
    buf: &mut [u8],
    sender_id: u32,
    head: &ControllerResponseHead,
) -> Result<usize> {
    let mut builder = FrameBuilder::new(buf, sender_id, MessageType::ControllerInfo)?;
    builder.put_controller_info(head)?;
    builder.finish()
}

/// Encode a complete ControllerData response frame into `buf`
pub fn encode_controller_data_response(
    buf: &mut [u8],
    sender_id: u32,
    data: &ControllerData,
) -> Result<usize> {
    let mut builder = FrameBuilder::new(buf, sender_id, MessageType::ControllerData)?;
    builder.put_controller_data(data)?;
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsu::crc::verify_frame;
    use crate::dsu::protocol::{
        CONTROLLER_DATA_PAYLOAD_SIZE, CONTROLLER_INFO_PAYLOAD_SIZE, VERSION_PAYLOAD_SIZE,
    };

    #[test]
    fn test_version_response_layout() {
        let mut buf = [0u8; 64];
        let len = encode_version_response(&mut buf, 0xAABB_CCDD).unwrap();

        assert_eq!(len, HEADER_SIZE + VERSION_PAYLOAD_SIZE);
        assert_eq!(&buf[0..4], b"DSUS");
        // Version 1001 little-endian at its two wire positions
        assert_eq!(&buf[4..6], &[0xE9, 0x03]);
        assert_eq!(&buf[20..22], &[0xE9, 0x03]);
        // payload_length = 2
        assert_eq!(&buf[6..8], &[0x02, 0x00]);
        // sender_id little-endian
        assert_eq!(&buf[12..16], &[0xDD, 0xCC, 0xBB, 0xAA]);
        // message_type = 0x100000 little-endian
        assert_eq!(&buf[16..20], &[0x00, 0x00, 0x10, 0x00]);
        assert!(verify_frame(&buf[..len]).is_ok());
    }

    #[test]
    fn test_controller_info_response_layout() {
        let head = ControllerResponseHead {
            reporting_slot: 0,
            slot_state: crate::dsu::protocol::SlotState::Connected,
            device_model: crate::dsu::protocol::DeviceModel::FullGyro,
            connection_type: crate::dsu::protocol::ConnectionType::Usb,
            mac_address: crate::dsu::protocol::MacAddress::from_bytes([1, 2, 3, 4, 5, 6]),
            battery_level: crate::dsu::protocol::BatteryLevel::Charging,
        };

        let mut buf = [0u8; 64];
        let len = encode_controller_info_response(&mut buf, 7, &head).unwrap();

        assert_eq!(len, HEADER_SIZE + CONTROLLER_INFO_PAYLOAD_SIZE);
        assert_eq!(buf[20], 0); // slot
        assert_eq!(buf[21], 2); // Connected
        assert_eq!(buf[22], 2); // FullGyro
        assert_eq!(buf[23], 1); // Usb
        assert_eq!(&buf[24..30], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(buf[30], 0xEE); // Charging
        assert_eq!(buf[31], 0); // trailing zero byte
        assert!(verify_frame(&buf[..len]).is_ok());
    }

    #[test]
    fn test_controller_data_response_is_80_byte_payload() {
        let data = ControllerData {
            connected: true,
            packet_number: 42,
            ..Default::default()
        };

        let mut buf = [0u8; 128];
        let len = encode_controller_data_response(&mut buf, 7, &data).unwrap();

        assert_eq!(len, HEADER_SIZE + CONTROLLER_DATA_PAYLOAD_SIZE);
        // payload_length field matches
        assert_eq!(
            u16::from_le_bytes([buf[6], buf[7]]) as usize,
            CONTROLLER_DATA_PAYLOAD_SIZE
        );
        // connected flag right after the 11-byte descriptor
        assert_eq!(buf[31], 1);
        // packet_number little-endian
        assert_eq!(&buf[32..36], &42u32.to_le_bytes());
        assert!(verify_frame(&buf[..len]).is_ok());
    }

    #[test]
    fn test_crc_differs_between_payloads() {
        let mut buf_a = [0u8; 128];
        let mut buf_b = [0u8; 128];

        let data_a = ControllerData {
            packet_number: 1,
            ..Default::default()
        };
        let data_b = ControllerData {
            packet_number: 2,
            ..Default::default()
        };

        let len_a = encode_controller_data_response(&mut buf_a, 7, &data_a).unwrap();
        let len_b = encode_controller_data_response(&mut buf_b, 7, &data_b).unwrap();

        assert_eq!(len_a, len_b);
        assert_ne!(&buf_a[8..12], &buf_b[8..12], "CRC should track payload");
    }

    #[test]
    fn test_encode_into_undersized_buffer_fails() {
        let mut buf = [0u8; 16];
        assert!(encode_version_response(&mut buf, 7).is_err());
    }

    #[test]
    fn test_touch_points_and_motion_at_expected_offsets() {
        let data = ControllerData {
            first_touch: TouchPoint {
                active: true,
                id: 3,
                x: 0x1234,
                y: 0x5678,
            },
            motion_timestamp_us: 0x0102_0304_0506_0708,
            ..Default::default()
        };

        let mut buf = [0u8; 128];
        encode_controller_data_response(&mut buf, 7, &data).unwrap();

        // Touch blocks start after the analog bytes: 20 + 36 = 56
        assert_eq!(buf[56], 1);
        assert_eq!(buf[57], 3);
        assert_eq!(&buf[58..60], &[0x34, 0x12]);
        assert_eq!(&buf[60..62], &[0x78, 0x56]);
        // Motion timestamp after both touch blocks: 56 + 12 = 68
        assert_eq!(&buf[68..76], &0x0102_0304_0506_0708u64.to_le_bytes());
    }
}
