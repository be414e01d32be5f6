//! # Input Adapter Module
//!
//! Interface between the protocol engine and whatever produces controller
//! state.
//!
//! Acquisition of real button/stick/motion samples is outside this crate:
//! a hardware layer implements [`InputSource`] and hands the engine an
//! [`InputSnapshot`] on demand. [`DisconnectedInput`] is the bundled
//! stand-in used when no hardware layer is attached, reporting an empty
//! slot so clients still get well-formed responses.

pub mod mapping;

use crate::dsu::packet::{Accelerometer, Gyroscope, StickPosition, TouchPoint};
use crate::dsu::protocol::BatteryLevel;

/// Center position of an 8-bit analog stick axis
pub const STICK_CENTER: u8 = 0x80;

/// Momentary state of every digital button the protocol reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    pub dpad_left: bool,
    pub dpad_down: bool,
    pub dpad_right: bool,
    pub dpad_up: bool,
    pub options: bool,
    pub share: bool,
    pub l3: bool,
    pub r3: bool,
    pub y: bool,
    pub b: bool,
    pub a: bool,
    pub x: bool,
    pub r1: bool,
    pub l1: bool,
    pub r2: bool,
    pub l2: bool,
    pub home: bool,
    pub touch: bool,
}

/// One complete sample of controller state, as supplied by an
/// [`InputSource`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    /// Whether a physical controller is attached
    pub connected: bool,
    /// Digital button states
    pub buttons: Buttons,
    /// Left analog stick position
    pub left_stick: StickPosition,
    /// Right analog stick position
    pub right_stick: StickPosition,
    /// First touch point
    pub first_touch: TouchPoint,
    /// Second touch point
    pub second_touch: TouchPoint,
    /// Accelerometer sample in g
    pub accelerometer: Accelerometer,
    /// Gyroscope sample in degrees per second
    pub gyroscope: Gyroscope,
    /// Time the motion sample was taken, microseconds
    pub motion_timestamp_us: u64,
    /// Battery level of the device
    pub battery: BatteryLevel,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            connected: false,
            buttons: Buttons::default(),
            left_stick: StickPosition {
                x: STICK_CENTER,
                y: STICK_CENTER,
            },
            right_stick: StickPosition {
                x: STICK_CENTER,
                y: STICK_CENTER,
            },
            first_touch: TouchPoint::default(),
            second_touch: TouchPoint::default(),
            accelerometer: Accelerometer::default(),
            gyroscope: Gyroscope::default(),
            motion_timestamp_us: 0,
            battery: BatteryLevel::NotApplicable,
        }
    }
}

/// Supplier of the current controller state.
///
/// Implemented by the excluded hardware layer; called by the dispatch
/// loop once per request that needs controller state.
pub trait InputSource: Send {
    /// Current button/stick/motion/battery state
    fn snapshot(&mut self) -> InputSnapshot;
}

/// Input source used when no hardware layer is attached.
///
/// Reports a disconnected slot with neutral axes and no battery
/// information.
#[derive(Debug, Default)]
pub struct DisconnectedInput;

impl InputSource for DisconnectedInput {
    fn snapshot(&mut self) -> InputSnapshot {
        InputSnapshot::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_neutral() {
        let snapshot = InputSnapshot::default();
        assert!(!snapshot.connected);
        assert_eq!(snapshot.battery, BatteryLevel::NotApplicable);
        assert_eq!(snapshot.left_stick.x, STICK_CENTER);
        assert_eq!(snapshot.left_stick.y, STICK_CENTER);
        assert_eq!(snapshot.right_stick.x, STICK_CENTER);
        assert!(!snapshot.buttons.a);
        assert!(!snapshot.first_touch.active);
    }

    #[test]
    fn test_disconnected_input_reports_disconnected() {
        let mut source = DisconnectedInput;
        let snapshot = source.snapshot();
        assert!(!snapshot.connected);
        assert_eq!(snapshot.battery, BatteryLevel::NotApplicable);
    }
}
