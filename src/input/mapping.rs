//! # Input Mapping
//!
//! Converts an [`InputSnapshot`](super::InputSnapshot) into the wire-level
//! fields of a report: the two button bitmasks, the synthesized analog
//! bytes, the slot descriptor, and the assembled ControllerData payload.
//!
//! ## Analog Derivation
//!
//! The protocol carries one analog byte per digital button. These are not
//! independently sampled: a byte is 255 exactly when the matching bit is
//! set in its bitmask, else 0.

use super::InputSnapshot;
use crate::dsu::packet::{
    AnalogDpad, AnalogFace, AnalogPair, ControllerData, ControllerResponseHead,
};
use crate::dsu::protocol::{button_group_1, button_group_2, BatteryLevel, SlotState};

/// Analog value reported for a pressed digital button
const PRESSED: u8 = 255;

/// Map digital button states to the two wire bitmasks
pub fn button_masks(snapshot: &InputSnapshot) -> (u8, u8) {
    let b = &snapshot.buttons;

    let mut mask_1 = 0u8;
    if b.dpad_left {
        mask_1 |= button_group_1::DPAD_LEFT;
    }
    if b.dpad_down {
        mask_1 |= button_group_1::DPAD_DOWN;
    }
    if b.dpad_right {
        mask_1 |= button_group_1::DPAD_RIGHT;
    }
    if b.dpad_up {
        mask_1 |= button_group_1::DPAD_UP;
    }
    if b.options {
        mask_1 |= button_group_1::OPTIONS;
    }
    if b.r3 {
        mask_1 |= button_group_1::R3;
    }
    if b.l3 {
        mask_1 |= button_group_1::L3;
    }
    if b.share {
        mask_1 |= button_group_1::SHARE;
    }

    let mut mask_2 = 0u8;
    if b.y {
        mask_2 |= button_group_2::Y;
    }
    if b.b {
        mask_2 |= button_group_2::B;
    }
    if b.a {
        mask_2 |= button_group_2::A;
    }
    if b.x {
        mask_2 |= button_group_2::X;
    }
    if b.r1 {
        mask_2 |= button_group_2::R1;
    }
    if b.l1 {
        mask_2 |= button_group_2::L1;
    }
    if b.r2 {
        mask_2 |= button_group_2::R2;
    }
    if b.l2 {
        mask_2 |= button_group_2::L2;
    }

    (mask_1, mask_2)
}

fn analog(mask: u8, bit: u8) -> u8 {
    if mask & bit != 0 {
        PRESSED
    } else {
        0
    }
}

/// Derive the per-direction dpad analog bytes from button mask 1
pub fn analog_dpad(mask_1: u8) -> AnalogDpad {
    AnalogDpad {
        left: analog(mask_1, button_group_1::DPAD_LEFT),
        down: analog(mask_1, button_group_1::DPAD_DOWN),
        right: analog(mask_1, button_group_1::DPAD_RIGHT),
        up: analog(mask_1, button_group_1::DPAD_UP),
    }
}

/// Derive the per-button face analog bytes from button mask 2
pub fn analog_face(mask_2: u8) -> AnalogFace {
    AnalogFace {
        y: analog(mask_2, button_group_2::Y),
        b: analog(mask_2, button_group_2::B),
        a: analog(mask_2, button_group_2::A),
        x: analog(mask_2, button_group_2::X),
    }
}

/// Derive the bumper (L1/R1) analog bytes from button mask 2
pub fn analog_bumpers(mask_2: u8) -> AnalogPair {
    AnalogPair {
        left: analog(mask_2, button_group_2::L1),
        right: analog(mask_2, button_group_2::R1),
    }
}

/// Derive the trigger (L2/R2) analog bytes from button mask 2
pub fn analog_triggers(mask_2: u8) -> AnalogPair {
    AnalogPair {
        left: analog(mask_2, button_group_2::L2),
        right: analog(mask_2, button_group_2::R2),
    }
}

/// Build the slot descriptor for a snapshot.
///
/// `template` supplies the static identity of the slot (index, device
/// model, connection type, MAC); the snapshot decides the dynamic part.
/// A disconnected slot reports `Disconnected` and `NotApplicable`
/// battery regardless of what the template says.
pub fn slot_descriptor(
    template: &ControllerResponseHead,
    snapshot: &InputSnapshot,
) -> ControllerResponseHead {
    let mut head = *template;
    if snapshot.connected {
        head.slot_state = SlotState::Connected;
        head.battery_level = snapshot.battery;
    } else {
        head.slot_state = SlotState::Disconnected;
        head.battery_level = BatteryLevel::NotApplicable;
    }
    head
}

/// Assemble the full ControllerData payload for a snapshot
pub fn input_report(
    template: &ControllerResponseHead,
    snapshot: &InputSnapshot,
    packet_number: u32,
) -> ControllerData {
    let (mask_1, mask_2) = button_masks(snapshot);

    ControllerData {
        head: slot_descriptor(template, snapshot),
        connected: snapshot.connected,
        packet_number,
        button_mask_1: mask_1,
        button_mask_2: mask_2,
        home_button: snapshot.buttons.home,
        touch_button: snapshot.buttons.touch,
        left_stick: snapshot.left_stick,
        right_stick: snapshot.right_stick,
        analog_dpad: analog_dpad(mask_1),
        analog_face: analog_face(mask_2),
        analog_bumper: analog_bumpers(mask_2),
        analog_trigger: analog_triggers(mask_2),
        first_touch: snapshot.first_touch,
        second_touch: snapshot.second_touch,
        motion_timestamp_us: snapshot.motion_timestamp_us,
        accelerometer: snapshot.accelerometer,
        gyroscope: snapshot.gyroscope,
    }
}
