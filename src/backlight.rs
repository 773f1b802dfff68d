//! Backlight control, one strategy per board
//!
//! The LCD backlight is fed from a PMIC rail whose voltage sets the
//! brightness. Which rail, and how the duty code sits in its register, is a
//! board property described by a [`Backlight`] implementation.

use crate::bus::RegisterBus;
use crate::config::BoardModel;
use crate::error::Error;
use crate::registers::CORE2_BACKLIGHT_CTRL;

/// Board-specific backlight register layout
pub trait Backlight: Sync {
    /// Register holding the duty code
    fn register(&self) -> u8;

    /// Lowest and highest usable duty code
    fn duty_range(&self) -> (u8, u8);

    /// Register value for `duty` given the value currently in the register
    fn compose(&self, current: u8, duty: u8) -> u8;
}

/// M5Stack Core2: duty in bits [6:3], bit 7 belongs to something else
pub struct M5Core2Backlight;

impl Backlight for M5Core2Backlight {
    fn register(&self) -> u8 {
        CORE2_BACKLIGHT_CTRL
    }

    fn duty_range(&self) -> (u8, u8) {
        (7, 12)
    }

    fn compose(&self, current: u8, duty: u8) -> u8 {
        (current & 0x80) | (duty << 3)
    }
}

static M5CORE2_BACKLIGHT: M5Core2Backlight = M5Core2Backlight;

impl BoardModel {
    /// Backlight strategy for this board, `None` if the board has no PMIC-driven backlight
    pub fn backlight(self) -> Option<&'static dyn Backlight> {
        match self {
            BoardModel::M5Core2 => Some(&M5CORE2_BACKLIGHT),
        }
    }
}

/// Map brightness 0.0-1.0 linearly onto `min..=max`, truncating.
/// Out-of-range input is clamped.
pub fn duty_for_brightness(brightness: f32, min: u8, max: u8) -> u8 {
    let span = max.saturating_sub(min) as f32;
    // float to int casts saturate, so negative input lands on `min`
    let step = (brightness * span) as u8;
    min.saturating_add(step).min(max)
}

/// Read-modify-write the backlight register. Returns the duty written.
pub(crate) fn apply<B: RegisterBus>(
    bus: &mut B,
    backlight: &dyn Backlight,
    brightness: f32,
) -> Result<u8, Error<B::Error>> {
    let (min, max) = backlight.duty_range();
    let duty = duty_for_brightness(brightness, min, max);
    let reg = backlight.register();
    let current = bus.read_u8(reg)?;
    bus.write_u8(reg, backlight.compose(current, duty))?;
    Ok(duty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RegisterFile;

    #[test]
    fn core2_duty_mapping() {
        let (min, max) = M5Core2Backlight.duty_range();
        assert_eq!(duty_for_brightness(0.0, min, max), 7);
        assert_eq!(duty_for_brightness(1.0, min, max), 12);
        assert_eq!(duty_for_brightness(0.5, min, max), 9);
        assert_eq!(duty_for_brightness(1.2, min, max), 12);
        assert_eq!(duty_for_brightness(-0.5, min, max), 7);
    }

    #[test]
    fn core2_keeps_top_bit() {
        let mut bus = RegisterFile::new();
        bus.set(CORE2_BACKLIGHT_CTRL, 0xFF);
        let duty = apply(&mut bus, &M5Core2Backlight, 1.0).unwrap();
        assert_eq!(duty, 12);
        assert_eq!(bus.get(CORE2_BACKLIGHT_CTRL), 0x80 | (12 << 3));
    }

    #[test]
    fn every_model_has_a_strategy() {
        assert!(BoardModel::M5Core2.backlight().is_some());
    }
}
