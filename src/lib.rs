#![cfg_attr(not(test), no_std)]
//! # AXP2101 board power component
//!
//! Driver and board-level component for the AXP2101 Power Management IC as
//! used on the M5Stack Core2:
//! - Typed register operations for status, rails, charger, ADC, IRQ and watchdog
//! - One-shot board setup that stops at the first failing step
//! - Polling update publishing battery voltage, level and charging state
//! - Backlight brightness through a per-board strategy
//! - Core2 measurement block (coulomb counter, legacy ADC words)
//! - Sleep entry, power off, power key and startup reason
//!
//! ## Example
//!
//! ```no_run
//! use axp2101_pmu::{Axp2101Component, Axp2101Config, IrqFlag, IrqPin, Sensor};
//! # use embedded_hal::i2c::I2c;
//!
//! static PMU_IRQ: IrqFlag = IrqFlag::new();
//!
//! # fn example<I: I2c, P: IrqPin>(i2c: I, mut irq_pin: P, level: &mut dyn Sensor) {
//! let mut pmu = Axp2101Component::from_i2c(i2c, Axp2101Config::default(), &PMU_IRQ);
//! pmu.set_battery_level_sensor(level);
//!
//! if let Err(e) = pmu.setup(&mut irq_pin) {
//!     // `e.step` names the part of the power tree that was not configured
//!     return;
//! }
//!
//! loop {
//!     // the pass is skipped on a bus error, next one starts over
//!     let _ = pmu.update();
//!     if let Ok(Some(flags)) = pmu.handle_irq() {
//!         if flags.is_power_key_short() {
//!             pmu.set_brightness(0.5);
//!         }
//!     }
//! #   break;
//! }
//! # }
//! ```

// must stay first so the logging macros are visible in every module
mod fmt;

mod backlight;
mod bus;
mod component;
mod config;
mod driver;
mod error;
mod gauge;
mod interrupt;
mod registers;
mod sensor;
mod sleep;
mod types;

#[cfg(test)]
mod mock;

pub use backlight::{duty_for_brightness, Backlight, M5Core2Backlight};
pub use bus::{pack_12bit, pack_13bit, I2cBus, RegisterBus};
pub use component::{battery_percent_estimate, Axp2101Component};
pub use config::{Axp2101Config, BoardModel, RailConfig, DEFAULT_IRQ_MASK, M5CORE2_RAILS};
pub use driver::{decode_rail_voltage, encode_rail_voltage, Axp2101};
pub use error::{Error, SetupError, SetupStep};
pub use gauge::{coulomb_to_mah, legacy_temperature, AdcWidth, LegacyAdc};
pub use interrupt::{IrqFlag, IrqPin};
pub use registers::*;
pub use sensor::{BinarySensor, Sensor};
pub use sleep::{startup_reason, ResetReason, SleepControl, StartupReason, WakeupCause};
pub use types::*;
