//! Board configuration for [`Axp2101Component`](crate::Axp2101Component)
//!
//! `Axp2101Config::default()` is the M5Stack Core2 v1.1 power tree.

use crate::registers::AXP2101_SLAVE_ADDRESS;
use crate::types::*;

/// Board variant, selects board-specific register layouts (backlight)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardModel {
    #[default]
    M5Core2,
}

impl BoardModel {
    pub fn as_str(self) -> &'static str {
        match self {
            BoardModel::M5Core2 => "M5Core2",
        }
    }
}

/// Setpoint for one rail. Rails absent from the table are left as the bootloader set them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RailConfig {
    pub channel: PowerChannel,
    /// `None` keeps the current voltage
    pub millivolts: Option<u16>,
    /// Switch the rail on during setup
    pub enable: bool,
}

impl RailConfig {
    pub const fn on(channel: PowerChannel, millivolts: u16) -> Self {
        Self {
            channel,
            millivolts: Some(millivolts),
            enable: true,
        }
    }

    pub const fn voltage_only(channel: PowerChannel, millivolts: u16) -> Self {
        Self {
            channel,
            millivolts: Some(millivolts),
            enable: false,
        }
    }
}

/// Core2 rails. ALDO3 (speaker) and DLDO1 (vibration motor) stay off until
/// their drivers ask for them.
pub const M5CORE2_RAILS: &[RailConfig] = &[
    // DC1 already feeds the ESP32
    RailConfig::voltage_only(PowerChannel::Dcdc1, 3300),
    RailConfig::on(PowerChannel::Dcdc2, 1000),
    RailConfig::on(PowerChannel::Dcdc3, 3300),
    RailConfig::on(PowerChannel::Dcdc4, 1000),
    RailConfig::on(PowerChannel::Dcdc5, 3300),
    RailConfig::on(PowerChannel::Aldo1, 3300),
    RailConfig::on(PowerChannel::Aldo2, 3300),
    RailConfig::on(PowerChannel::Aldo4, 3300),
    RailConfig::on(PowerChannel::Bldo1, 3300),
    RailConfig::on(PowerChannel::Bldo2, 3300),
    RailConfig::on(PowerChannel::CpuSldo, 1000),
];

/// PMIC interrupts the component listens for
pub const DEFAULT_IRQ_MASK: u32 = irq::BAT_INSERT
    | irq::BAT_REMOVE
    | irq::VBUS_INSERT
    | irq::VBUS_REMOVE
    | irq::PKEY_SHORT
    | irq::PKEY_LONG
    | irq::BAT_CHG_DONE
    | irq::BAT_CHG_START;

#[derive(Debug, Clone, PartialEq)]
pub struct Axp2101Config {
    pub address: u8,
    pub model: BoardModel,
    /// GPIO wired to the PMIC IRQ line
    pub irq_pin: u8,
    /// GPIO used as the active-low ext0 wake source in deep sleep
    pub wakeup_pin: u8,

    pub vbus_voltage_limit: VbusVoltageLimit,
    pub vbus_current_limit: VbusCurrentLimit,
    /// VSYS cutoff, 2600-3300 mV
    pub sys_power_down_mv: u16,
    pub rails: &'static [RailConfig],

    pub power_key_off_time: PowerKeyOffTime,
    pub power_key_on_time: PowerKeyOnTime,
    pub charge_led: ChargeLedMode,
    /// Interrupts enabled after the full mask is cleared, see [`irq`]
    pub irq_mask: u32,

    pub precharge_current: PrechargeCurrent,
    pub charge_current: ChargeCurrent,
    pub termination_current: ChargeTerminationCurrent,
    pub charge_voltage: ChargeVoltage,

    pub watchdog_config: WatchdogConfig,
    pub watchdog_timeout: WatchdogTimeout,
    pub watchdog_enable: bool,

    /// RTC backup cell charge voltage, 2600-3300 mV
    pub button_battery_mv: u16,

    /// Coulomb counter ADC sample rate; the accumulators are counted in samples
    pub coulomb_sample_rate_hz: f32,
    /// Voltage curve for the percentage estimate when the gauge has no battery
    pub battery_empty_volts: f32,
    pub battery_full_volts: f32,

    /// Initial backlight brightness, 0.0-1.0
    pub brightness: f32,
}

impl Default for Axp2101Config {
    fn default() -> Self {
        Self {
            address: AXP2101_SLAVE_ADDRESS,
            model: BoardModel::M5Core2,
            irq_pin: 35,
            wakeup_pin: 37,
            vbus_voltage_limit: VbusVoltageLimit::V4_36,
            vbus_current_limit: VbusCurrentLimit::I1500mA,
            sys_power_down_mv: 2600,
            rails: M5CORE2_RAILS,
            power_key_off_time: PowerKeyOffTime::S4,
            power_key_on_time: PowerKeyOnTime::Ms128,
            charge_led: ChargeLedMode::Off,
            irq_mask: DEFAULT_IRQ_MASK,
            precharge_current: PrechargeCurrent::I50mA,
            charge_current: ChargeCurrent::I200mA,
            termination_current: ChargeTerminationCurrent::I25mA,
            charge_voltage: ChargeVoltage::V4_1,
            watchdog_config: WatchdogConfig::IrqOnly,
            watchdog_timeout: WatchdogTimeout::Timeout4s,
            watchdog_enable: true,
            button_battery_mv: 3300,
            coulomb_sample_rate_hz: 25.0,
            battery_empty_volts: 3.0,
            battery_full_volts: 4.1,
            brightness: 1.0,
        }
    }
}
