//! AXP2101 PMIC register operations

use crate::bus::{I2cBus, RegisterBus};
use crate::error::Error;
use crate::registers::*;
use crate::types::*;
use embedded_hal::i2c::I2c;

/// One linear piece of a rail's voltage encoding
struct Segment {
    min: u16,
    max: u16,
    step: u16,
    /// Register code of `min`
    base: u8,
}

impl Segment {
    const fn new(min: u16, max: u16, step: u16, base: u8) -> Self {
        Self {
            min,
            max,
            step,
            base,
        }
    }

    fn last_code(&self) -> u8 {
        self.base + ((self.max - self.min) / self.step) as u8
    }
}

struct RailLayout {
    enable_reg: u8,
    enable_bit: u8,
    voltage_reg: u8,
    code_mask: u8,
    segments: &'static [Segment],
    /// Off-curve setpoint (DC5 1200 mV)
    fixed: Option<(u16, u8)>,
}

const DC1_SEGMENTS: &[Segment] = &[Segment::new(1500, 3400, 100, 0)];
const DC2_SEGMENTS: &[Segment] = &[
    Segment::new(500, 1200, 10, 0),
    Segment::new(1220, 1540, 20, 71),
];
const DC3_SEGMENTS: &[Segment] = &[
    Segment::new(500, 1200, 10, 0),
    Segment::new(1220, 1540, 20, 71),
    Segment::new(1600, 3400, 100, 88),
];
const DC4_SEGMENTS: &[Segment] = &[
    Segment::new(500, 1200, 10, 0),
    Segment::new(1220, 1840, 20, 71),
];
const DC5_SEGMENTS: &[Segment] = &[Segment::new(1400, 3700, 100, 0)];
const LDO_3V5_SEGMENTS: &[Segment] = &[Segment::new(500, 3500, 100, 0)];
const LDO_1V4_SEGMENTS: &[Segment] = &[Segment::new(500, 1400, 50, 0)];
const DLDO1_SEGMENTS: &[Segment] = &[Segment::new(500, 3400, 100, 0)];

const fn dcdc(bit: u8, voltage_reg: u8, code_mask: u8, segments: &'static [Segment]) -> RailLayout {
    RailLayout {
        enable_reg: AXP2101_DC_ONOFF_DVM_CTRL,
        enable_bit: bit,
        voltage_reg,
        code_mask,
        segments,
        fixed: None,
    }
}

const fn ldo(enable_reg: u8, bit: u8, voltage_reg: u8, segments: &'static [Segment]) -> RailLayout {
    RailLayout {
        enable_reg,
        enable_bit: bit,
        voltage_reg,
        code_mask: 0x1F,
        segments,
        fixed: None,
    }
}

fn rail_layout(channel: PowerChannel) -> RailLayout {
    match channel {
        PowerChannel::Dcdc1 => dcdc(0, AXP2101_DC_VOL0_CTRL, 0x1F, DC1_SEGMENTS),
        PowerChannel::Dcdc2 => dcdc(1, AXP2101_DC_VOL1_CTRL, 0x7F, DC2_SEGMENTS),
        PowerChannel::Dcdc3 => dcdc(2, AXP2101_DC_VOL2_CTRL, 0x7F, DC3_SEGMENTS),
        PowerChannel::Dcdc4 => dcdc(3, AXP2101_DC_VOL3_CTRL, 0x7F, DC4_SEGMENTS),
        PowerChannel::Dcdc5 => RailLayout {
            fixed: Some((1200, 24)),
            ..dcdc(4, AXP2101_DC_VOL4_CTRL, 0x1F, DC5_SEGMENTS)
        },
        PowerChannel::Aldo1 => ldo(AXP2101_LDO_ONOFF_CTRL0, 0, AXP2101_LDO_VOL0_CTRL, LDO_3V5_SEGMENTS),
        PowerChannel::Aldo2 => ldo(AXP2101_LDO_ONOFF_CTRL0, 1, AXP2101_LDO_VOL1_CTRL, LDO_3V5_SEGMENTS),
        PowerChannel::Aldo3 => ldo(AXP2101_LDO_ONOFF_CTRL0, 2, AXP2101_LDO_VOL2_CTRL, LDO_3V5_SEGMENTS),
        PowerChannel::Aldo4 => ldo(AXP2101_LDO_ONOFF_CTRL0, 3, AXP2101_LDO_VOL3_CTRL, LDO_3V5_SEGMENTS),
        PowerChannel::Bldo1 => ldo(AXP2101_LDO_ONOFF_CTRL0, 4, AXP2101_LDO_VOL4_CTRL, LDO_3V5_SEGMENTS),
        PowerChannel::Bldo2 => ldo(AXP2101_LDO_ONOFF_CTRL0, 5, AXP2101_LDO_VOL5_CTRL, LDO_3V5_SEGMENTS),
        PowerChannel::CpuSldo => ldo(AXP2101_LDO_ONOFF_CTRL0, 6, AXP2101_LDO_VOL6_CTRL, LDO_1V4_SEGMENTS),
        PowerChannel::Dldo1 => ldo(AXP2101_LDO_ONOFF_CTRL0, 7, AXP2101_LDO_VOL7_CTRL, DLDO1_SEGMENTS),
        PowerChannel::Dldo2 => ldo(AXP2101_LDO_ONOFF_CTRL1, 0, AXP2101_LDO_VOL8_CTRL, LDO_1V4_SEGMENTS),
    }
}

/// Register code for `millivolt` on `channel`, or `None` if the rail cannot produce it
pub fn encode_rail_voltage(channel: PowerChannel, millivolt: u16) -> Option<u8> {
    let rail = rail_layout(channel);
    if let Some((mv, code)) = rail.fixed {
        if mv == millivolt {
            return Some(code);
        }
    }
    let seg = rail
        .segments
        .iter()
        .find(|s| (s.min..=s.max).contains(&millivolt))?;
    let offset = millivolt - seg.min;
    if offset % seg.step != 0 {
        return None;
    }
    Some(seg.base + (offset / seg.step) as u8)
}

/// Millivolts for a register code on `channel`, or `None` for a reserved code
pub fn decode_rail_voltage(channel: PowerChannel, raw: u8) -> Option<u16> {
    let rail = rail_layout(channel);
    let code = raw & rail.code_mask;
    if let Some((mv, fixed)) = rail.fixed {
        if fixed == code {
            return Some(mv);
        }
    }
    rail.segments
        .iter()
        .find(|s| (s.base..=s.last_code()).contains(&code))
        .map(|s| s.min + (code - s.base) as u16 * s.step)
}

/// AXP2101 PMIC driver
pub struct Axp2101<B> {
    bus: B,
}

impl<I: I2c> Axp2101<I2cBus<I>> {
    /// Create a driver on the default I2C address
    ///
    /// # Example
    /// ```no_run
    /// # use axp2101_pmu::Axp2101;
    /// # use embedded_hal::i2c::I2c;
    /// # fn example<I: I2c>(i2c: I) {
    /// let pmic = Axp2101::new(i2c);
    /// # }
    /// ```
    pub fn new(i2c: I) -> Self {
        Self::with_address(i2c, AXP2101_SLAVE_ADDRESS)
    }

    /// Create a driver on a custom I2C address
    pub fn with_address(i2c: I, addr: u8) -> Self {
        Self::from_bus(I2cBus::new(i2c, addr))
    }
}

impl<B: RegisterBus> Axp2101<B> {
    pub fn from_bus(bus: B) -> Self {
        Self { bus }
    }

    /// Raw register access for anything not wrapped here
    pub fn bus(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn release(self) -> B {
        self.bus
    }

    /// Verify the chip ID
    ///
    /// Returns `Error::DeviceNotFound` if the chip ID doesn't match
    pub fn init(&mut self) -> Result<(), Error<B::Error>> {
        match self.chip_id()? {
            AXP2101_CHIP_ID | AXP2101_CHIP_ID_M5 => Ok(()),
            _ => Err(Error::DeviceNotFound),
        }
    }

    pub fn chip_id(&mut self) -> Result<u8, Error<B::Error>> {
        self.bus.read_u8(AXP2101_IC_TYPE)
    }

    // ========================================
    // Status
    // ========================================

    pub fn is_vbus_good(&mut self) -> Result<bool, Error<B::Error>> {
        self.bus.get_bit(AXP2101_STATUS1, 5)
    }

    pub fn is_battery_connected(&mut self) -> Result<bool, Error<B::Error>> {
        self.bus.get_bit(AXP2101_STATUS1, 3)
    }

    /// VBUS inserted and good
    pub fn is_vbus_in(&mut self) -> Result<bool, Error<B::Error>> {
        let no_vbus = self.bus.get_bit(AXP2101_STATUS2, 3)?;
        Ok(!no_vbus && self.is_vbus_good()?)
    }

    pub fn is_charging(&mut self) -> Result<bool, Error<B::Error>> {
        Ok(self.bus.read_u8(AXP2101_STATUS2)? >> 5 == 0x01)
    }

    pub fn is_discharging(&mut self) -> Result<bool, Error<B::Error>> {
        Ok(self.bus.read_u8(AXP2101_STATUS2)? >> 5 == 0x02)
    }

    pub fn charger_status(&mut self) -> Result<ChargeStatus, Error<B::Error>> {
        Ok(match self.bus.read_u8(AXP2101_STATUS2)? & 0x07 {
            0 => ChargeStatus::TriCharge,
            1 => ChargeStatus::PreCharge,
            2 => ChargeStatus::ConstantCurrent,
            3 => ChargeStatus::ConstantVoltage,
            4 => ChargeStatus::ChargeDone,
            _ => ChargeStatus::NotCharging,
        })
    }

    // ========================================
    // Rails
    // ========================================

    pub fn is_enabled(&mut self, channel: PowerChannel) -> Result<bool, Error<B::Error>> {
        let rail = rail_layout(channel);
        self.bus.get_bit(rail.enable_reg, rail.enable_bit)
    }

    pub fn enable(&mut self, channel: PowerChannel) -> Result<(), Error<B::Error>> {
        let rail = rail_layout(channel);
        self.bus.set_bit(rail.enable_reg, rail.enable_bit)
    }

    pub fn disable(&mut self, channel: PowerChannel) -> Result<(), Error<B::Error>> {
        let rail = rail_layout(channel);
        self.bus.clear_bit(rail.enable_reg, rail.enable_bit)
    }

    /// Set a rail's output voltage. Nothing is written if the rail cannot produce `millivolt`.
    pub fn set_voltage(
        &mut self,
        channel: PowerChannel,
        millivolt: u16,
    ) -> Result<(), Error<B::Error>> {
        let code = encode_rail_voltage(channel, millivolt).ok_or(Error::InvalidVoltage)?;
        let rail = rail_layout(channel);
        self.bus.modify(rail.voltage_reg, !rail.code_mask, code)
    }

    pub fn voltage(&mut self, channel: PowerChannel) -> Result<u16, Error<B::Error>> {
        let rail = rail_layout(channel);
        let raw = self.bus.read_u8(rail.voltage_reg)?;
        decode_rail_voltage(channel, raw).ok_or(Error::InvalidVoltage)
    }

    // ========================================
    // VBUS / VSYS
    // ========================================

    pub fn set_vbus_voltage_limit(&mut self, limit: VbusVoltageLimit) -> Result<(), Error<B::Error>> {
        self.bus.modify(AXP2101_INPUT_VOL_LIMIT_CTRL, 0xF0, limit as u8)
    }

    pub fn vbus_voltage_limit(&mut self) -> Result<u8, Error<B::Error>> {
        Ok(self.bus.read_u8(AXP2101_INPUT_VOL_LIMIT_CTRL)? & 0x0F)
    }

    pub fn set_vbus_current_limit(&mut self, limit: VbusCurrentLimit) -> Result<(), Error<B::Error>> {
        self.bus.modify(AXP2101_INPUT_CUR_LIMIT_CTRL, 0xF8, limit as u8)
    }

    pub fn vbus_current_limit(&mut self) -> Result<u8, Error<B::Error>> {
        Ok(self.bus.read_u8(AXP2101_INPUT_CUR_LIMIT_CTRL)? & 0x07)
    }

    /// Set system power down voltage (2600-3300mV, 100mV steps)
    pub fn set_sys_power_down_voltage(&mut self, millivolt: u16) -> Result<(), Error<B::Error>> {
        if !(AXP2101_VSYS_VOL_THRESHOLD_MIN..=AXP2101_VSYS_VOL_THRESHOLD_MAX).contains(&millivolt)
            || millivolt % AXP2101_VSYS_VOL_THRESHOLD_STEPS != 0
        {
            return Err(Error::InvalidVoltage);
        }
        let code = (millivolt - AXP2101_VSYS_VOL_THRESHOLD_MIN) / AXP2101_VSYS_VOL_THRESHOLD_STEPS;
        self.bus.modify(AXP2101_VOFF_SET, 0xF8, code as u8)
    }

    pub fn sys_power_down_voltage(&mut self) -> Result<u16, Error<B::Error>> {
        let code = self.bus.read_u8(AXP2101_VOFF_SET)? & 0x07;
        Ok(code as u16 * AXP2101_VSYS_VOL_THRESHOLD_STEPS + AXP2101_VSYS_VOL_THRESHOLD_MIN)
    }

    // ========================================
    // Power key and protection
    // ========================================

    pub fn set_power_key_off_time(&mut self, time: PowerKeyOffTime) -> Result<(), Error<B::Error>> {
        self.bus
            .modify(AXP2101_IRQ_OFF_ON_LEVEL_CTRL, 0xF3, (time as u8) << 2)
    }

    pub fn power_key_off_time(&mut self) -> Result<PowerKeyOffTime, Error<B::Error>> {
        let val = self.bus.read_u8(AXP2101_IRQ_OFF_ON_LEVEL_CTRL)?;
        Ok(PowerKeyOffTime::from_bits(val >> 2))
    }

    pub fn set_power_key_on_time(&mut self, time: PowerKeyOnTime) -> Result<(), Error<B::Error>> {
        self.bus
            .modify(AXP2101_IRQ_OFF_ON_LEVEL_CTRL, 0xFC, time as u8)
    }

    pub fn power_key_on_time(&mut self) -> Result<PowerKeyOnTime, Error<B::Error>> {
        let val = self.bus.read_u8(AXP2101_IRQ_OFF_ON_LEVEL_CTRL)?;
        Ok(PowerKeyOnTime::from_bits(val))
    }

    /// DCDC 120%/130% over-voltage turns the PMIC off
    pub fn is_dc_high_voltage_power_down_enabled(&mut self) -> Result<bool, Error<B::Error>> {
        self.bus.get_bit(AXP2101_DC_OVP_UVP_CTRL, 5)
    }

    /// DCx 85% under-voltage turns the PMIC off. Only DC1-DC5 have this.
    pub fn is_dc_low_voltage_power_down_enabled(
        &mut self,
        channel: PowerChannel,
    ) -> Result<bool, Error<B::Error>> {
        let bit = match channel {
            PowerChannel::Dcdc1
            | PowerChannel::Dcdc2
            | PowerChannel::Dcdc3
            | PowerChannel::Dcdc4
            | PowerChannel::Dcdc5 => channel as u8,
            _ => return Err(Error::InvalidParameter),
        };
        self.bus.get_bit(AXP2101_DC_OVP_UVP_CTRL, bit)
    }

    // ========================================
    // ADC
    // ========================================

    /// Disconnect the TS pin from the charger (boards without a thermistor)
    pub fn disable_ts_pin_measure(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.modify(AXP2101_TS_PIN_CTRL, 0xF0, 0x10)?;
        self.bus.clear_bit(AXP2101_ADC_CHANNEL_CTRL, ADC_TS_PIN_BIT)
    }

    pub fn enable_ts_pin_measure(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.modify(AXP2101_TS_PIN_CTRL, 0xE0, 0x07)?;
        self.bus.set_bit(AXP2101_ADC_CHANNEL_CTRL, ADC_TS_PIN_BIT)
    }

    pub fn enable_temperature_measure(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.set_bit(AXP2101_ADC_CHANNEL_CTRL, ADC_DIE_TEMP_BIT)
    }

    pub fn enable_system_voltage_measure(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.set_bit(AXP2101_ADC_CHANNEL_CTRL, ADC_VSYS_VOLTAGE_BIT)
    }

    pub fn enable_vbus_voltage_measure(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.set_bit(AXP2101_ADC_CHANNEL_CTRL, ADC_VBUS_VOLTAGE_BIT)
    }

    pub fn enable_battery_voltage_measure(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.set_bit(AXP2101_ADC_CHANNEL_CTRL, ADC_BATT_VOLTAGE_BIT)
    }

    pub fn enable_general_adc_channel(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.set_bit(AXP2101_ADC_CHANNEL_CTRL, ADC_GENERAL_BIT)
    }

    pub fn enable_battery_detection(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.set_bit(AXP2101_BAT_DET_CTRL, 0)
    }

    /// Battery voltage in mV, read whether or not a battery is detected
    pub fn battery_voltage(&mut self) -> Result<u16, Error<B::Error>> {
        self.bus
            .read_h5l8(AXP2101_ADC_DATA_RELUST0, AXP2101_ADC_DATA_RELUST1)
    }

    /// Fuel gauge state of charge, 0-100
    pub fn battery_percent(&mut self) -> Result<u8, Error<B::Error>> {
        self.bus.read_u8(AXP2101_BAT_PERCENT_DATA)
    }

    /// VBUS voltage in mV, 0 when VBUS is absent
    pub fn vbus_voltage(&mut self) -> Result<u16, Error<B::Error>> {
        if !self.is_vbus_in()? {
            return Ok(0);
        }
        self.bus
            .read_h6l8(AXP2101_ADC_DATA_RELUST4, AXP2101_ADC_DATA_RELUST5)
    }

    pub fn system_voltage(&mut self) -> Result<u16, Error<B::Error>> {
        self.bus
            .read_h6l8(AXP2101_ADC_DATA_RELUST6, AXP2101_ADC_DATA_RELUST7)
    }

    pub fn ts_pin_value(&mut self) -> Result<u16, Error<B::Error>> {
        self.bus
            .read_h6l8(AXP2101_ADC_DATA_RELUST2, AXP2101_ADC_DATA_RELUST3)
    }

    /// Die temperature in °C from the AXP2101 ADC
    pub fn temperature(&mut self) -> Result<f32, Error<B::Error>> {
        let raw = self
            .bus
            .read_h6l8(AXP2101_ADC_DATA_RELUST8, AXP2101_ADC_DATA_RELUST9)?;
        Ok(die_temp_conversion(raw))
    }

    // ========================================
    // Charging
    // ========================================

    pub fn set_charging_led_mode(&mut self, mode: ChargeLedMode) -> Result<(), Error<B::Error>> {
        match mode {
            ChargeLedMode::Off
            | ChargeLedMode::Blink1Hz
            | ChargeLedMode::Blink4Hz
            | ChargeLedMode::On => {
                // manual control, output level in bits [5:4]
                self.bus
                    .modify(AXP2101_CHGLED_SET_CTRL, 0xC8, 0x05 | ((mode as u8) << 4))
            }
            ChargeLedMode::ControlledByCharger => {
                self.bus.modify(AXP2101_CHGLED_SET_CTRL, 0xF9, 0x01)
            }
        }
    }

    pub fn set_precharge_current(&mut self, current: PrechargeCurrent) -> Result<(), Error<B::Error>> {
        self.bus.modify(AXP2101_IPRECHG_SET, 0xF0, current as u8)
    }

    pub fn set_charger_constant_current(&mut self, current: ChargeCurrent) -> Result<(), Error<B::Error>> {
        self.bus.modify(AXP2101_ICC_CHG_SET, 0xE0, current as u8)
    }

    pub fn charger_constant_current(&mut self) -> Result<u8, Error<B::Error>> {
        Ok(self.bus.read_u8(AXP2101_ICC_CHG_SET)? & 0x1F)
    }

    pub fn set_charger_termination_current(
        &mut self,
        current: ChargeTerminationCurrent,
    ) -> Result<(), Error<B::Error>> {
        self.bus
            .modify(AXP2101_ITERM_CHG_SET_CTRL, 0xF0, current as u8)
    }

    pub fn set_charge_target_voltage(&mut self, voltage: ChargeVoltage) -> Result<(), Error<B::Error>> {
        self.bus.modify(AXP2101_CV_CHG_VOL_SET, 0xF8, voltage as u8)
    }

    pub fn charge_target_voltage(&mut self) -> Result<u8, Error<B::Error>> {
        Ok(self.bus.read_u8(AXP2101_CV_CHG_VOL_SET)? & 0x07)
    }

    // ========================================
    // Interrupts
    // ========================================

    pub fn enable_irq(&mut self, mask: u32) -> Result<(), Error<B::Error>> {
        self.set_irq_mask(mask, true)
    }

    pub fn disable_irq(&mut self, mask: u32) -> Result<(), Error<B::Error>> {
        self.set_irq_mask(mask, false)
    }

    fn set_irq_mask(&mut self, mask: u32, enable: bool) -> Result<(), Error<B::Error>> {
        let regs = [AXP2101_INTEN1, AXP2101_INTEN2, AXP2101_INTEN3];
        for (i, reg) in regs.into_iter().enumerate() {
            let bits = (mask >> (8 * i)) as u8;
            if bits == 0 {
                continue;
            }
            let current = self.bus.read_u8(reg)?;
            let next = if enable { current | bits } else { current & !bits };
            self.bus.write_u8(reg, next)?;
        }
        Ok(())
    }

    pub fn irq_status(&mut self) -> Result<InterruptFlags, Error<B::Error>> {
        Ok(InterruptFlags {
            status1: self.bus.read_u8(AXP2101_INTSTS1)?,
            status2: self.bus.read_u8(AXP2101_INTSTS2)?,
            status3: self.bus.read_u8(AXP2101_INTSTS3)?,
        })
    }

    /// Status bits are write-1-to-clear
    pub fn clear_irq_status(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.write_u8(AXP2101_INTSTS1, 0xFF)?;
        self.bus.write_u8(AXP2101_INTSTS2, 0xFF)?;
        self.bus.write_u8(AXP2101_INTSTS3, 0xFF)
    }

    // ========================================
    // Watchdog
    // ========================================

    /// Enable watchdog and its expiry IRQ
    pub fn enable_watchdog(&mut self) -> Result<(), Error<B::Error>> {
        self.enable_irq(irq::WDT_EXPIRE)?;
        self.bus.set_bit(AXP2101_CHARGE_GAUGE_WDT_CTRL, 0)
    }

    pub fn disable_watchdog(&mut self) -> Result<(), Error<B::Error>> {
        self.disable_irq(irq::WDT_EXPIRE)?;
        self.bus.clear_bit(AXP2101_CHARGE_GAUGE_WDT_CTRL, 0)
    }

    pub fn set_watchdog_config(&mut self, config: WatchdogConfig) -> Result<(), Error<B::Error>> {
        self.bus.modify(AXP2101_WDT_CTRL, 0xCF, (config as u8) << 4)
    }

    pub fn set_watchdog_timeout(&mut self, timeout: WatchdogTimeout) -> Result<(), Error<B::Error>> {
        self.bus.modify(AXP2101_WDT_CTRL, 0xF8, timeout as u8)
    }

    /// Feed the watchdog
    pub fn clear_watchdog(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.set_bit(AXP2101_WDT_CTRL, 3)
    }

    // ========================================
    // Button battery
    // ========================================

    pub fn enable_button_battery_charge(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.set_bit(AXP2101_CHARGE_GAUGE_WDT_CTRL, 2)
    }

    pub fn disable_button_battery_charge(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.clear_bit(AXP2101_CHARGE_GAUGE_WDT_CTRL, 2)
    }

    pub fn is_button_battery_charge_enabled(&mut self) -> Result<bool, Error<B::Error>> {
        self.bus.get_bit(AXP2101_CHARGE_GAUGE_WDT_CTRL, 2)
    }

    /// Set button battery charge voltage (2600-3300mV, 100mV steps)
    pub fn set_button_battery_charge_voltage(&mut self, millivolt: u16) -> Result<(), Error<B::Error>> {
        if !(AXP2101_BTN_VOL_MIN..=AXP2101_BTN_VOL_MAX).contains(&millivolt)
            || millivolt % AXP2101_BTN_VOL_STEPS != 0
        {
            return Err(Error::InvalidVoltage);
        }
        let code = (millivolt - AXP2101_BTN_VOL_MIN) / AXP2101_BTN_VOL_STEPS;
        self.bus.modify(AXP2101_BTN_BAT_CHG_VOL_SET, 0xF8, code as u8)
    }

    pub fn button_battery_voltage(&mut self) -> Result<u16, Error<B::Error>> {
        let code = self.bus.read_u8(AXP2101_BTN_BAT_CHG_VOL_SET)? & 0x07;
        Ok(code as u16 * AXP2101_BTN_VOL_STEPS + AXP2101_BTN_VOL_MIN)
    }

    /// Turn off every channel except VRTC
    pub fn shutdown(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.set_bit(AXP2101_COMMON_CONFIG, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RegisterFile;

    fn pmic() -> Axp2101<RegisterFile> {
        Axp2101::from_bus(RegisterFile::new())
    }

    #[test]
    fn rail_encoding_matches_datasheet_segments() {
        assert_eq!(encode_rail_voltage(PowerChannel::Dcdc1, 3300), Some(18));
        assert_eq!(encode_rail_voltage(PowerChannel::Dcdc2, 1000), Some(50));
        assert_eq!(encode_rail_voltage(PowerChannel::Dcdc2, 1220), Some(71));
        assert_eq!(encode_rail_voltage(PowerChannel::Dcdc3, 3300), Some(88 + 17));
        assert_eq!(encode_rail_voltage(PowerChannel::Dcdc4, 1840), Some(71 + 31));
        assert_eq!(encode_rail_voltage(PowerChannel::Dcdc5, 1200), Some(24));
        assert_eq!(encode_rail_voltage(PowerChannel::Dcdc5, 3300), Some(19));
        assert_eq!(encode_rail_voltage(PowerChannel::CpuSldo, 1000), Some(10));
        assert_eq!(encode_rail_voltage(PowerChannel::Dldo2, 1400), Some(18));
    }

    #[test]
    fn rail_encoding_rejects_off_grid_and_out_of_range() {
        assert_eq!(encode_rail_voltage(PowerChannel::Dcdc1, 3350), None);
        assert_eq!(encode_rail_voltage(PowerChannel::Dcdc1, 1400), None);
        assert_eq!(encode_rail_voltage(PowerChannel::Dcdc2, 1230), None);
        assert_eq!(encode_rail_voltage(PowerChannel::Dcdc3, 1560), None);
        assert_eq!(encode_rail_voltage(PowerChannel::Aldo1, 3600), None);
        assert_eq!(encode_rail_voltage(PowerChannel::Dldo1, 3500), None);
    }

    #[test]
    fn decode_skips_reserved_codes() {
        assert_eq!(decode_rail_voltage(PowerChannel::Dcdc2, 87), Some(1540));
        assert_eq!(decode_rail_voltage(PowerChannel::Dcdc2, 96), None);
        assert_eq!(decode_rail_voltage(PowerChannel::Dcdc5, 24), Some(1200));
        assert_eq!(decode_rail_voltage(PowerChannel::Dcdc5, 25), None);
        // bits above the code field are ignored
        assert_eq!(decode_rail_voltage(PowerChannel::Aldo1, 0xE0 | 28), Some(3300));
    }

    #[test]
    fn set_voltage_preserves_bits_outside_the_code() {
        let mut pmic = pmic();
        pmic.bus().set(AXP2101_DC_VOL1_CTRL, 0x80);
        pmic.set_voltage(PowerChannel::Dcdc2, 1000).unwrap();
        assert_eq!(pmic.bus().get(AXP2101_DC_VOL1_CTRL), 0x80 | 50);
        assert_eq!(pmic.voltage(PowerChannel::Dcdc2), Ok(1000));
    }

    #[test]
    fn invalid_voltage_writes_nothing() {
        let mut pmic = pmic();
        assert_eq!(
            pmic.set_voltage(PowerChannel::Aldo3, 3550),
            Err(Error::InvalidVoltage)
        );
        assert!(pmic.bus().writes.is_empty());
    }

    #[test]
    fn rail_enable_bits() {
        let mut pmic = pmic();
        pmic.enable(PowerChannel::Dcdc3).unwrap();
        pmic.enable(PowerChannel::Dldo1).unwrap();
        pmic.enable(PowerChannel::Dldo2).unwrap();
        assert_eq!(pmic.bus().get(AXP2101_DC_ONOFF_DVM_CTRL), 0b0000_0100);
        assert_eq!(pmic.bus().get(AXP2101_LDO_ONOFF_CTRL0), 0b1000_0000);
        assert_eq!(pmic.bus().get(AXP2101_LDO_ONOFF_CTRL1), 0b0000_0001);
        pmic.disable(PowerChannel::Dcdc3).unwrap();
        assert_eq!(pmic.is_enabled(PowerChannel::Dcdc3), Ok(false));
        assert_eq!(pmic.is_enabled(PowerChannel::Dldo1), Ok(true));
    }

    #[test]
    fn vbus_in_requires_good_and_not_absent() {
        let mut pmic = pmic();
        pmic.bus().set(AXP2101_STATUS1, 1 << 5);
        pmic.bus().set(AXP2101_STATUS2, 0);
        assert_eq!(pmic.is_vbus_in(), Ok(true));
        pmic.bus().set(AXP2101_STATUS2, 1 << 3);
        assert_eq!(pmic.is_vbus_in(), Ok(false));
        pmic.bus().set(AXP2101_STATUS1, 0);
        pmic.bus().set(AXP2101_STATUS2, 0);
        assert_eq!(pmic.is_vbus_in(), Ok(false));
    }

    #[test]
    fn irq_mask_bytes_map_to_enable_registers() {
        let mut pmic = pmic();
        pmic.bus().set(AXP2101_INTEN2, 0x01);
        pmic.enable_irq(irq::VBUS_INSERT | irq::BAT_CHG_DONE).unwrap();
        assert_eq!(pmic.bus().get(AXP2101_INTEN1), 0x00);
        assert_eq!(pmic.bus().get(AXP2101_INTEN2), 0x81);
        assert_eq!(pmic.bus().get(AXP2101_INTEN3), 0x10);
        assert!(pmic.bus().writes_to(AXP2101_INTEN1).is_empty());

        pmic.disable_irq(irq::ALL).unwrap();
        assert_eq!(pmic.bus().get(AXP2101_INTEN2), 0x00);
        assert_eq!(pmic.bus().get(AXP2101_INTEN3), 0x00);
    }

    #[test]
    fn power_key_times_share_one_register() {
        let mut pmic = pmic();
        pmic.bus().set(AXP2101_IRQ_OFF_ON_LEVEL_CTRL, 0x30);
        pmic.set_power_key_off_time(PowerKeyOffTime::S8).unwrap();
        pmic.set_power_key_on_time(PowerKeyOnTime::S1).unwrap();
        assert_eq!(pmic.bus().get(AXP2101_IRQ_OFF_ON_LEVEL_CTRL), 0x30 | 0b1000 | 0b10);
        assert_eq!(pmic.power_key_off_time(), Ok(PowerKeyOffTime::S8));
        assert_eq!(pmic.power_key_on_time(), Ok(PowerKeyOnTime::S1));
    }

    #[test]
    fn low_voltage_power_down_only_exists_on_dcdc() {
        let mut pmic = pmic();
        pmic.bus().set(AXP2101_DC_OVP_UVP_CTRL, 0b0010_0010);
        assert_eq!(pmic.is_dc_high_voltage_power_down_enabled(), Ok(true));
        assert_eq!(pmic.is_dc_low_voltage_power_down_enabled(PowerChannel::Dcdc2), Ok(true));
        assert_eq!(pmic.is_dc_low_voltage_power_down_enabled(PowerChannel::Dcdc1), Ok(false));
        assert_eq!(
            pmic.is_dc_low_voltage_power_down_enabled(PowerChannel::Aldo1),
            Err(Error::InvalidParameter)
        );
    }

    #[test]
    fn charge_led_off_selects_manual_mode() {
        let mut pmic = pmic();
        pmic.bus().set(AXP2101_CHGLED_SET_CTRL, 0xFF);
        pmic.set_charging_led_mode(ChargeLedMode::Off).unwrap();
        assert_eq!(pmic.bus().get(AXP2101_CHGLED_SET_CTRL), 0xC8 | 0x05);
    }

    #[test]
    fn button_battery_voltage_range() {
        let mut pmic = pmic();
        pmic.set_button_battery_charge_voltage(3300).unwrap();
        assert_eq!(pmic.bus().get(AXP2101_BTN_BAT_CHG_VOL_SET), 7);
        assert_eq!(pmic.button_battery_voltage(), Ok(3300));
        assert_eq!(
            pmic.set_button_battery_charge_voltage(3500),
            Err(Error::InvalidVoltage)
        );
    }

    #[test]
    fn init_accepts_both_known_chip_ids() {
        let mut pmic = pmic();
        pmic.bus().set(AXP2101_IC_TYPE, AXP2101_CHIP_ID_M5);
        assert_eq!(pmic.init(), Ok(()));
        pmic.bus().set(AXP2101_IC_TYPE, 0x03);
        assert_eq!(pmic.init(), Err(Error::DeviceNotFound));
    }
}
