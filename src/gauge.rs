//! Core2 measurement block: legacy ADC words, coulomb counter, sleep-side switches
//!
//! These registers are the ones the Core2 board support has always used.
//! Each ADC word has a fixed packing, so reads go through [`LegacyAdc`]
//! instead of letting callers pick a helper.

use crate::bus::RegisterBus;
use crate::driver::Axp2101;
use crate::error::Error;
use crate::registers::*;

/// Packing of a two-register ADC word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcWidth {
    /// `b0 << 4 | b1`
    Bits12,
    /// `b0 << 5 | b1`
    Bits13,
}

/// ADC channels of the Core2 measurement block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LegacyAdc {
    VinVoltage,
    VinCurrent,
    VbusVoltage,
    VbusCurrent,
    Temperature,
    BatteryVoltage,
    ApsVoltage,
    BatteryChargeCurrent,
    BatteryDischargeCurrent,
}

impl LegacyAdc {
    pub fn register(self) -> u8 {
        match self {
            LegacyAdc::VinVoltage => CORE2_ADC_VIN_VOLTAGE,
            LegacyAdc::VinCurrent => CORE2_ADC_VIN_CURRENT,
            LegacyAdc::VbusVoltage => CORE2_ADC_VBUS_VOLTAGE,
            LegacyAdc::VbusCurrent => CORE2_ADC_VBUS_CURRENT,
            LegacyAdc::Temperature => CORE2_ADC_TEMPERATURE,
            LegacyAdc::BatteryVoltage => CORE2_ADC_BAT_VOLTAGE,
            LegacyAdc::ApsVoltage => CORE2_ADC_APS_VOLTAGE,
            LegacyAdc::BatteryChargeCurrent => CORE2_ADC_BAT_CHARGE_CURRENT,
            LegacyAdc::BatteryDischargeCurrent => CORE2_ADC_BAT_DISCHARGE_CURRENT,
        }
    }

    pub fn width(self) -> AdcWidth {
        match self {
            LegacyAdc::BatteryChargeCurrent | LegacyAdc::BatteryDischargeCurrent => AdcWidth::Bits13,
            _ => AdcWidth::Bits12,
        }
    }
}

// LSB scales
const VIN_VOLTAGE_LSB_V: f32 = 1.7 / 1000.0;
const VIN_CURRENT_LSB_MA: f32 = 0.625;
const VBUS_VOLTAGE_LSB_V: f32 = 1.7 / 1000.0;
const VBUS_CURRENT_LSB_MA: f32 = 0.375;
const BAT_CURRENT_LSB_MA: f32 = 0.5;
const APS_VOLTAGE_LSB_V: f32 = 1.4 / 1000.0;
const TEMP_LSB_C: f32 = 0.1;
const TEMP_OFFSET_C: f32 = -144.7;
const BAT_POWER_VOLTAGE_LSB: f32 = 1.1;
const BAT_POWER_CURRENT_LSB: f32 = 0.5;

/// Convert a coulomb accumulator value (in samples) to mAh.
///
/// `sample_rate_hz` must match the ADC rate the chip is running at.
pub fn coulomb_to_mah(raw: i64, sample_rate_hz: f32) -> f32 {
    raw as f32 * 65536.0 * BAT_CURRENT_LSB_MA / 3600.0 / sample_rate_hz
}

/// Die temperature in °C from the 12-bit legacy ADC word
pub fn legacy_temperature(raw: u16) -> f32 {
    TEMP_OFFSET_C + raw as f32 * TEMP_LSB_C
}

impl<B: RegisterBus> Axp2101<B> {
    pub fn read_adc(&mut self, channel: LegacyAdc) -> Result<u16, Error<B::Error>> {
        match channel.width() {
            AdcWidth::Bits12 => self.bus().read_12bit(channel.register()),
            AdcWidth::Bits13 => self.bus().read_13bit(channel.register()),
        }
    }

    /// Net battery current in mA, positive while charging
    pub fn battery_current(&mut self) -> Result<f32, Error<B::Error>> {
        let charge = self.read_adc(LegacyAdc::BatteryChargeCurrent)? as f32;
        let discharge = self.read_adc(LegacyAdc::BatteryDischargeCurrent)? as f32;
        Ok((charge - discharge) * BAT_CURRENT_LSB_MA)
    }

    pub fn battery_charge_current(&mut self) -> Result<f32, Error<B::Error>> {
        Ok(self.read_adc(LegacyAdc::BatteryChargeCurrent)? as f32 * BAT_CURRENT_LSB_MA)
    }

    /// Volts
    pub fn vin_voltage(&mut self) -> Result<f32, Error<B::Error>> {
        Ok(self.read_adc(LegacyAdc::VinVoltage)? as f32 * VIN_VOLTAGE_LSB_V)
    }

    /// mA
    pub fn vin_current(&mut self) -> Result<f32, Error<B::Error>> {
        Ok(self.read_adc(LegacyAdc::VinCurrent)? as f32 * VIN_CURRENT_LSB_MA)
    }

    /// Volts
    pub fn vbus_adc_voltage(&mut self) -> Result<f32, Error<B::Error>> {
        Ok(self.read_adc(LegacyAdc::VbusVoltage)? as f32 * VBUS_VOLTAGE_LSB_V)
    }

    /// mA
    pub fn vbus_adc_current(&mut self) -> Result<f32, Error<B::Error>> {
        Ok(self.read_adc(LegacyAdc::VbusCurrent)? as f32 * VBUS_CURRENT_LSB_MA)
    }

    pub fn adc_temperature(&mut self) -> Result<f32, Error<B::Error>> {
        Ok(legacy_temperature(self.read_adc(LegacyAdc::Temperature)?))
    }

    /// mW
    pub fn battery_power(&mut self) -> Result<f32, Error<B::Error>> {
        let raw = self.bus().read_u24(CORE2_ADC_BAT_POWER)?;
        Ok(BAT_POWER_VOLTAGE_LSB * BAT_POWER_CURRENT_LSB * raw as f32 / 1000.0)
    }

    /// Volts
    pub fn aps_voltage(&mut self) -> Result<f32, Error<B::Error>> {
        Ok(self.read_adc(LegacyAdc::ApsVoltage)? as f32 * APS_VOLTAGE_LSB_V)
    }

    /// Battery present bit of the power mode register
    pub fn battery_state(&mut self) -> Result<bool, Error<B::Error>> {
        Ok(self.bus().read_u8(AXP2101_STATUS2)? & 0x20 != 0)
    }

    pub fn battery_data(&mut self) -> Result<u8, Error<B::Error>> {
        self.bus().read_u8(CORE2_BAT_DATA)
    }

    pub fn warning_level(&mut self) -> Result<bool, Error<B::Error>> {
        self.bus().get_bit(CORE2_WARNING_LEVEL, 0)
    }

    // ========================================
    // Coulomb counter
    // ========================================
    //
    // The control register takes whole-byte states; other bits are not kept.

    pub fn enable_coulomb_counter(&mut self) -> Result<(), Error<B::Error>> {
        self.bus().write_u8(CORE2_COULOMB_CTRL, COULOMB_ENABLE)
    }

    pub fn disable_coulomb_counter(&mut self) -> Result<(), Error<B::Error>> {
        self.bus().write_u8(CORE2_COULOMB_CTRL, COULOMB_DISABLE)
    }

    pub fn stop_coulomb_counter(&mut self) -> Result<(), Error<B::Error>> {
        self.bus().write_u8(CORE2_COULOMB_CTRL, COULOMB_STOP)
    }

    pub fn clear_coulomb_counter(&mut self) -> Result<(), Error<B::Error>> {
        self.bus().write_u8(CORE2_COULOMB_CTRL, COULOMB_CLEAR)
    }

    /// Clear the accumulators without the enable bit (counter ends up off)
    pub fn clear_coulomb_flag(&mut self) -> Result<(), Error<B::Error>> {
        self.bus().write_u8(CORE2_COULOMB_CTRL, COULOMB_CLEAR_FLAG)
    }

    pub fn coulomb_charge_raw(&mut self) -> Result<u32, Error<B::Error>> {
        self.bus().read_u32(CORE2_COULOMB_CHARGE)
    }

    pub fn coulomb_discharge_raw(&mut self) -> Result<u32, Error<B::Error>> {
        self.bus().read_u32(CORE2_COULOMB_DISCHARGE)
    }

    /// Charge counted into the battery, mAh
    pub fn coulomb_input(&mut self, sample_rate_hz: f32) -> Result<f32, Error<B::Error>> {
        Ok(coulomb_to_mah(self.coulomb_charge_raw()? as i64, sample_rate_hz))
    }

    /// Charge counted out of the battery, mAh
    pub fn coulomb_output(&mut self, sample_rate_hz: f32) -> Result<f32, Error<B::Error>> {
        Ok(coulomb_to_mah(self.coulomb_discharge_raw()? as i64, sample_rate_hz))
    }

    /// Net charge, mAh. Negative when more went out than in.
    pub fn coulomb_data(&mut self, sample_rate_hz: f32) -> Result<f32, Error<B::Error>> {
        let charge = self.coulomb_charge_raw()? as i64;
        let discharge = self.coulomb_discharge_raw()? as i64;
        Ok(coulomb_to_mah(charge - discharge, sample_rate_hz))
    }

    // ========================================
    // Switches
    // ========================================

    /// All legacy ADC channels on or off
    pub fn set_adc_state(&mut self, on: bool) -> Result<(), Error<B::Error>> {
        self.bus()
            .write_u8(CORE2_ADC_ENABLE, if on { 0xFF } else { 0x00 })
    }

    pub fn set_ldo2(&mut self, on: bool) -> Result<(), Error<B::Error>> {
        if on {
            self.bus().set_bit(CORE2_OUTPUT_CTRL, CORE2_LDO2_BIT)
        } else {
            self.bus().clear_bit(CORE2_OUTPUT_CTRL, CORE2_LDO2_BIT)
        }
    }

    pub fn set_ldo3(&mut self, on: bool) -> Result<(), Error<B::Error>> {
        if on {
            self.bus().set_bit(CORE2_OUTPUT_CTRL, CORE2_LDO3_BIT)
        } else {
            self.bus().clear_bit(CORE2_OUTPUT_CTRL, CORE2_LDO3_BIT)
        }
    }

    /// Legacy charge current code, low 3 bits of 0x33
    pub fn set_legacy_charge_current(&mut self, code: u8) -> Result<(), Error<B::Error>> {
        self.bus().modify(CORE2_CHARGE_CTRL, 0xF0, code & 0x07)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RegisterFile;

    fn pmic() -> Axp2101<RegisterFile> {
        Axp2101::from_bus(RegisterFile::new())
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn coulomb_net_charge() {
        let mut pmic = pmic();
        pmic.bus().load(CORE2_COULOMB_CHARGE, &3600u32.to_be_bytes());
        pmic.bus().load(CORE2_COULOMB_DISCHARGE, &0u32.to_be_bytes());
        let mah = pmic.coulomb_data(25.0).unwrap();
        assert!(approx(mah, 1310.72), "{}", mah);
    }

    #[test]
    fn coulomb_net_charge_goes_negative() {
        let mut pmic = pmic();
        pmic.bus().load(CORE2_COULOMB_CHARGE, &0u32.to_be_bytes());
        pmic.bus().load(CORE2_COULOMB_DISCHARGE, &3600u32.to_be_bytes());
        let mah = pmic.coulomb_data(25.0).unwrap();
        assert!(approx(mah, -1310.72), "{}", mah);
    }

    #[test]
    fn coulomb_scale_follows_sample_rate() {
        assert!(approx(coulomb_to_mah(3600, 50.0), 655.36));
    }

    #[test]
    fn coulomb_control_overwrites_whole_byte() {
        let mut pmic = pmic();
        pmic.bus().set(CORE2_COULOMB_CTRL, 0x0F);
        pmic.stop_coulomb_counter().unwrap();
        pmic.clear_coulomb_counter().unwrap();
        assert_eq!(pmic.bus().writes_to(CORE2_COULOMB_CTRL), [0xC0, 0xA0]);
        assert_eq!(pmic.bus().reads, 0);
    }

    #[test]
    fn temperature_offset() {
        let mut pmic = pmic();
        // 90 << 4 | 7 == 1447
        pmic.bus().load(CORE2_ADC_TEMPERATURE, &[90, 7]);
        let t = pmic.adc_temperature().unwrap();
        assert!(approx(t, 0.0), "{}", t);
    }

    #[test]
    fn battery_current_is_signed() {
        let mut pmic = pmic();
        pmic.bus().load(CORE2_ADC_BAT_CHARGE_CURRENT, &[0, 10]);
        pmic.bus().load(CORE2_ADC_BAT_DISCHARGE_CURRENT, &[1, 0]);
        assert_eq!(pmic.battery_current(), Ok((10.0 - 32.0) * 0.5));
    }

    #[test]
    fn battery_state_tests_the_bit() {
        let mut pmic = pmic();
        pmic.bus().set(AXP2101_STATUS2, 0x00);
        assert_eq!(pmic.battery_state(), Ok(false));
        pmic.bus().set(AXP2101_STATUS2, 0x20);
        assert_eq!(pmic.battery_state(), Ok(true));
    }

    #[test]
    fn channel_width_selects_packing() {
        let mut pmic = pmic();
        pmic.bus().load(CORE2_ADC_BAT_CHARGE_CURRENT, &[1, 1]);
        pmic.bus().load(CORE2_ADC_BAT_VOLTAGE, &[1, 1]);
        assert_eq!(pmic.read_adc(LegacyAdc::BatteryChargeCurrent), Ok(33));
        assert_eq!(pmic.read_adc(LegacyAdc::BatteryVoltage), Ok(17));
    }
}
