//! Register addresses and constants for AXP2101
//!
//! The first block follows the AXP2101 datasheet. The second block is the
//! measurement/control register set the M5Stack Core2 board support has
//! always addressed (coulomb counter, legacy ADC words, sleep bits); it is
//! kept separate because several of those addresses overlap AXP2101
//! registers with a different meaning.

/// Default 7-bit I2C address
pub const AXP2101_SLAVE_ADDRESS: u8 = 0x34;

/// Chip ID values seen in the field (datasheet 0x47, M5Stack Core2 v1.1 0x4A)
pub const AXP2101_CHIP_ID: u8 = 0x47;
pub const AXP2101_CHIP_ID_M5: u8 = 0x4A;

// ----------------------------------------
// Status and identification
// ----------------------------------------

/// VBUS good, BATFET, battery present/active, thermal and current limit flags
pub const AXP2101_STATUS1: u8 = 0x00;
/// Battery current direction, system power-on, VBUS insert, charger state
pub const AXP2101_STATUS2: u8 = 0x01;
/// Chip identification
pub const AXP2101_IC_TYPE: u8 = 0x03;

// ----------------------------------------
// Common configuration
// ----------------------------------------

/// Internal discharge, PWROK restart, PWRON shutdown, SoC reset, soft power-off
pub const AXP2101_COMMON_CONFIG: u8 = 0x10;
pub const AXP2101_BATFET_CTRL: u8 = 0x12;
pub const AXP2101_DIE_TEMP_CTRL: u8 = 0x13;
pub const AXP2101_MIN_SYS_VOL_CTRL: u8 = 0x14;
/// VBUS input voltage limit, bits [3:0]
pub const AXP2101_INPUT_VOL_LIMIT_CTRL: u8 = 0x15;
/// VBUS input current limit, bits [2:0]
pub const AXP2101_INPUT_CUR_LIMIT_CTRL: u8 = 0x16;
pub const AXP2101_RESET_FUEL_GAUGE: u8 = 0x17;
/// Gauge, button battery charge and watchdog enables
pub const AXP2101_CHARGE_GAUGE_WDT_CTRL: u8 = 0x18;
/// Watchdog config bits [5:4], clear bit 3, timeout bits [2:0]
pub const AXP2101_WDT_CTRL: u8 = 0x19;
pub const AXP2101_LOW_BAT_WARN_SET: u8 = 0x1A;

// ----------------------------------------
// Power on/off
// ----------------------------------------

pub const AXP2101_PWRON_STATUS: u8 = 0x20;
pub const AXP2101_PWROFF_STATUS: u8 = 0x21;
pub const AXP2101_PWROFF_EN: u8 = 0x22;
/// DCDC high-voltage (bit 5) and DC1-5 low-voltage (bits 0-4) power-down enables
pub const AXP2101_DC_OVP_UVP_CTRL: u8 = 0x23;
/// VSYS power-down voltage, bits [2:0]
pub const AXP2101_VOFF_SET: u8 = 0x24;
pub const AXP2101_PWROK_SEQU_CTRL: u8 = 0x25;
pub const AXP2101_SLEEP_WAKEUP_CTRL: u8 = 0x26;
/// Power key IRQ level [5:4], off time [3:2], on time [1:0]
pub const AXP2101_IRQ_OFF_ON_LEVEL_CTRL: u8 = 0x27;

// ----------------------------------------
// ADC
// ----------------------------------------

pub const AXP2101_ADC_CHANNEL_CTRL: u8 = 0x30;
pub const AXP2101_ADC_DATA_RELUST0: u8 = 0x34; // Battery voltage H
pub const AXP2101_ADC_DATA_RELUST1: u8 = 0x35; // Battery voltage L
pub const AXP2101_ADC_DATA_RELUST2: u8 = 0x36; // TS pin H
pub const AXP2101_ADC_DATA_RELUST3: u8 = 0x37; // TS pin L
pub const AXP2101_ADC_DATA_RELUST4: u8 = 0x38; // VBUS voltage H
pub const AXP2101_ADC_DATA_RELUST5: u8 = 0x39; // VBUS voltage L
pub const AXP2101_ADC_DATA_RELUST6: u8 = 0x3A; // VSYS voltage H
pub const AXP2101_ADC_DATA_RELUST7: u8 = 0x3B; // VSYS voltage L
pub const AXP2101_ADC_DATA_RELUST8: u8 = 0x3C; // Die temperature H
pub const AXP2101_ADC_DATA_RELUST9: u8 = 0x3D; // Die temperature L

/// ADC channel enable bits in `AXP2101_ADC_CHANNEL_CTRL`
pub const ADC_BATT_VOLTAGE_BIT: u8 = 0;
pub const ADC_TS_PIN_BIT: u8 = 1;
pub const ADC_VBUS_VOLTAGE_BIT: u8 = 2;
pub const ADC_VSYS_VOLTAGE_BIT: u8 = 3;
pub const ADC_DIE_TEMP_BIT: u8 = 4;
pub const ADC_GENERAL_BIT: u8 = 5;

// ----------------------------------------
// Interrupts
// ----------------------------------------

pub const AXP2101_INTEN1: u8 = 0x40;
pub const AXP2101_INTEN2: u8 = 0x41;
pub const AXP2101_INTEN3: u8 = 0x42;
pub const AXP2101_INTSTS1: u8 = 0x48;
pub const AXP2101_INTSTS2: u8 = 0x49;
pub const AXP2101_INTSTS3: u8 = 0x4A;

// ----------------------------------------
// Charger
// ----------------------------------------

pub const AXP2101_TS_PIN_CTRL: u8 = 0x50;
pub const AXP2101_IPRECHG_SET: u8 = 0x61;
pub const AXP2101_ICC_CHG_SET: u8 = 0x62;
pub const AXP2101_ITERM_CHG_SET_CTRL: u8 = 0x63;
pub const AXP2101_CV_CHG_VOL_SET: u8 = 0x64;
pub const AXP2101_THE_REGU_THRES_SET: u8 = 0x65;
pub const AXP2101_BAT_DET_CTRL: u8 = 0x68;
pub const AXP2101_CHGLED_SET_CTRL: u8 = 0x69;
/// Button (backup) battery charge voltage, bits [2:0]
pub const AXP2101_BTN_BAT_CHG_VOL_SET: u8 = 0x6A;

// ----------------------------------------
// Rails
// ----------------------------------------

/// DC1-5 enables (bits 0-4), DVM ramp (bit 5), CCM (bit 6)
pub const AXP2101_DC_ONOFF_DVM_CTRL: u8 = 0x80;
pub const AXP2101_DC_FORCE_PWM_CTRL: u8 = 0x81;
pub const AXP2101_DC_VOL0_CTRL: u8 = 0x82; // DC1
pub const AXP2101_DC_VOL1_CTRL: u8 = 0x83; // DC2
pub const AXP2101_DC_VOL2_CTRL: u8 = 0x84; // DC3
pub const AXP2101_DC_VOL3_CTRL: u8 = 0x85; // DC4
pub const AXP2101_DC_VOL4_CTRL: u8 = 0x86; // DC5

/// ALDO1-4, BLDO1-2, CPUSLDO, DLDO1 enables (bits 0-7)
pub const AXP2101_LDO_ONOFF_CTRL0: u8 = 0x90;
/// DLDO2 enable (bit 0)
pub const AXP2101_LDO_ONOFF_CTRL1: u8 = 0x91;
pub const AXP2101_LDO_VOL0_CTRL: u8 = 0x92; // ALDO1
pub const AXP2101_LDO_VOL1_CTRL: u8 = 0x93; // ALDO2
pub const AXP2101_LDO_VOL2_CTRL: u8 = 0x94; // ALDO3
pub const AXP2101_LDO_VOL3_CTRL: u8 = 0x95; // ALDO4
pub const AXP2101_LDO_VOL4_CTRL: u8 = 0x96; // BLDO1
pub const AXP2101_LDO_VOL5_CTRL: u8 = 0x97; // BLDO2
pub const AXP2101_LDO_VOL6_CTRL: u8 = 0x98; // CPUSLDO
pub const AXP2101_LDO_VOL7_CTRL: u8 = 0x99; // DLDO1
pub const AXP2101_LDO_VOL8_CTRL: u8 = 0x9A; // DLDO2

// ----------------------------------------
// Fuel gauge
// ----------------------------------------

pub const AXP2101_BAT_PARAMS: u8 = 0xA1;
pub const AXP2101_FUEL_GAUGE_CTRL: u8 = 0xA2;
pub const AXP2101_BAT_PERCENT_DATA: u8 = 0xA4;

// Button battery voltage
pub const AXP2101_BTN_VOL_MIN: u16 = 2600;
pub const AXP2101_BTN_VOL_MAX: u16 = 3300;
pub const AXP2101_BTN_VOL_STEPS: u16 = 100;

// VSYS threshold
pub const AXP2101_VSYS_VOL_THRESHOLD_MIN: u16 = 2600;
pub const AXP2101_VSYS_VOL_THRESHOLD_MAX: u16 = 3300;
pub const AXP2101_VSYS_VOL_THRESHOLD_STEPS: u16 = 100;

/// Die temperature from the 14-bit ADC word at 0x3C/0x3D
#[inline]
pub fn die_temp_conversion(raw: u16) -> f32 {
    22.0 + (7274.0 - raw as f32) / 20.0
}

// ========================================
// Core2 board measurement/control block
// ========================================

/// Power key press state (0 none, 1 long, 2 short); write 0x03 to clear
pub const CORE2_BUTTON_STATE: u8 = 0x46;
/// Low battery warning level, bit 0
pub const CORE2_WARNING_LEVEL: u8 = 0x47;

/// 12-bit ADC words (`H << 4 | L`)
pub const CORE2_ADC_VIN_VOLTAGE: u8 = 0x56;
pub const CORE2_ADC_VIN_CURRENT: u8 = 0x58;
pub const CORE2_ADC_VBUS_VOLTAGE: u8 = 0x5A;
pub const CORE2_ADC_VBUS_CURRENT: u8 = 0x5C;
pub const CORE2_ADC_TEMPERATURE: u8 = 0x5E;
pub const CORE2_ADC_BAT_VOLTAGE: u8 = 0x78;
pub const CORE2_ADC_APS_VOLTAGE: u8 = 0x7E;
/// 13-bit ADC words (`H << 5 | L`)
pub const CORE2_ADC_BAT_CHARGE_CURRENT: u8 = 0x7A;
pub const CORE2_ADC_BAT_DISCHARGE_CURRENT: u8 = 0x7C;
/// 24-bit battery instantaneous power
pub const CORE2_ADC_BAT_POWER: u8 = 0x70;
/// Raw battery data byte
pub const CORE2_BAT_DATA: u8 = 0x75;

/// Output switches: DCDC1 bit 0, LDO2 bit 2, LDO3 bit 3
pub const CORE2_OUTPUT_CTRL: u8 = 0x12;
pub const CORE2_LDO2_BIT: u8 = 2;
pub const CORE2_LDO3_BIT: u8 = 3;
/// Power-off voltage setting; bit 3 selects the 3.0 V cutoff used while asleep
pub const CORE2_VOFF_CTRL: u8 = 0x31;
/// Shutdown control; bit 7 powers the PMIC off
pub const CORE2_POWER_OFF_CTRL: u8 = 0x32;
pub const CORE2_POWER_OFF_BIT: u8 = 7;
/// Charge control; current select bits [2:0]
pub const CORE2_CHARGE_CTRL: u8 = 0x33;
/// ADC enable, whole byte
pub const CORE2_ADC_ENABLE: u8 = 0x82;
/// GPIO1 function; low three bits set = floating
pub const CORE2_GPIO1_CTRL: u8 = 0x90;

/// Coulomb counter accumulators, 32-bit big-endian
pub const CORE2_COULOMB_CHARGE: u8 = 0xB0;
pub const CORE2_COULOMB_DISCHARGE: u8 = 0xB4;
/// Coulomb counter control, written as whole bytes
pub const CORE2_COULOMB_CTRL: u8 = 0xB8;
pub const COULOMB_ENABLE: u8 = 0x80;
pub const COULOMB_DISABLE: u8 = 0x00;
pub const COULOMB_STOP: u8 = 0xC0;
pub const COULOMB_CLEAR: u8 = 0xA0;
/// Clear flag alone, without the enable bit
pub const COULOMB_CLEAR_FLAG: u8 = 0x20;

/// Brightness register for the M5Stack Core2 backlight duty (bits [6:3])
pub const CORE2_BACKLIGHT_CTRL: u8 = 0x27;
