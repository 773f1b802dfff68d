//! Type definitions and enumerations for AXP2101 configuration
//!
//! Discriminants are the raw field values written to the chip.

/// Power channel identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerChannel {
    Dcdc1 = 0,
    Dcdc2 = 1,
    Dcdc3 = 2,
    Dcdc4 = 3,
    Dcdc5 = 4,
    Aldo1 = 5,
    Aldo2 = 6,
    Aldo3 = 7,
    Aldo4 = 8,
    Bldo1 = 9,
    Bldo2 = 10,
    CpuSldo = 11,
    Dldo1 = 12,
    Dldo2 = 13,
}

impl PowerChannel {
    pub const ALL: [PowerChannel; 14] = [
        PowerChannel::Dcdc1,
        PowerChannel::Dcdc2,
        PowerChannel::Dcdc3,
        PowerChannel::Dcdc4,
        PowerChannel::Dcdc5,
        PowerChannel::Aldo1,
        PowerChannel::Aldo2,
        PowerChannel::Aldo3,
        PowerChannel::Aldo4,
        PowerChannel::Bldo1,
        PowerChannel::Bldo2,
        PowerChannel::CpuSldo,
        PowerChannel::Dldo1,
        PowerChannel::Dldo2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PowerChannel::Dcdc1 => "DC1",
            PowerChannel::Dcdc2 => "DC2",
            PowerChannel::Dcdc3 => "DC3",
            PowerChannel::Dcdc4 => "DC4",
            PowerChannel::Dcdc5 => "DC5",
            PowerChannel::Aldo1 => "ALDO1",
            PowerChannel::Aldo2 => "ALDO2",
            PowerChannel::Aldo3 => "ALDO3",
            PowerChannel::Aldo4 => "ALDO4",
            PowerChannel::Bldo1 => "BLDO1",
            PowerChannel::Bldo2 => "BLDO2",
            PowerChannel::CpuSldo => "CPUSLDO",
            PowerChannel::Dldo1 => "DLDO1",
            PowerChannel::Dldo2 => "DLDO2",
        }
    }
}

/// Minimum VBUS voltage before the PMU stops drawing from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum VbusVoltageLimit {
    V3_88 = 0,
    V3_96 = 1,
    V4_04 = 2,
    V4_12 = 3,
    V4_20 = 4,
    V4_28 = 5,
    V4_36 = 6,
    V4_44 = 7,
    V4_52 = 8,
    V4_60 = 9,
    V4_68 = 10,
    V4_76 = 11,
    V4_84 = 12,
    V4_92 = 13,
    V5_00 = 14,
    V5_08 = 15,
}

/// Maximum VBUS input current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum VbusCurrentLimit {
    I100mA = 0,
    I500mA = 1,
    I900mA = 2,
    I1000mA = 3,
    I1500mA = 4,
    I2000mA = 5,
}

/// Power key hold time that turns the PMU off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerKeyOffTime {
    S4 = 0,
    S6 = 1,
    S8 = 2,
    S10 = 3,
}

impl PowerKeyOffTime {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => PowerKeyOffTime::S4,
            1 => PowerKeyOffTime::S6,
            2 => PowerKeyOffTime::S8,
            _ => PowerKeyOffTime::S10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PowerKeyOffTime::S4 => "4 Second",
            PowerKeyOffTime::S6 => "6 Second",
            PowerKeyOffTime::S8 => "8 Second",
            PowerKeyOffTime::S10 => "10 Second",
        }
    }
}

/// Power key hold time that turns the PMU on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerKeyOnTime {
    Ms128 = 0,
    Ms512 = 1,
    S1 = 2,
    S2 = 3,
}

impl PowerKeyOnTime {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => PowerKeyOnTime::Ms128,
            1 => PowerKeyOnTime::Ms512,
            2 => PowerKeyOnTime::S1,
            _ => PowerKeyOnTime::S2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PowerKeyOnTime::Ms128 => "128 Ms",
            PowerKeyOnTime::Ms512 => "512 Ms",
            PowerKeyOnTime::S1 => "1 Second",
            PowerKeyOnTime::S2 => "2 Second",
        }
    }
}

/// Precharge current settings (25 mA per step)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PrechargeCurrent {
    I0mA = 0,
    I25mA = 1,
    I50mA = 2,
    I75mA = 3,
    I100mA = 4,
    I125mA = 5,
    I150mA = 6,
    I175mA = 7,
    I200mA = 8,
}

/// Constant-current charge limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChargeCurrent {
    I0mA = 0,
    I100mA = 4,
    I125mA = 5,
    I150mA = 6,
    I175mA = 7,
    I200mA = 8,
    I300mA = 9,
    I400mA = 10,
    I500mA = 11,
    I600mA = 12,
    I700mA = 13,
    I800mA = 14,
    I900mA = 15,
    I1000mA = 16,
}

/// Charge termination current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChargeTerminationCurrent {
    I0mA = 0,
    I25mA = 1,
    I50mA = 2,
    I75mA = 3,
    I100mA = 4,
    I125mA = 5,
    I150mA = 6,
    I175mA = 7,
    I200mA = 8,
}

/// Charge cut-off voltage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChargeVoltage {
    V4_0 = 1,
    V4_1 = 2,
    V4_2 = 3,
    V4_35 = 4,
    V4_4 = 5,
}

/// Charge status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargeStatus {
    TriCharge = 0,
    PreCharge = 1,
    ConstantCurrent = 2,
    ConstantVoltage = 3,
    ChargeDone = 4,
    NotCharging = 5,
}

/// Watchdog configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WatchdogConfig {
    /// Raise the IRQ pin only
    IrqOnly = 0,
    IrqAndReset = 1,
    IrqResetPullDownPwrOk = 2,
    IrqResetAllOff = 3,
}

/// Watchdog timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WatchdogTimeout {
    Timeout1s = 0,
    Timeout2s = 1,
    Timeout4s = 2,
    Timeout8s = 3,
    Timeout16s = 4,
    Timeout32s = 5,
    Timeout64s = 6,
    Timeout128s = 7,
}

/// Charge LED modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargeLedMode {
    Off = 0,
    Blink1Hz = 1,
    Blink4Hz = 2,
    On = 3,
    ControlledByCharger = 4,
}

/// Power key press reported by the Core2 button register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonPress {
    None,
    Long,
    Short,
    /// Both bits set, or an undocumented value
    Other(u8),
}

impl ButtonPress {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => ButtonPress::None,
            0x01 => ButtonPress::Long,
            0x02 => ButtonPress::Short,
            other => ButtonPress::Other(other),
        }
    }
}

/// Interrupt bit masks, XPowers layout: IRQ1 in bits 0-7, IRQ2 in 8-15, IRQ3 in 16-23.
pub mod irq {
    // IRQ1 (0x40 / 0x48)
    pub const BAT_WORK_UNDER_TEMP: u32 = 1 << 0;
    pub const BAT_WORK_OVER_TEMP: u32 = 1 << 1;
    pub const BAT_CHG_UNDER_TEMP: u32 = 1 << 2;
    pub const BAT_CHG_OVER_TEMP: u32 = 1 << 3;
    pub const GAUGE_NEW_SOC: u32 = 1 << 4;
    pub const WDT_TIMEOUT: u32 = 1 << 5;
    pub const WARNING_LEVEL1: u32 = 1 << 6;
    pub const WARNING_LEVEL2: u32 = 1 << 7;

    // IRQ2 (0x41 / 0x49)
    pub const PKEY_POSITIVE: u32 = 1 << 8;
    pub const PKEY_NEGATIVE: u32 = 1 << 9;
    pub const PKEY_LONG: u32 = 1 << 10;
    pub const PKEY_SHORT: u32 = 1 << 11;
    pub const BAT_REMOVE: u32 = 1 << 12;
    pub const BAT_INSERT: u32 = 1 << 13;
    pub const VBUS_REMOVE: u32 = 1 << 14;
    pub const VBUS_INSERT: u32 = 1 << 15;

    // IRQ3 (0x42 / 0x4A)
    pub const BAT_OVER_VOL: u32 = 1 << 16;
    pub const CHARGER_TIMER: u32 = 1 << 17;
    pub const DIE_OVER_TEMP: u32 = 1 << 18;
    pub const BAT_CHG_START: u32 = 1 << 19;
    pub const BAT_CHG_DONE: u32 = 1 << 20;
    pub const BATFET_OVER_CURR: u32 = 1 << 21;
    pub const LDO_OVER_CURR: u32 = 1 << 22;
    pub const WDT_EXPIRE: u32 = 1 << 23;

    pub const ALL: u32 = 0x00FF_FFFF;
}

/// Interrupt status snapshot, one byte per status register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptFlags {
    pub status1: u8,
    pub status2: u8,
    pub status3: u8,
}

impl InterruptFlags {
    /// Combined mask in the [`irq`] layout
    pub fn as_u32(&self) -> u32 {
        (self.status1 as u32) | ((self.status2 as u32) << 8) | ((self.status3 as u32) << 16)
    }

    pub fn contains(&self, mask: u32) -> bool {
        self.as_u32() & mask != 0
    }

    pub fn is_vbus_insert(&self) -> bool {
        self.contains(irq::VBUS_INSERT)
    }

    pub fn is_vbus_remove(&self) -> bool {
        self.contains(irq::VBUS_REMOVE)
    }

    pub fn is_battery_insert(&self) -> bool {
        self.contains(irq::BAT_INSERT)
    }

    pub fn is_battery_remove(&self) -> bool {
        self.contains(irq::BAT_REMOVE)
    }

    pub fn is_power_key_short(&self) -> bool {
        self.contains(irq::PKEY_SHORT)
    }

    pub fn is_power_key_long(&self) -> bool {
        self.contains(irq::PKEY_LONG)
    }

    pub fn is_charge_start(&self) -> bool {
        self.contains(irq::BAT_CHG_START)
    }

    pub fn is_charge_done(&self) -> bool {
        self.contains(irq::BAT_CHG_DONE)
    }

    pub fn is_watchdog_expire(&self) -> bool {
        self.contains(irq::WDT_EXPIRE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_flags_follow_register_order() {
        let flags = InterruptFlags {
            status1: 0x20,
            status2: 0x80,
            status3: 0x10,
        };
        assert_eq!(flags.as_u32(), irq::WDT_TIMEOUT | irq::VBUS_INSERT | irq::BAT_CHG_DONE);
        assert!(flags.is_vbus_insert());
        assert!(flags.is_charge_done());
        assert!(!flags.is_charge_start());
    }

    #[test]
    fn button_press_decodes_core2_states() {
        assert_eq!(ButtonPress::from_raw(0), ButtonPress::None);
        assert_eq!(ButtonPress::from_raw(1), ButtonPress::Long);
        assert_eq!(ButtonPress::from_raw(2), ButtonPress::Short);
        assert_eq!(ButtonPress::from_raw(3), ButtonPress::Other(3));
    }

    #[test]
    fn power_key_times_ignore_upper_bits() {
        assert_eq!(PowerKeyOffTime::from_bits(0b1110), PowerKeyOffTime::S8);
        assert_eq!(PowerKeyOnTime::from_bits(0xF0), PowerKeyOnTime::Ms128);
    }
}
