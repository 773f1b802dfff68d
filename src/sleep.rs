//! Sleep entry, power off, power key and startup reason
//!
//! The MCU half of sleep (wake sources, entering sleep, reset reason) is
//! behind [`SleepControl`] so the PMIC side stays free of any HAL.

use core::convert::Infallible;

use crate::bus::RegisterBus;
use crate::driver::Axp2101;
use crate::error::Error;
use crate::registers::*;
use crate::types::ButtonPress;

/// ESP-IDF `esp_reset_reason_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ResetReason {
    Unknown = 0,
    PowerOn = 1,
    External = 2,
    Software = 3,
    Panic = 4,
    InterruptWatchdog = 5,
    TaskWatchdog = 6,
    Watchdog = 7,
    DeepSleep = 8,
    Brownout = 9,
    Sdio = 10,
}

impl ResetReason {
    pub fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => ResetReason::Unknown,
            1 => ResetReason::PowerOn,
            2 => ResetReason::External,
            3 => ResetReason::Software,
            4 => ResetReason::Panic,
            5 => ResetReason::InterruptWatchdog,
            6 => ResetReason::TaskWatchdog,
            7 => ResetReason::Watchdog,
            8 => ResetReason::DeepSleep,
            9 => ResetReason::Brownout,
            10 => ResetReason::Sdio,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResetReason::Unknown => "ESP_RST_UNKNOWN",
            ResetReason::PowerOn => "ESP_RST_POWERON",
            ResetReason::External => "ESP_RST_EXT",
            ResetReason::Software => "ESP_RST_SW",
            ResetReason::Panic => "ESP_RST_PANIC",
            ResetReason::InterruptWatchdog => "ESP_RST_INT_WDT",
            ResetReason::TaskWatchdog => "ESP_RST_TASK_WDT",
            ResetReason::Watchdog => "ESP_RST_WDT",
            ResetReason::DeepSleep => "ESP_RST_DEEPSLEEP",
            ResetReason::Brownout => "ESP_RST_BROWNOUT",
            ResetReason::Sdio => "ESP_RST_SDIO",
        }
    }
}

/// ESP-IDF `esp_sleep_source_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WakeupCause {
    Undefined = 0,
    All = 1,
    Ext0 = 2,
    Ext1 = 3,
    Timer = 4,
    Touchpad = 5,
    Ulp = 6,
    Gpio = 7,
    Uart = 8,
}

impl WakeupCause {
    pub fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => WakeupCause::Undefined,
            1 => WakeupCause::All,
            2 => WakeupCause::Ext0,
            3 => WakeupCause::Ext1,
            4 => WakeupCause::Timer,
            5 => WakeupCause::Touchpad,
            6 => WakeupCause::Ulp,
            7 => WakeupCause::Gpio,
            8 => WakeupCause::Uart,
            _ => return None,
        })
    }

    /// Name of a cause that identifies a wake source
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            WakeupCause::Ext0 => Some("ESP_SLEEP_WAKEUP_EXT0"),
            WakeupCause::Ext1 => Some("ESP_SLEEP_WAKEUP_EXT1"),
            WakeupCause::Timer => Some("ESP_SLEEP_WAKEUP_TIMER"),
            WakeupCause::Touchpad => Some("ESP_SLEEP_WAKEUP_TOUCHPAD"),
            WakeupCause::Ulp => Some("ESP_SLEEP_WAKEUP_ULP"),
            WakeupCause::Gpio => Some("ESP_SLEEP_WAKEUP_GPIO"),
            WakeupCause::Uart => Some("ESP_SLEEP_WAKEUP_UART"),
            WakeupCause::Undefined | WakeupCause::All => None,
        }
    }
}

/// Why the MCU is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupReason {
    Reset(ResetReason),
    /// Woke from deep sleep
    Wakeup(WakeupCause),
    UnknownReset,
    UnknownWakeup,
}

impl StartupReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StartupReason::Reset(reason) => reason.as_str(),
            StartupReason::Wakeup(cause) => cause.as_str().unwrap_or("WAKEUP_UNKNOWN_REASON"),
            StartupReason::UnknownReset => "RESET_UNKNOWN_REASON",
            StartupReason::UnknownWakeup => "WAKEUP_UNKNOWN_REASON",
        }
    }
}

/// MCU sleep controller
pub trait SleepControl {
    /// Wake when `pin` reads `level`
    fn enable_ext0_wakeup(&mut self, pin: u8, level: bool);

    fn enable_timer_wakeup(&mut self, micros: u64);

    fn disable_timer_wakeup(&mut self);

    fn deep_sleep_start(&mut self) -> !;

    fn light_sleep_start(&mut self);

    /// Raw `esp_reset_reason()`
    fn reset_reason(&self) -> u32;

    /// Raw `esp_sleep_get_wakeup_cause()`
    fn wakeup_cause(&self) -> u32;
}

/// Decode the MCU reset reason, and the wake source after deep sleep
pub fn startup_reason<S: SleepControl + ?Sized>(ctrl: &S) -> StartupReason {
    match ResetReason::from_raw(ctrl.reset_reason()) {
        Some(ResetReason::DeepSleep) => match WakeupCause::from_raw(ctrl.wakeup_cause()) {
            Some(cause) if cause.as_str().is_some() => StartupReason::Wakeup(cause),
            _ => StartupReason::UnknownWakeup,
        },
        Some(reason) => StartupReason::Reset(reason),
        None => StartupReason::UnknownReset,
    }
}

fn arm_timer<S: SleepControl + ?Sized>(ctrl: &mut S, micros: u64) {
    if micros > 0 {
        ctrl.enable_timer_wakeup(micros);
    } else {
        ctrl.disable_timer_wakeup();
    }
}

impl<B: RegisterBus> Axp2101<B> {
    /// Drop the board to its sleep power state: 3.0 V power-off voltage,
    /// GPIO1 floating, ADCs off, every output but DCDC1 off.
    pub fn prepare_sleep(&mut self) -> Result<(), Error<B::Error>> {
        self.bus().set_bit(CORE2_VOFF_CTRL, 3)?;
        self.bus().modify(CORE2_GPIO1_CTRL, 0xFF, 0x07)?;
        self.bus().write_u8(CORE2_ADC_ENABLE, 0x00)?;
        self.bus().modify(CORE2_OUTPUT_CTRL, 0xA1, 0x00)
    }

    /// Enter deep sleep, waking on `wakeup_pin` going low or after `micros`
    /// (0 means no timer). Only returns if a register write failed.
    pub fn deep_sleep<S: SleepControl + ?Sized>(
        &mut self,
        ctrl: &mut S,
        wakeup_pin: u8,
        micros: u64,
    ) -> Result<Infallible, Error<B::Error>> {
        self.prepare_sleep()?;
        ctrl.enable_ext0_wakeup(wakeup_pin, false);
        arm_timer(ctrl, micros);
        info!("entering deep sleep, timer {} us", micros);
        ctrl.deep_sleep_start()
    }

    /// Light sleep with an optional timer wake. PMIC outputs stay as they are.
    pub fn light_sleep<S: SleepControl + ?Sized>(&mut self, ctrl: &mut S, micros: u64) {
        arm_timer(ctrl, micros);
        ctrl.light_sleep_start();
    }

    /// Latched power key press, cleared once read
    pub fn button_press(&mut self) -> Result<ButtonPress, Error<B::Error>> {
        let state = self.bus().read_u8(CORE2_BUTTON_STATE)?;
        if state != 0 {
            self.bus().write_u8(CORE2_BUTTON_STATE, 0x03)?;
        }
        Ok(ButtonPress::from_raw(state))
    }

    /// Cut power to the board. Only a power key press or VBUS brings it back.
    pub fn power_off(&mut self) -> Result<(), Error<B::Error>> {
        warn!("powering off");
        self.bus().set_bit(CORE2_POWER_OFF_CTRL, CORE2_POWER_OFF_BIT)
    }
}
