//! Error types for AXP2101 operations
//!
//! Every register transaction returns a `Result`. A transport failure is
//! reported as [`Error::I2c`]. Configuration values the chip cannot encode are
//! rejected before anything is written.

/// Error types for AXP2101 operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C communication error
    I2c(E),
    /// The bus transaction timed out.
    ///
    /// [`I2cBus`](crate::I2cBus) never returns this; every HAL failure is
    /// [`Error::I2c`]. Reserved for custom [`RegisterBus`](crate::RegisterBus)
    /// implementations whose transport reports timeouts separately.
    Timeout,
    /// Invalid parameter value
    InvalidParameter,
    /// Invalid voltage value
    InvalidVoltage,
    /// Device not found or wrong chip ID
    DeviceNotFound,
    /// The IRQ GPIO could not be configured
    InterruptPin,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::I2c(error)
    }
}

impl<E> Error<E> {
    /// Short description, usable in log lines without a `Debug` bound on `E`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Error::I2c(_) => "i2c transfer failed",
            Error::Timeout => "i2c timeout",
            Error::InvalidParameter => "invalid parameter",
            Error::InvalidVoltage => "invalid voltage",
            Error::DeviceNotFound => "device not found",
            Error::InterruptPin => "irq pin setup failed",
        }
    }
}

/// One step of [`Axp2101Component::setup`](crate::Axp2101Component::setup).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupStep {
    ChipId,
    VbusLimits,
    SysPowerDown,
    Rails,
    PowerKey,
    ProtectionReport,
    AdcChannels,
    ChargeLed,
    IrqPin,
    Interrupts,
    Charger,
    Watchdog,
    ButtonBattery,
}

impl SetupStep {
    pub fn as_str(self) -> &'static str {
        match self {
            SetupStep::ChipId => "chip id",
            SetupStep::VbusLimits => "vbus limits",
            SetupStep::SysPowerDown => "vsys power-down voltage",
            SetupStep::Rails => "power rails",
            SetupStep::PowerKey => "power key timing",
            SetupStep::ProtectionReport => "dc protection report",
            SetupStep::AdcChannels => "adc channels",
            SetupStep::ChargeLed => "charge led",
            SetupStep::IrqPin => "irq pin",
            SetupStep::Interrupts => "pmic interrupts",
            SetupStep::Charger => "charger",
            SetupStep::Watchdog => "watchdog",
            SetupStep::ButtonBattery => "button battery",
        }
    }
}

/// Setup stopped at `step` because of `error`. Steps before it were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupError<E> {
    pub step: SetupStep,
    pub error: Error<E>,
}
