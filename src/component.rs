//! Board power component: one-time setup and the polling update
//!
//! The host framework owns the sinks and the polling timer. It calls
//! [`setup`](Axp2101Component::setup) once, then
//! [`update`](Axp2101Component::update) on its own schedule.

use core::convert::Infallible;

use embedded_hal::i2c::I2c;

use crate::backlight;
use crate::bus::{I2cBus, RegisterBus};
use crate::config::Axp2101Config;
use crate::driver::Axp2101;
use crate::error::{Error, SetupError, SetupStep};
use crate::interrupt::{IrqFlag, IrqPin};
use crate::registers::{AXP2101_CHIP_ID, AXP2101_CHIP_ID_M5};
use crate::sensor::{BinarySensor, Sensor};
use crate::sleep::{startup_reason, SleepControl, StartupReason};
use crate::types::{irq, InterruptFlags, PowerChannel};

/// Linear state-of-charge estimate for when the fuel gauge has no battery.
///
/// Clamped at 100 only; below `empty_volts` the result goes negative.
pub fn battery_percent_estimate(volts: f32, empty_volts: f32, full_volts: f32) -> f32 {
    let percent = 100.0 * ((volts - empty_volts) / (full_volts - empty_volts));
    percent.min(100.0)
}

fn enabled_str(on: bool) -> &'static str {
    if on {
        "ENABLE"
    } else {
        "DISABLE"
    }
}

fn fail_at<E>(step: SetupStep) -> impl FnOnce(Error<E>) -> SetupError<E> {
    move |error| {
        warn!("setup failed at {}: {}", step.as_str(), error.as_str());
        SetupError { step, error }
    }
}

pub struct Axp2101Component<'a, B> {
    pmu: Axp2101<B>,
    config: Axp2101Config,
    irq: &'a IrqFlag,

    battery_voltage: Option<&'a mut dyn Sensor>,
    battery_level: Option<&'a mut dyn Sensor>,
    battery_charging: Option<&'a mut dyn BinarySensor>,

    brightness: f32,
    applied_brightness: Option<f32>,
}

impl<'a, I: I2c> Axp2101Component<'a, I2cBus<I>> {
    /// Component on an I2C bus at `config.address`
    pub fn from_i2c(i2c: I, config: Axp2101Config, irq: &'a IrqFlag) -> Self {
        let pmu = Axp2101::with_address(i2c, config.address);
        Self::new(pmu, config, irq)
    }
}

impl<'a, B: RegisterBus> Axp2101Component<'a, B> {
    pub fn new(pmu: Axp2101<B>, config: Axp2101Config, irq: &'a IrqFlag) -> Self {
        let brightness = config.brightness;
        let mut component = Self {
            pmu,
            config,
            irq,
            battery_voltage: None,
            battery_level: None,
            battery_charging: None,
            brightness: 1.0,
            applied_brightness: None,
        };
        component.set_brightness(brightness);
        component
    }

    pub fn set_battery_voltage_sensor(&mut self, sensor: &'a mut dyn Sensor) {
        self.battery_voltage = Some(sensor);
    }

    pub fn set_battery_level_sensor(&mut self, sensor: &'a mut dyn Sensor) {
        self.battery_level = Some(sensor);
    }

    pub fn set_battery_charging_sensor(&mut self, sensor: &'a mut dyn BinarySensor) {
        self.battery_charging = Some(sensor);
    }

    /// Underlying driver, for the auxiliary getters
    pub fn pmu(&mut self) -> &mut Axp2101<B> {
        &mut self.pmu
    }

    pub fn config(&self) -> &Axp2101Config {
        &self.config
    }

    // ========================================
    // Setup
    // ========================================

    /// Configure the PMIC. Stops at the first step that fails.
    pub fn setup<P: IrqPin>(&mut self, irq_pin: &mut P) -> Result<(), SetupError<B::Error>> {
        info!("setting up AXP2101");
        self.check_chip_id().map_err(fail_at(SetupStep::ChipId))?;
        self.setup_vbus_limits().map_err(fail_at(SetupStep::VbusLimits))?;
        self.setup_sys_power_down().map_err(fail_at(SetupStep::SysPowerDown))?;
        self.setup_rails().map_err(fail_at(SetupStep::Rails))?;
        self.setup_power_key().map_err(fail_at(SetupStep::PowerKey))?;
        self.report_protection().map_err(fail_at(SetupStep::ProtectionReport))?;
        self.setup_adc().map_err(fail_at(SetupStep::AdcChannels))?;
        self.pmu
            .set_charging_led_mode(self.config.charge_led)
            .map_err(fail_at(SetupStep::ChargeLed))?;
        irq_pin
            .listen_falling_edge()
            .map_err(|_| Error::InterruptPin)
            .map_err(fail_at::<B::Error>(SetupStep::IrqPin))?;
        self.setup_interrupts().map_err(fail_at(SetupStep::Interrupts))?;
        self.setup_charger().map_err(fail_at(SetupStep::Charger))?;
        self.setup_watchdog().map_err(fail_at(SetupStep::Watchdog))?;
        self.setup_button_battery().map_err(fail_at(SetupStep::ButtonBattery))?;
        info!("AXP2101 ready");
        Ok(())
    }

    fn check_chip_id(&mut self) -> Result<(), Error<B::Error>> {
        let id = self.pmu.chip_id()?;
        info!("chip id: {:#x}", id);
        if id != AXP2101_CHIP_ID && id != AXP2101_CHIP_ID_M5 {
            warn!("unexpected chip id {:#x}, continuing", id);
        }
        Ok(())
    }

    fn setup_vbus_limits(&mut self) -> Result<(), Error<B::Error>> {
        self.pmu.set_vbus_voltage_limit(self.config.vbus_voltage_limit)?;
        self.pmu.set_vbus_current_limit(self.config.vbus_current_limit)
    }

    fn setup_sys_power_down(&mut self) -> Result<(), Error<B::Error>> {
        info!("sys power down voltage: {} mV", self.pmu.sys_power_down_voltage()?);
        self.pmu.set_sys_power_down_voltage(self.config.sys_power_down_mv)?;
        info!("-> sys power down voltage: {} mV", self.pmu.sys_power_down_voltage()?);
        Ok(())
    }

    fn setup_rails(&mut self) -> Result<(), Error<B::Error>> {
        for rail in self.config.rails {
            if let Some(mv) = rail.millivolts {
                self.pmu.set_voltage(rail.channel, mv)?;
            }
        }
        for rail in self.config.rails.iter().filter(|r| r.enable) {
            self.pmu.enable(rail.channel)?;
        }
        self.log_rails()
    }

    fn log_rails(&mut self) -> Result<(), Error<B::Error>> {
        for channel in PowerChannel::ALL {
            let sign = if self.pmu.is_enabled(channel)? { "+" } else { "-" };
            match self.pmu.voltage(channel) {
                Ok(mv) => info!("{}: {} {} mV", channel.name(), sign, mv),
                Err(Error::InvalidVoltage) => info!("{}: {} reserved code", channel.name(), sign),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn setup_power_key(&mut self) -> Result<(), Error<B::Error>> {
        self.pmu.set_power_key_off_time(self.config.power_key_off_time)?;
        info!("power key off time: {}", self.pmu.power_key_off_time()?.as_str());
        self.pmu.set_power_key_on_time(self.config.power_key_on_time)?;
        info!("power key on time: {}", self.pmu.power_key_on_time()?.as_str());
        Ok(())
    }

    fn report_protection(&mut self) -> Result<(), Error<B::Error>> {
        let high = self.pmu.is_dc_high_voltage_power_down_enabled()?;
        info!("DC high voltage power down: {}", enabled_str(high));
        for channel in [
            PowerChannel::Dcdc1,
            PowerChannel::Dcdc2,
            PowerChannel::Dcdc3,
            PowerChannel::Dcdc4,
            PowerChannel::Dcdc5,
        ] {
            let low = self.pmu.is_dc_low_voltage_power_down_enabled(channel)?;
            info!("{} low voltage power down: {}", channel.name(), enabled_str(low));
        }
        Ok(())
    }

    fn setup_adc(&mut self) -> Result<(), Error<B::Error>> {
        // no thermistor on the TS pin; left enabled the charger refuses to charge
        self.pmu.disable_ts_pin_measure()?;
        self.pmu.enable_temperature_measure()?;
        self.pmu.enable_battery_detection()?;
        self.pmu.enable_vbus_voltage_measure()?;
        self.pmu.enable_battery_voltage_measure()?;
        self.pmu.enable_system_voltage_measure()
    }

    fn setup_interrupts(&mut self) -> Result<(), Error<B::Error>> {
        self.pmu.disable_irq(irq::ALL)?;
        self.pmu.clear_irq_status()?;
        self.pmu.enable_irq(self.config.irq_mask)
    }

    fn setup_charger(&mut self) -> Result<(), Error<B::Error>> {
        self.pmu.set_precharge_current(self.config.precharge_current)?;
        self.pmu.set_charger_constant_current(self.config.charge_current)?;
        self.pmu
            .set_charger_termination_current(self.config.termination_current)?;
        self.pmu.set_charge_target_voltage(self.config.charge_voltage)
    }

    fn setup_watchdog(&mut self) -> Result<(), Error<B::Error>> {
        self.pmu.set_watchdog_config(self.config.watchdog_config)?;
        self.pmu.set_watchdog_timeout(self.config.watchdog_timeout)?;
        if self.config.watchdog_enable {
            self.pmu.enable_watchdog()?;
        }
        Ok(())
    }

    fn setup_button_battery(&mut self) -> Result<(), Error<B::Error>> {
        self.pmu.enable_button_battery_charge()?;
        self.pmu
            .set_button_battery_charge_voltage(self.config.button_battery_mv)
    }

    pub fn dump_config(&self) {
        info!("AXP2101:");
        info!("  address: {:#x}", self.config.address);
        info!("  model: {}", self.config.model.as_str());
        info!("  irq pin: {}", self.config.irq_pin);
        match &self.battery_voltage {
            Some(s) => info!("  battery voltage: {}", s.name()),
            None => info!("  battery voltage: not configured"),
        }
        match &self.battery_level {
            Some(s) => info!("  battery level: {}", s.name()),
            None => info!("  battery level: not configured"),
        }
        match &self.battery_charging {
            Some(s) => info!("  battery charging: {}", s.name()),
            None => info!("  battery charging: not configured"),
        }
    }

    // ========================================
    // Polling
    // ========================================

    /// One polling cycle. On a bus error nothing is published and the
    /// cycle is skipped; the next call starts over.
    pub fn update(&mut self) -> Result<(), Error<B::Error>> {
        let result = self.poll();
        if let Err(e) = &result {
            warn!("update skipped: {}", e.as_str());
        }
        result
    }

    fn poll(&mut self) -> Result<(), Error<B::Error>> {
        let mut volts = None;
        let mut level = None;
        if self.battery_voltage.is_some() || self.battery_level.is_some() {
            let v = self.pmu.battery_voltage()? as f32 / 1000.0;
            debug!("battery voltage: {} V", v);
            if self.battery_level.is_some() {
                // the gauge learns the battery curve over a full charge cycle
                let percent = if self.pmu.is_battery_connected()? {
                    self.pmu.battery_percent()? as f32
                } else {
                    battery_percent_estimate(
                        v,
                        self.config.battery_empty_volts,
                        self.config.battery_full_volts,
                    )
                };
                debug!("battery level: {} %", percent);
                level = Some(percent.min(100.0));
            }
            volts = Some(v);
        }

        let mut charging = None;
        if self.battery_charging.is_some() {
            let vbus = self.pmu.is_vbus_in()?;
            debug!("vbus in: {}", vbus);
            charging = Some(vbus);
        }

        if let (Some(sensor), Some(v)) = (self.battery_voltage.as_deref_mut(), volts) {
            sensor.publish_state(v);
        }
        if let (Some(sensor), Some(l)) = (self.battery_level.as_deref_mut(), level) {
            sensor.publish_state(l);
        }
        if let (Some(sensor), Some(c)) = (self.battery_charging.as_deref_mut(), charging) {
            sensor.publish_state(c);
        }

        self.update_brightness()
    }

    // ========================================
    // Backlight
    // ========================================

    /// Desired backlight brightness, 0.0-1.0. Applied on the next update.
    /// Out-of-range values are clamped, NaN is ignored.
    pub fn set_brightness(&mut self, brightness: f32) {
        if brightness.is_nan() {
            warn!("ignoring NaN brightness");
            return;
        }
        self.brightness = brightness.clamp(0.0, 1.0);
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Write the backlight register if the desired brightness changed
    pub fn update_brightness(&mut self) -> Result<(), Error<B::Error>> {
        if self.applied_brightness == Some(self.brightness) {
            return Ok(());
        }
        if let Some(strategy) = self.config.model.backlight() {
            let duty = backlight::apply(self.pmu.bus(), strategy, self.brightness)?;
            debug!("brightness {} -> duty {}", self.brightness, duty);
        }
        self.applied_brightness = Some(self.brightness);
        Ok(())
    }

    // ========================================
    // Interrupts
    // ========================================

    pub fn irq_pending(&self) -> bool {
        self.irq.is_pending()
    }

    /// Consume a pending IRQ: read and clear the PMIC status.
    /// `Ok(None)` when the line has not fired.
    ///
    /// The PMIC holds its IRQ line low until the status is cleared, so no
    /// new edge arrives while it is latched. If the read or clear fails the
    /// flag stays pending and the next call retries.
    pub fn handle_irq(&mut self) -> Result<Option<InterruptFlags>, Error<B::Error>> {
        if !self.irq.take() {
            return Ok(None);
        }
        let flags = match self.read_and_clear_irq() {
            Ok(flags) => flags,
            Err(e) => {
                self.irq.signal();
                warn!("pmu irq status not cleared: {}", e.as_str());
                return Err(e);
            }
        };
        debug!("pmu irq status: {:#x}", flags.as_u32());
        if flags.is_vbus_insert() {
            info!("vbus inserted");
        }
        if flags.is_vbus_remove() {
            info!("vbus removed");
        }
        if flags.is_battery_insert() {
            info!("battery inserted");
        }
        if flags.is_battery_remove() {
            info!("battery removed");
        }
        if flags.is_charge_done() {
            info!("charge done");
        }
        if flags.is_watchdog_expire() {
            warn!("pmu watchdog expired");
            self.pmu.clear_watchdog()?;
        }
        Ok(Some(flags))
    }

    fn read_and_clear_irq(&mut self) -> Result<InterruptFlags, Error<B::Error>> {
        let flags = self.pmu.irq_status()?;
        self.pmu.clear_irq_status()?;
        Ok(flags)
    }

    // ========================================
    // Power
    // ========================================

    /// Net coulomb counter charge in mAh at the configured sample rate
    pub fn coulomb_data(&mut self) -> Result<f32, Error<B::Error>> {
        self.pmu.coulomb_data(self.config.coulomb_sample_rate_hz)
    }

    /// Deep sleep waking on the configured wake pin. Only returns on a bus error.
    pub fn deep_sleep<S: SleepControl + ?Sized>(
        &mut self,
        ctrl: &mut S,
        micros: u64,
    ) -> Result<Infallible, Error<B::Error>> {
        self.pmu.deep_sleep(ctrl, self.config.wakeup_pin, micros)
    }

    pub fn light_sleep<S: SleepControl + ?Sized>(&mut self, ctrl: &mut S, micros: u64) {
        self.pmu.light_sleep(ctrl, micros)
    }

    pub fn startup_reason<S: SleepControl + ?Sized>(&self, ctrl: &S) -> StartupReason {
        startup_reason(ctrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RegisterFile;
    use crate::registers::*;
    use crate::sensor::recording::Recorder;

    struct FakePin {
        armed: bool,
        fail: bool,
    }

    impl FakePin {
        fn new() -> Self {
            Self {
                armed: false,
                fail: false,
            }
        }
    }

    impl IrqPin for FakePin {
        type Error = ();

        fn listen_falling_edge(&mut self) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.armed = true;
            Ok(())
        }
    }

    fn component(irq: &IrqFlag) -> Axp2101Component<'_, RegisterFile> {
        let mut bus = RegisterFile::new();
        bus.set(AXP2101_IC_TYPE, AXP2101_CHIP_ID_M5);
        Axp2101Component::new(Axp2101::from_bus(bus), Axp2101Config::default(), irq)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn percent_estimate_clamps_high_only() {
        assert!(approx(battery_percent_estimate(3.0, 3.0, 4.1), 0.0));
        assert!(approx(battery_percent_estimate(3.55, 3.0, 4.1), 50.0));
        assert!(approx(battery_percent_estimate(4.1, 3.0, 4.1), 100.0));
        assert_eq!(battery_percent_estimate(4.5, 3.0, 4.1), 100.0);
        assert!(battery_percent_estimate(2.9, 3.0, 4.1) < 0.0);
    }

    #[test]
    fn setup_programs_the_board() {
        let irq = IrqFlag::new();
        let mut comp = component(&irq);
        let mut pin = FakePin::new();
        comp.setup(&mut pin).unwrap();
        assert!(pin.armed);

        let bus = comp.pmu().bus();
        assert_eq!(bus.get(AXP2101_INPUT_VOL_LIMIT_CTRL) & 0x0F, 6);
        assert_eq!(bus.get(AXP2101_INPUT_CUR_LIMIT_CTRL) & 0x07, 4);
        assert_eq!(bus.get(AXP2101_DC_VOL1_CTRL), 50);
        // DC2-5 on, DC1 left as the bootloader had it
        assert_eq!(bus.get(AXP2101_DC_ONOFF_DVM_CTRL), 0b1_1110);
        // ALDO3 and DLDO1 stay off
        assert_eq!(bus.get(AXP2101_LDO_ONOFF_CTRL0), 0b0111_1011);
        assert_eq!(bus.get(AXP2101_INTEN1), 0x00);
        // INTEN3 also carries the watchdog expiry bit
        assert_eq!(bus.get(AXP2101_INTEN2), 0xFC);
        assert_eq!(bus.get(AXP2101_INTEN3), 0x98);
        assert_eq!(bus.get(AXP2101_ICC_CHG_SET), 8);
        assert_eq!(bus.get(AXP2101_CV_CHG_VOL_SET), 2);
        assert_eq!(bus.get(AXP2101_BTN_BAT_CHG_VOL_SET), 7);
        assert_eq!(bus.get(AXP2101_CHARGE_GAUGE_WDT_CTRL) & 0b101, 0b101);
    }

    #[test]
    fn setup_stops_at_first_failure() {
        let irq = IrqFlag::new();
        let mut comp = component(&irq);
        comp.pmu().bus().fail_on(AXP2101_DC_VOL1_CTRL);
        let err = comp.setup(&mut FakePin::new()).unwrap_err();
        assert_eq!(err.step, SetupStep::Rails);
        assert_eq!(err.error, Error::I2c(()));
        assert!(comp.pmu().bus().writes_to(AXP2101_INTEN2).is_empty());
        assert!(comp.pmu().bus().writes_to(AXP2101_BTN_BAT_CHG_VOL_SET).is_empty());
    }

    #[test]
    fn setup_reports_irq_pin_failure() {
        let irq = IrqFlag::new();
        let mut comp = component(&irq);
        let mut pin = FakePin::new();
        pin.fail = true;
        let err = comp.setup(&mut pin).unwrap_err();
        assert_eq!(err.step, SetupStep::IrqPin);
        assert_eq!(err.error, Error::InterruptPin);
    }

    #[test]
    fn update_without_sinks_only_touches_backlight() {
        let irq = IrqFlag::new();
        let mut comp = component(&irq);
        comp.update().unwrap();
        let bus = comp.pmu().bus();
        assert_eq!(bus.reads, 1);
        assert_eq!(bus.writes, [(CORE2_BACKLIGHT_CTRL, 12u8 << 3)]);
    }

    #[test]
    fn update_publishes_fallback_level_and_charging() {
        let irq = IrqFlag::new();
        let mut voltage = Recorder::<f32>::default();
        let mut level = Recorder::<f32>::default();
        let mut charging = Recorder::<bool>::default();
        let mut comp = component(&irq);
        comp.set_battery_voltage_sensor(&mut voltage);
        comp.set_battery_level_sensor(&mut level);
        comp.set_battery_charging_sensor(&mut charging);
        // 3550 mV, no battery behind the gauge, VBUS good
        comp.pmu().bus().load(AXP2101_ADC_DATA_RELUST0, &[0x0D, 0xDE]);
        comp.pmu().bus().set(AXP2101_STATUS1, 1 << 5);
        comp.update().unwrap();
        drop(comp);

        assert_eq!(voltage.values.len(), 1);
        assert!(approx(voltage.values[0], 3.55));
        assert!(approx(level.values[0], 50.0));
        assert_eq!(charging.last(), Some(true));
    }

    #[test]
    fn update_prefers_fuel_gauge_when_battery_present() {
        let irq = IrqFlag::new();
        let mut level = Recorder::<f32>::default();
        let mut comp = component(&irq);
        comp.set_battery_level_sensor(&mut level);
        comp.pmu().bus().load(AXP2101_ADC_DATA_RELUST0, &[0x10, 0x04]);
        comp.pmu().bus().set(AXP2101_STATUS1, 1 << 3);
        comp.pmu().bus().set(AXP2101_BAT_PERCENT_DATA, 87);
        comp.update().unwrap();
        drop(comp);
        assert_eq!(level.last(), Some(87.0));
    }

    #[test]
    fn failed_update_publishes_nothing_and_retries_backlight() {
        let irq = IrqFlag::new();
        let mut voltage = Recorder::<f32>::default();
        let mut comp = component(&irq);
        comp.set_battery_voltage_sensor(&mut voltage);
        comp.pmu().bus().fail_on(AXP2101_ADC_DATA_RELUST1);
        assert_eq!(comp.update(), Err(Error::I2c(())));
        assert!(comp.pmu().bus().writes_to(CORE2_BACKLIGHT_CTRL).is_empty());

        comp.pmu().bus().fail_on(0xFF);
        comp.update().unwrap();
        assert_eq!(comp.pmu().bus().writes_to(CORE2_BACKLIGHT_CTRL).len(), 1);
        drop(comp);
        assert_eq!(voltage.values.len(), 1);
    }

    #[test]
    fn unchanged_brightness_writes_nothing() {
        let irq = IrqFlag::new();
        let mut comp = component(&irq);
        comp.set_brightness(0.5);
        comp.update_brightness().unwrap();
        assert_eq!(comp.pmu().bus().get(CORE2_BACKLIGHT_CTRL), 9 << 3);
        let writes = comp.pmu().bus().writes.len();
        let reads = comp.pmu().bus().reads;
        comp.update_brightness().unwrap();
        assert_eq!(comp.pmu().bus().writes.len(), writes);
        assert_eq!(comp.pmu().bus().reads, reads);

        comp.set_brightness(0.0);
        comp.update_brightness().unwrap();
        assert_eq!(comp.pmu().bus().get(CORE2_BACKLIGHT_CTRL), 7 << 3);
    }

    #[test]
    fn handle_irq_reads_and_clears_once() {
        let irq = IrqFlag::new();
        let mut comp = component(&irq);
        assert_eq!(comp.handle_irq(), Ok(None));

        comp.pmu().bus().set(AXP2101_INTSTS2, 0x80);
        irq.signal();
        assert!(comp.irq_pending());
        let flags = comp.handle_irq().unwrap().unwrap();
        assert!(flags.is_vbus_insert());
        assert_eq!(comp.pmu().bus().get(AXP2101_INTSTS2), 0xFF);
        assert!(!comp.irq_pending());
        assert_eq!(comp.handle_irq(), Ok(None));
    }

    #[test]
    fn failed_status_read_keeps_irq_pending() {
        let irq = IrqFlag::new();
        let mut comp = component(&irq);
        comp.pmu().bus().set(AXP2101_INTSTS2, 0x80);
        irq.signal();

        comp.pmu().bus().fail_on(AXP2101_INTSTS1);
        assert_eq!(comp.handle_irq(), Err(Error::I2c(())));
        assert!(comp.irq_pending());

        comp.pmu().bus().fail_on(0xFF);
        let flags = comp.handle_irq().unwrap().unwrap();
        assert!(flags.is_vbus_insert());
        assert!(!comp.irq_pending());
    }

    #[test]
    fn failed_status_clear_keeps_irq_pending() {
        let irq = IrqFlag::new();
        let mut comp = component(&irq);
        comp.pmu().bus().set(AXP2101_INTSTS1, 0x08);
        irq.signal();

        // three status reads succeed, the first clear write fails
        comp.pmu().bus().fail_after(3);
        assert_eq!(comp.handle_irq(), Err(Error::I2c(())));
        assert!(comp.irq_pending());
        assert_eq!(comp.pmu().bus().get(AXP2101_INTSTS1), 0x08);
    }

    #[test]
    fn brightness_is_clamped_and_nan_ignored() {
        let irq = IrqFlag::new();
        let mut comp = component(&irq);
        comp.set_brightness(1.5);
        assert_eq!(comp.brightness(), 1.0);
        comp.set_brightness(-0.2);
        assert_eq!(comp.brightness(), 0.0);

        comp.set_brightness(0.5);
        comp.update_brightness().unwrap();
        let writes = comp.pmu().bus().writes.len();
        comp.set_brightness(f32::NAN);
        assert_eq!(comp.brightness(), 0.5);
        comp.update_brightness().unwrap();
        comp.update_brightness().unwrap();
        assert_eq!(comp.pmu().bus().writes.len(), writes);
    }
}
