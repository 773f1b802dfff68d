//! M5Stack Core2 power component walkthrough
//!
//! Runs the board setup, a few polling passes and one interrupt against an
//! in-memory stand-in for the PMIC, printing what the sinks receive. On real
//! hardware swap `FakePmic` for the platform's I2C peripheral and `FakePin`
//! for the GPIO wired to the PMIC IRQ line.
//!
//! Run with: cargo run --example core2

use axp2101_pmu::{
    Axp2101Component, Axp2101Config, BinarySensor, IrqFlag, IrqPin, RegisterBus, Sensor,
    AXP2101_BAT_PERCENT_DATA, AXP2101_CHIP_ID_M5, AXP2101_IC_TYPE, AXP2101_INTSTS2, AXP2101_STATUS1,
};
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};

static PMU_IRQ: IrqFlag = IrqFlag::new();

/// Register file behind an I2C interface, auto-incrementing like the chip
struct FakePmic {
    regs: [u8; 256],
    pointer: u8,
}

impl FakePmic {
    fn new() -> Self {
        let mut regs = [0; 256];
        regs[AXP2101_IC_TYPE as usize] = AXP2101_CHIP_ID_M5;
        // battery present, fuel gauge reports 87%
        regs[AXP2101_STATUS1 as usize] = 0x08;
        regs[AXP2101_BAT_PERCENT_DATA as usize] = 87;
        Self { regs, pointer: 0 }
    }
}

impl ErrorType for FakePmic {
    type Error = ErrorKind;
}

impl I2c<SevenBitAddress> for FakePmic {
    fn transaction(
        &mut self,
        _address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let Some((reg, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = *reg;
                    for b in data {
                        self.regs[self.pointer as usize] = *b;
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.regs[self.pointer as usize];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

struct FakePin;

impl IrqPin for FakePin {
    type Error = ();

    fn listen_falling_edge(&mut self) -> Result<(), ()> {
        println!("irq pin armed");
        Ok(())
    }
}

struct Printer(&'static str);

impl Sensor for Printer {
    fn publish_state(&mut self, value: f32) {
        println!("{}: {:.2}", self.0, value);
    }

    fn name(&self) -> &str {
        self.0
    }
}

impl BinarySensor for Printer {
    fn publish_state(&mut self, value: bool) {
        println!("{}: {}", self.0, value);
    }

    fn name(&self) -> &str {
        self.0
    }
}

fn main() {
    let mut voltage = Printer("battery voltage");
    let mut level = Printer("battery level");
    let mut charging = Printer("charging");

    let mut pmu = Axp2101Component::from_i2c(FakePmic::new(), Axp2101Config::default(), &PMU_IRQ);
    pmu.set_battery_voltage_sensor(&mut voltage);
    pmu.set_battery_level_sensor(&mut level);
    pmu.set_battery_charging_sensor(&mut charging);

    if let Err(e) = pmu.setup(&mut FakePin) {
        println!("setup failed at {}: {}", e.step.as_str(), e.error.as_str());
        return;
    }
    pmu.dump_config();

    for brightness in [1.0, 0.5, 0.5] {
        pmu.set_brightness(brightness);
        if let Err(e) = pmu.update() {
            println!("update failed: {}", e.as_str());
        }
    }

    // what the GPIO handler would do on a VBUS insert
    pmu.pmu().bus().write_u8(AXP2101_INTSTS2, 0x80).ok();
    PMU_IRQ.signal();
    match pmu.handle_irq() {
        Ok(Some(flags)) => println!("irq: vbus inserted = {}", flags.is_vbus_insert()),
        Ok(None) => println!("no irq pending"),
        Err(e) => println!("irq handling failed: {}", e.as_str()),
    }
}
