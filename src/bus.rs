//! Register transactions against the PMIC
//!
//! [`RegisterBus`] is the only thing the rest of the crate talks to. The
//! provided methods assemble the chip's fixed-width words out of consecutive
//! bytes; which packing applies to which register is a property of the
//! register, not of the bus.

use crate::error::Error;
use embedded_hal::i2c::I2c;

/// Byte-addressed register access with fallible transactions
pub trait RegisterBus {
    type Error;

    /// Read `buf.len()` consecutive registers starting at `reg`
    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<Self::Error>>;

    /// Write a single register
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<Self::Error>>;

    /// 7-bit device address, for diagnostics
    fn address(&self) -> u8;

    fn read_u8(&mut self, reg: u8) -> Result<u8, Error<Self::Error>> {
        let mut buf = [0u8];
        self.read_registers(reg, &mut buf)?;
        Ok(buf[0])
    }

    fn write_u8(&mut self, reg: u8, value: u8) -> Result<(), Error<Self::Error>> {
        self.write_register(reg, value)
    }

    /// 12-bit ADC word: `b0 << 4 | b1`
    fn read_12bit(&mut self, reg: u8) -> Result<u16, Error<Self::Error>> {
        let mut buf = [0u8; 2];
        self.read_registers(reg, &mut buf)?;
        Ok(pack_12bit(buf[0], buf[1]))
    }

    /// 13-bit ADC word: `b0 << 5 | b1`
    fn read_13bit(&mut self, reg: u8) -> Result<u16, Error<Self::Error>> {
        let mut buf = [0u8; 2];
        self.read_registers(reg, &mut buf)?;
        Ok(pack_13bit(buf[0], buf[1]))
    }

    fn read_u16(&mut self, reg: u8) -> Result<u16, Error<Self::Error>> {
        let mut buf = [0u8; 2];
        self.read_registers(reg, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn read_u24(&mut self, reg: u8) -> Result<u32, Error<Self::Error>> {
        let mut buf = [0u8; 3];
        self.read_registers(reg, &mut buf)?;
        Ok(buf.iter().fold(0u32, |acc, b| (acc << 8) | *b as u32))
    }

    fn read_u32(&mut self, reg: u8) -> Result<u32, Error<Self::Error>> {
        let mut buf = [0u8; 4];
        self.read_registers(reg, &mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Split word with the high byte at `high_reg` masked to 5 bits (13-bit result)
    fn read_h5l8(&mut self, high_reg: u8, low_reg: u8) -> Result<u16, Error<Self::Error>> {
        let high = self.read_u8(high_reg)? as u16;
        let low = self.read_u8(low_reg)? as u16;
        Ok(((high & 0x1F) << 8) | low)
    }

    /// Split word with the high byte at `high_reg` masked to 6 bits (14-bit result)
    fn read_h6l8(&mut self, high_reg: u8, low_reg: u8) -> Result<u16, Error<Self::Error>> {
        let high = self.read_u8(high_reg)? as u16;
        let low = self.read_u8(low_reg)? as u16;
        Ok(((high & 0x3F) << 8) | low)
    }

    fn set_bit(&mut self, reg: u8, bit: u8) -> Result<(), Error<Self::Error>> {
        let val = self.read_u8(reg)?;
        self.write_register(reg, val | (1 << bit))
    }

    fn clear_bit(&mut self, reg: u8, bit: u8) -> Result<(), Error<Self::Error>> {
        let val = self.read_u8(reg)?;
        self.write_register(reg, val & !(1 << bit))
    }

    fn get_bit(&mut self, reg: u8, bit: u8) -> Result<bool, Error<Self::Error>> {
        let val = self.read_u8(reg)?;
        Ok((val & (1 << bit)) != 0)
    }

    /// Read-modify-write: keep the bits in `keep`, OR in `value`
    fn modify(&mut self, reg: u8, keep: u8, value: u8) -> Result<(), Error<Self::Error>> {
        let val = self.read_u8(reg)? & keep;
        self.write_register(reg, val | value)
    }
}

#[inline]
pub fn pack_12bit(b0: u8, b1: u8) -> u16 {
    ((b0 as u16) << 4) | b1 as u16
}

#[inline]
pub fn pack_13bit(b0: u8, b1: u8) -> u16 {
    ((b0 as u16) << 5) | b1 as u16
}

/// [`RegisterBus`] over an `embedded-hal` I2C peripheral
pub struct I2cBus<I> {
    i2c: I,
    addr: u8,
}

impl<I: I2c> I2cBus<I> {
    pub fn new(i2c: I, addr: u8) -> Self {
        Self { i2c, addr }
    }

    /// Give the I2C peripheral back
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> RegisterBus for I2cBus<I> {
    type Error = I::Error;

    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<I::Error>> {
        self.i2c
            .write_read(self.addr, &[reg], buf)
            .map_err(Error::I2c)
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.i2c.write(self.addr, &[reg, value]).map_err(Error::I2c)
    }

    fn address(&self) -> u8 {
        self.addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RegisterFile;

    #[test]
    fn twelve_and_thirteen_bit_packing_over_full_range() {
        for b0 in 0..=255u8 {
            for b1 in 0..=15u8 {
                assert_eq!(pack_12bit(b0, b1), b0 as u16 * 16 + b1 as u16);
                assert_eq!(pack_13bit(b0, b1), b0 as u16 * 32 + b1 as u16);
            }
        }
    }

    #[test]
    fn adc_words_read_consecutive_registers() {
        let mut bus = RegisterFile::new();
        bus.set(0x5E, 0x5A);
        bus.set(0x5F, 0x07);
        assert_eq!(bus.read_12bit(0x5E), Ok(0x5A7));

        bus.set(0x7A, 0x12);
        bus.set(0x7B, 0x1F);
        assert_eq!(bus.read_13bit(0x7A), Ok((0x12 << 5) | 0x1F));
    }

    #[test]
    fn wide_reads_are_big_endian() {
        let mut bus = RegisterFile::new();
        bus.load(0xB0, &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(bus.read_u16(0xB0), Ok(0x0102));
        assert_eq!(bus.read_u24(0xB0), Ok(0x01_0203));
        assert_eq!(bus.read_u32(0xB0), Ok(0x0102_0304));
    }

    #[test]
    fn modify_keeps_only_masked_bits() {
        let mut bus = RegisterFile::new();
        bus.set(0x24, 0xFF);
        bus.modify(0x24, 0xF8, 0x02).unwrap();
        assert_eq!(bus.get(0x24), 0xFA);
    }

    #[test]
    fn failed_read_reports_instead_of_stale_data() {
        let mut bus = RegisterFile::new();
        bus.set(0x00, 0x08);
        bus.fail_after(0);
        assert_eq!(bus.read_u8(0x00), Err(Error::I2c(())));
    }
}
