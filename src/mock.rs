//! In-memory register file standing in for the PMIC in unit tests.

use crate::bus::RegisterBus;
use crate::error::Error;
use std::vec::Vec;

pub struct RegisterFile {
    regs: [u8; 256],
    pub writes: Vec<(u8, u8)>,
    pub reads: usize,
    remaining_ok: Option<usize>,
    failing_reg: Option<u8>,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            regs: [0; 256],
            writes: Vec::new(),
            reads: 0,
            remaining_ok: None,
            failing_reg: None,
        }
    }

    pub fn set(&mut self, reg: u8, value: u8) {
        self.regs[reg as usize] = value;
    }

    pub fn get(&self, reg: u8) -> u8 {
        self.regs[reg as usize]
    }

    pub fn load(&mut self, reg: u8, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.regs[reg as usize + i] = *b;
        }
    }

    /// Let `n` more transactions through, then fail every one after.
    pub fn fail_after(&mut self, n: usize) {
        self.remaining_ok = Some(n);
    }

    /// Fail every transaction addressed to `reg`.
    pub fn fail_on(&mut self, reg: u8) {
        self.failing_reg = Some(reg);
    }

    pub fn writes_to(&self, reg: u8) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(r, _)| *r == reg)
            .map(|(_, v)| *v)
            .collect()
    }

    fn admit(&mut self, reg: u8) -> Result<(), Error<()>> {
        if self.failing_reg == Some(reg) {
            return Err(Error::I2c(()));
        }
        match self.remaining_ok {
            Some(0) => Err(Error::I2c(())),
            Some(ref mut n) => {
                *n -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl RegisterBus for RegisterFile {
    type Error = ();

    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<()>> {
        self.admit(reg)?;
        self.reads += 1;
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.regs[(reg as usize + i) & 0xFF];
        }
        Ok(())
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<()>> {
        self.admit(reg)?;
        self.writes.push((reg, value));
        self.regs[reg as usize] = value;
        Ok(())
    }

    fn address(&self) -> u8 {
        crate::registers::AXP2101_SLAVE_ADDRESS
    }
}
