//! PMIC interrupt line
//!
//! The ISR only flips an [`IrqFlag`]; reading and clearing the PMIC status
//! happens later in [`Axp2101Component::handle_irq`](crate::Axp2101Component::handle_irq).

use core::sync::atomic::{AtomicBool, Ordering};

/// Single-producer single-consumer pending flag, one per PMIC.
///
/// Lives in a `static` so the interrupt handler can reach it:
///
/// ```
/// use axp2101_pmu::IrqFlag;
///
/// static PMU_IRQ: IrqFlag = IrqFlag::new();
///
/// // in the GPIO interrupt handler
/// PMU_IRQ.signal();
///
/// assert!(PMU_IRQ.take());
/// assert!(!PMU_IRQ.take());
/// ```
#[derive(Debug, Default)]
pub struct IrqFlag {
    pending: AtomicBool,
}

impl IrqFlag {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Called from interrupt context
    pub fn signal(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Consume a pending interrupt
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

/// MCU GPIO connected to the PMIC IRQ output (open drain, active low)
pub trait IrqPin {
    type Error;

    /// Input with pull-up, interrupt on falling edge. The board's handler
    /// for that interrupt calls [`IrqFlag::signal`].
    fn listen_falling_edge(&mut self) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_independent_per_instance() {
        let a = IrqFlag::new();
        let b = IrqFlag::new();
        a.signal();
        assert!(a.is_pending());
        assert!(!b.is_pending());
        assert!(a.take());
        assert!(!a.is_pending());
    }
}
