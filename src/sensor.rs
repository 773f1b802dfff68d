//! Value sinks the component publishes to
//!
//! The sinks belong to the host framework. The component only borrows them,
//! and a sink that is not wired up is simply `None`.

/// Numeric sink (battery voltage in volts, battery level in percent)
pub trait Sensor {
    fn publish_state(&mut self, value: f32);

    fn name(&self) -> &str {
        "sensor"
    }
}

/// Boolean sink (charging)
pub trait BinarySensor {
    fn publish_state(&mut self, value: bool);

    fn name(&self) -> &str {
        "binary sensor"
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::vec::Vec;

    /// Keeps every published value
    #[derive(Default)]
    pub struct Recorder<T> {
        pub values: Vec<T>,
    }

    impl<T: Copy> Recorder<T> {
        pub fn last(&self) -> Option<T> {
            self.values.last().copied()
        }
    }

    impl Sensor for Recorder<f32> {
        fn publish_state(&mut self, value: f32) {
            self.values.push(value);
        }
    }

    impl BinarySensor for Recorder<bool> {
        fn publish_state(&mut self, value: bool) {
            self.values.push(value);
        }
    }
}
