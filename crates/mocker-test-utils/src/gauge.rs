//! Sample capability and its recorded fake

use crate::double::Double;
use crate::recording::Recorded;

/// A small read/write capability used across the test suites
pub trait Gauge {
    fn value(&self) -> i64;
    fn label(&self, key: &str) -> String;
    fn record(&self, sample: i64);
}

#[derive(Debug, Clone, Default)]
pub struct FakeGauge {
    double: Double,
}

impl Recorded for FakeGauge {
    fn from_double(double: Double) -> Self {
        Self { double }
    }

    fn double(&self) -> &Double {
        &self.double
    }
}

impl Gauge for FakeGauge {
    fn value(&self) -> i64 {
        self.double.invoke("value", ())
    }

    fn label(&self, key: &str) -> String {
        self.double.invoke("label", key)
    }

    fn record(&self, sample: i64) {
        self.double.invoke::<()>("record", sample);
    }
}
