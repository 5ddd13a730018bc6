//! In-crate provider for unit tests
//!
//! Instances are tapes that log every stub, side effect and verification
//! written to them, so tests can assert on ordering.

use crate::multiplicity::Multiplicity;
use crate::provider::MockProvider;
use std::cell::Cell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tape {
    pub(crate) id: usize,
    pub(crate) events: Vec<String>,
}

impl Tape {
    pub(crate) fn log(&mut self, event: impl Into<String>) {
        self.events.push(event.into());
    }
}

#[derive(Debug, Default)]
pub(crate) struct TapeProvider {
    minted: Cell<usize>,
}

impl TapeProvider {
    pub(crate) fn minted(&self) -> usize {
        self.minted.get()
    }
}

impl MockProvider for TapeProvider {
    type Instance = Tape;
    type Selection = String;
    type Value = i64;
    type Verification = (Tape, Multiplicity);

    fn create_instance(&self) -> Tape {
        let id = self.minted.get();
        self.minted.set(id + 1);
        Tape {
            id,
            events: Vec::new(),
        }
    }

    fn register_stub(&self, instance: &mut Tape, selection: String, value: i64) {
        instance.log(format!("stub {selection}={value}"));
    }

    fn verify_invocation(&self, instance: &Tape, multiplicity: Multiplicity) -> Self::Verification {
        (instance.clone(), multiplicity)
    }
}
