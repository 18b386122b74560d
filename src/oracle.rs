use crate::error::GovResult;
use crate::types::{Allocation, Assignment, CityId, Stats};
use std::sync::atomic::{AtomicUsize, Ordering};

/// The authoritative recomputation of a city for one concrete assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub production: Stats,
    pub surplus: Stats,
    pub disorder: bool,
    pub happy: bool,
}

impl Evaluation {
    pub fn into_allocation(self, assignment: &Assignment) -> Allocation {
        Allocation {
            worked: assignment.worked,
            specialists: assignment.specialists,
            production: self.production,
            surplus: self.surplus,
            disorder: self.disorder,
            happy: self.happy,
        }
    }
}

/// Expensive city evaluation, called as rarely as possible.
///
/// Implementations must be pure for a fixed city state: the governor caches
/// secondary stats under the assumption that gold, luxury and science depend
/// only on (trade surplus, own headcount) and mood only on (luxury, workers).
/// A violation surfaces as an invariant error, never as a silent overwrite.
pub trait Oracle {
    fn evaluate(&self, city: CityId, assignment: &Assignment) -> GovResult<Evaluation>;
}

impl<O: Oracle + ?Sized> Oracle for &O {
    fn evaluate(&self, city: CityId, assignment: &Assignment) -> GovResult<Evaluation> {
        (**self).evaluate(city, assignment)
    }
}

/// Wraps an oracle and counts calls.
pub struct CountingOracle<O> {
    inner: O,
    calls: AtomicUsize,
}

impl<O: Oracle> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
    }
}

impl<O: Oracle> Oracle for CountingOracle<O> {
    fn evaluate(&self, city: CityId, assignment: &Assignment) -> GovResult<Evaluation> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.evaluate(city, assignment)
    }
}
