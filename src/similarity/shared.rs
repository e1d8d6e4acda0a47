//! Shared handle to the surface-layer state.

use std::sync::{Arc, RwLock};

use super::MoData;

/// Shared Monin–Obukhov state.
///
/// The ABL wall function owns the updates; wall source terms hold a clone
/// of the handle and take a [`snapshot`](SharedMoData::snapshot) once per
/// evaluation.
///
/// # Example
///
/// ```
/// use abl_forcing::similarity::{MoData, SharedMoData};
///
/// let shared = SharedMoData::new(MoData::default());
/// let reader = shared.clone();
///
/// shared.update(|mo| mo.utau = 0.35);
/// assert_eq!(reader.snapshot().utau, 0.35);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SharedMoData {
    inner: Arc<RwLock<MoData>>,
}

impl SharedMoData {
    /// Wrap a state.
    pub fn new(mo: MoData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(mo)),
        }
    }

    /// Copy of the current state.
    ///
    /// `MoData` is plain data, so a lock poisoned by a panicking writer
    /// still holds a usable value.
    pub fn snapshot(&self) -> MoData {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Modify the state in place and return the closure's result.
    pub fn update<R>(&self, f: impl FnOnce(&mut MoData) -> R) -> R {
        match self.inner.write() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    /// Replace the state.
    pub fn set(&self, mo: MoData) {
        self.update(|current| *current = mo);
    }
}
