//! Gate identity and operational status

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique gate identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateId(Uuid);

impl GateId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operational flag shared by both gate kinds. Can be flipped while the
/// gate is registered with a facility.
#[derive(Debug)]
pub struct OperationalFlag(AtomicBool);

impl OperationalFlag {
    pub fn new(is_operational: bool) -> Self {
        Self(AtomicBool::new(is_operational))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, is_operational: bool) {
        self.0.store(is_operational, Ordering::SeqCst);
    }
}

impl Default for OperationalFlag {
    fn default() -> Self {
        Self::new(true)
    }
}
