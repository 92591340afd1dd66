//! Host service location and capability probing.
//!
//! Optional host services are located by a well-known [`ContractId`] in a
//! [`HostServices`] registry. A located service advertises which of the
//! known API shapes it actually implements through the default-`None`
//! adapter methods on [`HostService`] — host releases differ, and callers
//! must not assume the newest shape exists. The callout bridge in
//! [`callout`] is the consumer of this machinery.

pub mod callout;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::host::callout::{CalloutApiV1, CalloutApiV2};

/// Well-known identifier a host service is registered and located under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractId(Uuid);

impl ContractId {
    pub const fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A service object supplied by the host.
///
/// Each `callout_*` adapter returns the concrete API variant when the
/// service implements that shape. The defaults return `None`, so a service
/// only overrides the shapes it genuinely supports and probing code never
/// needs reflection.
pub trait HostService: Send + Sync {
    /// Newer hosts: element-region anchor, optional command binding.
    fn callout_v2(&self) -> Option<&dyn CalloutApiV2> {
        None
    }

    /// Older hosts: screen-point anchor, required command group/id pair.
    fn callout_v1(&self) -> Option<&dyn CalloutApiV1> {
        None
    }
}

/// Registry of host services keyed by contract id.
///
/// Read-only after the host finishes wiring; lookups are per-call and no
/// state survives between them. `headless` records that the process runs
/// without real screen geometry (test harness), in which case element-to-
/// screen translation substitutes the zero point.
#[derive(Default)]
pub struct HostServices {
    services: HashMap<Uuid, Arc<dyn HostService>>,
    headless: bool,
}

impl HostServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry for harnesses where screen coordinates are meaningless.
    pub fn headless() -> Self {
        Self { services: HashMap::new(), headless: true }
    }

    pub fn is_headless(&self) -> bool {
        self.headless
    }

    /// Registers `service` under `contract`, replacing any previous
    /// registration for the same contract.
    pub fn register(&mut self, contract: ContractId, service: Arc<dyn HostService>) {
        self.services.insert(contract.value(), service);
    }

    /// Locates the service registered under `contract`, if any.
    pub fn get(&self, contract: &ContractId) -> Option<&Arc<dyn HostService>> {
        self.services.get(&contract.value())
    }
}

impl fmt::Debug for HostServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostServices")
            .field("contracts", &self.services.keys().collect::<Vec<_>>())
            .field("headless", &self.headless)
            .finish()
    }
}
