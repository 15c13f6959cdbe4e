//! Authored migration registries, one per target kind.

pub mod master;
pub mod tenant;

use sm_core::registry::Registry;
use sm_core::target::TargetKind;
use sm_core::CoreResult;

/// Build the registry for a target kind.
pub fn registry_for(kind: TargetKind) -> CoreResult<Registry> {
    match kind {
        TargetKind::Catalog => master::registry(),
        TargetKind::Tenant => tenant::registry(),
    }
}
