//! Node account provisioning.
//!
//! Ensures a configured number of accounts exist on the node and are unlocked,
//! with special handling for the well-known development and test accounts.

pub mod policy;
pub mod provisioner;
pub mod well_known;

pub use policy::{PolicyError, ProvisioningPolicy};
pub use provisioner::{provision, ProvisioningError, ProvisioningReport, UnlockFailure};
