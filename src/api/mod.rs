//! Typed views of the Gardener resources this webhook consumes.
//!
//! - `garden`: core Gardener shapes (`Shoot`, `CloudProfile`, `Seed`)
//! - `extensions`: the seed-side `Cluster` resource with embedded payloads
//! - `provider`: the vSphere provider configuration types
//! - `decoder`: typed decoding of raw provider payloads
//! - `helper`: accessors that read provider configs out of a decoded cluster

pub mod decoder;
pub mod extensions;
pub mod garden;
pub mod helper;
pub mod provider;
