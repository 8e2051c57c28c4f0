//! Validation of shoot networking and worker pools.

use crate::api::garden::{Networking, Worker};

use super::{FieldError, FieldErrorList, FieldPath};

/// Validate the networking section of a shoot.
///
/// vSphere shoots carve machine addresses out of an NSX-T segment, so the
/// nodes CIDR is mandatory.
pub fn validate_networking(networking: &Networking, path: &FieldPath) -> FieldErrorList {
    let mut errs = FieldErrorList::new();

    if networking.nodes.is_none() {
        errs.push(FieldError::required(
            path.child("nodes"),
            "a nodes CIDR must be provided",
        ));
    }

    errs
}

/// Validate the worker pools of a shoot.
pub fn validate_workers(workers: &[Worker], path: &FieldPath) -> FieldErrorList {
    let mut errs = FieldErrorList::new();

    for (i, worker) in workers.iter().enumerate() {
        let worker_path = path.index(i);
        if worker.name.is_empty() {
            errs.push(FieldError::required(
                worker_path.child("name"),
                "worker name must not be empty",
            ));
        }
        if worker.zones.is_empty() {
            errs.push(FieldError::required(
                worker_path.child("zones"),
                "at least one zone must be configured",
            ));
        }
        if worker.minimum < 0 {
            errs.push(FieldError::invalid_value(
                worker_path.child("minimum"),
                worker.minimum,
                "minimum value must not be negative",
            ));
        }
        if worker.minimum > worker.maximum {
            errs.push(FieldError::invalid_value(
                worker_path.child("minimum"),
                worker.minimum,
                "minimum value must not exceed maximum value",
            ));
        }
    }

    errs
}

/// Validate a change to the worker pools of a shoot.
///
/// Zones of an existing pool are immutable because machines cannot move
/// between NSX-T segments; scaling bounds may change freely, and pools may
/// be added or removed.
pub fn validate_workers_update(
    old_workers: &[Worker],
    new_workers: &[Worker],
    path: &FieldPath,
) -> FieldErrorList {
    let mut errs = FieldErrorList::new();

    for (i, worker) in new_workers.iter().enumerate() {
        if let Some(old) = old_workers.iter().find(|w| w.name == worker.name) {
            if worker.zones != old.zones {
                errs.push(FieldError::forbidden(
                    path.index(i).child("zones"),
                    "field is immutable",
                ));
            }
        }
    }

    errs
}
