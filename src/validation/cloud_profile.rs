//! Validation of `CloudProfileConfig`.

use std::collections::BTreeSet;
use std::net::IpAddr;

use crate::api::provider::{CloudProfileConfig, LOAD_BALANCER_SIZES};

use super::{FieldError, FieldErrorList, FieldPath};

const DNS1123_DETAIL: &str = "a lowercase RFC 1123 label must consist of lower case alphanumeric characters or '-', and must start and end with an alphanumeric character";

/// Validate the provider configuration of a cloud profile.
///
/// A broken profile would reject every shoot created against it with a
/// misleading message, so the profile payload is checked structurally
/// whenever it is decoded.
pub fn validate_cloud_profile_config(
    config: &CloudProfileConfig,
    path: &FieldPath,
) -> FieldErrorList {
    let mut errs = FieldErrorList::new();

    if config.name_prefix.is_empty() {
        errs.push(FieldError::required(
            path.child("namePrefix"),
            "a name prefix for NSX-T objects must be provided",
        ));
    }

    validate_regions(config, path, &mut errs);
    validate_load_balancer_constraints(config, path, &mut errs);

    let dns_path = path.child("dnsServers");
    for (i, server) in config.dns_servers.iter().enumerate() {
        if server.parse::<IpAddr>().is_err() {
            errs.push(FieldError::invalid(
                dns_path.index(i),
                server,
                "must be a valid IP address",
            ));
        }
    }

    errs
}

fn validate_regions(config: &CloudProfileConfig, path: &FieldPath, errs: &mut FieldErrorList) {
    let regions_path = path.child("regions");
    if config.regions.is_empty() {
        errs.push(FieldError::required(
            regions_path,
            "must provide at least one region",
        ));
        return;
    }

    let mut region_names = BTreeSet::new();
    for (i, region) in config.regions.iter().enumerate() {
        let region_path = regions_path.index(i);
        if region.name.is_empty() {
            errs.push(FieldError::required(
                region_path.child("name"),
                "region name must not be empty",
            ));
        } else {
            if !is_dns1123_label(&region.name) {
                errs.push(FieldError::invalid(
                    region_path.child("name"),
                    &region.name,
                    DNS1123_DETAIL,
                ));
            }
            if !region_names.insert(region.name.as_str()) {
                errs.push(FieldError::duplicate(region_path.child("name"), &region.name));
            }
        }

        let zones_path = region_path.child("zones");
        if region.zones.is_empty() {
            errs.push(FieldError::required(
                zones_path,
                "must provide at least one zone",
            ));
            continue;
        }
        let mut zone_names = BTreeSet::new();
        for (j, zone) in region.zones.iter().enumerate() {
            let zone_name_path = zones_path.index(j).child("name");
            if zone.name.is_empty() {
                errs.push(FieldError::required(
                    zone_name_path,
                    "zone name must not be empty",
                ));
            } else if !zone_names.insert(zone.name.as_str()) {
                errs.push(FieldError::duplicate(zone_name_path, &zone.name));
            }
        }
    }
}

fn validate_load_balancer_constraints(
    config: &CloudProfileConfig,
    path: &FieldPath,
    errs: &mut FieldErrorList,
) {
    let lb_path = path.child("constraints").child("loadBalancerConfig");
    let lb = &config.constraints.load_balancer_config;

    if lb.size.is_empty() {
        errs.push(FieldError::required(
            lb_path.child("size"),
            "a load balancer size must be provided",
        ));
    } else if !LOAD_BALANCER_SIZES.contains(&lb.size.as_str()) {
        errs.push(FieldError::not_supported(
            lb_path.child("size"),
            &lb.size,
            &LOAD_BALANCER_SIZES,
        ));
    }

    let classes_path = lb_path.child("classes");
    let mut class_names = BTreeSet::new();
    for (i, class) in lb.classes.iter().enumerate() {
        let name_path = classes_path.index(i).child("name");
        if class.name.is_empty() {
            errs.push(FieldError::required(
                name_path,
                "load balancer class name must not be empty",
            ));
        } else if !class_names.insert(class.name.as_str()) {
            errs.push(FieldError::duplicate(name_path, &class.name));
        }
    }
}

/// Check a string against the DNS-1123 label rules region names follow.
fn is_dns1123_label(value: &str) -> bool {
    use std::sync::LazyLock;
    // Pattern: ^[a-z0-9]([-a-z0-9]*[a-z0-9])?$
    static LABEL_RE: LazyLock<Option<regex::Regex>> =
        LazyLock::new(|| regex::Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").ok());
    value.len() <= 63 && LABEL_RE.as_ref().is_some_and(|re| re.is_match(value))
}
