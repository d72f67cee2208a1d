//! Plain-text rendering of directory, availability and alert data.

use std::collections::HashMap;
use std::fmt::Write;

use covin_core::alert::Alert;
use covin_core::alert_form::ValidationErrors;
use covin_core::matching::{capacity_for, SessionMatch};
use covin_core::types::{Center, CenterDim, CenterId, District};

pub fn districts(districts: &[District]) -> String {
    if districts.is_empty() {
        return "No districts found.\n".to_string();
    }
    let mut out = String::new();
    for d in districts {
        let _ = writeln!(out, "{:>6}  {}", d.district_id, d.district_name);
    }
    out
}

pub fn directory(centers: &[CenterDim]) -> String {
    if centers.is_empty() {
        return "No centers in this district.\n".to_string();
    }
    let mut out = String::new();
    for c in centers {
        let _ = writeln!(out, "{:>8}  {}", c.center_id, c.name);
    }
    out
}

/// One block per center with a line per session.
///
/// With `available_only`, sessions without capacity are hidden and centers
/// left with none are skipped.
pub fn centers(heading: &str, centers: &[Center], available_only: bool) -> String {
    let mut out = format!("{heading}\n");
    let mut shown = 0;

    for center in centers {
        let sessions: Vec<_> = center
            .sessions
            .iter()
            .filter(|s| !available_only || s.available_capacity > 0)
            .collect();
        if available_only && sessions.is_empty() {
            continue;
        }
        shown += 1;

        let _ = writeln!(out, "\n{} [{}]", center.name, center.center_id);
        let location: Vec<&str> = [
            center.address.as_str(),
            center.block_name.as_str(),
            center.district_name.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
        if !location.is_empty() || center.pincode != 0 {
            let _ = writeln!(out, "  {} {}", location.join(", "), center.pincode);
        }
        if !center.fee_type.is_empty() || !center.from.is_empty() {
            let _ = writeln!(out, "  {} {}-{}", center.fee_type, center.from, center.to);
        }
        if sessions.is_empty() {
            out.push_str("  no sessions\n");
        }
        for s in sessions {
            let _ = writeln!(
                out,
                "  {}  {:<10}  age {:>2}+  {:>3} open (dose 1: {}, dose 2: {})  {}",
                s.date,
                s.vaccine,
                s.min_age_limit,
                s.available_capacity,
                s.available_capacity_dose1,
                s.available_capacity_dose2,
                s.slots.join(", "),
            );
        }
    }

    if shown == 0 {
        out.push_str("\nNo centers found.\n");
    }
    out
}

/// Read-only alert view, labelling center ids with their directory names.
pub fn alert(alert: &Alert, district: Option<&str>, names: &HashMap<CenterId, String>) -> String {
    let mut out = String::new();
    let _ = match district {
        Some(name) => writeln!(out, "District:  {name} ({})", alert.district_id),
        None => writeln!(out, "District:  {}", alert.district_id),
    };

    match alert.centers.as_deref() {
        Some(ids) if !ids.is_empty() => {
            let _ = writeln!(out, "Centers:");
            for id in ids {
                match names.get(id) {
                    Some(name) => {
                        let _ = writeln!(out, "  {id}  {name}");
                    }
                    None => {
                        let _ = writeln!(out, "  {id}");
                    }
                }
            }
        }
        _ => {
            let _ = writeln!(out, "Centers:   any center in the district");
        }
    }

    let _ = writeln!(out, "Email:     {}", alert.email.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Mobile:    {}", alert.mobile_no.as_deref().unwrap_or("-"));
    let _ = match alert.age {
        Some(age) => writeln!(out, "Age:       {age}"),
        None => writeln!(out, "Age:       -"),
    };
    let _ = writeln!(out, "Dose:      {}", alert.dose);
    out
}

/// One line per field violation.
pub fn violations(errors: &ValidationErrors) -> String {
    let mut out = String::from("Alert not saved:\n");
    for v in errors.violations() {
        let _ = writeln!(out, "  {}: {}", v.field, v.message);
    }
    out
}

pub fn matches(alert: &Alert, found: &[SessionMatch<'_>]) -> String {
    if found.is_empty() {
        return "No sessions tomorrow match this alert.\n".to_string();
    }
    let mut out = String::new();
    for m in found {
        let _ = writeln!(
            out,
            "{} [{}]  {}  {}  age {}+  {} open for dose {}",
            m.center.name,
            m.center.center_id,
            m.session.date,
            m.session.vaccine,
            m.session.min_age_limit,
            capacity_for(m.session, alert.dose),
            alert.dose,
        );
    }
    out
}
