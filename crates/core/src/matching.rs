//! Preview of which sessions would satisfy an alert.
//!
//! Applies the same filters the alerting backend evaluates: the alert's
//! center set (or every center when none is set), open capacity for the
//! requested dose, and the session's minimum age.

use crate::alert::{Alert, Dose};
use crate::types::{Center, Session};

/// A session that satisfies an alert, with the center offering it.
#[derive(Debug, Clone, Copy)]
pub struct SessionMatch<'a> {
    pub center: &'a Center,
    pub session: &'a Session,
}

/// Open capacity of `session` for the requested dose.
pub fn capacity_for(session: &Session, dose: Dose) -> u32 {
    match dose {
        Dose::Any => session.available_capacity,
        Dose::First => session.available_capacity_dose1,
        Dose::Second => session.available_capacity_dose2,
    }
}

/// All sessions in `centers` that would trigger `alert`, in response order.
pub fn match_sessions<'a>(alert: &Alert, centers: &'a [Center]) -> Vec<SessionMatch<'a>> {
    let watched = alert.centers.as_deref().filter(|c| !c.is_empty());

    centers
        .iter()
        .filter(|center| match watched {
            Some(ids) => center.numeric_id().is_some_and(|id| ids.contains(&id)),
            None => true,
        })
        .flat_map(|center| {
            center
                .sessions
                .iter()
                .map(move |session| SessionMatch { center, session })
        })
        .filter(|m| capacity_for(m.session, alert.dose) >= 1)
        .filter(|m| alert.age.map_or(true, |age| m.session.min_age_limit <= age))
        .collect()
}
