//! Directory and availability records as served by the upstream APIs.

use serde::{Deserialize, Deserializer, Serialize};

/// Upstream district identifier.
pub type DistrictId = i64;

/// Upstream state identifier.
pub type StateId = i64;

/// Upstream center identifier as used by the directory and alerts.
pub type CenterId = i64;

// ---------------------------------------------------------------------------
// Directory records
// ---------------------------------------------------------------------------

/// A district from the bulk district directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub district_id: DistrictId,
    pub district_name: String,
    pub state_id: StateId,
}

/// A center entry from the bulk center directory.
///
/// `district_id` is trusted from the source; it is not checked against the
/// district directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterDim {
    pub center_id: CenterId,
    pub name: String,
    pub district_id: DistrictId,
    pub state_id: StateId,
}

// ---------------------------------------------------------------------------
// Availability records
// ---------------------------------------------------------------------------

/// Response body of an availability query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CenterResponse {
    #[serde(default)]
    pub centers: Vec<Center>,
}

/// A vaccination center with its sessions for the queried date range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Center {
    #[serde(deserialize_with = "string_or_number")]
    pub center_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub state_name: String,
    #[serde(default)]
    pub district_name: String,
    #[serde(default)]
    pub block_name: String,
    #[serde(default)]
    pub pincode: u32,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub long: f64,
    #[serde(default)]
    pub fee_type: String,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl Center {
    /// The center id as a directory id, if it is numeric.
    pub fn numeric_id(&self) -> Option<CenterId> {
        self.center_id.parse().ok()
    }

    /// Total open capacity across all sessions.
    pub fn total_capacity(&self) -> u32 {
        self.sessions.iter().map(|s| s.available_capacity).sum()
    }
}

/// A single day's session at a center.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    #[serde(default, deserialize_with = "capacity")]
    pub available_capacity: u32,
    #[serde(default, deserialize_with = "capacity")]
    pub available_capacity_dose1: u32,
    #[serde(default, deserialize_with = "capacity")]
    pub available_capacity_dose2: u32,
    #[serde(default)]
    pub min_age_limit: u16,
    /// `DD-MM-YYYY`.
    pub date: String,
    #[serde(default)]
    pub vaccine: String,
    #[serde(default)]
    pub slots: Vec<String>,
}

/// Accept either a JSON string or a JSON number and keep it as a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

/// Capacities arrive as integers or floats (`10.0`); negatives count as zero.
fn capacity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = serde_json::Number::deserialize(deserializer)?;
    Ok(match (n.as_u64(), n.as_f64()) {
        (Some(v), _) => u32::try_from(v).unwrap_or(u32::MAX),
        (None, Some(v)) if v > 0.0 => v.min(f64::from(u32::MAX)) as u32,
        _ => 0,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn center_dim_uses_camel_case() {
        let dim: CenterDim = serde_json::from_value(json!({
            "centerId": 604_813,
            "name": "PHC Vellanad",
            "districtId": 296,
            "stateId": 17,
        }))
        .unwrap();
        assert_eq!(dim.center_id, 604_813);
        assert_eq!(dim.district_id, 296);
        assert_eq!(dim.state_id, 17);
    }

    #[test]
    fn center_id_accepts_number_or_string() {
        let numeric: Center =
            serde_json::from_value(json!({"center_id": 1234, "name": "A"})).unwrap();
        let text: Center =
            serde_json::from_value(json!({"center_id": "1234", "name": "A"})).unwrap();
        assert_eq!(numeric.center_id, "1234");
        assert_eq!(text.center_id, "1234");
        assert_eq!(numeric.numeric_id(), Some(1234));
    }

    #[test]
    fn session_defaults_missing_dose_capacity() {
        let session: Session = serde_json::from_value(json!({
            "session_id": "s-1",
            "available_capacity": 12,
            "min_age_limit": 18,
            "date": "17-10-2026",
            "slots": ["09:00AM-11:00AM", "11:00AM-01:00PM"],
        }))
        .unwrap();
        assert_eq!(session.available_capacity, 12);
        assert_eq!(session.available_capacity_dose1, 0);
        assert_eq!(session.slots.len(), 2);
    }

    #[test]
    fn capacity_accepts_float_values() {
        let session: Session = serde_json::from_value(json!({
            "session_id": "s-2",
            "available_capacity": 10.0,
            "available_capacity_dose1": 7.0,
            "available_capacity_dose2": -1,
            "date": "17-10-2026",
        }))
        .unwrap();
        assert_eq!(session.available_capacity, 10);
        assert_eq!(session.available_capacity_dose1, 7);
        assert_eq!(session.available_capacity_dose2, 0);
    }

    #[test]
    fn total_capacity_sums_sessions() {
        let center = Center {
            center_id: "1".into(),
            sessions: vec![
                Session {
                    available_capacity: 3,
                    ..Default::default()
                },
                Session {
                    available_capacity: 4,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(center.total_capacity(), 7);
    }

    #[test]
    fn empty_response_body_has_no_centers() {
        let response: CenterResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.centers.is_empty());
    }
}
