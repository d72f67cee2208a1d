//! Standing availability alert as stored by the alerts backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{CenterId, DistrictId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Country calling code prefixed to mobile numbers on submit.
pub const COUNTRY_CODE: &str = "+91";

/// Minimum number of centers when specific centers are selected.
pub const MIN_CENTERS: usize = 1;

/// Maximum number of centers an alert may watch.
pub const MAX_CENTERS: usize = 20;

/// Youngest age an alert may be registered for.
pub const MIN_AGE: u16 = 18;

/// Oldest age accepted by the form.
pub const MAX_AGE: u16 = 150;

// ---------------------------------------------------------------------------
// Dose
// ---------------------------------------------------------------------------

/// Which dose availability should trigger the alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dose {
    #[default]
    Any,
    First,
    Second,
}

impl Dose {
    pub const ALL: [Dose; 3] = [Dose::Any, Dose::First, Dose::Second];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::First => "first",
            Self::Second => "second",
        }
    }
}

impl fmt::Display for Dose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dose {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(Self::Any),
            "first" | "1" => Ok(Self::First),
            "second" | "2" => Ok(Self::Second),
            other => Err(CoreError::InvalidInput(format!(
                "dose must be one of any, first, second (got {other:?})"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Alert
// ---------------------------------------------------------------------------

/// A registered alert, in the camelCase shape the alerts API reads and writes.
///
/// `centers == None` means any center in the district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub district_id: DistrictId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centers: Option<Vec<CenterId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u16>,
    #[serde(default)]
    pub dose: Dose,
}

impl Alert {
    /// Whether the alert watches every center in its district.
    pub fn watches_any_center(&self) -> bool {
        self.centers.as_ref().map_or(true, |c| c.is_empty())
    }

    /// Mobile number without the country calling code, as typed into the form.
    pub fn local_mobile_no(&self) -> Option<&str> {
        self.mobile_no
            .as_deref()
            .map(|m| m.strip_prefix(COUNTRY_CODE).unwrap_or(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dose_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Dose::Second).unwrap(), json!("second"));
        assert_eq!("FIRST".parse::<Dose>().unwrap(), Dose::First);
        assert!("third".parse::<Dose>().is_err());
    }

    #[test]
    fn absent_fields_are_omitted() {
        let alert = Alert {
            district_id: 296,
            centers: None,
            email: Some("a@example.com".into()),
            mobile_no: None,
            age: None,
            dose: Dose::Any,
        };
        let value = serde_json::to_value(&alert).unwrap();
        assert_eq!(
            value,
            json!({"districtId": 296, "email": "a@example.com", "dose": "any"})
        );
    }

    #[test]
    fn missing_dose_defaults_to_any() {
        let alert: Alert =
            serde_json::from_value(json!({"districtId": 296, "centers": [1, 2]})).unwrap();
        assert_eq!(alert.dose, Dose::Any);
        assert!(!alert.watches_any_center());
    }

    #[test]
    fn local_mobile_strips_country_code() {
        let alert = Alert {
            district_id: 1,
            centers: Some(vec![]),
            email: None,
            mobile_no: Some("+919123456789".into()),
            age: None,
            dose: Dose::Any,
        };
        assert_eq!(alert.local_mobile_no(), Some("9123456789"));
        assert!(alert.watches_any_center());
    }
}
