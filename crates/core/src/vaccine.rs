//! Vaccine filter for availability queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Vaccine selection on the locator. `Any` omits the filter entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VaccineType {
    #[default]
    Any,
    Covishield,
    Covaxin,
    SputnikV,
}

impl VaccineType {
    /// Every selectable type, in display order.
    pub const ALL: [VaccineType; 4] = [
        VaccineType::Any,
        VaccineType::Covishield,
        VaccineType::Covaxin,
        VaccineType::SputnikV,
    ];

    /// Value of the `vaccine` query parameter, or `None` for [`VaccineType::Any`].
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Covishield => Some("COVISHIELD"),
            Self::Covaxin => Some("COVAXIN"),
            Self::SputnikV => Some("SPUTNIK V"),
        }
    }
}

impl fmt::Display for VaccineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value().unwrap_or("ANY"))
    }
}

impl FromStr for VaccineType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "ANY" | "" => Ok(Self::Any),
            "COVISHIELD" => Ok(Self::Covishield),
            "COVAXIN" => Ok(Self::Covaxin),
            "SPUTNIKV" => Ok(Self::SputnikV),
            _ => Err(CoreError::InvalidInput(format!("unknown vaccine type: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_has_no_query_value() {
        assert_eq!(VaccineType::Any.query_value(), None);
        assert_eq!(VaccineType::Covishield.query_value(), Some("COVISHIELD"));
    }

    #[test]
    fn parses_loose_spellings() {
        assert_eq!("covishield".parse::<VaccineType>().unwrap(), VaccineType::Covishield);
        assert_eq!("Sputnik V".parse::<VaccineType>().unwrap(), VaccineType::SputnikV);
        assert_eq!("sputnik-v".parse::<VaccineType>().unwrap(), VaccineType::SputnikV);
        assert_eq!("ANY".parse::<VaccineType>().unwrap(), VaccineType::Any);
    }

    #[test]
    fn rejects_unknown() {
        assert!("moderna".parse::<VaccineType>().is_err());
    }
}
