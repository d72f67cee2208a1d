//! Alert form model (create / edit a standing alert).
//!
//! [`AlertDraft`] holds raw form input exactly as typed. [`AlertDraft::validate`]
//! evaluates every field rule in one pass and either produces the submission
//! payload or a [`ValidationErrors`] listing each offending field, so a
//! front-end can render all messages inline at once.
//!
//! [`AlertScreen`] is the two-state view/edit machine of the alerts page.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::alert::{Alert, Dose, COUNTRY_CODE, MAX_AGE, MAX_CENTERS, MIN_AGE, MIN_CENTERS};
use crate::types::{CenterId, DistrictId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Local (country-code stripped) mobile number: ten digits, leading 6-9.
pub const MOBILE_PATTERN: &str = r"^[6-9]\d{9}$";

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MOBILE_PATTERN).expect("valid regex"));

/// Form field names, matching the camelCase payload keys.
pub mod fields {
    pub const DISTRICT_ID: &str = "districtId";
    pub const CENTERS: &str = "centers";
    pub const EMAIL: &str = "email";
    pub const MOBILE_NO: &str = "mobileNo";
    pub const AGE: &str = "age";
    pub const DOSE: &str = "dose";
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            rule,
            message: message.into(),
        }
    }
}

/// Every violation found in one validation pass, in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// The violation to show next to `field`, if any.
    pub fn for_field(&self, field: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.for_field(field).is_some()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// Raw alert form input.
///
/// Optional text fields left blank are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDraft {
    pub district_id: String,
    pub centers: Vec<String>,
    pub email: String,
    /// Local number, without the country code.
    pub mobile_no: String,
    pub age: String,
    pub dose: String,
    any_centers: bool,
    /// Center selection parked while `any_centers` is on.
    stashed_centers: Vec<String>,
}

impl Default for AlertDraft {
    fn default() -> Self {
        Self::empty()
    }
}

impl AlertDraft {
    /// A blank form for creating a new alert.
    pub fn empty() -> Self {
        Self {
            district_id: String::new(),
            centers: Vec::new(),
            email: String::new(),
            mobile_no: String::new(),
            age: String::new(),
            dose: Dose::Any.as_str().to_string(),
            any_centers: false,
            stashed_centers: Vec::new(),
        }
    }

    /// Pre-fill the form from an existing alert.
    pub fn from_alert(alert: &Alert) -> Self {
        let centers: Vec<String> = alert
            .centers
            .iter()
            .flatten()
            .map(|id| id.to_string())
            .collect();
        Self {
            district_id: alert.district_id.to_string(),
            any_centers: centers.is_empty(),
            centers,
            email: alert.email.clone().unwrap_or_default(),
            mobile_no: alert.local_mobile_no().unwrap_or_default().to_string(),
            age: alert.age.map(|a| a.to_string()).unwrap_or_default(),
            dose: alert.dose.as_str().to_string(),
            stashed_centers: Vec::new(),
        }
    }

    pub fn any_centers(&self) -> bool {
        self.any_centers
    }

    /// Toggle "any center in the district".
    ///
    /// Turning it on parks the current selection; turning it off restores it.
    pub fn set_any_centers(&mut self, on: bool) {
        if on == self.any_centers {
            return;
        }
        if on {
            self.stashed_centers = std::mem::take(&mut self.centers);
        } else {
            self.centers = std::mem::take(&mut self.stashed_centers);
        }
        self.any_centers = on;
    }

    /// Validate every field and build the submission payload.
    pub fn validate(&self) -> Result<Alert, ValidationErrors> {
        let district_id = check_district(&self.district_id);
        let centers = check_centers(self.any_centers, &self.centers);
        let email = check_email(&self.email);
        let mobile_no = check_mobile(&self.mobile_no);
        let age = check_age(&self.age);
        let dose = check_dose(&self.dose);

        match (district_id, centers, email, mobile_no, age, dose) {
            (Ok(district_id), Ok(centers), Ok(email), Ok(mobile_no), Ok(age), Ok(dose)) => {
                Ok(Alert {
                    district_id,
                    centers,
                    email,
                    mobile_no,
                    age,
                    dose,
                })
            }
            (district_id, centers, email, mobile_no, age, dose) => {
                let violations = [
                    district_id.err(),
                    centers.err(),
                    email.err(),
                    mobile_no.err(),
                    age.err(),
                    dose.err(),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(ValidationErrors { violations })
            }
        }
    }
}

fn check_district(raw: &str) -> Result<DistrictId, FieldViolation> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldViolation::new(
            fields::DISTRICT_ID,
            "required",
            "District is required",
        ));
    }
    match raw.parse::<DistrictId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(FieldViolation::new(
            fields::DISTRICT_ID,
            "positive_integer",
            format!("District must be a positive integer id (got {raw:?})"),
        )),
    }
}

fn check_centers(any_centers: bool, raw: &[String]) -> Result<Option<Vec<CenterId>>, FieldViolation> {
    if any_centers {
        return Ok(None);
    }

    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(raw.len());
    for value in raw.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        match value.parse::<CenterId>() {
            Ok(id) if id > 0 => {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
            _ => {
                return Err(FieldViolation::new(
                    fields::CENTERS,
                    "integer",
                    format!("Centers must be integer ids (got {value:?})"),
                ))
            }
        }
    }

    if ids.len() < MIN_CENTERS {
        return Err(FieldViolation::new(
            fields::CENTERS,
            "min",
            format!("Select at least {MIN_CENTERS} center or choose any center"),
        ));
    }
    if ids.len() > MAX_CENTERS {
        return Err(FieldViolation::new(
            fields::CENTERS,
            "max",
            format!("Select at most {MAX_CENTERS} centers (got {})", ids.len()),
        ));
    }
    Ok(Some(ids))
}

fn check_email(raw: &str) -> Result<Option<String>, FieldViolation> {
    let email = raw.trim().to_string();
    if email.is_empty() {
        return Ok(None);
    }
    if email.validate_email() {
        Ok(Some(email))
    } else {
        Err(FieldViolation::new(
            fields::EMAIL,
            "email",
            "Email must be a valid email address",
        ))
    }
}

fn check_mobile(raw: &str) -> Result<Option<String>, FieldViolation> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let local = raw.strip_prefix(COUNTRY_CODE).unwrap_or(raw);
    if MOBILE_RE.is_match(local) {
        Ok(Some(format!("{COUNTRY_CODE}{local}")))
    } else {
        Err(FieldViolation::new(
            fields::MOBILE_NO,
            "pattern",
            "Mobile number must be 10 digits starting with 6, 7, 8 or 9",
        ))
    }
}

fn check_age(raw: &str) -> Result<Option<u16>, FieldViolation> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let age: i64 = raw.parse().map_err(|_| {
        FieldViolation::new(
            fields::AGE,
            "integer",
            format!("Age must be a whole number (got {raw:?})"),
        )
    })?;
    if !(i64::from(MIN_AGE)..=i64::from(MAX_AGE)).contains(&age) {
        return Err(FieldViolation::new(
            fields::AGE,
            "range",
            format!("Age must be between {MIN_AGE} and {MAX_AGE}"),
        ));
    }
    // In range, so it fits.
    Ok(Some(age as u16))
}

fn check_dose(raw: &str) -> Result<Dose, FieldViolation> {
    if raw.trim().is_empty() {
        return Err(FieldViolation::new(fields::DOSE, "required", "Dose is required"));
    }
    raw.parse().map_err(|_| {
        FieldViolation::new(
            fields::DOSE,
            "one_of",
            "Dose must be one of any, first, second",
        )
    })
}

// ---------------------------------------------------------------------------
// View / edit state
// ---------------------------------------------------------------------------

/// State of the alerts page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertScreen {
    /// An alert exists and is shown read-only.
    Viewing(Alert),
    /// Creating (`base == None`) or modifying (`base == Some`) an alert.
    Editing {
        draft: AlertDraft,
        base: Option<Alert>,
    },
}

impl Default for AlertScreen {
    fn default() -> Self {
        Self::initial(None)
    }
}

impl AlertScreen {
    /// Initial state from the result of fetching the current alert.
    pub fn initial(existing: Option<Alert>) -> Self {
        match existing {
            Some(alert) => Self::Viewing(alert),
            None => Self::Editing {
                draft: AlertDraft::empty(),
                base: None,
            },
        }
    }

    /// Open the editor on the shown alert. No-op while already editing.
    pub fn edit(self) -> Self {
        match self {
            Self::Viewing(alert) => Self::Editing {
                draft: AlertDraft::from_alert(&alert),
                base: Some(alert),
            },
            editing => editing,
        }
    }

    /// Abandon the edit. Without an existing alert the form is reset.
    pub fn cancel(self) -> Self {
        match self {
            Self::Editing {
                base: Some(alert), ..
            } => Self::Viewing(alert),
            Self::Editing { base: None, .. } => Self::initial(None),
            viewing => viewing,
        }
    }

    /// The alert was stored by the backend.
    pub fn submitted(alert: Alert) -> Self {
        Self::Viewing(alert)
    }

    /// The alert was removed by the backend.
    pub fn deleted() -> Self {
        Self::initial(None)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// The stored alert this screen is about, if any.
    pub fn alert(&self) -> Option<&Alert> {
        match self {
            Self::Viewing(alert) => Some(alert),
            Self::Editing { base, .. } => base.as_ref(),
        }
    }

    pub fn draft(&self) -> Option<&AlertDraft> {
        match self {
            Self::Editing { draft, .. } => Some(draft),
            Self::Viewing(_) => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut AlertDraft> {
        match self {
            Self::Editing { draft, .. } => Some(draft),
            Self::Viewing(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
