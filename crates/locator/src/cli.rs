//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use covin_core::alert_form::AlertDraft;
use covin_core::types::DistrictId;
use covin_core::vaccine::VaccineType;

/// Find vaccination centers with open slots tomorrow and manage your
/// availability alert.
#[derive(Parser, Debug)]
#[command(name = "covin-locator", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the districts of the configured state.
    Districts,

    /// Centers with sessions tomorrow in a district.
    Centers {
        #[arg(long)]
        district: DistrictId,

        /// any, covishield, covaxin or sputnik-v.
        #[arg(long, default_value_t = VaccineType::Any)]
        vaccine: VaccineType,

        /// Only show sessions with open capacity.
        #[arg(long)]
        available: bool,
    },

    /// Every directory center in a district, with ids for `alert set --center`.
    Directory {
        #[arg(long)]
        district: DistrictId,
    },

    /// Manage the signed-in user's alert.
    #[command(subcommand)]
    Alert(AlertCommand),
}

#[derive(Subcommand, Debug)]
pub enum AlertCommand {
    /// Show the registered alert.
    Show,

    /// Create the alert, or update fields of the existing one.
    Set(AlertFields),

    /// Delete the registered alert.
    Delete {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Sessions tomorrow that would trigger the registered alert.
    Preview {
        #[arg(long, default_value_t = VaccineType::Any)]
        vaccine: VaccineType,
    },
}

/// Alert form fields. Anything not given keeps its current value.
///
/// Values are taken as typed and checked by the form validation, so bad
/// input is reported per field rather than by the argument parser.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct AlertFields {
    #[arg(long)]
    pub district: Option<String>,

    /// Center id to watch; repeat for several. Replaces the current set.
    #[arg(long = "center", conflicts_with = "any_centers")]
    pub centers: Vec<String>,

    /// Watch every center in the district.
    #[arg(long)]
    pub any_centers: bool,

    #[arg(long)]
    pub email: Option<String>,

    /// Ten-digit mobile number, with or without +91.
    #[arg(long)]
    pub mobile: Option<String>,

    #[arg(long)]
    pub age: Option<String>,

    /// any, first or second.
    #[arg(long)]
    pub dose: Option<String>,

    /// Remove the email address.
    #[arg(long, conflicts_with = "email")]
    pub clear_email: bool,

    /// Remove the mobile number.
    #[arg(long, conflicts_with = "mobile")]
    pub clear_mobile: bool,

    /// Remove the age restriction.
    #[arg(long, conflicts_with = "age")]
    pub clear_age: bool,
}

impl AlertFields {
    /// Overlay the given fields onto `draft`.
    pub fn apply(&self, draft: &mut AlertDraft) {
        if let Some(district) = &self.district {
            draft.district_id = district.clone();
        }
        if self.any_centers {
            draft.set_any_centers(true);
        } else if !self.centers.is_empty() {
            draft.set_any_centers(false);
            draft.centers = self.centers.clone();
        }
        if let Some(email) = &self.email {
            draft.email = email.clone();
        } else if self.clear_email {
            draft.email.clear();
        }
        if let Some(mobile) = &self.mobile {
            draft.mobile_no = mobile.clone();
        } else if self.clear_mobile {
            draft.mobile_no.clear();
        }
        if let Some(age) = &self.age {
            draft.age = age.clone();
        } else if self.clear_age {
            draft.age.clear();
        }
        if let Some(dose) = &self.dose {
            draft.dose = dose.clone();
        }
    }
}
