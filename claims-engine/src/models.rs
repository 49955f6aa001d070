use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClaimsError;

/// Exported column headers; spelling and casing are part of the file format
pub mod columns {
    pub const CLAIM_ID: &str = "Claim ID";
    pub const CLAIM_DATE: &str = "Claim Date";
    pub const PROVIDER_ID: &str = "Provider ID";
    pub const FACILITY_ID: &str = "Facility ID";
    pub const PAYOR_ID: &str = "Payor ID";
    pub const PAYOR_NAME: &str = "Payor Name";
    pub const PATIENT_ID: &str = "Patient ID";
    pub const GENDER: &str = "Gender";
    pub const AGE: &str = "Age";
    pub const DIAGNOSIS_CODE: &str = "Diagnosis Code";
    pub const ICD10: &str = "ICD-10";
    pub const PROCEDURE_CODE: &str = "Procedure Code";
    pub const AMOUNT_BILLED: &str = "Amount Billed";
    pub const AMOUNT_PAID: &str = "Amount Paid";
    pub const CLAIM_STATUS: &str = "Claim Status";
    pub const SERVICE_DATE_START: &str = "Service Date Start";
    pub const SERVICE_DATE_END: &str = "Service Date End";
    pub const PAYMENT_DATE: &str = "Payment Date";
    pub const ADJUSTMENTS: &str = "Adjustments";
    pub const DEDUCTIBLES: &str = "Deductibles";
    pub const CO_PAYS: &str = "Co-pays";

    // Dimension tables
    pub const IS_GOVERNMENT: &str = "Is Government";
    pub const DESCRIPTION: &str = "Description";
    pub const CATEGORY: &str = "Category";
    pub const FACILITY_NAME: &str = "Facility Name";
    pub const FACILITY_TYPE: &str = "Facility Type";
    pub const STATE: &str = "State";
}

/// Selector value that disables a categorical filter
pub const ALL_SENTINEL: &str = "All";

/// Claim adjudication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    Paid,
    Denied,
    Pending,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 3] = [ClaimStatus::Paid, ClaimStatus::Denied, ClaimStatus::Pending];

    pub fn as_str(self) -> &'static str {
        match self {
            ClaimStatus::Paid => "Paid",
            ClaimStatus::Denied => "Denied",
            ClaimStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClaimsError::configuration(format!("unknown claim status '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Fixed government payors; their ids never change between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernmentPayor {
    pub id: &'static str,
    pub name: &'static str,
}

pub const MEDICARE: GovernmentPayor = GovernmentPayor {
    id: "0000000001",
    name: "Medicare",
};

pub const MEDICAID: GovernmentPayor = GovernmentPayor {
    id: "0000000002",
    name: "Medicaid",
};

pub const GOVERNMENT_PAYORS: [GovernmentPayor; 2] = [MEDICARE, MEDICAID];

/// Commercial payor catalog; ids are drawn fresh for every claim
pub const PRIVATE_PAYORS: [&str; 10] = [
    "United Healthcare",
    "Aetna",
    "Cigna",
    "Humana",
    "Blue Cross Blue Shield",
    "Kaiser Permanente",
    "Centene",
    "Anthem",
    "Molina Healthcare",
    "WellCare",
];

pub fn government_payor(id: &str) -> Option<GovernmentPayor> {
    GOVERNMENT_PAYORS.into_iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_case_insensitively() {
        assert_eq!("paid".parse::<ClaimStatus>().unwrap(), ClaimStatus::Paid);
        assert_eq!(" Denied ".parse::<ClaimStatus>().unwrap(), ClaimStatus::Denied);
        assert!("Approved".parse::<ClaimStatus>().is_err());
    }

    #[test]
    fn test_government_payor_lookup() {
        assert_eq!(government_payor("0000000001"), Some(MEDICARE));
        assert_eq!(government_payor("0000000002").map(|p| p.name), Some("Medicaid"));
        assert_eq!(government_payor("0000000003"), None);
    }
}
