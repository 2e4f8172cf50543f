// ==========================================
// Quotation system - domain type definitions
// ==========================================
// Enums shared by importer, repository and API layers
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Import record status (user decision)
// ==========================================
// pending -> approved | rejected, set by the user at preview time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStatus::Pending => write!(f, "pending"),
            ImportStatus::Approved => write!(f, "approved"),
            ImportStatus::Rejected => write!(f, "rejected"),
        }
    }
}

// ==========================================
// Sheet language (header classification)
// ==========================================
// Serialized as the preview `fileType`; any unrecognized string reads as Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FileType {
    Thai,
    English,
    #[default]
    Unknown,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Thai => write!(f, "thai"),
            FileType::English => write!(f, "english"),
            FileType::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for FileType {
    type Err = std::convert::Infallible;

    /// Lenient: anything that is not "thai"/"english" is Unknown
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "thai" => FileType::Thai,
            "english" => FileType::English,
            _ => FileType::Unknown,
        })
    }
}

impl From<String> for FileType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(file_type) => file_type,
            Err(never) => match never {},
        }
    }
}

// ==========================================
// Date fallback policy (import.date_fallback)
// ==========================================
// reject: an unreadable date fails the row
// today: the import date replaces it and a warning is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFallbackPolicy {
    #[default]
    Reject,
    Today,
}

impl fmt::Display for DateFallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFallbackPolicy::Reject => write!(f, "reject"),
            DateFallbackPolicy::Today => write!(f, "today"),
        }
    }
}

impl FromStr for DateFallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(DateFallbackPolicy::Reject),
            "today" => Ok(DateFallbackPolicy::Today),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// Master data kinds
// ==========================================
// Every kind maps to one lookup table; dispatch is a plain match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MasterDataKind {
    Car,
    SaleMember,
    Province,
    Color,
}

impl MasterDataKind {
    pub const ALL: [MasterDataKind; 4] = [
        MasterDataKind::Car,
        MasterDataKind::SaleMember,
        MasterDataKind::Province,
        MasterDataKind::Color,
    ];

    /// Backing table name
    pub fn table(&self) -> &'static str {
        match self {
            MasterDataKind::Car => "cars",
            MasterDataKind::SaleMember => "sale_members",
            MasterDataKind::Province => "provinces",
            MasterDataKind::Color => "colors",
        }
    }

    /// Path segment used by the HTTP routes
    pub fn slug(&self) -> &'static str {
        match self {
            MasterDataKind::Car => "cars",
            MasterDataKind::SaleMember => "sale-members",
            MasterDataKind::Province => "provinces",
            MasterDataKind::Color => "colors",
        }
    }
}

impl fmt::Display for MasterDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for MasterDataKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cars" | "car" => Ok(MasterDataKind::Car),
            "sale-members" | "sale-member" | "sale_members" => Ok(MasterDataKind::SaleMember),
            "provinces" | "province" => Ok(MasterDataKind::Province),
            "colors" | "color" => Ok(MasterDataKind::Color),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_serde() {
        assert_eq!(serde_json::to_string(&FileType::Thai).unwrap(), "\"thai\"");
        assert_eq!("ENGLISH".parse::<FileType>().unwrap(), FileType::English);
        assert_eq!("xls".parse::<FileType>().unwrap(), FileType::Unknown);
        let lenient: FileType = serde_json::from_str("\"mixed\"").unwrap();
        assert_eq!(lenient, FileType::Unknown);
    }

    #[test]
    fn test_master_data_kind_round_trip() {
        for kind in MasterDataKind::ALL {
            assert_eq!(kind.slug().parse::<MasterDataKind>().unwrap(), kind);
        }
        assert!("statuses".parse::<MasterDataKind>().is_err());
    }

    #[test]
    fn test_import_status_default_pending() {
        assert_eq!(ImportStatus::default(), ImportStatus::Pending);
        let s: ImportStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(s, ImportStatus::Approved);
    }

    #[test]
    fn test_date_fallback_policy_parse() {
        assert_eq!("TODAY".parse::<DateFallbackPolicy>().unwrap(), DateFallbackPolicy::Today);
        assert_eq!(DateFallbackPolicy::default(), DateFallbackPolicy::Reject);
        assert!("guess".parse::<DateFallbackPolicy>().is_err());
    }
}
