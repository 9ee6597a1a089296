//! crates/college_path_core/src/domain.rs
//!
//! Defines the core data structures for the application: the student's
//! profile and bookmarks, the session progress flags, and the read-only
//! catalog of colleges and scholarships.
//!
//! Field names serialize in camelCase because these records are exactly what
//! the session store writes to the backing key-value store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Student-Owned State
//=========================================================================================

/// The intermediate ("Inter") stream a student studied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stream {
    #[serde(rename = "MPC")]
    Mpc,
    #[serde(rename = "BiPC")]
    BiPc,
    #[serde(rename = "MEC")]
    Mec,
    #[serde(rename = "HEC")]
    Hec,
}

impl Stream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stream::Mpc => "MPC",
            Stream::BiPc => "BiPC",
            Stream::Mec => "MEC",
            Stream::Hec => "HEC",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stream {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MPC" => Ok(Stream::Mpc),
            "BiPC" => Ok(Stream::BiPc),
            "MEC" => Ok(Stream::Mec),
            "HEC" => Ok(Stream::Hec),
            other => Err(format!("unknown stream '{}'", other)),
        }
    }
}

/// An unset stream is stored as the empty string.
mod optional_stream {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<Stream>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.map(|v| v.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Stream>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

/// The student's academic and contact record.
///
/// Marks and ranks are kept as the raw strings the student typed; they are
/// only interpreted numerically by onboarding validation and the eligibility
/// rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    // Registration
    pub email: String,
    pub phone: String,

    // Stage 1 - Personal Details
    pub first_name: String,
    pub last_name: String,
    pub tenth_marks: String,

    // Stage 2 - Inter Details
    pub inter_marks: String,
    #[serde(with = "optional_stream", default)]
    pub stream: Option<Stream>,

    // Stage 3 - Optional Scholarship Info
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jee_rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eapcet_rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emcet_rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_income: Option<String>,
}

impl Profile {
    /// The profile created when registration completes: contact details set,
    /// every academic field blank.
    pub fn registered(email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            phone: phone.into(),
            first_name: String::new(),
            last_name: String::new(),
            tenth_marks: String::new(),
            inter_marks: String::new(),
            stream: None,
            jee_rank: None,
            eapcet_rank: None,
            emcet_rank: None,
            father_income: None,
        }
    }

    /// Merges every field present in `patch` into this profile.
    pub fn apply(&mut self, patch: ProfilePatch) {
        let ProfilePatch {
            first_name,
            last_name,
            tenth_marks,
            inter_marks,
            stream,
            jee_rank,
            eapcet_rank,
            emcet_rank,
            father_income,
        } = patch;

        if let Some(v) = first_name {
            self.first_name = v;
        }
        if let Some(v) = last_name {
            self.last_name = v;
        }
        if let Some(v) = tenth_marks {
            self.tenth_marks = v;
        }
        if let Some(v) = inter_marks {
            self.inter_marks = v;
        }
        if let Some(v) = stream {
            self.stream = v;
        }
        if let Some(v) = jee_rank {
            self.jee_rank = Some(v);
        }
        if let Some(v) = eapcet_rank {
            self.eapcet_rank = Some(v);
        }
        if let Some(v) = emcet_rank {
            self.emcet_rank = Some(v);
        }
        if let Some(v) = father_income {
            self.father_income = Some(v);
        }
    }
}

/// A partial update to a [`Profile`]. Absent fields are left untouched.
///
/// Email and phone have no counterpart here: they are fixed once
/// registration completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenth_marks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inter_marks: Option<String>,
    /// `Some(None)` clears the stream.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "patch_stream"
    )]
    pub stream: Option<Option<Stream>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jee_rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eapcet_rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emcet_rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_income: Option<String>,
}

mod patch_stream {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<Option<Stream>>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => optional_stream::serialize(inner, s),
            None => s.serialize_none(),
        }
    }

    /// Only called when the field is present: `null` and `""` both clear.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<Stream>>, D::Error> {
        match Option::<String>::deserialize(d)?.as_deref() {
            None | Some("") => Ok(Some(None)),
            Some(raw) => raw.parse().map(|s| Some(Some(s))).map_err(serde::de::Error::custom),
        }
    }
}

/// A saved college, unique by `college_id` within the bookmark set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(rename = "id", alias = "collegeId")]
    pub college_id: String,
    pub marked_at: DateTime<Utc>,
}

/// Registration and onboarding progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFlags {
    pub is_registered: bool,
    pub is_onboarded: bool,
    /// Onboarding stage in `1..=3`; only meaningful while not onboarded.
    pub current_step: u8,
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self {
            is_registered: false,
            is_onboarded: false,
            current_step: FIRST_STEP,
        }
    }
}

pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 3;

//=========================================================================================
// Read-Only Catalog
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollegeType {
    Engineering,
    Medical,
    #[serde(rename = "Arts & Science")]
    ArtsAndScience,
    Management,
    Pharmacy,
    Law,
}

impl FromStr for CollegeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Engineering" => Ok(CollegeType::Engineering),
            "Medical" => Ok(CollegeType::Medical),
            "Arts & Science" => Ok(CollegeType::ArtsAndScience),
            "Management" => Ok(CollegeType::Management),
            "Pharmacy" => Ok(CollegeType::Pharmacy),
            "Law" => Ok(CollegeType::Law),
            other => Err(format!("unknown college type '{}'", other)),
        }
    }
}

/// The two states the catalog covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Andhra Pradesh
    #[serde(rename = "AP")]
    AndhraPradesh,
    /// Telangana
    #[serde(rename = "TG")]
    Telangana,
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AP" => Ok(Region::AndhraPradesh),
            "TG" => Ok(Region::Telangana),
            other => Err(format!("unknown state '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct College {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub college_type: CollegeType,
    pub state: Region,
    pub district: String,
    pub address: String,
    pub contact: String,
    pub website: String,
    /// 0.0 to 5.0
    pub rating: f32,
    pub streams: Vec<Stream>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_percentage: Option<f32>,
    #[serde(rename = "acceptsJEE", default)]
    pub accepts_jee: bool,
    #[serde(rename = "acceptsEAPCET", default)]
    pub accepts_eapcet: bool,
    #[serde(rename = "acceptsEMCET", default)]
    pub accepts_emcet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScholarshipCategory {
    #[serde(rename = "JEE")]
    Jee,
    #[serde(rename = "EAPCET")]
    Eapcet,
    #[serde(rename = "EMCET")]
    Emcet,
    Income,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scholarship {
    pub id: String,
    pub name: String,
    pub category: ScholarshipCategory,
    pub eligibility: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rank: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_income: Option<u64>,
}

/// The static catalog, loaded once and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub colleges: Vec<College>,
    pub scholarships: Vec<Scholarship>,
    #[serde(default)]
    pub ap_districts: Vec<String>,
    #[serde(default)]
    pub tg_districts: Vec<String>,
}

impl Catalog {
    pub fn college(&self, id: &str) -> Option<&College> {
        self.colleges.iter().find(|c| c.id == id)
    }

    /// District names used to populate the district selector. `None` means
    /// "all states", for which no district list is offered.
    pub fn districts_for(&self, region: Option<Region>) -> &[String] {
        match region {
            Some(Region::AndhraPradesh) => &self.ap_districts,
            Some(Region::Telangana) => &self.tg_districts,
            None => &[],
        }
    }
}
