//! crates/college_path_core/src/eligibility.rs
//!
//! Pure matching of a student profile against the static catalog. Nothing
//! here is cached; every call recomputes from its inputs.

use crate::domain::{College, CollegeType, Profile, Region, Scholarship, ScholarshipCategory};

/// Query value meaning "do not filter on state or type".
pub const ALL: &str = "all";
/// Query value meaning "do not filter on district".
pub const ALL_DISTRICTS: &str = "All Districts";

/// Criteria the student picks on the college search screen. `None` in any
/// selector means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollegeCriteria {
    pub search: String,
    pub state: Option<Region>,
    pub district: Option<String>,
    pub college_type: Option<CollegeType>,
}

impl CollegeCriteria {
    /// Builds criteria from the raw selector values, where `"all"` and
    /// `"All Districts"` (or an empty value) stand for no restriction.
    pub fn from_selectors(
        search: &str,
        state: &str,
        district: &str,
        college_type: &str,
    ) -> Result<Self, String> {
        let state = match state {
            "" | ALL => None,
            s => Some(s.parse()?),
        };
        let district = match district {
            "" | ALL_DISTRICTS => None,
            d => Some(d.to_string()),
        };
        let college_type = match college_type {
            "" | ALL => None,
            t => Some(t.parse()?),
        };
        Ok(Self {
            search: search.to_string(),
            state,
            district,
            college_type,
        })
    }
}

/// Returns the colleges matching every criterion, in catalog order.
///
/// When the profile has a stream, only colleges accepting that stream match.
pub fn filter_colleges<'a>(
    profile: Option<&Profile>,
    colleges: &'a [College],
    criteria: &CollegeCriteria,
) -> Vec<&'a College> {
    let needle = criteria.search.to_lowercase();
    let stream = profile.and_then(|p| p.stream);

    colleges
        .iter()
        .filter(|c| {
            let matches_search = c.name.to_lowercase().contains(&needle)
                || c.district.to_lowercase().contains(&needle);
            let matches_state = criteria.state.map_or(true, |s| c.state == s);
            let matches_district = criteria.district.as_deref().map_or(true, |d| c.district == d);
            let matches_type = criteria.college_type.map_or(true, |t| c.college_type == t);
            let matches_stream = stream.map_or(true, |s| c.streams.contains(&s));
            matches_search && matches_state && matches_district && matches_type && matches_stream
        })
        .collect()
}

/// Parses a rank or income the student typed. Blank or non-numeric input
/// counts as not supplied.
fn supplied_number(raw: Option<&str>) -> Option<u64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// Whether the profile qualifies for a single scholarship.
pub fn is_eligible(profile: &Profile, scholarship: &Scholarship) -> bool {
    let (supplied, limit) = match scholarship.category {
        ScholarshipCategory::Jee => (profile.jee_rank.as_deref(), scholarship.max_rank),
        ScholarshipCategory::Eapcet => (profile.eapcet_rank.as_deref(), scholarship.max_rank),
        ScholarshipCategory::Emcet => (profile.emcet_rank.as_deref(), scholarship.max_rank),
        ScholarshipCategory::Income => (profile.father_income.as_deref(), scholarship.max_income),
    };
    match supplied_number(supplied) {
        Some(value) => limit.map_or(true, |max| value <= max),
        None => false,
    }
}

/// Returns the scholarships the profile qualifies for, in catalog order.
pub fn filter_scholarships<'a>(
    profile: Option<&Profile>,
    scholarships: &'a [Scholarship],
) -> Vec<&'a Scholarship> {
    let Some(profile) = profile else {
        return Vec::new();
    };
    scholarships
        .iter()
        .filter(|s| is_eligible(profile, s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stream;

    fn college(id: &str, state: Region, district: &str, kind: CollegeType, streams: &[Stream]) -> College {
        College {
            id: id.into(),
            name: format!("{} College", id),
            college_type: kind,
            state,
            district: district.into(),
            address: String::new(),
            contact: String::new(),
            website: String::new(),
            rating: 4.0,
            streams: streams.to_vec(),
            min_percentage: None,
            accepts_jee: false,
            accepts_eapcet: false,
            accepts_emcet: false,
        }
    }

    fn scholarship(category: ScholarshipCategory, max_rank: Option<u64>, max_income: Option<u64>) -> Scholarship {
        Scholarship {
            id: "s1".into(),
            name: "Merit Award".into(),
            category,
            eligibility: String::new(),
            amount: "50000".into(),
            max_rank,
            max_income,
        }
    }

    fn student() -> Profile {
        Profile::registered("s@x.in", "9123456789")
    }

    #[test]
    fn stream_restricts_colleges() {
        let colleges = vec![
            college("C1", Region::AndhraPradesh, "Guntur", CollegeType::Engineering, &[Stream::Mpc]),
            college("C2", Region::Telangana, "Hyderabad", CollegeType::Medical, &[Stream::BiPc]),
        ];
        let mut profile = student();
        profile.stream = Some(Stream::Mpc);

        let criteria = CollegeCriteria::from_selectors("", "all", "All Districts", "all").unwrap();
        let found = filter_colleges(Some(&profile), &colleges, &criteria);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "C1");

        profile.stream = None;
        assert_eq!(filter_colleges(Some(&profile), &colleges, &criteria).len(), 2);
        assert_eq!(filter_colleges(None, &colleges, &criteria).len(), 2);
    }

    #[test]
    fn search_matches_name_or_district_case_insensitively() {
        let colleges = vec![
            college("Andhra", Region::AndhraPradesh, "Visakhapatnam", CollegeType::Engineering, &[]),
            college("Osmania", Region::Telangana, "Hyderabad", CollegeType::Law, &[]),
        ];
        let by_district = CollegeCriteria {
            search: "VISAKHA".into(),
            ..Default::default()
        };
        let by_name = CollegeCriteria {
            search: "osmania".into(),
            ..Default::default()
        };
        assert_eq!(filter_colleges(None, &colleges, &by_district)[0].id, "Andhra");
        assert_eq!(filter_colleges(None, &colleges, &by_name)[0].id, "Osmania");
    }

    #[test]
    fn district_must_match_exactly() {
        let colleges = vec![college("C1", Region::Telangana, "Hyderabad", CollegeType::Law, &[])];
        let criteria = CollegeCriteria::from_selectors("", "TG", "hyderabad", "Law").unwrap();
        assert!(filter_colleges(None, &colleges, &criteria).is_empty());
        let criteria = CollegeCriteria::from_selectors("", "TG", "Hyderabad", "Law").unwrap();
        assert_eq!(filter_colleges(None, &colleges, &criteria).len(), 1);
    }

    #[test]
    fn unknown_selector_values_are_rejected() {
        assert!(CollegeCriteria::from_selectors("", "KA", "", "all").is_err());
        assert!(CollegeCriteria::from_selectors("", "all", "", "Dental").is_err());
    }

    #[test]
    fn rank_within_limit_is_eligible() {
        let s1 = scholarship(ScholarshipCategory::Jee, Some(10_000), None);
        let mut profile = student();

        profile.jee_rank = Some("5000".into());
        assert!(is_eligible(&profile, &s1));

        profile.jee_rank = Some("15000".into());
        assert!(!is_eligible(&profile, &s1));

        profile.jee_rank = None;
        assert!(!is_eligible(&profile, &s1));
    }

    #[test]
    fn missing_limit_means_any_supplied_value_qualifies() {
        let s = scholarship(ScholarshipCategory::Emcet, None, None);
        let mut profile = student();
        profile.emcet_rank = Some("987654".into());
        assert!(is_eligible(&profile, &s));
    }

    #[test]
    fn income_uses_max_income_not_max_rank() {
        let s = scholarship(ScholarshipCategory::Income, Some(1), Some(250_000));
        let mut profile = student();
        profile.father_income = Some("200000".into());
        assert!(is_eligible(&profile, &s));
        profile.father_income = Some("300000".into());
        assert!(!is_eligible(&profile, &s));
    }

    #[test]
    fn blank_or_garbage_numbers_count_as_absent() {
        let s = scholarship(ScholarshipCategory::Eapcet, None, None);
        let mut profile = student();
        for raw in ["", "   ", "abc", "12x", "-4"] {
            profile.eapcet_rank = Some(raw.into());
            assert!(!is_eligible(&profile, &s), "{:?} should not qualify", raw);
        }
    }

    #[test]
    fn another_category_rank_does_not_help() {
        let s = scholarship(ScholarshipCategory::Jee, None, None);
        let mut profile = student();
        profile.eapcet_rank = Some("10".into());
        assert!(!is_eligible(&profile, &s));
    }

    #[test]
    fn no_profile_means_no_scholarships() {
        let all = vec![scholarship(ScholarshipCategory::Income, None, None)];
        assert!(filter_scholarships(None, &all).is_empty());
    }
}
