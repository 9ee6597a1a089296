//! crates/college_path_core/src/dashboard.rs
//!
//! Views the dashboard derives from session state and the catalog.

use serde::Serialize;

use crate::domain::{Bookmark, Catalog, College, Profile, Scholarship};
use crate::eligibility::is_eligible;

/// Catalog colleges the student has bookmarked, in catalog order. Bookmarks
/// pointing at ids the catalog does not know are skipped.
pub fn bookmarked_colleges<'a>(bookmarks: &[Bookmark], catalog: &'a Catalog) -> Vec<&'a College> {
    catalog
        .colleges
        .iter()
        .filter(|c| bookmarks.iter().any(|b| b.college_id == c.id))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ScholarshipEntry<'a> {
    #[serde(flatten)]
    pub scholarship: &'a Scholarship,
    pub is_eligible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScholarshipBoard<'a> {
    /// `true` when `entries` holds only the scholarships the student
    /// qualifies for; `false` when nothing matched and every scholarship is
    /// listed instead.
    pub eligible_only: bool,
    pub entries: Vec<ScholarshipEntry<'a>>,
}

pub fn scholarship_board<'a>(profile: Option<&Profile>, catalog: &'a Catalog) -> ScholarshipBoard<'a> {
    let entries: Vec<_> = catalog
        .scholarships
        .iter()
        .map(|s| ScholarshipEntry {
            scholarship: s,
            is_eligible: profile.is_some_and(|p| is_eligible(p, s)),
        })
        .collect();

    if entries.iter().any(|e| e.is_eligible) {
        ScholarshipBoard {
            eligible_only: true,
            entries: entries.into_iter().filter(|e| e.is_eligible).collect(),
        }
    } else {
        ScholarshipBoard {
            eligible_only: false,
            entries,
        }
    }
}
