pub mod dashboard;
pub mod domain;
pub mod eligibility;
pub mod memory;
pub mod navigation;
pub mod onboarding;
pub mod ports;
pub mod registration;
pub mod session;
pub mod validation;

pub use domain::{
    Bookmark, Catalog, College, CollegeType, Profile, ProfilePatch, Region, Scholarship,
    ScholarshipCategory, SessionFlags, Stream,
};
pub use eligibility::{filter_colleges, filter_scholarships, CollegeCriteria};
pub use memory::MemoryKeyValueStore;
pub use ports::{KeyValueStore, OtpService, PortError, PortResult};
pub use session::{LoadPolicy, SessionError, SessionResult, SessionStore};
pub use validation::{FlowError, FlowResult, ValidationError};
