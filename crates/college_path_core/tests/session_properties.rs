use college_path_core::domain::Stream;
use college_path_core::navigation::{entry_screen, Screen};
use college_path_core::session::keys;
use college_path_core::*;

fn fresh_store() -> SessionStore {
    SessionStore::initialize(Box::new(MemoryKeyValueStore::new()), LoadPolicy::Abort).unwrap()
}

fn reload(store: SessionStore) -> SessionStore {
    SessionStore::initialize(store.into_backend(), LoadPolicy::Abort).unwrap()
}

fn bookmark_ids(store: &SessionStore) -> Vec<String> {
    store.bookmarks().iter().map(|b| b.college_id.clone()).collect()
}

#[test]
fn test_toggle_twice_restores_membership() {
    let mut store = fresh_store();
    store.toggle_bookmark("a").unwrap();
    store.toggle_bookmark("b").unwrap();
    let before = bookmark_ids(&store);

    for id in ["a", "c"] {
        store.toggle_bookmark(id).unwrap();
        store.toggle_bookmark(id).unwrap();
        let mut after = bookmark_ids(&store);
        let mut expected = before.clone();
        after.sort();
        expected.sort();
        assert_eq!(after, expected);
    }
}

#[test]
fn test_successive_patches_accumulate() {
    let mut store = fresh_store();
    let mut profile = Profile::registered("ravi@mail.com", "9988776655");
    profile.last_name = "Kumar".into();
    store.set_profile(profile).unwrap();

    store
        .update_profile(ProfilePatch {
            first_name: Some("Ravi".into()),
            ..Default::default()
        })
        .unwrap();
    store
        .update_profile(ProfilePatch {
            stream: Some(Some(Stream::Mec)),
            ..Default::default()
        })
        .unwrap();

    let profile = store.profile().unwrap();
    assert_eq!(profile.first_name, "Ravi");
    assert_eq!(profile.stream, Some(Stream::Mec));
    assert_eq!(profile.last_name, "Kumar");
}

#[test]
fn test_profile_survives_reload() {
    let mut store = fresh_store();
    let mut profile = Profile::registered("priya@mail.com", "9000000001");
    profile.first_name = "Priya".into();
    profile.tenth_marks = "91.5".into();
    profile.stream = Some(Stream::BiPc);
    profile.eapcet_rank = Some("1200".into());
    profile.father_income = Some("".into());
    store.set_profile(profile.clone()).unwrap();
    store.toggle_bookmark("c7").unwrap();
    store.set_registered(true).unwrap();
    store.set_onboarding_step(3).unwrap();

    let reloaded = reload(store);
    assert_eq!(reloaded.profile(), Some(&profile));
    assert!(reloaded.is_bookmarked("c7"));
    assert!(reloaded.flags().is_registered);
    assert_eq!(reloaded.flags().current_step, 3);
    assert!(!reloaded.flags().is_onboarded);
}

#[test]
fn test_logout_clears_every_slice() {
    let mut store = fresh_store();
    store.set_profile(Profile::registered("a@b.co", "9876543210")).unwrap();
    store.set_registered(true).unwrap();
    store.set_onboarding_step(2).unwrap();
    store.toggle_bookmark("x").unwrap();
    store.set_onboarded(true).unwrap();

    store.logout().unwrap();

    assert!(store.profile().is_none());
    assert!(store.bookmarks().is_empty());
    assert!(!store.flags().is_registered);
    assert!(!store.flags().is_onboarded);
    assert_eq!(store.flags().current_step, 1);
    for key in keys::LOGOUT_ORDER {
        assert!(store.backend().get(key).unwrap().is_none(), "{} still stored", key);
    }

    let reloaded = reload(store);
    assert!(reloaded.profile().is_none());
    assert_eq!(reloaded.flags(), SessionFlags::default());
}

#[test]
fn test_interrupted_logout_reloads_unregistered() {
    let mut profile = Profile::registered("a@b.co", "9876543210");
    profile.first_name = "Anu".into();
    let full = [
        (keys::IS_REGISTERED, "true".to_string()),
        (keys::IS_ONBOARDED, "true".to_string()),
        (keys::CURRENT_STEP, "3".to_string()),
        (keys::BOOKMARKS, r#"[{"id":"x","markedAt":"2024-05-01T10:00:00Z"}]"#.to_string()),
        (keys::PROFILE, serde_json::to_string(&profile).unwrap()),
    ];

    let before = full
        .iter()
        .fold(MemoryKeyValueStore::new(), |store, (key, value)| store.seed(key, value));
    let store = SessionStore::initialize(Box::new(before), LoadPolicy::Abort).unwrap();
    assert_eq!(entry_screen(store.flags()), Screen::Dashboard);

    // Every prefix of the removal order is a state a crash could leave behind.
    for removed in 1..=keys::LOGOUT_ORDER.len() {
        let gone = &keys::LOGOUT_ORDER[..removed];
        let backend = full
            .iter()
            .filter(|(key, _)| !gone.contains(key))
            .fold(MemoryKeyValueStore::new(), |store, (key, value)| store.seed(key, value));

        let store = SessionStore::initialize(Box::new(backend), LoadPolicy::Abort).unwrap();
        assert!(!store.flags().is_registered, "after removing {:?}", gone);
        assert_eq!(entry_screen(store.flags()), Screen::Register, "after removing {:?}", gone);
    }
}

#[test]
fn test_widening_max_rank_never_removes_a_match() {
    let mut profile = Profile::registered("a@b.co", "9876543210");
    profile.jee_rank = Some("7500".into());

    let mut previous = 0;
    for max_rank in [1_000, 7_499, 7_500, 10_000, 1_000_000] {
        let scholarships = vec![Scholarship {
            id: "s".into(),
            name: "Merit".into(),
            category: ScholarshipCategory::Jee,
            eligibility: String::new(),
            amount: "25000".into(),
            max_rank: Some(max_rank),
            max_income: None,
        }];
        let count = filter_scholarships(Some(&profile), &scholarships).len();
        assert!(count >= previous, "max_rank {} dropped a match", max_rank);
        previous = count;
    }
    assert_eq!(previous, 1);
}

#[test]
fn test_college_predicates_commute() {
    let college = |id: &str, state, district: &str, kind, streams: Vec<Stream>| College {
        id: id.into(),
        name: format!("{} Institute", id),
        college_type: kind,
        state,
        district: district.into(),
        address: String::new(),
        contact: String::new(),
        website: String::new(),
        rating: 3.5,
        streams,
        min_percentage: Some(60.0),
        accepts_jee: true,
        accepts_eapcet: true,
        accepts_emcet: false,
    };
    let colleges = vec![
        college("Alpha", Region::AndhraPradesh, "Guntur", CollegeType::Engineering, vec![Stream::Mpc]),
        college("Beta", Region::AndhraPradesh, "Krishna", CollegeType::Engineering, vec![Stream::Mpc]),
        college("Gamma", Region::Telangana, "Guntur", CollegeType::Pharmacy, vec![Stream::BiPc]),
        college("Delta", Region::AndhraPradesh, "Guntur", CollegeType::Pharmacy, vec![Stream::Mpc, Stream::BiPc]),
    ];
    let mut profile = Profile::registered("a@b.co", "9876543210");
    profile.stream = Some(Stream::Mpc);

    let all_at_once = CollegeCriteria::from_selectors("guntur", "AP", "Guntur", "Engineering").unwrap();
    let combined: Vec<_> = filter_colleges(Some(&profile), &colleges, &all_at_once)
        .into_iter()
        .map(|c| c.id.clone())
        .collect();
    assert_eq!(combined, ["Alpha"]);

    // Apply one predicate per pass, in reverse order, narrowing the input each time.
    let single = [
        CollegeCriteria::from_selectors("", "all", "All Districts", "Engineering").unwrap(),
        CollegeCriteria::from_selectors("", "all", "Guntur", "all").unwrap(),
        CollegeCriteria::from_selectors("", "AP", "All Districts", "all").unwrap(),
        CollegeCriteria::from_selectors("guntur", "all", "All Districts", "all").unwrap(),
    ];
    let mut remaining = colleges.clone();
    for criteria in single.iter() {
        remaining = filter_colleges(None, &remaining, criteria).into_iter().cloned().collect();
    }
    remaining = filter_colleges(Some(&profile), &remaining, &CollegeCriteria::default())
        .into_iter()
        .cloned()
        .collect();
    let stepwise: Vec<_> = remaining.into_iter().map(|c| c.id).collect();
    assert_eq!(stepwise, combined);
}
