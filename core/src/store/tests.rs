use super::*;
use tempfile::TempDir;

mod common {
    use super::*;

    pub(super) fn create_test_store() -> (CampaignStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            base_path: temp_dir.path().to_path_buf(),
        };
        let store = CampaignStore::open(config).unwrap();
        (store, temp_dir)
    }
}

mod create_campaign {
    use super::common::create_test_store;
    use super::*;

    #[test]
    fn test_new_campaign_has_creator_and_no_notes() {
        let (store, _temp) = create_test_store();
        store.create_campaign("gronk", "alice").unwrap();

        let campaign = store.campaign("gronk").unwrap();
        assert_eq!(campaign.name.as_str(), "gronk");
        assert_eq!(
            campaign.authorized_users.creator().map(|u| u.as_str()),
            Some("alice")
        );
        assert!(!campaign.has_notes());
    }

    #[test]
    fn test_duplicate_name_keeps_first_creator() {
        let (store, _temp) = create_test_store();
        store.create_campaign("foo", "u1").unwrap();

        let err = store.create_campaign("foo", "u2").unwrap_err();
        assert_eq!(err, StoreError::DuplicateName("foo".into()));

        let campaign = store.campaign("foo").unwrap();
        let users: Vec<&str> = campaign.authorized_users.iter().map(|u| u.as_str()).collect();
        assert_eq!(users, vec!["u1"]);
    }

    #[test]
    fn test_duplicate_detection_is_case_insensitive() {
        let (store, _temp) = create_test_store();
        store.create_campaign("Gronk", "alice").unwrap();

        let err = store.create_campaign("GRONK", "bob").unwrap_err();
        assert_eq!(err, StoreError::DuplicateName("gronk".into()));
    }

    #[test]
    fn test_invalid_creator_is_rejected() {
        let (store, _temp) = create_test_store();
        let err = store.create_campaign("gronk", "two words").unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
        assert_eq!(
            store.campaign("gronk").unwrap_err(),
            StoreError::NotFound("gronk".into())
        );
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let (store, _temp) = create_test_store();
        let err = store.create_campaign("   ", "alice").unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }
}

mod notes {
    use super::common::create_test_store;
    use super::*;

    #[test]
    fn test_missing_campaign_is_not_found() {
        let (store, _temp) = create_test_store();
        assert_eq!(
            store.notes("nowhere").unwrap_err(),
            StoreError::NotFound("nowhere".into())
        );
    }

    #[test]
    fn test_empty_campaign_has_no_notes_yet() {
        let (store, _temp) = create_test_store();
        store.create_campaign("gronk", "alice").unwrap();
        assert_eq!(
            store.notes("gronk").unwrap_err(),
            StoreError::NoNotesYet("gronk".into())
        );
    }

    #[test]
    fn test_appends_are_ordered_and_separated() {
        let (store, _temp) = create_test_store();
        store.create_campaign("gronk", "alice").unwrap();

        store.append_notes("gronk", "a", "alice").unwrap();
        store.append_notes("gronk", "b", "alice").unwrap();

        let notes = store.notes("gronk").unwrap();
        assert_eq!(notes, "a\n\nb\n\n");
        assert!(notes.find('a').unwrap() < notes.find('b').unwrap());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let (store, _temp) = create_test_store();
        store.create_campaign("gronk", "alice").unwrap();
        store.append_notes("GRONK", "met a lich", "Alice").unwrap();

        assert_eq!(store.notes("Gronk").unwrap(), "met a lich\n\n");
    }
}

mod authorization {
    use super::common::create_test_store;
    use super::*;

    #[test]
    fn test_outsider_cannot_append() {
        let (store, _temp) = create_test_store();
        store.create_campaign("gronk", "alice").unwrap();
        store.append_notes("gronk", "first", "alice").unwrap();

        let err = store.append_notes("gronk", "graffiti", "mallory").unwrap_err();
        assert_eq!(err, StoreError::Unauthorized("gronk".into()));
        assert_eq!(store.notes("gronk").unwrap(), "first\n\n");
    }

    #[test]
    fn test_outsider_cannot_add_users() {
        let (store, _temp) = create_test_store();
        store.create_campaign("gronk", "alice").unwrap();

        let err = store
            .add_authorized_user("gronk", "mallory", "eve")
            .unwrap_err();
        assert_eq!(err, StoreError::Unauthorized("gronk".into()));

        let campaign = store.campaign("gronk").unwrap();
        assert_eq!(campaign.authorized_users.len(), 1);
    }

    #[test]
    fn test_substring_of_member_is_not_a_member() {
        let (store, _temp) = create_test_store();
        store.create_campaign("gronk", "bobby").unwrap();

        let err = store.append_notes("gronk", "sneaky", "bob").unwrap_err();
        assert_eq!(err, StoreError::Unauthorized("gronk".into()));
    }

    #[test]
    fn test_empty_note_is_invalid() {
        let (store, _temp) = create_test_store();
        store.create_campaign("gronk", "alice").unwrap();

        let err = store.append_notes("gronk", "", "alice").unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
        assert_eq!(
            store.notes("gronk").unwrap_err(),
            StoreError::NoNotesYet("gronk".into())
        );
    }

    #[test]
    fn test_new_user_with_whitespace_is_invalid() {
        let (store, _temp) = create_test_store();
        store.create_campaign("gronk", "alice").unwrap();

        let err = store
            .add_authorized_user("gronk", "alice", "bob smith")
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_add_user_to_missing_campaign() {
        let (store, _temp) = create_test_store();
        let err = store
            .add_authorized_user("nowhere", "alice", "bob")
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound("nowhere".into()));
    }

    #[test]
    fn test_gronk_scenario() {
        let (store, _temp) = create_test_store();

        store.create_campaign("gronk", "alice").unwrap();
        store.add_authorized_user("gronk", "alice", "bob").unwrap();
        assert_eq!(
            store.add_authorized_user("gronk", "alice", "bob").unwrap_err(),
            StoreError::AlreadyAuthorized("bob".into())
        );
        store.append_notes("gronk", "slew the dragon", "bob").unwrap();

        assert_eq!(store.notes("gronk").unwrap(), "slew the dragon\n\n");
    }
}

mod availability {
    use super::common::create_test_store;
    use super::*;

    #[test]
    fn test_closed_store_is_unavailable() {
        let (store, _temp) = create_test_store();
        store.create_campaign("gronk", "alice").unwrap();
        store.close();

        assert_eq!(
            store.create_campaign("other", "alice").unwrap_err(),
            StoreError::StoreUnavailable
        );
        assert_eq!(store.notes("gronk").unwrap_err(), StoreError::StoreUnavailable);
        assert_eq!(
            store.append_notes("gronk", "x", "alice").unwrap_err(),
            StoreError::StoreUnavailable
        );
        assert_eq!(
            store.add_authorized_user("gronk", "alice", "bob").unwrap_err(),
            StoreError::StoreUnavailable
        );
    }

    #[test]
    fn test_unavailable_takes_precedence_over_bad_arguments() {
        let (store, _temp) = create_test_store();
        store.close();

        assert_eq!(
            store.append_notes("", "", "").unwrap_err(),
            StoreError::StoreUnavailable
        );
    }

    #[test]
    fn test_campaign_names() {
        let (store, _temp) = create_test_store();
        store.create_campaign("Beta", "alice").unwrap();
        store.create_campaign("alpha", "alice").unwrap();

        let names: Vec<String> = store
            .campaign_names()
            .unwrap()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }
}

mod concurrency {
    use super::common::create_test_store;
    use super::*;
    use std::thread;

    const WRITERS: usize = 8;
    const APPENDS_PER_WRITER: usize = 25;

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let (store, _temp) = create_test_store();
        store.create_campaign("gronk", "alice").unwrap();
        for i in 0..WRITERS {
            store
                .add_authorized_user("gronk", "alice", &format!("writer{i}"))
                .unwrap();
        }

        thread::scope(|s| {
            for i in 0..WRITERS {
                let store = &store;
                s.spawn(move || {
                    for j in 0..APPENDS_PER_WRITER {
                        store
                            .append_notes("gronk", &format!("w{i}-n{j}"), &format!("writer{i}"))
                            .unwrap();
                    }
                });
            }
        });

        let notes = store.notes("gronk").unwrap();
        let entries: Vec<&str> = notes.split("\n\n").filter(|e| !e.is_empty()).collect();
        assert_eq!(entries.len(), WRITERS * APPENDS_PER_WRITER);

        for i in 0..WRITERS {
            let mine: Vec<&str> = entries
                .iter()
                .copied()
                .filter(|e| e.starts_with(&format!("w{i}-")))
                .collect();
            let expected: Vec<String> = (0..APPENDS_PER_WRITER)
                .map(|j| format!("w{i}-n{j}"))
                .collect();
            assert_eq!(mine, expected, "writer {i} lost or reordered notes");
        }
    }

    #[test]
    fn test_concurrent_creates_have_one_winner() {
        let (store, _temp) = create_test_store();

        let results: Vec<Result<(), StoreError>> = thread::scope(|s| {
            let handles: Vec<_> = (0..WRITERS)
                .map(|i| {
                    let store = &store;
                    s.spawn(move || store.create_campaign("contested", &format!("user{i}")))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|e| *e == StoreError::DuplicateName("contested".into()))
        );
        assert_eq!(store.campaign("contested").unwrap().authorized_users.len(), 1);
    }
}
