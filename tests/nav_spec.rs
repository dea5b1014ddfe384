use docforge::models::NavEntry;
use docforge::nav::{NavError, NavStore};
use tempfile::TempDir;

fn setup() -> (NavStore, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = NavStore::new(dir.path().join("nav.yml"));
    (store, dir)
}

fn leaf(name: &str, target: &str) -> NavEntry {
    NavEntry::Leaf {
        name: name.to_string(),
        target: target.to_string(),
    }
}

mod reading {
    use super::*;

    #[test]
    fn missing_manifest_reads_as_empty_entries() {
        let (store, _dir) = setup();
        assert!(store.read().unwrap().is_empty());
        assert!(matches!(store.raw_text(), Err(NavError::Missing)));
    }

    #[test]
    fn bare_string_and_named_entries_round_trip_in_order() {
        let (store, _dir) = setup();
        std::fs::write(
            store.path(),
            "nav:\n- index.md\n- About: about.md\n- Guides:\n  - Intro: guides/intro.md\n",
        )
        .unwrap();

        let entries = store.read().unwrap();
        assert_eq!(
            entries,
            vec![
                NavEntry::Doc("index.md".to_string()),
                leaf("About", "about.md"),
                NavEntry::Branch {
                    name: "Guides".to_string(),
                    children: vec![leaf("Intro", "guides/intro.md")],
                },
            ]
        );

        store.replace(&entries).unwrap();
        assert_eq!(store.read().unwrap(), entries);
    }

    #[test]
    fn non_mapping_manifest_is_rejected() {
        let (store, _dir) = setup();
        std::fs::write(store.path(), "- just\n- a\n- list\n").unwrap();
        assert!(matches!(store.read(), Err(NavError::Malformed)));
    }
}

mod sections {
    use super::*;

    #[test]
    fn add_section_creates_manifest_and_appends_in_order() {
        let (store, _dir) = setup();

        store.add_section("Guides", "guides").unwrap();
        store.add_section("Reference", "reference").unwrap();

        assert_eq!(
            store.read().unwrap(),
            vec![
                leaf("Guides", "guides/index.md"),
                leaf("Reference", "reference/index.md"),
            ]
        );
    }

    #[test]
    fn duplicate_section_name_is_rejected() {
        let (store, _dir) = setup();
        store.add_section("Guides", "guides").unwrap();

        let err = store.add_section("Guides", "guides").unwrap_err();
        assert!(matches!(err, NavError::DuplicateSection(name) if name == "Guides"));
    }

    #[test]
    fn other_top_level_keys_keep_their_position() {
        let (store, _dir) = setup();
        std::fs::write(
            store.path(),
            "site_name: Test Docs\nnav:\n- Home: index.md\ntheme: material\n",
        )
        .unwrap();

        store.add_section("Guides", "guides").unwrap();

        let text = store.raw_text().unwrap();
        assert!(text.starts_with("site_name: Test Docs"));
        assert!(text.contains("theme: material"));
        assert!(text.contains("Guides: guides/index.md"));
    }

    #[test]
    fn unicode_names_are_written_verbatim() {
        let (store, _dir) = setup();
        store.add_section("Éditeur", "editeur").unwrap();

        assert!(store.raw_text().unwrap().contains("Éditeur"));
        assert_eq!(
            store.read().unwrap(),
            vec![leaf("Éditeur", "editeur/index.md")]
        );
    }
}

mod subsections {
    use super::*;

    #[test]
    fn bare_parent_is_promoted_with_overview_first() {
        let (store, _dir) = setup();
        std::fs::write(store.path(), "nav:\n- Guides: guides/index.md\n").unwrap();

        store.add_subsection("Guides", "API", "guides/api").unwrap();

        assert_eq!(
            store.read().unwrap(),
            vec![NavEntry::Branch {
                name: "Guides".to_string(),
                children: vec![
                    leaf("Overview", "guides/index.md"),
                    leaf("API", "guides/api/index.md"),
                ],
            }]
        );
    }

    #[test]
    fn branch_parent_just_gains_a_child() {
        let (store, _dir) = setup();
        std::fs::write(
            store.path(),
            "nav:\n- Guides:\n  - Overview: guides/index.md\n",
        )
        .unwrap();

        store.add_subsection("Guides", "API", "guides/api").unwrap();

        let entries = store.read().unwrap();
        let NavEntry::Branch { children, .. } = &entries[0] else {
            panic!("expected a branch entry");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(children[1], leaf("API", "guides/api/index.md"));
    }

    #[test]
    fn missing_parent_and_duplicate_child_are_rejected() {
        let (store, _dir) = setup();
        std::fs::write(store.path(), "nav:\n- Guides: guides/index.md\n").unwrap();

        let err = store.add_subsection("Ghost", "API", "ghost/api").unwrap_err();
        assert!(matches!(err, NavError::ParentNotFound(name) if name == "Ghost"));

        store.add_subsection("Guides", "API", "guides/api").unwrap();
        let err = store.add_subsection("Guides", "API", "guides/api").unwrap_err();
        assert!(matches!(err, NavError::DuplicateSubsection(name) if name == "API"));
    }
}

mod removal {
    use super::*;

    #[test]
    fn remove_section_reports_false_only_without_a_nav_key() {
        let (store, _dir) = setup();
        std::fs::write(store.path(), "site_name: Test Docs\n").unwrap();
        assert!(!store.remove_section("Guides").unwrap());

        store.add_section("Guides", "guides").unwrap();
        // removing an absent entry is a no-op, still reported as handled
        assert!(store.remove_section("Ghost").unwrap());
        assert_eq!(store.read().unwrap().len(), 1);

        assert!(store.remove_section("Guides").unwrap());
        assert!(store.read().unwrap().is_empty());
    }

    #[test]
    fn remove_subsection_reports_false_when_parent_is_missing() {
        let (store, _dir) = setup();
        std::fs::write(
            store.path(),
            "nav:\n- Guides:\n  - Overview: guides/index.md\n  - API: guides/api/index.md\n",
        )
        .unwrap();

        assert!(!store.remove_subsection("Ghost", "API").unwrap());

        // parent found, child absent: handled without change
        assert!(store.remove_subsection("Guides", "Ghost").unwrap());
        let NavEntry::Branch { children, .. } = &store.read().unwrap()[0] else {
            panic!("expected a branch entry");
        };
        assert_eq!(children.len(), 2);

        assert!(store.remove_subsection("Guides", "API").unwrap());
        let NavEntry::Branch { children, .. } = &store.read().unwrap()[0] else {
            panic!("expected a branch entry");
        };
        assert_eq!(children.len(), 1);
    }
}

mod validation {
    use super::*;

    #[test]
    fn named_entries_with_missing_targets_fail_bare_ones_only_warn() {
        let (store, dir) = setup();
        let docs = dir.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join("index.md"), "# Home\n").unwrap();

        std::fs::write(
            store.path(),
            "nav:\n- index.md\n- missing.md\n- Guides:\n  - API: guides/api.md\n",
        )
        .unwrap();

        let report = store.validate(&docs);
        assert!(!report.valid);
        assert_eq!(report.warnings, vec!["File not found: missing.md".to_string()]);
        assert_eq!(
            report.errors,
            vec!["Navigation item 'API' points to non-existent file: guides/api.md".to_string()]
        );
        assert_eq!(report.orphaned, vec!["guides/api.md".to_string()]);
    }

    #[test]
    fn unreadable_manifest_fails_validation() {
        let (store, dir) = setup();
        std::fs::write(store.path(), "just a scalar").unwrap();

        let report = store.validate(dir.path());
        assert!(!report.valid);
        assert!(report.errors[0].starts_with("Validation error:"));
    }
}
