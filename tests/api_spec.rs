use axum::http::StatusCode;
use axum_test::TestServer;
use docforge::api::create_router;
use docforge::config::Config;
use docforge::models::*;
use docforge::workspace::Workspace;
use tempfile::TempDir;

/// A server over a fresh workspace rooted in a tempdir. The root is not a
/// git repository, so history sync is skipped and responses carry no
/// `git_status`.
fn setup() -> (TestServer, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let workspace =
        Workspace::open(Config::for_root(dir.path())).expect("failed to open workspace");
    let server = TestServer::new(create_router(workspace)).expect("failed to create test server");
    (server, dir)
}

fn create_input(path: &str, content: &str) -> CreateDocumentInput {
    CreateDocumentInput {
        path: path.to_string(),
        content: content.to_string(),
        title: None,
        commit_message: None,
        push: true,
    }
}

mod documents {
    use super::*;

    #[tokio::test]
    async fn create_get_update_delete_lifecycle() {
        let (server, _dir) = setup();

        let response = server
            .post("/api/documents")
            .json(&create_input("a/b.md", "# Hello\n"))
            .await;
        response.assert_status(StatusCode::CREATED);
        let doc: DocumentInfo = response.json();
        assert_eq!(doc.path, "a/b.md");
        assert_eq!(doc.title.as_deref(), Some("Hello"));

        let doc: DocumentInfo = server.get("/api/documents/a/b.md").await.json();
        assert_eq!(doc.title.as_deref(), Some("Hello"));
        assert_eq!(doc.content, "# Hello\n");

        let response = server
            .put("/api/documents/a/b.md")
            .json(&UpdateDocumentInput {
                content: "# Bye\n".to_string(),
                title: None,
                commit_message: None,
                push: true,
            })
            .await;
        response.assert_status_ok();

        let doc: DocumentInfo = server.get("/api/documents/a/b.md").await.json();
        assert_eq!(doc.title.as_deref(), Some("Bye"));

        let response = server.delete("/api/documents/a/b.md").await;
        response.assert_status_ok();
        let deleted: DeleteDocumentResponse = response.json();
        assert_eq!(deleted.path, "a/b.md");

        server
            .get("/api/documents/a/b.md")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_appends_markdown_extension() {
        let (server, _dir) = setup();

        let doc: DocumentInfo = server
            .post("/api/documents")
            .json(&create_input("notes/plain", "content"))
            .await
            .json();
        assert_eq!(doc.path, "notes/plain.md");
    }

    #[tokio::test]
    async fn create_conflicts_on_existing_document() {
        let (server, _dir) = setup();

        server
            .post("/api/documents")
            .json(&create_input("page.md", "one"))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .post("/api/documents")
            .json(&create_input("page.md", "two"))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn create_rejects_path_escaping_root() {
        let (server, dir) = setup();

        server
            .post("/api/documents")
            .json(&create_input("../outside.md", "nope"))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        assert!(!dir.path().join("outside.md").exists());
    }

    #[tokio::test]
    async fn update_and_delete_missing_document_return_not_found() {
        let (server, _dir) = setup();

        server
            .put("/api/documents/ghost.md")
            .json(&UpdateDocumentInput {
                content: "x".to_string(),
                title: None,
                commit_message: None,
                push: true,
            })
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .delete("/api/documents/ghost.md")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_markdown_files_are_rejected() {
        let (server, dir) = setup();
        std::fs::write(dir.path().join("docs/notes.txt"), "plain").unwrap();

        server
            .get("/api/documents/notes.txt")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn listing_returns_documents_sorted_by_path() {
        let (server, _dir) = setup();

        server
            .post("/api/documents")
            .json(&create_input("zeta/page.md", "z"))
            .await;
        server
            .post("/api/documents")
            .json(&create_input("alpha/page.md", "a"))
            .await;

        let documents: Vec<DocumentSummary> = server.get("/api/documents").await.json();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].path, "alpha/page.md");
        assert_eq!(documents[1].path, "zeta/page.md");

        let directories: Vec<DirectoryEntry> = server.get("/api/directories").await.json();
        let names: Vec<&str> = directories.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}

mod sections {
    use super::*;

    #[tokio::test]
    async fn created_section_appears_in_structure_with_one_index_document() {
        let (server, _dir) = setup();

        let response = server
            .post("/api/sections")
            .json(&CreateSectionInput {
                name: "Engineering Team".to_string(),
                commit_message: None,
                push: true,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: SectionResponse = response.json();
        assert_eq!(created.path, "engineering-team");
        assert!(created.navigation_updated);

        let structure: SectionStructure = server.get("/api/sections").await.json();
        assert_eq!(structure.total_sections, 1);
        assert_eq!(structure.sections[0].name, "engineering-team");
        assert_eq!(structure.sections[0].documents.len(), 1);
        assert_eq!(structure.sections[0].documents[0].name, "index.md");
        assert!(structure.sections[0].subsections.is_empty());
    }

    #[tokio::test]
    async fn invalid_and_duplicate_section_names_are_rejected() {
        let (server, _dir) = setup();

        server
            .post("/api/sections")
            .json(&CreateSectionInput {
                name: "///".to_string(),
                commit_message: None,
                push: true,
            })
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let input = CreateSectionInput {
            name: "Guides".to_string(),
            commit_message: None,
            push: true,
        };
        server.post("/api/sections").json(&input).await;
        server
            .post("/api/sections")
            .json(&input)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn subsection_under_missing_parent_fails_without_creating_anything() {
        let (server, dir) = setup();

        server
            .post("/api/sections/ghost/subsections")
            .json(&CreateSectionInput {
                name: "api".to_string(),
                commit_message: None,
                push: true,
            })
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        assert!(!dir.path().join("docs/ghost").exists());
    }

    #[tokio::test]
    async fn subsection_promotes_bare_parent_reference_to_overview_list() {
        let (server, _dir) = setup();

        server
            .post("/api/sections")
            .json(&CreateSectionInput {
                name: "Guides".to_string(),
                commit_message: None,
                push: true,
            })
            .await;

        server
            .post("/api/sections/Guides/subsections")
            .json(&CreateSectionInput {
                name: "API Reference".to_string(),
                commit_message: None,
                push: true,
            })
            .await
            .assert_status(StatusCode::CREATED);

        let nav: NavigationResponse = server.get("/api/navigation").await.json();
        assert_eq!(
            nav.navigation,
            vec![NavEntry::Branch {
                name: "Guides".to_string(),
                children: vec![
                    NavEntry::Leaf {
                        name: "Overview".to_string(),
                        target: "guides/index.md".to_string(),
                    },
                    NavEntry::Leaf {
                        name: "API Reference".to_string(),
                        target: "guides/api-reference/index.md".to_string(),
                    },
                ],
            }]
        );

        let structure: SectionStructure = server.get("/api/sections").await.json();
        assert_eq!(structure.sections[0].subsections.len(), 1);
        assert_eq!(structure.sections[0].subsections[0].name, "api-reference");
        // index.md of the section plus index.md of the subsection
        assert_eq!(structure.total_documents, 2);
    }

    #[tokio::test]
    async fn deleting_a_section_twice_fails_the_second_time() {
        let (server, _dir) = setup();

        server
            .post("/api/sections")
            .json(&CreateSectionInput {
                name: "Temp".to_string(),
                commit_message: None,
                push: true,
            })
            .await;

        let response = server.delete("/api/sections/temp").await;
        response.assert_status_ok();

        let structure: SectionStructure = server.get("/api/sections").await.json();
        assert_eq!(structure.total_sections, 0);

        server
            .delete("/api/sections/temp")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

mod navigation {
    use super::*;

    fn sample_navigation() -> Vec<NavEntry> {
        vec![
            NavEntry::Leaf {
                name: "Home".to_string(),
                target: "index.md".to_string(),
            },
            NavEntry::Branch {
                name: "Docs".to_string(),
                children: vec![NavEntry::Leaf {
                    name: "Intro".to_string(),
                    target: "docs/intro.md".to_string(),
                }],
            },
        ]
    }

    #[tokio::test]
    async fn replace_then_get_round_trips_ordered_entries() {
        let (server, _dir) = setup();

        let response = server
            .put("/api/navigation")
            .json(&ReplaceNavigationInput {
                navigation: sample_navigation(),
                commit_message: None,
                push: true,
            })
            .await;
        response.assert_status_ok();

        let nav: NavigationResponse = server.get("/api/navigation").await.json();
        assert_eq!(nav.navigation, sample_navigation());
    }

    #[tokio::test]
    async fn validate_flags_entries_pointing_at_missing_files() {
        let (server, _dir) = setup();

        server
            .post("/api/documents")
            .json(&create_input("index.md", "# Home\n"))
            .await;
        server
            .put("/api/navigation")
            .json(&ReplaceNavigationInput {
                navigation: sample_navigation(),
                commit_message: None,
                push: true,
            })
            .await;

        let report: ValidationReport = server.get("/api/navigation/validate").await.json();
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("docs/intro.md"));
        assert_eq!(report.orphaned, vec!["docs/intro.md".to_string()]);
    }

    #[tokio::test]
    async fn manifest_endpoint_serves_raw_text_once_it_exists() {
        let (server, _dir) = setup();

        server
            .get("/api/manifest")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .post("/api/sections")
            .json(&CreateSectionInput {
                name: "Guides".to_string(),
                commit_message: None,
                push: true,
            })
            .await;

        let response = server.get("/api/manifest").await;
        response.assert_status_ok();
        let manifest: ManifestResponse = response.json();
        assert!(manifest.content.contains("nav:"));
        assert!(manifest.content.contains("guides/index.md"));
    }
}

mod git_status {
    use super::*;

    #[tokio::test]
    async fn reports_not_a_repository_outside_version_control() {
        let (server, _dir) = setup();

        let status: GitStatusResponse = server.get("/api/git/status").await.json();
        assert!(!status.is_repo);
        assert!(!status.has_changes);
        assert!(status.files.is_empty());
    }
}

mod service {
    use super::*;

    #[tokio::test]
    async fn health_and_root_respond() {
        let (server, _dir) = setup();

        server.get("/health").await.assert_status_ok();
        let info: serde_json::Value = server.get("/").await.json();
        assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
    }
}
