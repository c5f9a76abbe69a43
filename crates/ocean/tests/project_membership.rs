//! Project flows: lookup, summaries, resource listings, and moving
//! droplets between projects by URN.

mod common;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{droplet, droplet_list_json, facade, project_json, project_list_json, resource_list_json};
use ocean::{droplet_urn, Error, ProjectRef};

// =============================================================================
// Lookup and summaries
// =============================================================================

/// Project names match exactly; there is no case folding here.
#[tokio::test]
async fn find_by_name_is_case_sensitive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(project_list_json(&[project_json("p-1", "Production")])),
        )
        .expect(2)
        .mount(&server)
        .await;
    let ocean = facade(&server);

    let found = ocean.projects.find_by_name("Production").await.unwrap();
    assert_eq!(found.unwrap().id, "p-1");

    assert!(ocean.projects.find_by_name("production").await.unwrap().is_none());
}

/// Direct ID lookup propagates the miss; resolution softens it to `None`.
#[tokio::test]
async fn resolve_softens_unknown_project_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/bad-id"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "id": "not_found",
            "message": "The resource you requested could not be found."
        })))
        .expect(2)
        .mount(&server)
        .await;
    let ocean = facade(&server);

    let err = ocean.projects.find_by_id("bad-id").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let resolved = ocean
        .projects
        .resolve(ProjectRef::Id("bad-id".to_string()))
        .await
        .unwrap();
    assert!(resolved.is_none());
}

/// Summaries carry the display fields of the resolved project.
#[tokio::test]
async fn summary_reflects_project_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(project_list_json(&[project_json("p-1", "Production")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let summary = facade(&server)
        .projects
        .summary("Production")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(summary.id, "p-1");
    assert_eq!(summary.name, "Production");
    assert_eq!(summary.purpose, "Service or API");
    assert_eq!(summary.environment.as_deref(), Some("Production"));
}

/// Resource listings come back as plain URN strings.
#[tokio::test]
async fn resources_of_lists_urns() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(project_list_json(&[project_json("p-1", "Production")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/p-1/resources"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(resource_list_json(&["do:droplet:42", "do:volume:abc-123"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resources = facade(&server)
        .projects
        .resources_of("Production")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(resources, vec!["do:droplet:42", "do:volume:abc-123"]);
}

// =============================================================================
// Membership
// =============================================================================

/// Membership is an exact URN string match, so droplet 42 is not confused
/// with droplet 420.
#[tokio::test]
async fn membership_requires_exact_urn() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(project_list_json(&[project_json("p-1", "Production")])),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/p-1/resources"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(resource_list_json(&["do:droplet:420"])),
        )
        .expect(2)
        .mount(&server)
        .await;
    let ocean = facade(&server);

    let inside = ocean
        .droplets
        .is_in_project(droplet(420, "big-web", "active"), "Production")
        .await
        .unwrap();
    assert!(inside);

    let outside = ocean
        .droplets
        .is_in_project(droplet(42, "web-1", "active"), "Production")
        .await
        .unwrap();
    assert!(!outside);
}

/// Finding a droplet's project scans resource sets until the URN shows up.
#[tokio::test]
async fn project_name_of_scans_resource_sets() {
    let urn = droplet_urn(42);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_list_json(&[
            project_json("p-1", "Staging"),
            project_json("p-2", "Production"),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/p-1/resources"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(resource_list_json(&["do:volume:abc-123"])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/p-2/resources"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(resource_list_json(&[urn.as_str()])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let name = facade(&server)
        .droplets
        .project_name_of(droplet(42, "web-1", "active"))
        .await
        .unwrap();

    assert_eq!(name.as_deref(), Some("Production"));
}

/// A droplet in no project comes back as `None`, not an error.
#[tokio::test]
async fn project_name_of_reports_unassigned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(project_list_json(&[project_json("p-1", "Production")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/p-1/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(resource_list_json(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let name = facade(&server)
        .droplets
        .project_name_of(droplet(42, "web-1", "active"))
        .await
        .unwrap();

    assert!(name.is_none());
}

// =============================================================================
// Moving droplets
// =============================================================================

/// Moving a droplet that is already a member is a logged no-op; nothing
/// is posted.
#[tokio::test]
async fn move_to_project_skips_existing_member() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(project_list_json(&[project_json("p-1", "Production")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/p-1/resources"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(resource_list_json(&["do:droplet:42"])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/projects/p-1/resources"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let moved = facade(&server)
        .droplets
        .move_to_project(droplet(42, "web-1", "active"), "Production")
        .await
        .unwrap();

    assert!(moved.is_none());
}

/// Moving an unassigned droplet posts exactly its URN to the project.
#[tokio::test]
async fn move_to_project_assigns_urn() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(project_list_json(&[project_json("p-1", "Production")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/p-1/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(resource_list_json(&[])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/projects/p-1/resources"))
        .and(body_json(json!({ "resources": ["do:droplet:42"] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(resource_list_json(&["do:droplet:42"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let moved = facade(&server)
        .droplets
        .move_to_project(droplet(42, "web-1", "active"), "Production")
        .await
        .unwrap();

    assert_eq!(moved, Some(true));
}

/// A droplet reference that does not resolve aborts the move before any
/// project lookups.
#[tokio::test]
async fn move_to_project_skips_unresolved_droplet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/droplets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(droplet_list_json(&[])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_list_json(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let moved = facade(&server)
        .droplets
        .move_to_project("ghost", "Production")
        .await
        .unwrap();

    assert!(moved.is_none());
}
