use serde_json::json;
use tilgang_application::AssignmentRepository;
use tilgang_core::{AppError, BasePath};
use tilgang_domain::{NewAssignment, ObjectTypeSelector, Scope, ScopeOrgUnit, UserRole};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::http_api_client::HttpApiClient;

use super::HttpAssignmentRepository;

fn repository(server: &MockServer) -> HttpAssignmentRepository {
    let client = HttpApiClient::new(reqwest::Client::new(), &server.uri(), 2, 50)
        .unwrap_or_else(|error| panic!("client should build: {error}"));
    HttpAssignmentRepository::new(client)
}

#[tokio::test]
async fn new_assignment_is_posted_under_base_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/beta/api/accessmanagement/v1/accessassignment"))
        .and(body_json(json!({
            "userId": "599",
            "scopeId": 3,
            "accessRoleId": "ata",
            "orgUnitIds": ["198", "41"]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    let base_path =
        BasePath::new("/beta/").unwrap_or_else(|error| panic!("base path should parse: {error}"));
    let assignment = NewAssignment {
        user_resource_id: "599".to_owned(),
        access_role_id: "ata".to_owned(),
        scope_id: Some(3),
        org_unit_ids: vec!["198".to_owned(), "41".to_owned()],
        apply_to_all_org_units: false,
    };

    let result = repository(&server)
        .create_assignment(&base_path, &assignment)
        .await;

    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn duplicate_assignment_is_a_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/accessmanagement/v1/accessassignment"))
        .respond_with(ResponseTemplate::new(409).set_body_string("already assigned"))
        .expect(1)
        .mount(&server)
        .await;
    let assignment = NewAssignment {
        user_resource_id: "599".to_owned(),
        access_role_id: "ata".to_owned(),
        scope_id: None,
        org_unit_ids: Vec::new(),
        apply_to_all_org_units: true,
    };

    let result = repository(&server)
        .create_assignment(&BasePath::root(), &assignment)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(message)) if message.contains("already assigned")));
}

#[tokio::test]
async fn wildcard_delete_sends_star_object_type() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(
            "/api/accessmanagement/v1/accessassignment/user/599/role/ata",
        ))
        .and(query_param("objectType", "*"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = repository(&server)
        .delete_assignment(&BasePath::root(), "599", "ata", &ObjectTypeSelector::All)
        .await;

    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn specific_delete_sends_object_type() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(
            "/api/accessmanagement/v1/accessassignment/user/599/role/ata",
        ))
        .and(query_param("objectType", "student"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = repository(&server)
        .delete_assignment(
            &BasePath::root(),
            "599",
            "ata",
            &ObjectTypeSelector::Specific("student".to_owned()),
        )
        .await;

    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn updated_assignment_is_returned() {
    let server = MockServer::start().await;
    let role_json = json!({
        "roleId": "ata",
        "roleName": "Tildeler",
        "scopes": [{
            "scopeId": "1",
            "objectType": "student",
            "orgUnits": [{"name": "VGSTOR", "orgUnitId": "198", "shortName": "VGSTOR"}]
        }]
    });
    let mut request_json = role_json.clone();
    request_json["userId"] = json!("599");
    Mock::given(method("PUT"))
        .and(path("/api/accessmanagement/v1/accessassignment"))
        .and(body_json(request_json))
        .respond_with(ResponseTemplate::new(200).set_body_json(role_json))
        .expect(1)
        .mount(&server)
        .await;
    let role = UserRole {
        role_id: "ata".to_owned(),
        role_name: "Tildeler".to_owned(),
        scopes: vec![Scope {
            scope_id: "1".to_owned(),
            object_type: "student".to_owned(),
            org_units: vec![ScopeOrgUnit {
                name: "VGSTOR".to_owned(),
                org_unit_id: "198".to_owned(),
                short_name: "VGSTOR".to_owned(),
            }],
        }],
    };

    let updated = repository(&server)
        .update_assignment(&BasePath::root(), "599", &role)
        .await;

    assert_eq!(updated, Ok(role));
}
