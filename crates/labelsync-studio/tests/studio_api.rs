use labelsync_studio::{Attributes, Direction, StudioClient, StudioConfig, StudioError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> StudioClient {
    StudioClient::new(StudioConfig::new(server.uri(), "secret-token").with_page_size(2)).unwrap()
}

fn attrs(value: serde_json::Value) -> Attributes {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_list_projects_follows_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/"))
        .and(query_param("page", "1"))
        .and(header("Authorization", "Token secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": "http://ignored/api/projects/?page=2",
            "previous": null,
            "results": [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": null,
            "previous": "http://ignored/api/projects/?page=1",
            "results": [{"id": 3, "title": "C"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let projects = client_for(&server).list_projects().await.unwrap();
    let ids: Vec<u64> = projects.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_create_and_update_project() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects/"))
        .and(body_json(json!({"title": "Demo", "color": "#fff"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42, "title": "Demo"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/projects/42/"))
        .and(body_json(json!({"title": "Demo", "color": "#000"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42, "title": "Demo"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/projects/42/"))
        .and(body_json(json!({"model_version": "v3"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created = client
        .create_project(&attrs(json!({"title": "Demo", "color": "#fff"})))
        .await
        .unwrap();
    assert_eq!(created.id, 42);

    let updated = client
        .update_project(42, &attrs(json!({"title": "Demo", "color": "#000"})))
        .await
        .unwrap();
    assert_eq!(updated.title.as_deref(), Some("Demo"));

    client.set_model_version(42, "v3").await.unwrap();
}

#[tokio::test]
async fn test_storage_endpoints_by_direction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/storages/export/s3"))
        .and(query_param("project", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 9, "project": 42, "title": "results", "bucket": "ls-42-results"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/storages/export/s3/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9, "title": "results"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/storages/export/s3/9/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/storages/s3/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 11, "title": "raw"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/storages/s3/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 11, "title": "raw"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/storages/s3/11/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 11})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let links = client.list_storages(Direction::Export, 42).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].bucket.as_deref(), Some("ls-42-results"));

    client
        .update_storage(Direction::Export, 9, &attrs(json!({"title": "results"})))
        .await
        .unwrap();
    client.sync_storage(Direction::Export, 9).await.unwrap();

    let created = client
        .create_storage(Direction::Import, &attrs(json!({"title": "raw", "project": 42})))
        .await
        .unwrap();
    assert_eq!(created.id, 11);
    client
        .update_storage(Direction::Import, 11, &attrs(json!({"title": "raw"})))
        .await
        .unwrap();
    client.sync_storage(Direction::Import, 11).await.unwrap();
}

#[tokio::test]
async fn test_import_list_uses_trailing_slash() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/storages/s3/"))
        .and(query_param("project", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "project": 42, "title": "raw", "bucket": "ls-42-raw"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let links = client_for(&server)
        .list_storages(Direction::Import, 42)
        .await
        .unwrap();
    assert_eq!(links[0].id, 7);
}

#[tokio::test]
async fn test_api_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid token."))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_project(&Attributes::new())
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    match err {
        StudioError::Api {
            operation, body, ..
        } => {
            assert_eq!(operation, "create project");
            assert_eq!(body, "Invalid token.");
        }
        other => panic!("unexpected error: {other}"),
    }
}
