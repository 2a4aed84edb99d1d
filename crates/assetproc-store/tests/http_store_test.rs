//! Integration tests for HttpAssetStore against a mock store API.
//!
//! These tests verify:
//! - Service routes carry the bearer token
//! - 404 on the asset route maps to `Ok(None)`
//! - Job updates send only the populated fields
//! - Non-2xx responses surface as `Error::Api`

use assetproc_core::{AssetStore, Error, ErrorKind, JobUpdate};
use assetproc_store::{HttpAssetStore, StoreConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn store_for(server: &MockServer) -> HttpAssetStore {
    HttpAssetStore::new(StoreConfig::new(server.uri(), "test-key")).expect("client")
}

#[tokio::test]
async fn test_fetch_asset_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/asset"))
        .and(query_param("assetId", "asset-1"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "asset-1",
            "projectId": "project-1",
            "fileName": "project-1/talk.mp3",
            "fileUrl": "https://blob.example/talk.mp3",
            "fileType": "audio",
            "mimeType": "audio/mpeg",
            "size": 1024
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let asset = store_for(&mock_server)
        .fetch_asset("asset-1")
        .await
        .expect("request should succeed")
        .expect("asset should exist");

    assert_eq!(asset.id, "asset-1");
    assert_eq!(asset.file_type, "audio");
    assert_eq!(asset.base_name(), "talk.mp3");
}

#[tokio::test]
async fn test_fetch_asset_not_found_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/asset"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Asset not found"})))
        .mount(&mock_server)
        .await;

    let asset = store_for(&mock_server).fetch_asset("missing").await.unwrap();
    assert!(asset.is_none());
}

#[tokio::test]
async fn test_fetch_asset_null_body_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/asset"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    let asset = store_for(&mock_server).fetch_asset("missing").await.unwrap();
    assert!(asset.is_none());
}

#[tokio::test]
async fn test_fetch_asset_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/asset"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&mock_server)
        .await;

    let err = store_for(&mock_server)
        .fetch_asset("asset-1")
        .await
        .unwrap_err();

    match &err {
        Error::Api { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "database down");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
    assert_eq!(err.kind(), ErrorKind::TransientIo);
}

#[tokio::test]
async fn test_fetch_asset_file_has_no_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blobs/notes.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/blobs/notes.txt", mock_server.uri());
    let bytes = store_for(&mock_server).fetch_asset_file(&url).await.unwrap();
    assert_eq!(bytes, b"hello");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_update_asset_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/asset"))
        .and(query_param("assetId", "asset-1"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_json(json!({"content": "a\n\nb"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    store_for(&mock_server)
        .update_asset_content("asset-1", "a\n\nb")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_job_details_failed_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/asset-processing-job"))
        .and(query_param("jobId", "job-1"))
        .and(body_json(json!({
            "status": "failed",
            "errorMessage": "Unsupported content type: image",
            "attempts": 2
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    store_for(&mock_server)
        .update_job_details(
            "job-1",
            &JobUpdate::failed("Unsupported content type: image", 2),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_job_details_in_progress_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/asset-processing-job"))
        .and(query_param("jobId", "job-1"))
        .and(body_json(json!({"status": "in_progress"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    store_for(&mock_server)
        .update_job_details("job-1", &JobUpdate::in_progress())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_job_heartbeat_sends_timestamp() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/asset-processing-job"))
        .and(query_param("jobId", "job-1"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    store_for(&mock_server)
        .update_job_heartbeat("job-1")
        .await
        .unwrap();

    let requests: Vec<Request> = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let stamp = body["lastHeartBeat"].as_str().expect("timestamp string");
    assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    assert_eq!(body.as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/asset-processing-job"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "Invalid API key"})))
        .mount(&mock_server)
        .await;

    let err = store_for(&mock_server)
        .update_job_heartbeat("job-1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { status: 403, .. }));
}

#[tokio::test]
async fn test_health_check() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/asset-processing-job"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    assert!(store_for(&mock_server).health_check().await.unwrap());
}
