//! Integration tests for the HTTP reference source against a mock server.

use std::collections::BTreeSet;

use fleet_core::{new_v7, Error, ReferenceSource};
use fleet_reference::HttpReferenceSource;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_services_decodes_array() {
    let mock_server = MockServer::start().await;
    let oil = new_v7();
    let tyres = new_v7();

    let body = serde_json::json!([
        {"id": oil.to_string(), "label": "Oil change", "notes": "5W-30"},
        {"id": tyres.to_string(), "label": "Tyre rotation", "extra": true}
    ]);

    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = HttpReferenceSource::new(mock_server.uri()).unwrap();
    let services = source.fetch_services().await.unwrap();

    assert_eq!(services.len(), 2);
    assert_eq!(services[0].id, oil);
    assert_eq!(services[0].notes, "5W-30");
    assert_eq!(services[1].label, "Tyre rotation");
    assert_eq!(services[1].notes, "");
}

#[tokio::test]
async fn test_fetch_consumables_by_ids_filters_full_list() {
    let mock_server = MockServer::start().await;
    let filter = new_v7();
    let gasket = new_v7();

    let body = serde_json::json!([
        {"id": filter.to_string(), "label": "Oil filter"},
        {"id": gasket.to_string(), "label": "Gasket"}
    ]);

    Mock::given(method("GET"))
        .and(path("/consumables"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let source = HttpReferenceSource::new(mock_server.uri()).unwrap();
    let wanted: BTreeSet<_> = [filter, new_v7()].into_iter().collect();
    let consumables = source.fetch_consumables_by_ids(&wanted).await.unwrap();

    assert_eq!(consumables.len(), 1);
    assert_eq!(consumables[0].label, "Oil filter");
}

#[tokio::test]
async fn test_server_error_is_returned_to_caller() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let source = HttpReferenceSource::new(mock_server.uri()).unwrap();
    let err = source.fetch_services().await.unwrap_err();
    assert!(matches!(err, Error::Request(_)));
}

#[tokio::test]
async fn test_malformed_body_is_returned_to_caller() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/consumables"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let source = HttpReferenceSource::new(mock_server.uri()).unwrap();
    assert!(source.fetch_consumables().await.is_err());
}

#[tokio::test]
async fn test_unreachable_service_errors() {
    // Port 1 is reserved and never listening in test environments.
    let source = HttpReferenceSource::new("http://127.0.0.1:1").unwrap();
    let err = source.fetch_services().await.unwrap_err();
    assert!(matches!(err, Error::Request(_)));
}

#[tokio::test]
async fn test_fetch_asset_found_and_missing() {
    let mock_server = MockServer::start().await;
    let known = new_v7();
    let unknown = new_v7();

    let body = serde_json::json!({
        "id": known.to_string(),
        "label": "Truck 7",
        "type": "vehicle",
        "location": "Depot",
        "effective_date": chrono::Utc::now()
    });

    Mock::given(method("GET"))
        .and(path(format!("/assets/{}", known)))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/assets/{}", unknown)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let source = HttpReferenceSource::new(mock_server.uri()).unwrap();

    let asset = source.fetch_asset(known).await.unwrap().unwrap();
    assert_eq!(asset.label, "Truck 7");
    assert_eq!(asset.asset_type, "vehicle");

    assert!(source.fetch_asset(unknown).await.unwrap().is_none());
}
