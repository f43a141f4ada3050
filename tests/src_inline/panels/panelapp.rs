use httpmock::prelude::*;
use serde_json::json;

use super::*;

fn panel_body() -> serde_json::Value {
    json!({
        "id": 101,
        "hash_id": "abc123",
        "name": "Intellectual disability",
        "version": "3.4",
        "version_created": "2024-05-01T10:00:00Z",
        "relevant_disorders": ["ID"],
        "genes": [
            {
                "gene_data": {"hgnc_symbol": "BRCA1", "gene_symbol": "BRCA1", "hgnc_id": "HGNC:1100"},
                "confidence_level": "3"
            },
            {
                "gene_data": {"gene_symbol": "TP53", "hgnc_id": null},
                "confidence_level": "1"
            },
            {
                "gene_data": {"hgnc_id": "HGNC:0"},
                "confidence_level": "2"
            }
        ]
    })
}

#[test]
fn test_get_panel_current_version() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/panels/101/");
        then.status(200).json_body(panel_body());
    });

    let client = PanelAppClient::new(server.base_url());
    let panel = client.get_panel("101", None).unwrap();
    mock.assert();

    assert_eq!(panel.id, 101);
    assert_eq!(panel.name, "Intellectual disability");
    assert_eq!(panel.hash.as_deref(), Some("abc123"));
    assert_eq!(panel.version, "3.4");
    assert_eq!(panel.genes.len(), 2);
    assert_eq!(panel.gene("BRCA1").unwrap().confidence_level, "3");
    assert_eq!(panel.gene("TP53").unwrap().hgnc_id, None);
}

#[test]
fn test_get_panel_pinned_version() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/panels/101/")
            .query_param("version", "1.0");
        then.status(200).json_body(panel_body());
    });

    let client = PanelAppClient::new(format!("{}/", server.base_url()));
    client.get_panel("101", Some("1.0")).unwrap();
    mock.assert();
}

#[test]
fn test_get_panel_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/panels/5/");
        then.status(404);
    });

    let client = PanelAppClient::new(server.base_url());
    let err = client.get_panel("5", None).unwrap_err();
    assert!(matches!(err, RegistryError::Status { status: 404, .. }));
}

#[test]
fn test_get_panel_bad_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/panels/5/");
        then.status(200).body("not json");
    });

    let client = PanelAppClient::new(server.base_url());
    let err = client.get_panel("5", None).unwrap_err();
    assert!(matches!(err, RegistryError::Decode { .. }));
}

#[test]
fn test_list_panels_follows_pages() {
    let server = MockServer::start();
    let second = server.url("/panels/page2/");
    let first_mock = server.mock(|when, then| {
        when.method(GET).path("/panels/");
        then.status(200).json_body(json!({
            "next": second,
            "results": [
                {"id": 1, "name": "One", "relevant_disorders": ["P1", "Alias"]}
            ]
        }));
    });
    let second_mock = server.mock(|when, then| {
        when.method(GET).path("/panels/page2/");
        then.status(200).json_body(json!({
            "next": null,
            "results": [
                {"id": 2, "name": "Two"}
            ]
        }));
    });

    let client = PanelAppClient::new(server.base_url());
    let listings = client.list_panels().unwrap();
    first_mock.assert();
    second_mock.assert();

    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].relevant_disorders, vec!["P1", "Alias"]);
    assert_eq!(listings[1].id, 2);
    assert!(listings[1].relevant_disorders.is_empty());
}
