//! Integration tests for decoding recorded FortiOS response envelopes.

use fortios_core::client::map_status_to_error;
use fortios_core::{ApiResponse, Error};
use reqwest::StatusCode;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> String {
    let fixture_path = fixtures_dir().join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

#[derive(Debug, Deserialize)]
struct Address {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    subnet: Option<String>,
    #[serde(default)]
    fqdn: Option<String>,
    color: u8,
    #[serde(rename = "associated-interface")]
    associated_interface: String,
}

#[test]
fn test_deserialize_address_list() {
    let json_data = load_fixture("firewall_address_list.json");
    let response: ApiResponse = serde_json::from_str(&json_data).unwrap_or_else(|e| {
        panic!("Failed to deserialize envelope: {}\nJSON: {}", e, json_data)
    });

    assert!(response.is_success());
    assert_eq!(response.result_count(), 2);
    assert_eq!(response.matched_count, Some(2));
    assert_eq!(response.size, Some(3));
    assert_eq!(response.version.as_deref(), Some("v7.4.3"));

    let addresses: Vec<Address> = response.results_as().unwrap();
    let lan = &addresses[0];
    assert_eq!(lan.name, "lan-net");
    assert_eq!(lan.kind, "ipmask");
    assert_eq!(lan.subnet.as_deref(), Some("192.168.10.0 255.255.255.0"));
    assert_eq!(lan.color, 3);
    assert_eq!(lan.associated_interface, "port2");

    let fqdn = &addresses[1];
    assert_eq!(fqdn.kind, "fqdn");
    assert_eq!(fqdn.fqdn.as_deref(), Some("update.example.com"));
    assert!(fqdn.subnet.is_none());
}

#[test]
fn test_first_result_of_list() {
    let response: ApiResponse =
        serde_json::from_str(&load_fixture("firewall_address_list.json")).unwrap();
    let first: Address = response.first_result().unwrap();
    assert_eq!(first.name, "lan-net");
}

#[test]
fn test_error_envelope() {
    let json_data = load_fixture("policy_move_error.json");
    let response: ApiResponse = serde_json::from_str(&json_data).unwrap();

    assert!(!response.is_success());
    assert_eq!(response.action.as_deref(), Some("move"));
    assert_eq!(response.mkey_str().as_deref(), Some("12"));
    assert_eq!(response.revision_changed, Some(false));

    let err = map_status_to_error(StatusCode::NOT_FOUND, "cmdb/firewall/policy/12", &json_data);
    assert_eq!(
        err,
        Error::NotFound("cmdb/firewall/policy/12: Entry not found".to_string())
    );
}
