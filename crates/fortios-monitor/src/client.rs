//! Asynchronous monitor client implementation.

use crate::models::{InterfaceQuery, InterfaceStatus, LicenseStatus, SystemStatus};
use crate::Result;
use fortios_core::{ApiFamily, ApiRequest, ApiResponse, ApiTransport, Error};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Client for `/api/v2/monitor/...` endpoints.
#[derive(Clone)]
pub struct MonitorClient {
    transport: Arc<dyn ApiTransport>,
}

impl MonitorClient {
    /// Create a client over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Device status and identity.
    ///
    /// # Errors
    ///
    /// Returns transport errors or [`Error::ResponseParseError`].
    pub async fn system_status(&self) -> Result<SystemStatus> {
        let response = self.get("system/status", Vec::new()).await?;
        let mut status: SystemStatus = decode(&response)?;
        status.serial = status.serial.or(response.serial);
        status.version = status.version.or(response.version);
        status.build = status.build.or(response.build);
        Ok(status)
    }

    /// Live interface state, sorted by interface name.
    ///
    /// # Errors
    ///
    /// Returns transport errors or [`Error::ResponseParseError`].
    pub async fn interfaces(&self, query: &InterfaceQuery) -> Result<Vec<InterfaceStatus>> {
        let response = self.get("system/interface", query.to_params()).await?;
        let by_name: BTreeMap<String, InterfaceStatus> = decode(&response)?;
        Ok(by_name.into_values().collect())
    }

    /// License and FortiGuard entitlement state.
    ///
    /// # Errors
    ///
    /// Returns transport errors or [`Error::ResponseParseError`].
    pub async fn license_status(&self) -> Result<LicenseStatus> {
        let response = self.get("license/status", Vec::new()).await?;
        decode(&response)
    }

    /// GET any monitor path, e.g. `router/ipv4`.
    ///
    /// # Errors
    ///
    /// Returns transport errors.
    pub async fn get(
        &self,
        path: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<ApiResponse> {
        debug!(path, "monitor GET");
        let request = ApiRequest::get(ApiFamily::Monitor, path).with_params(params);
        self.transport.send(request).await
    }

    /// POST an action to any monitor path, e.g. `system/config/backup`.
    ///
    /// # Errors
    ///
    /// Returns transport errors.
    pub async fn post(&self, path: &str, body: Value) -> Result<ApiResponse> {
        debug!(path, "monitor POST");
        let request = ApiRequest::post(ApiFamily::Monitor, path).with_body(body);
        self.transport.send(request).await
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: &ApiResponse) -> Result<T> {
    serde_json::from_value(response.results.clone())
        .map_err(|err| Error::ResponseParseError(format!("unexpected monitor payload: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fortios_core::ServiceClient;
    use mockall::predicate::function;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    mockall::mock! {
        pub Transport {}

        #[async_trait]
        impl ApiTransport for Transport {
            async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
        }
    }

    fn test_client(server: &MockServer) -> MonitorClient {
        let transport = ServiceClient::builder(server.uri())
            .unwrap()
            .with_token("secret")
            .build()
            .unwrap();
        MonitorClient::new(Arc::new(transport))
    }

    #[tokio::test]
    async fn system_status_merges_envelope_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/monitor/system/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "http_method": "GET",
                "results": {
                    "model_name": "FortiGate",
                    "model_number": "VM64",
                    "model": "FGVMK6",
                    "hostname": "fw-edge-01",
                    "log_disk_status": "available"
                },
                "vdom": "root",
                "path": "system",
                "name": "status",
                "status": "success",
                "serial": "FGVM01TM00000000",
                "version": "v7.4.3",
                "build": 2573
            })))
            .mount(&server)
            .await;

        let status = test_client(&server).system_status().await.unwrap();
        assert_eq!(status.hostname.as_deref(), Some("fw-edge-01"));
        assert_eq!(status.serial.as_deref(), Some("FGVM01TM00000000"));
        assert_eq!(status.build, Some(2573));
    }

    #[tokio::test]
    async fn interfaces_are_sorted_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/monitor/system/interface"))
            .and(query_param("include_vlan", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "results": {
                    "port2": {"id": "port2", "name": "port2", "link": false},
                    "port1": {
                        "id": "port1",
                        "name": "port1",
                        "ip": "192.0.2.1",
                        "mask": 24,
                        "link": true,
                        "speed": 1000.0,
                        "tx_bytes": 1024,
                        "rx_bytes": 2048
                    }
                }
            })))
            .mount(&server)
            .await;

        let interfaces = test_client(&server)
            .interfaces(&InterfaceQuery::new().including_logical())
            .await
            .unwrap();
        assert_eq!(interfaces.len(), 2);
        assert_eq!(interfaces[0].name, "port1");
        assert!(interfaces[0].link);
        assert_eq!(interfaces[0].rx_bytes, 2048);
    }

    #[tokio::test]
    async fn unexpected_payload_is_parse_error() {
        let mut mock = MockTransport::new();
        mock.expect_send().returning(|_| {
            Ok(ApiResponse {
                results: json!(["not", "a", "map"]),
                ..ApiResponse::default()
            })
        });

        let err = MonitorClient::new(Arc::new(mock))
            .license_status()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ResponseParseError(_)));
    }

    #[tokio::test]
    async fn post_targets_monitor_family() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .with(function(|request: &ApiRequest| {
                request.family == ApiFamily::Monitor
                    && request.path == "system/config/backup"
                    && request.body == Some(json!({"scope": "global"}))
            }))
            .times(1)
            .returning(|_| Ok(ApiResponse::default()));

        MonitorClient::new(Arc::new(mock))
            .post("system/config/backup", json!({"scope": "global"}))
            .await
            .unwrap();
    }
}
