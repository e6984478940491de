//! # fortios
//!
//! Async client for the FortiOS REST API.
//!
//! [`FortiOs`] wires one transport into the configuration database
//! ([`cmdb`](FortiOs::cmdb)) and monitor ([`monitor`](FortiOs::monitor)) APIs.
//!
//! ```no_run
//! use fortios::{FortiOs, FortiOsConfig};
//! use fortios::cmdb::firewall::Address;
//! use fortios::cmdb::WriteOptions;
//!
//! # async fn run() -> fortios::Result<()> {
//! let config = FortiOsConfig::new("https://fw.example.com")?
//!     .with_token("api-token")
//!     .with_vdom("root");
//! let client = FortiOs::new(config)?;
//!
//! let status = client.monitor().system_status().await?;
//! println!("{:?} running {:?}", status.hostname, status.version);
//!
//! client
//!     .cmdb()
//!     .firewall()
//!     .address()
//!     .set(&Address::subnet("lan", "10.0.0.0 255.255.255.0"), &WriteOptions::new())
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub use fortios_cmdb as cmdb;
pub use fortios_monitor as monitor;

pub use fortios_core::{
    ApiFamily, ApiRequest, ApiResponse, ApiTransport, Error, FortiOsConfig, Result, ServiceClient,
};

use fortios_cmdb::CmdbClient;
use fortios_monitor::MonitorClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// FortiOS client facade.
#[derive(Clone)]
pub struct FortiOs {
    transport: Arc<dyn ApiTransport>,
    cmdb: CmdbClient,
    monitor: MonitorClient,
}

impl FortiOs {
    /// Connect using `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: FortiOsConfig) -> Result<Self> {
        let transport = ServiceClient::from_config(&config)?;
        info!(
            host = %transport.base_url(),
            vdom = transport.default_vdom().unwrap_or("-"),
            "FortiOS client ready"
        );
        Ok(Self::with_transport(
            Arc::new(transport),
            config.reference_cache_ttl(),
        ))
    }

    /// Build on an existing transport, e.g. a test double.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn ApiTransport>, reference_cache_ttl: Duration) -> Self {
        Self {
            cmdb: CmdbClient::new(Arc::clone(&transport), reference_cache_ttl),
            monitor: MonitorClient::new(Arc::clone(&transport)),
            transport,
        }
    }

    /// Configuration database endpoints.
    #[must_use]
    pub const fn cmdb(&self) -> &CmdbClient {
        &self.cmdb
    }

    /// Monitor endpoints.
    #[must_use]
    pub const fn monitor(&self) -> &MonitorClient {
        &self.monitor
    }

    /// The underlying transport, for raw requests (log and service APIs).
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn ApiTransport> {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> FortiOs {
        let config = FortiOsConfig::new(server.uri())
            .unwrap()
            .with_token("secret")
            .with_vdom("root")
            .with_max_retries(0);
        FortiOs::new(config).unwrap()
    }

    #[test]
    fn rejects_invalid_host() {
        assert!(matches!(
            FortiOsConfig::new("not a url"),
            Err(Error::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn cmdb_and_monitor_share_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/monitor/system/status"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "results": {"hostname": "fw-edge-01"},
                "serial": "FGVM01TM00000000",
                "version": "v7.4.3",
                "build": 2573
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/firewall/addrgrp/web"))
            .and(query_param("vdom", "root"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "results": [{"name": "web", "member": [{"name": "web1"}]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let status = client.monitor().system_status().await.unwrap();
        assert_eq!(status.version.as_deref(), Some("v7.4.3"));

        let group = client
            .cmdb()
            .firewall()
            .addrgrp()
            .get_entry("web")
            .await
            .unwrap();
        assert_eq!(group.member.unwrap()[0].name, "web1");
    }

    #[tokio::test]
    async fn raw_log_request_through_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/log/memory/event/system/raw"))
            .and(query_param("rows", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "results": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ApiRequest::get(ApiFamily::Log, "memory/event/system/raw")
            .with_param("rows", "10");
        let response = client(&server).transport().send(request).await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.result_count(), 0);
    }
}
