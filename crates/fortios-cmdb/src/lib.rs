//! Typed FortiOS configuration database (CMDB) endpoints.
//!
//! Every endpoint pairs a static [`EndpointSchema`](fortios_core::metadata::EndpointSchema)
//! with a serde model and is reached through a category accessor:
//!
//! ```no_run
//! # async fn example(cmdb: fortios_cmdb::CmdbClient) -> fortios_cmdb::Result<()> {
//! use fortios_cmdb::firewall::Address;
//! use fortios_cmdb::WriteOptions;
//!
//! let address = Address::subnet("lan", "10.0.0.0 255.255.255.0");
//! cmdb.firewall().address().set(&address, &WriteOptions::new()).await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod endpoint;
pub mod firewall;
pub mod models;
pub mod router;
pub mod system;
pub mod vpn;

pub use endpoint::{
    CmdbContext, CmdbEndpoint, CmdbSingleton, GetOptions, MovePosition, ReferenceEndpoint,
    WriteOptions,
};
pub use models::{NameRef, Toggle};

use fortios_core::cache::CacheStats;
use fortios_core::ApiTransport;
use std::sync::Arc;
use std::time::Duration;

/// Convenient result alias that reuses the shared FortiOS error type.
pub type Result<T> = fortios_core::Result<T>;

/// Generates a category struct whose accessors bind a schema and model to
/// the shared context.
macro_rules! endpoint_group {
    (
        $(#[$meta:meta])*
        $group:ident {
            $( $(#[$doc:meta])* $accessor:ident => $kind:ident<$model:ty>($schema:path); )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $group {
            ctx: CmdbContext,
        }

        impl $group {
            $(
                $(#[$doc])*
                #[must_use]
                pub fn $accessor(&self) -> $kind<$model> {
                    $kind::new(self.ctx.clone(), &$schema)
                }
            )+
        }
    };
}

endpoint_group! {
    /// `firewall` and `firewall.service` endpoints.
    FirewallApi {
        /// `firewall/dnstranslation`
        dnstranslation => CmdbEndpoint<firewall::DnsTranslation>(firewall::dnstranslation::SCHEMA);
        /// `firewall/address`
        address => CmdbEndpoint<firewall::Address>(firewall::address::SCHEMA);
        /// `firewall/addrgrp`
        addrgrp => CmdbEndpoint<firewall::AddressGroup>(firewall::addrgrp::SCHEMA);
        /// `firewall/policy`
        policy => CmdbEndpoint<firewall::Policy>(firewall::policy::SCHEMA);
        /// `firewall.service/custom`
        service_custom => CmdbEndpoint<firewall::ServiceCustom>(firewall::service_custom::SCHEMA);
        /// `firewall/internet-service` (cached)
        internet_service => ReferenceEndpoint<firewall::InternetService>(firewall::internet_service::SCHEMA);
    }
}

endpoint_group! {
    /// `vpn.ipsec` endpoints.
    VpnApi {
        /// `vpn.ipsec/phase1`
        ipsec_phase1 => CmdbEndpoint<vpn::Phase1>(vpn::ipsec_phase1::SCHEMA);
        /// `vpn.ipsec/phase2`
        ipsec_phase2 => CmdbEndpoint<vpn::Phase2>(vpn::ipsec_phase2::SCHEMA);
    }
}

endpoint_group! {
    /// `system` endpoints.
    SystemApi {
        /// `system/interface`
        interface => CmdbEndpoint<system::Interface>(system::interface::SCHEMA);
        /// `system/global`
        global => CmdbSingleton<system::GlobalSettings>(system::global::SCHEMA);
        /// `system/geoip-country` (cached)
        geoip_country => ReferenceEndpoint<system::GeoipCountry>(system::geoip_country::SCHEMA);
    }
}

endpoint_group! {
    /// `router` endpoints.
    RouterApi {
        /// `router/static`
        static_route => CmdbEndpoint<router::StaticRoute>(router::static_route::SCHEMA);
    }
}

/// Entry point to the CMDB endpoints.
#[derive(Clone)]
pub struct CmdbClient {
    ctx: CmdbContext,
}

impl CmdbClient {
    /// Create a client over `transport`; reference endpoints cache for `reference_ttl`.
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>, reference_ttl: Duration) -> Self {
        Self {
            ctx: CmdbContext::new(transport, reference_ttl),
        }
    }

    /// Firewall objects and policies.
    #[must_use]
    pub fn firewall(&self) -> FirewallApi {
        FirewallApi {
            ctx: self.ctx.clone(),
        }
    }

    /// IPsec VPN.
    #[must_use]
    pub fn vpn(&self) -> VpnApi {
        VpnApi {
            ctx: self.ctx.clone(),
        }
    }

    /// System settings and interfaces.
    #[must_use]
    pub fn system(&self) -> SystemApi {
        SystemApi {
            ctx: self.ctx.clone(),
        }
    }

    /// Routing.
    #[must_use]
    pub fn router(&self) -> RouterApi {
        RouterApi {
            ctx: self.ctx.clone(),
        }
    }

    /// Statistics of the cache shared by all reference endpoints.
    #[must_use]
    pub fn reference_cache_stats(&self) -> CacheStats {
        self.ctx.reference_cache().stats()
    }

    /// Drop every cached reference response.
    pub fn clear_reference_cache(&self) {
        self.ctx.reference_cache().clear();
    }
}
