//! Firewall objects and policies.

pub mod address;
pub mod addrgrp;
pub mod dnstranslation;
pub mod internet_service;
pub mod policy;
pub mod service_custom;

pub use address::{Address, AddressType};
pub use addrgrp::AddressGroup;
pub use dnstranslation::DnsTranslation;
pub use internet_service::InternetService;
pub use policy::{LogTraffic, Policy, PolicyAction};
pub use service_custom::ServiceCustom;
