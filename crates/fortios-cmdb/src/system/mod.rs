//! System settings, interfaces and reference tables.

pub mod geoip_country;
pub mod global;
pub mod interface;

pub use geoip_country::GeoipCountry;
pub use global::GlobalSettings;
pub use interface::{Interface, InterfaceMode};
