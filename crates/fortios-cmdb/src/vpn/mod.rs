//! IPsec VPN tunnels.

pub mod ipsec_phase1;
pub mod ipsec_phase2;

pub use ipsec_phase1::{IkeVersion, Phase1};
pub use ipsec_phase2::Phase2;
