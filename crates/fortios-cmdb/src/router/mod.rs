//! Routing.

pub mod static_route;

pub use static_route::StaticRoute;
