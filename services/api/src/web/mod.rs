pub mod auth;
pub mod middleware;
pub mod onboarding;
pub mod rest;
pub mod router;
pub mod state;

// Re-export the router builder so the binary and the tests share one
// definition of the routes.
pub use middleware::require_registered;
pub use router::build_router;
