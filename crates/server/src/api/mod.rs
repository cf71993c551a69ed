pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod saml_validate;

pub use routes::create_router;
