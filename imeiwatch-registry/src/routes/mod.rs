pub mod admin_routes;
pub mod auth_routes;
pub mod health;
pub mod origin;
pub mod public_routes;
