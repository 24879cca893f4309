pub mod controller;
pub mod crud;
pub mod interface;
pub mod model;
pub mod relay;
pub mod routes;
pub mod schema;
pub mod views;

pub use routes::bridge_routes;
