pub mod client;
pub mod config;
pub mod hub;
pub mod messages;
pub mod roster;
pub mod routes;
pub mod transport;
