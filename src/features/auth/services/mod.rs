pub mod auth_gateway;

pub use auth_gateway::AuthGateway;
