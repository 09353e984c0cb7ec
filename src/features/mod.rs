pub mod auth;
pub mod distributors;
pub mod geocoding;
pub mod web;
