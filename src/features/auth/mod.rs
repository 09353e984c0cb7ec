//! Admin authentication.
//!
//! Passwords are checked by the hosted identity provider; admin rights come from
//! the `role` column of the `users` table. Only `admin` accounts may hold a session.
//!
//! ## Endpoints
//!
//! | Method | Path | Description | Auth |
//! |--------|------|-------------|------|
//! | POST | `/api/auth/login` | Sign in with email and password | - |
//! | POST | `/api/auth/logout` | End the session behind the bearer token | Bearer |
//! | GET | `/api/auth/session` | Resolve the presented token to `admin` or `anonymous` | optional |
//! | GET | `/api/auth/me` | Current administrator | Admin |

pub mod clients;
pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod session;

pub use services::AuthGateway;
