//! Distributor directory.
//!
//! Visitors see active distributors only, filtered by department and city.
//! Administrators manage every record; each save geocodes the address first and
//! nothing is written when that fails.
//!
//! ## Endpoints
//!
//! | Method | Path | Description | Auth |
//! |--------|------|-------------|------|
//! | GET | `/api/distributors` | Active distributors (`department`, `city` filters) | - |
//! | GET | `/api/distributors/suggestions` | Autocomplete values from the active listing | - |
//! | GET | `/api/distributors/map` | Map viewport and markers | - |
//! | GET | `/api/admin/distributors` | All distributors | Admin |
//! | POST | `/api/admin/distributors` | Create (geocoded) | Admin |
//! | PUT | `/api/admin/distributors/{id}` | Partial update (re-geocoded) | Admin |
//! | DELETE | `/api/admin/distributors/{id}?confirm=true` | Permanent delete | Admin |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
