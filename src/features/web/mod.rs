//! Navigable surface of the single-page front end.
//!
//! | Path | Serves |
//! |------|--------|
//! | `/` | public map and list |
//! | `/admin/login` | admin login form |
//! | `/admin` | admin dashboard (the page itself checks `/api/auth/session`) |
//! | anything else outside `/api` | redirect to `/` |

pub mod routes;
