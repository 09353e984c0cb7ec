pub mod admin_directory;

pub use admin_directory::{AdminDirectory, PgAdminDirectory};
