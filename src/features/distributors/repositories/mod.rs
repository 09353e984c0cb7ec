pub mod distributor_repository;

pub use distributor_repository::{DistributorRepository, PgDistributorRepository};
