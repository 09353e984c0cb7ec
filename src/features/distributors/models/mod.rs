pub mod distributor;

pub use distributor::{Distributor, DistributorDetails, DistributorRow, DistributorWrite};
