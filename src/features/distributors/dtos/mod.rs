pub mod distributor_dto;

pub use distributor_dto::*;
