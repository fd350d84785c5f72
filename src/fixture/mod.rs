pub mod context;
pub mod fixture;
