pub mod driver;
pub mod mock;
pub mod session;
