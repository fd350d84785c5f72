pub mod runner;
pub mod script_model;
