pub mod parser;
pub mod properties;
pub mod registry;
pub mod settings;
