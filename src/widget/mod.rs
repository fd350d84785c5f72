pub mod factory;
pub mod widget_model;
