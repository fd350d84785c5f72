//! Configuration-driven UI test fixtures.
//!
//! A UI descriptor (XML) declares the forms of one UI and the widgets on each.
//! [`config::parser::ConfigParser`] turns it into validated
//! [`config::properties::FixtureProperties`]; a [`fixture::fixture::UiFixture`]
//! then drives a browser through the [`browser::driver::Driver`] capability,
//! resolving widget names against whichever form is currently active.

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod fixture;
pub mod script;
pub mod widget;

pub use config::parser::ConfigParser;
pub use config::properties::{FixtureProperties, MAIN_FORM};
pub use error::{ConfigError, DriverError, FixtureError};
pub use fixture::fixture::UiFixture;
