mod app;
pub mod components;
pub mod config;
pub mod environment;
pub mod error;
pub mod route;
pub mod store;
pub mod view_model;

pub use app::run;
pub use config::Config;
pub use environment::{Api, Environment, Model, Repository};
pub use error::{ApiError, ConfigError};
pub use route::Route;
pub use store::{Action, State, Store};
