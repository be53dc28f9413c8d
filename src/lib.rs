pub mod browser;
pub mod configuration;
pub mod domain;

pub use browser::*;
pub use configuration::*;
pub use domain::*;
