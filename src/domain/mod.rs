pub mod catalog;
pub mod models;
pub mod services;
pub mod errors;

pub use catalog::*;
pub use models::*;
pub use services::*;
pub use errors::*;
