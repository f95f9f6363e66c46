pub mod auth;
pub mod categories;
pub mod protected;
pub mod public;
mod router;
pub mod tasks;
pub mod users;

pub use router::router;
