//! Trait definitions for SambaSafety resource operations.
//!
//! Each model implements the traits its endpoints support, encapsulating
//! path layout and response unwrapping in the implementations.

mod create;
mod delete;
mod get;
mod list;
mod update;

pub use create::Create;
pub use delete::Delete;
pub use get::Get;
pub use list::{List, DEFAULT_PAGE_SIZE};
pub use update::Update;
