//! Hearthsheet Engine library.
//!
//! ## Structure
//!
//! - `infrastructure/` - Port traits, the JSON event store and settings
//! - `use_cases/` - Snapshot composition over the ports
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
