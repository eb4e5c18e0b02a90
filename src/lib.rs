//! Join a derived attribute from a reference spreadsheet onto a planning
//! spreadsheet, flagging rows that found no match.

pub mod config;
pub mod error;
pub mod excel;
pub mod mapping;
pub mod report;
pub mod session;
pub mod table;
pub mod ui;

pub use error::{MapperError, Result};
pub use session::{MappingSession, SessionOutcome};
