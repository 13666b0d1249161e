//! Default academic-year selection for school ERP front-ends.
//!
//! - [`resolver`] picks the academic year to pre-select for a given month.
//! - [`client`] lists academic years from the ERP lookup endpoint.
//! - [`control`] is a headless drop-down that ties the two together and
//!   proposes the default to its parent exactly once.

mod consts;
mod prelude;
mod record;
mod types;

pub mod client;
pub mod config;
pub mod control;
pub mod notify;
pub mod resolver;
pub mod token;

#[cfg(test)]
mod test_utils;

pub use client::{FetchError, LookupClient, LookupSource};
pub use config::{ConfigError, LookupConfig};
pub use consts::*;
pub use control::{
    Clock, ControlDeps, ControlProps, ControlView, FixedClock, InteractionError, OnChange, Phase,
    SelectOption, SelectionControl, SystemClock,
};
pub use notify::{Level, LogNotifier, MemoryNotifier, Notification, Notifier};
pub use record::{AcademicYearLabel, AcademicYearRecord};
pub use resolver::{Resolution, resolve_default, resolve_default_id, resolve_with_reason};
pub use token::{SessionTokens, TokenError, TokenProvider};
pub use types::{Month, Today, Year};

use crate::prelude::*;

/// Error type for label and date parsing.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Empty input")]
    EmptyInput,
}

impl std::error::Error for ParseError {}
