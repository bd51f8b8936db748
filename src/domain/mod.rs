//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - resolved inputs (`State`, `KeywordSet`) and the U.S. state table
//! - the trailing date window and week alignment (`DateWindow`, `week_start`)
//! - cleaned records (`CovidRecord`, `TrendRecord`) and the weekly join (`AggregateRecord`)
//! - run configuration (`RunConfig`)

pub mod states;
pub mod types;

pub use states::lookup_state;
pub use types::*;
