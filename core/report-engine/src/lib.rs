//! FILENAME: core/report-engine/src/lib.rs
//! Paged participant reports.
//!
//! Takes a flat query result and splits it into one page per subject (or
//! whatever the page-break field identifies), then lays each page out as a
//! header plus an inner grid, either one grid row per visit or transposed
//! with visits as columns.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the report IS)
//! - `engine`: Grouping rows into pages (HOW we paginate)
//! - `view`: Renderable output for the template layer (WHAT we display)
//! - `decorate`: Navigation links and display masking for page keys

pub mod decorate;
pub mod definition;
pub mod engine;
pub mod error;
pub mod view;

pub use decorate::{decorate_key, KeyDecorator, NoDecoration, SubjectLinkDecorator};
pub use definition::*;
pub use engine::{calculate_report, paginate, Page, ReportPager};
pub use error::ReportError;
pub use view::*;
