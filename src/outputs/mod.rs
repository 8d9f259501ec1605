//! Output rendering for the consolidated price report.
//!
//! # Submodules
//!
//! - [`xlsx`]: renders per-site tables and the unified table into one
//!   workbook
//!
//! # Output Structure
//!
//! ```text
//! report.xlsx
//! ├── Aggregate   # unified table, 4-column blocks per article
//! ├── ChipDip     # per-site table, 3-column blocks per article
//! ├── eBay
//! └── …
//! ```

pub mod xlsx;
