//! Output generation for extracted records.
//!
//! # Submodules
//!
//! - [`json`]: Serializes [`MediaRecord`](crate::models::MediaRecord)s for the
//!   downloading host, either to stdout or one file per sound
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── 703362.json
//! └── 194503.json
//! ```

pub mod json;
