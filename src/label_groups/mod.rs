//! Label groups and their expansion.
//!
//! # Data Flow
//! ```text
//! GET sec_policy/{draft|active}/label_groups   (operations.rs)
//!     → Vec<LabelGroup>                         (types.rs)
//!     → LabelGroupTable snapshot, swapped in    (table.rs)
//!     → expand(root) → flat set of label hrefs  (expand.rs)
//! ```
//!
//! # Design Decisions
//! - The table is keyed only by href; names are a secondary index that keeps
//!   every href sharing a name instead of silently overwriting
//! - Expansion walks an explicit queue with a visited set, so cycles and
//!   self-references terminate
//! - Missing groups contribute nothing rather than failing

pub mod expand;
pub mod operations;
pub mod table;
pub mod types;

pub use expand::LabelGroupExpander;
pub use operations::LABEL_GROUPS_ENDPOINT;
pub use table::LabelGroupTable;
pub use types::{LabelGroup, LabelRef, SubGroup, Usage};
