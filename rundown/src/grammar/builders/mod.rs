//! Builder functions for workout grammar productions
//!
//! Every builder takes the shared `Cursor`. Speculative productions return
//! `Ok(None)` and leave the cursor where they found it; errors are reserved
//! for input that cannot be anything else.

pub mod action;
pub mod distance;
pub mod helpers;
pub mod metadata;
pub mod recovery;
pub mod section;
pub mod target;
pub mod time;

pub use action::{parse_action, parse_rep};
pub use distance::{parse_distance, parse_unqualified_distance};
pub use metadata::parse_metadata;
pub use recovery::parse_recovery;
pub use section::{parse_section, parse_workout, SectionPart};
pub use target::parse_target;
pub use time::parse_time;
