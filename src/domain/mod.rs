mod amount;
mod catalog;
mod client;
mod crew;
mod estimate;
mod integrity;
mod inventory;
mod job;
mod validation;

pub use amount::*;
pub use catalog::*;
pub use client::*;
pub use crew::*;
pub use estimate::*;
pub use integrity::*;
pub use inventory::*;
pub use job::*;
pub use validation::ValidationError;

pub(crate) use validation::{out_of_range, require_non_negative, require_non_negative_opt, require_text};

pub const DEFAULT_STATUS: &str = "active";

pub(crate) fn default_active_status() -> String {
    DEFAULT_STATUS.to_string()
}
