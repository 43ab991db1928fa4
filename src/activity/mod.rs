//! Discord-side shape of a Rich Presence activity

mod builder;
mod types;

pub use builder::ActivityBuilder;
pub use types::{Activity, ActivityAssets, ActivityTimestamps};
