#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod api;
pub mod feed;
pub mod filter;
pub mod history;
pub mod location;
mod logs;
pub mod playback;
pub mod session;
pub mod stats;
pub mod utils;
pub mod video_store;
