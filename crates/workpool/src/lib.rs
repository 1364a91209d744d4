#![doc = include_str!("../README.md")]

mod config;
mod consumer;
mod error;
mod kind;
mod pipeline;
mod pool;
mod signal;
mod source;
mod store;
mod transform;
mod worker;

pub use crate::config::*;
pub use crate::consumer::*;
pub use crate::error::*;
pub use crate::kind::*;
pub use crate::pipeline::*;
pub use crate::pool::*;
pub use crate::signal::*;
pub use crate::source::*;
pub use crate::store::*;
pub use crate::transform::*;
pub use crate::worker::*;
