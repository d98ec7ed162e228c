#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod id;
#[cfg(feature = "std")]
mod mono_clock;
#[cfg(feature = "serde")]
pub mod serde;
mod status;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
pub use crate::mono_clock::*;
pub use crate::status::*;
pub use crate::time::*;
