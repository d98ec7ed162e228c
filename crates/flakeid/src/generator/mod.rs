mod basic;
mod interface;
#[cfg(feature = "std")]
mod lock;
#[cfg(feature = "std")]
mod mutex;
mod state;

pub use basic::*;
pub use interface::*;
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
pub use lock::*;
#[cfg(feature = "std")]
pub(crate) use mutex::*;
