//! Building blocks shared by the resource stores.
//!
//! Every store owns a [`ResourceCache`] of the records it has loaded and a
//! [`StoreStatus`] handle exposing `loading`, the last error and the last
//! success message. Reads turn failures into an error message and an empty
//! result; mutations touch the cache only after the backend confirms them.

pub mod cache;
pub mod status;

pub use cache::{Resource, ResourceCache};
pub use status::{LoadingGuard, StoreStatus};
