//! Whole-object storage for catalog inputs and generated outputs.
//!
//! Locations are either `s3://bucket/key` URLs or local paths. The
//! [`ObjectStore`] trait is implemented for S3, the local filesystem, a router
//! choosing between the two, and an in-memory map used by tests.

pub mod error;
pub mod location;
pub mod store;

pub use error::ObjectStoreError;
pub use location::ObjectLocation;
pub use store::{
    LocalObjectStore, MemoryObjectStore, ObjectStore, RoutingObjectStore, S3ObjectStore,
    SharedObjectStore,
};
