//! Listing backends for the four connection methods a neuroshuttle
//! project can use to reach its central storage: local
//! filesystem, SSH/SFTP, S3, and Google Drive. Everything above this
//! crate (`nb-validate`, `nb-transfer`) talks only to
//! [`traits::ListingBackend`].

pub mod builder;
pub mod error;
pub mod local;
pub mod rclone;
pub mod traits;

pub use builder::{central_backend, local_backend, rclone_remote_name};
pub use error::{Error, Result};
pub use traits::{ListingBackend, RemoteEntry};
