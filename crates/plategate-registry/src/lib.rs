//! Persistent registry for the Plategate access controller.
//!
//! The registry holds the two plate sets the authorization engine reads:
//! the **authorized** set (vehicles allowed through automatically) and
//! the **pending** queue (detected-but-unknown vehicles awaiting external
//! review). Removing a pending entry is how an external approval reaches
//! the core, so the registry also publishes removal notifications on a
//! broadcast channel.
//!
//! The crate additionally provides the [`ImageStore`] used to keep a
//! review photo for every pending entry, with a filesystem
//! implementation and an in-memory one for tests.
//!
//! All reads are point-in-time snapshots; staleness up to the store's
//! own propagation delay is accepted by the decision core.

pub mod error;
pub mod image_store;
pub mod models;
pub mod sqlite;

pub use error::{RegistryError, RegistryResult};
pub use image_store::{FsImageStore, ImageStore, MemoryImageStore, MemoryImageStoreHandle};
pub use models::{AuthorizedPlate, PendingPlate};
pub use sqlite::{Registry, SqliteRegistry};
