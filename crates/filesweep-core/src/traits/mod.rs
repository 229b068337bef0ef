//! Store traits defined in `filesweep-core` and implemented by
//! `filesweep-storage`.

pub mod health;
pub mod metadata;
pub mod storage;

pub use health::HealthProbe;
pub use metadata::MetadataStore;
pub use storage::ObjectStore;
