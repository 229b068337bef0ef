//! Store provider implementations.

#[cfg(feature = "appwrite")]
pub mod appwrite;
#[cfg(feature = "local")]
pub mod local;
pub mod memory;

#[cfg(feature = "appwrite")]
pub use appwrite::AppwriteClient;
#[cfg(feature = "local")]
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Reject IDs that would escape their directory or break a URL path.
pub(crate) fn check_id(kind: &str, id: &str) -> filesweep_core::AppResult<()> {
    if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
        return Err(filesweep_core::AppError::validation(format!(
            "Invalid {kind} ID: {id:?}"
        )));
    }
    Ok(())
}
