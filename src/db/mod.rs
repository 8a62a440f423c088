//! Database layer (Firestore).

pub mod firestore;

pub use firestore::DocumentStore;

/// Collection names as constants.
pub mod collections {
    /// Profile records, keyed by email
    pub const PROFILES: &str = "profiles";
    /// Saved link lists, one document per save
    pub const LINKS: &str = "links";
}
