//! Opaque link identifiers.

use uuid::Uuid;

/// Generates a new link: 32 lowercase hex characters, safe in URL paths.
#[must_use]
pub fn generate_link() -> String {
    Uuid::new_v4().simple().to_string()
}
