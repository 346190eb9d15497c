//! Population globe engine crate.
//! Scene construction, picking and drag interaction on the CPU; no GPU here.
#![deny(missing_docs)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::dbg_macro, clippy::large_enum_variant)]

pub mod app;
pub mod camera;
pub mod countries;
pub mod geometry;
pub mod interaction;
pub mod scene;

/// Returns the engine version string from Cargo metadata.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_semver_like() {
        assert!(version().split('.').count() >= 3);
    }
}
