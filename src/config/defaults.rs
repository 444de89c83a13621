//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn title() -> String {
        "My Store".into()
    }

    pub fn url() -> Option<String> {
        None
    }

    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [source] Section Defaults
// ============================================================================

pub mod source {
    pub fn api_url() -> String {
        "https://api.chec.io/v1".into()
    }

    pub fn public_key() -> Option<String> {
        None
    }

    pub fn timeout() -> u64 {
        30
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub fn images() -> PathBuf {
        "assets/images".into()
    }

    pub mod sitemap {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "sitemap.xml".into()
        }
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}
