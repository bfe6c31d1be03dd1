//! Module paths inside the generated crate.

use std::fmt;

/// Visibility of a generated module.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Visibility {
    /// `pub mod`.
    Public,
    /// `pub(crate) mod`.
    PubCrate,
    /// `mod`.
    Private,
}

impl Visibility {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Public => "pub ",
            Self::PubCrate => "pub(crate) ",
            Self::Private => "",
        }
    }
}

/// A top-level module of the generated crate.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RustModule {
    name: String,
    visibility: Visibility,
}

impl RustModule {
    const fn new(name: String, visibility: Visibility) -> Self {
        Self { name, visibility }
    }

    /// Public module.
    #[must_use]
    pub fn public(name: impl Into<String>) -> Self {
        Self::new(name.into(), Visibility::Public)
    }

    /// Crate-visible module.
    #[must_use]
    pub fn pub_crate(name: impl Into<String>) -> Self {
        Self::new(name.into(), Visibility::PubCrate)
    }

    /// Private module.
    #[must_use]
    pub fn private(name: impl Into<String>) -> Self {
        Self::new(name.into(), Visibility::Private)
    }

    /// The `config` module holding the service configuration.
    #[must_use]
    pub fn config() -> Self {
        Self::public("config")
    }

    /// The `protocol` module holding protocol support code.
    #[must_use]
    pub fn protocol() -> Self {
        Self::pub_crate("protocol")
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module visibility.
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Path usable from generated code, for example `crate::config`.
    #[must_use]
    pub fn fully_qualified_path(&self) -> String {
        format!("crate::{}", self.name)
    }

    /// Source file relative to the crate root, for example `src/config.rs`.
    #[must_use]
    pub fn file_path(&self) -> String {
        format!("src/{}.rs", self.name)
    }

    /// Declaration line for `src/lib.rs`, for example `pub mod config;`.
    #[must_use]
    pub fn declaration(&self) -> String {
        format!("{}mod {};", self.visibility.keyword(), self.name)
    }
}

impl fmt::Display for RustModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fully_qualified_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn module_paths() {
        let module = RustModule::protocol();
        assert_eq!(module.fully_qualified_path(), "crate::protocol");
        assert_eq!(module.file_path(), "src/protocol.rs");
        assert_eq!(module.declaration(), "pub(crate) mod protocol;");
    }

    #[rstest]
    #[case::public(RustModule::public("types"), "pub mod types;")]
    #[case::private(RustModule::private("json_errors"), "mod json_errors;")]
    fn declarations_follow_visibility(#[case] module: RustModule, #[case] expected: &str) {
        assert_eq!(module.declaration(), expected);
    }
}
