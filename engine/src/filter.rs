//! Blacklist matching.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Component, Path};

/// Compiled set of blacklist patterns.
#[derive(Debug, Clone)]
pub struct Blacklist {
    set: GlobSet,
}

impl Blacklist {
    /// Compile the given patterns.
    ///
    /// A pattern that is not a valid glob is retried as `**/<pattern>`; if
    /// that fails too it is dropped.
    pub fn new(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => match Glob::new(&format!("**/{}", pattern)) {
                    Ok(glob) => {
                        builder.add(glob);
                    }
                    Err(_) => {
                        tracing::warn!(%pattern, error = %err, "ignoring invalid blacklist pattern");
                    }
                },
            }
        }

        let set = builder.build().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "blacklist failed to compile, nothing will be excluded");
            GlobSet::empty()
        });

        Blacklist { set }
    }

    /// True if the path relative to its source root is excluded.
    ///
    /// Matches the whole relative path, or any single component of it, so a
    /// bare name like `node_modules` excludes that directory at any depth.
    pub fn is_blacklisted(&self, relative_path: &Path) -> bool {
        if self.set.is_empty() {
            return false;
        }

        if self.set.is_match(relative_path) {
            return true;
        }

        relative_path.components().any(|component| match component {
            Component::Normal(name) => self.set.is_match(name),
            _ => false,
        })
    }
}
