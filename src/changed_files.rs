//! Classification of the paths touched by a deploy.

use crate::manifest::Ecosystem;

const MIGRATION_PREFIX: &str = "db/migrate";

/// Changed paths bucketed by what the report does with them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedFileSet {
    /// Database migrations, linked from the report.
    pub migrations: Vec<String>,
    /// `elm.json` files at any depth.
    pub elm_manifests: Vec<String>,
    /// `Gemfile.lock` files at any depth.
    pub ruby_manifests: Vec<String>,
    /// `package-lock.json` files at any depth.
    pub javascript_manifests: Vec<String>,
}

impl ChangedFileSet {
    /// Buckets `paths`, preserving their order within each bucket.
    pub fn classify<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for path in paths {
            let path = path.as_ref().trim_end();
            if path.is_empty() {
                continue;
            }
            if path.starts_with(MIGRATION_PREFIX) {
                set.migrations.push(path.to_string());
            }
            if let Some(ecosystem) = Ecosystem::for_path(path) {
                set.manifests_mut(ecosystem).push(path.to_string());
            }
        }
        set
    }

    /// Manifest paths for one ecosystem.
    #[must_use]
    pub fn manifests(&self, ecosystem: Ecosystem) -> &[String] {
        match ecosystem {
            Ecosystem::Elm => &self.elm_manifests,
            Ecosystem::Ruby => &self.ruby_manifests,
            Ecosystem::Javascript => &self.javascript_manifests,
        }
    }

    fn manifests_mut(&mut self, ecosystem: Ecosystem) -> &mut Vec<String> {
        match ecosystem {
            Ecosystem::Elm => &mut self.elm_manifests,
            Ecosystem::Ruby => &mut self.ruby_manifests,
            Ecosystem::Javascript => &mut self.javascript_manifests,
        }
    }
}
