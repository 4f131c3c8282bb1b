//! `package-lock.json` parser.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{ManifestParseError, ManifestParser, ManifestSnapshot};

/// Reads the first level of an npm lockfile.
///
/// Transitive trees are not walked: only top-level `dependencies`
/// (lockfile v1/v2) or root `node_modules/<name>` entries under
/// `packages` (lockfile v3) are read.
pub struct JavascriptParser;

#[derive(Deserialize)]
struct PackageLock {
    dependencies: Option<BTreeMap<String, LockedPackage>>,
    packages: Option<BTreeMap<String, LockedPackage>>,
}

#[derive(Deserialize)]
struct LockedPackage {
    version: Option<String>,
}

const NODE_MODULES: &str = "node_modules/";

impl ManifestParser for JavascriptParser {
    fn parse(&self, file: &str, content: &str) -> Result<ManifestSnapshot, ManifestParseError> {
        if content.trim().is_empty() {
            return Ok(ManifestSnapshot::new());
        }

        let lock: PackageLock = serde_json::from_str(content)
            .map_err(|source| ManifestParseError::json(file, source))?;

        if let Some(dependencies) = lock.dependencies {
            return dependencies
                .into_iter()
                .map(|(name, package)| match package.version {
                    Some(version) => Ok((name, version)),
                    None => Err(ManifestParseError::missing_field(
                        file,
                        format!("dependencies.{name}.version"),
                    )),
                })
                .collect();
        }

        let packages = lock
            .packages
            .ok_or_else(|| ManifestParseError::missing_field(file, "dependencies"))?;

        Ok(packages
            .into_iter()
            .filter_map(|(path, package)| {
                let name = path.strip_prefix(NODE_MODULES)?;
                if name.contains(NODE_MODULES) {
                    return None;
                }
                // Workspace links carry no version of their own.
                Some((name.to_string(), package.version?))
            })
            .collect())
    }
}
