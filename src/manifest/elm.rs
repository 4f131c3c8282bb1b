//! `elm.json` parser.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{ManifestParseError, ManifestParser, ManifestSnapshot};

/// Reads application and package `elm.json` files.
pub struct ElmParser;

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ElmJson {
    dependencies: Option<ElmDependencies>,
    test_dependencies: Option<ElmDependencies>,
}

/// Applications pin exact versions split into direct/indirect; packages
/// declare a flat map of version constraints.
#[derive(Deserialize)]
#[serde(untagged)]
enum ElmDependencies {
    Application {
        direct: BTreeMap<String, String>,
        indirect: BTreeMap<String, String>,
    },
    Package(BTreeMap<String, String>),
}

impl ElmDependencies {
    fn merge_into(self, snapshot: &mut ManifestSnapshot) {
        match self {
            Self::Application { direct, indirect } => {
                snapshot.extend(direct);
                snapshot.extend(indirect);
            }
            Self::Package(constraints) => snapshot.extend(constraints),
        }
    }
}

impl ManifestParser for ElmParser {
    fn parse(&self, file: &str, content: &str) -> Result<ManifestSnapshot, ManifestParseError> {
        if content.trim().is_empty() {
            return Ok(ManifestSnapshot::new());
        }

        let json: ElmJson = serde_json::from_str(content)
            .map_err(|source| ManifestParseError::json(file, source))?;

        let dependencies = json
            .dependencies
            .ok_or_else(|| ManifestParseError::missing_field(file, "dependencies"))?;

        // Later maps win on collision: direct < indirect < test direct < test indirect.
        let mut snapshot = ManifestSnapshot::new();
        dependencies.merge_into(&mut snapshot);
        if let Some(test_dependencies) = json.test_dependencies {
            test_dependencies.merge_into(&mut snapshot);
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::{diff, ChangeKind};

    const OLD: &str = r#"{
        "type": "application",
        "source-directories": [],
        "elm-version": "0.19.0",
        "dependencies": {
            "direct": { "elm/core": "1.0.2" },
            "indirect": { "elm/json": "1.1.2" }
        },
        "test-dependencies": { "direct": {}, "indirect": {} }
    }"#;

    const NEW: &str = r#"{
        "type": "application",
        "source-directories": [],
        "elm-version": "0.19.0",
        "dependencies": {
            "direct": {},
            "indirect": { "elm/json": "1.2.2", "elm/time": "1.0.0" }
        },
        "test-dependencies": {
            "direct": { "elm-explorations/test": "1.2.0" },
            "indirect": {}
        }
    }"#;

    #[test]
    fn merges_all_four_dependency_maps() {
        let snapshot = ElmParser.parse("elm.json", NEW).unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot["elm/json"], "1.2.2");
        assert_eq!(snapshot["elm/time"], "1.0.0");
        assert_eq!(snapshot["elm-explorations/test"], "1.2.0");
    }

    #[test]
    fn diff_between_application_manifests() {
        let old = ElmParser.parse("elm.json", OLD).unwrap();
        let new = ElmParser.parse("elm.json", NEW).unwrap();

        let changes: Vec<(String, ChangeKind, Option<String>, Option<String>)> =
            diff(&old, &new, "elm.json")
                .into_iter()
                .map(|r| (r.package.clone(), r.change(), r.previous, r.current))
                .collect();
        let version = |v: &str| Some(v.to_string());

        assert_eq!(
            changes,
            vec![
                (
                    "elm-explorations/test".into(),
                    ChangeKind::Added,
                    None,
                    version("1.2.0")
                ),
                ("elm/core".into(), ChangeKind::Removed, version("1.0.2"), None),
                (
                    "elm/json".into(),
                    ChangeKind::Updated,
                    version("1.1.2"),
                    version("1.2.2")
                ),
                ("elm/time".into(), ChangeKind::Added, None, version("1.0.0")),
            ]
        );
    }

    #[test]
    fn test_dependencies_win_on_collision() {
        let content = r#"{
            "dependencies": {
                "direct": { "elm/core": "1.0.0" },
                "indirect": { "elm/core": "1.0.1" }
            },
            "test-dependencies": {
                "direct": { "elm/core": "1.0.2" },
                "indirect": { "elm/core": "1.0.3" }
            }
        }"#;
        let snapshot = ElmParser.parse("elm.json", content).unwrap();
        assert_eq!(snapshot["elm/core"], "1.0.3");
    }

    #[test]
    fn reads_package_constraints() {
        let content = r#"{
            "type": "package",
            "dependencies": { "elm/core": "1.0.0 <= v < 2.0.0" },
            "test-dependencies": { "elm-explorations/test": "1.0.0 <= v < 2.0.0" }
        }"#;
        let snapshot = ElmParser.parse("elm.json", content).unwrap();
        assert_eq!(snapshot["elm/core"], "1.0.0 <= v < 2.0.0");
        assert_eq!(snapshot["elm-explorations/test"], "1.0.0 <= v < 2.0.0");
    }

    #[test]
    fn blank_content_is_an_empty_snapshot() {
        for blank in ["", "  \n\t "] {
            assert!(ElmParser.parse("elm.json", blank).unwrap().is_empty());
        }
    }

    #[test]
    fn malformed_json_names_the_file() {
        let truncated = r#"{ "dependencies": "#;
        let err = ElmParser.parse("frontend/elm.json", truncated).unwrap_err();
        assert!(matches!(err, ManifestParseError::Json { .. }));
        assert_eq!(err.file(), "frontend/elm.json");
    }

    #[test]
    fn missing_dependencies_is_an_error() {
        let content = r#"{"type": "application"}"#;
        let err = ElmParser.parse("elm.json", content).unwrap_err();
        let ManifestParseError::MissingField { field, .. } = err else {
            panic!("expected a missing field, got {err:?}");
        };
        assert_eq!(field, "dependencies");
    }
}
