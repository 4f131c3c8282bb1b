//! `Gemfile.lock` parser.
//!
//! Bundler lockfiles are indentation-structured:
//!
//! ```text
//! GIT
//!   remote: https://github.com/org/gem.git
//!   revision: 5a3f...
//!   specs:
//!     gem (1.0.0)
//!       dependency (>= 0)
//!
//! GEM
//!   remote: https://rubygems.org/
//!   specs:
//!     pry (0.12.2)
//! ```
//!
//! Only the 4-space spec lines of `GEM`, `GIT` and `PATH` sections are read.

use super::{ManifestParseError, ManifestParser, ManifestSnapshot};

/// Reads resolved specs from a Bundler lockfile.
pub struct RubyParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Gem,
    Git,
    Path,
}

impl SourceKind {
    fn from_header(header: &str) -> Option<Self> {
        match header {
            "GEM" => Some(Self::Gem),
            "GIT" => Some(Self::Git),
            "PATH" => Some(Self::Path),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Source {
    kind: SourceKind,
    remote: String,
    revision: String,
    in_specs: bool,
}

impl Source {
    fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            remote: String::new(),
            revision: String::new(),
            in_specs: false,
        }
    }

    /// Git-sourced gems carry their pinned commit so a bump stays visible
    /// when the nominal version does not move.
    fn version_label(&self, version: &str) -> String {
        match self.kind {
            SourceKind::Git => format!("{version} (GIT {} {})", self.remote, self.revision),
            SourceKind::Gem | SourceKind::Path => version.to_string(),
        }
    }
}

/// Splits `name (version[-platform])` into name and bare version.
fn parse_spec(text: &str) -> Option<(&str, &str)> {
    let (name, rest) = text.split_once(" (")?;
    let version = rest.strip_suffix(')')?;
    let version = version.split_once('-').map_or(version, |(v, _platform)| v);
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((name, version))
}

impl ManifestParser for RubyParser {
    fn parse(&self, file: &str, content: &str) -> Result<ManifestSnapshot, ManifestParseError> {
        if content.trim().is_empty() {
            return Ok(ManifestSnapshot::new());
        }

        let mut snapshot = ManifestSnapshot::new();
        let mut source: Option<Source> = None;
        let mut saw_source = false;

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim_end();
            if line.is_empty() {
                continue;
            }
            let indent = line.len() - line.trim_start().len();
            let text = line.trim_start();

            if indent == 0 {
                source = SourceKind::from_header(text).map(Source::new);
                saw_source |= source.is_some();
                continue;
            }

            let Some(current) = source.as_mut() else {
                continue;
            };

            match indent {
                2 => {
                    current.in_specs = text == "specs:";
                    if let Some(remote) = text.strip_prefix("remote: ") {
                        current.remote = remote.to_string();
                    } else if let Some(revision) = text.strip_prefix("revision: ") {
                        current.revision = revision.to_string();
                    }
                }
                4 if current.in_specs => {
                    let Some((name, version)) = parse_spec(text) else {
                        return Err(ManifestParseError::MalformedLine {
                            file: file.to_string(),
                            line: index + 1,
                            text: text.to_string(),
                        });
                    };
                    snapshot.insert(name.to_string(), current.version_label(version));
                }
                _ => {}
            }
        }

        if !saw_source {
            return Err(ManifestParseError::MissingSection {
                file: file.to_string(),
                expected: "GEM, GIT or PATH".to_string(),
            });
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::diff;

    fn changes(old: &ManifestSnapshot, new: &ManifestSnapshot) -> Vec<String> {
        diff(old, new, "Gemfile.lock")
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    const OLD: &str = "\
GEM
  remote: https://rubygems.org/
  specs:
    coderay (1.1.2)
    method_source (0.9.2)
    pry (0.12.2)
      coderay (~> 1.1.0)
      method_source (~> 0.9.0)
    pry-doc (0.13.5)
      pry (~> 0.11)
      yard (~> 0.9.11)
    yard (0.9.20)

PLATFORMS
  ruby

DEPENDENCIES
  pry
  pry-doc

BUNDLED WITH
   1.17.2
";

    const NEW: &str = "\
PATH
  remote: .
  specs:
    deploy-complexity (0.4.0)
      values (~> 1.8)

GEM
  remote: https://rubygems.org/
  specs:
    coderay (1.1.2)
    method_source (0.9.2)
    pry (0.12.3)
      coderay (~> 1.1.0)
      method_source (~> 0.9.0)
    rake (10.5.0)
    yard (0.9.20)

PLATFORMS
  ruby

DEPENDENCIES
  deploy-complexity!
  pry
  rake (~> 10.0)

BUNDLED WITH
   1.17.2
";

    #[test]
    fn reads_resolved_specs_only() {
        let snapshot = RubyParser.parse("Gemfile.lock", OLD).unwrap();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot["pry"], "0.12.2");
        assert_eq!(snapshot["yard"], "0.9.20");
    }

    #[test]
    fn formats_changes() {
        let old = RubyParser.parse("Gemfile.lock", OLD).unwrap();
        let new = RubyParser.parse("Gemfile.lock", NEW).unwrap();

        assert_eq!(
            changes(&old, &new),
            vec![
                "Added deploy-complexity: 0.4.0 (Gemfile.lock)",
                "Updated pry: 0.12.2 -> 0.12.3 (Gemfile.lock)",
                "Removed pry-doc: 0.13.5 (Gemfile.lock)",
                "Added rake: 10.5.0 (Gemfile.lock)",
            ]
        );
    }

    #[test]
    fn unchanged_lockfile_has_no_changes() {
        let old = RubyParser.parse("Gemfile.lock", OLD).unwrap();
        assert!(diff(&old, &old, "Gemfile.lock").is_empty());
    }

    #[test]
    fn git_sources_expose_the_pinned_revision() {
        let lock = |revision: &str| {
            format!(
                "GIT\n  remote: https://github.com/org/widget.git\n  \
                 revision: {revision}\n  branch: main\n  specs:\n    \
                 widget (0.1.0)\n\n\
                 GEM\n  remote: https://rubygems.org/\n  specs:\n    \
                 rake (10.5.0)\n"
            )
        };
        let old = RubyParser.parse("Gemfile.lock", &lock("aaa111")).unwrap();
        let new = RubyParser.parse("Gemfile.lock", &lock("bbb222")).unwrap();

        assert_eq!(
            old["widget"],
            "0.1.0 (GIT https://github.com/org/widget.git aaa111)"
        );
        assert_eq!(old["rake"], "10.5.0");

        assert_eq!(
            changes(&old, &new),
            vec![
                "Updated widget: 0.1.0 (GIT https://github.com/org/widget.git aaa111) -> \
                 0.1.0 (GIT https://github.com/org/widget.git bbb222) (Gemfile.lock)"
            ]
        );
    }

    #[test]
    fn platform_suffix_is_dropped() {
        let content = "GEM\n  remote: https://rubygems.org/\n  specs:\n    \
                       nokogiri (1.10.4-x86_64-linux)\n      mini_portile2 (~> 2.4.0)\n";
        let snapshot = RubyParser.parse("Gemfile.lock", content).unwrap();
        assert_eq!(snapshot["nokogiri"], "1.10.4");
    }

    #[test]
    fn blank_content_is_an_empty_snapshot() {
        for blank in ["", "\n  \n"] {
            let snapshot = RubyParser.parse("Gemfile.lock", blank).unwrap();
            assert!(snapshot.is_empty());
        }
    }

    #[test]
    fn content_without_sources_is_an_error() {
        let lock = "PLATFORMS\n  ruby\n";
        let err = RubyParser.parse("Gemfile.lock", lock).unwrap_err();
        assert!(matches!(err, ManifestParseError::MissingSection { .. }));
        assert_eq!(err.file(), "Gemfile.lock");
    }

    #[test]
    fn malformed_spec_line_is_an_error() {
        let lock = "GEM\n  remote: https://rubygems.org/\n  specs:\n    pry 0.12.2\n";
        let err = RubyParser.parse("engine/Gemfile.lock", lock).unwrap_err();
        assert_eq!(
            err.to_string(),
            "engine/Gemfile.lock:4: malformed spec `pry 0.12.2`"
        );
    }
}
