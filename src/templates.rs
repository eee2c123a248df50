//! Per-language harness templates.
//!
//! Templates live as plain text files named `<language>.<kind>.template`
//! and support `$name` / `${name}` placeholder substitution, with `$$` as
//! an escaped dollar sign. There is no control flow. Placeholder names are
//! checked against the known set at load time so a malformed template
//! fails before any subprocess is spawned.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::language::Language;

/// Template kind for the whole harness file.
pub const KIND_MAIN: &str = "main";
/// Template kind for one test-case fragment.
pub const KIND_TEST: &str = "test";

/// Every placeholder any template is allowed to reference.
const KNOWN_PLACEHOLDERS: &[&str] = &["src", "function", "test_cases", "index", "args"];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("could not list template directory {}: {source}", .dir.display())]
    Discover {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read template file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no templates found for language '{language}' in {}", .dir.display())]
    NoneFound { language: Language, dir: PathBuf },

    #[error("template {} references unknown placeholder '${name}'", .path.display())]
    UnknownPlaceholder { path: PathBuf, name: String },

    #[error("template contains a bare '$' with no placeholder name")]
    DanglingDollar,

    #[error("no '{kind}' template loaded for language '{language}'")]
    MissingKind { language: Language, kind: String },

    #[error("no value supplied for placeholder '${name}'")]
    Unresolved { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed template: literal text interleaved with named placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != '$' {
                literal.push(ch);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    literal.push('$');
                }
                Some('{') => {
                    chars.next();
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => name.push(c),
                            None => return Err(TemplateError::DanglingDollar),
                        }
                    }
                    if name.is_empty() {
                        return Err(TemplateError::DanglingDollar);
                    }
                    flush_literal(&mut segments, &mut literal);
                    segments.push(Segment::Placeholder(name));
                }
                Some(c) if c.is_ascii_alphabetic() || *c == '_' => {
                    let mut name = String::new();
                    while let Some(c) = chars.peek() {
                        if c.is_ascii_alphanumeric() || *c == '_' {
                            name.push(*c);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    flush_literal(&mut segments, &mut literal);
                    segments.push(Segment::Placeholder(name));
                }
                _ => return Err(TemplateError::DanglingDollar),
            }
        }
        flush_literal(&mut segments, &mut literal);
        Ok(Self { segments })
    }

    /// Placeholder names referenced by this template, in order of first use.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute every placeholder. A placeholder with no value in
    /// `values` is a caller error, never absorbed silently.
    pub fn substitute(&self, values: &HashMap<&str, String>) -> Result<String, TemplateError> {
        let mut result = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Literal(text) => result.push_str(text),
                Segment::Placeholder(name) => match values.get(name.as_str()) {
                    Some(value) => result.push_str(value),
                    None => {
                        return Err(TemplateError::Unresolved { name: name.clone() });
                    }
                },
            }
        }
        Ok(result)
    }
}

fn flush_literal(segments: &mut Vec<Segment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

/// All templates for one language, keyed by kind.
#[derive(Debug)]
pub struct TemplateStore {
    language: Language,
    templates: HashMap<String, Template>,
}

impl TemplateStore {
    /// Discover and parse every `<language>.<kind>.template` file in `dir`.
    pub fn load(dir: &Path, language: Language) -> Result<Self, TemplateError> {
        let entries = std::fs::read_dir(dir).map_err(|source| TemplateError::Discover {
            dir: dir.to_path_buf(),
            source,
        })?;

        let mut templates = HashMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| TemplateError::Discover {
                dir: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(kind) = template_kind(&path, language) else {
                continue;
            };

            let text = std::fs::read_to_string(&path).map_err(|source| TemplateError::Read {
                path: path.clone(),
                source,
            })?;
            let template = Template::parse(&text)?;
            if let Some(unknown) = template
                .placeholders()
                .find(|name| !KNOWN_PLACEHOLDERS.contains(name))
            {
                return Err(TemplateError::UnknownPlaceholder {
                    path,
                    name: unknown.to_string(),
                });
            }
            templates.insert(kind, template);
        }

        if templates.is_empty() {
            return Err(TemplateError::NoneFound {
                language,
                dir: dir.to_path_buf(),
            });
        }

        Ok(Self {
            language,
            templates,
        })
    }

    pub fn get(&self, kind: &str) -> Result<&Template, TemplateError> {
        self.templates
            .get(kind)
            .ok_or_else(|| TemplateError::MissingKind {
                language: self.language,
                kind: kind.to_string(),
            })
    }
}

/// Extract the kind from a `<language>.<kind>.template` filename, or
/// `None` when the file does not follow the convention for `language`.
fn template_kind(path: &Path, language: Language) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let mut parts = name.split('.');
    let lang = parts.next()?;
    let kind = parts.next()?;
    let ext = parts.next()?;
    if parts.next().is_none() && lang == language.id() && ext == "template" && !kind.is_empty() {
        Some(kind.to_string())
    } else {
        None
    }
}

/// Resolve the directory harness templates are loaded from:
/// `CRYSTALBOX_TEMPLATES` if set, else `templates/` next to the current
/// executable, else `templates/` under the working directory.
pub fn templates_root() -> PathBuf {
    if let Ok(dir) = std::env::var("CRYSTALBOX_TEMPLATES") {
        return PathBuf::from(dir);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("templates");
            if candidate.is_dir() {
                return candidate;
            }
        }
    }
    PathBuf::from("templates")
}
