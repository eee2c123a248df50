use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;

/// Languages the tool knows how to name. Having an entry here does not
/// imply a backend exists for it; the registry decides that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Cpp,
    Go,
    Java,
    Javascript,
    Python,
    Ruby,
}

impl Language {
    /// Identifier used in template filenames (`<id>.<kind>.template`)
    /// and diagnostics.
    pub fn id(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Go => "go",
            Language::Java => "java",
            Language::Javascript => "javascript",
            Language::Python => "python",
            Language::Ruby => "ruby",
        }
    }

    /// Map a source-file extension to its language, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Language> {
        EXTENSIONS.get(ext.to_ascii_lowercase().as_str()).copied()
    }

    /// Convenience wrapper over [`Language::from_extension`] for a path.
    pub fn from_source_path(path: &Path) -> Option<Language> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Language::from_extension)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

static EXTENSIONS: Lazy<HashMap<&'static str, Language>> = Lazy::new(|| {
    let pairs: &[(&str, Language)] = &[
        ("c", Language::C),
        ("cpp", Language::Cpp),
        ("cc", Language::Cpp),
        ("cxx", Language::Cpp),
        ("go", Language::Go),
        ("java", Language::Java),
        ("js", Language::Javascript),
        ("mjs", Language::Javascript),
        ("py", Language::Python),
        ("rb", Language::Ruby),
    ];
    pairs.iter().copied().collect()
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(Language::from_extension("PY"), Some(Language::Python));
        assert_eq!(Language::from_extension("Mjs"), Some(Language::Javascript));
    }

    #[test]
    fn unknown_extension_yields_none() {
        assert_eq!(Language::from_extension("cob"), None);
    }

    #[test]
    fn path_lookup_uses_final_extension() {
        let path = PathBuf::from("/work/library.v2.py");
        assert_eq!(Language::from_source_path(&path), Some(Language::Python));
        assert_eq!(Language::from_source_path(Path::new("noext")), None);
    }
}
