use std::path::{Path, PathBuf};

use crate::language::Language;
use crate::process::CommandLine;
use crate::templates::templates_root;

use super::{remove_artifact, resolve_tool, Backend, BuildCommand};

// .mjs so the harness can use ES module imports and top-level await.
const HARNESS_FILE: &str = "js_runner.mjs";

/// Interpreted backend for JavaScript, executed with Node.
#[derive(Debug)]
pub struct JavascriptBackend {
    templates_dir: PathBuf,
    harness_path: PathBuf,
}

impl JavascriptBackend {
    pub fn new() -> Self {
        let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_paths(templates_root(), &work_dir)
    }

    pub fn with_paths(templates_dir: PathBuf, work_dir: &Path) -> Self {
        Self {
            templates_dir,
            harness_path: work_dir.join(HARNESS_FILE),
        }
    }

    fn runtime(&self) -> Option<PathBuf> {
        resolve_tool(&["node", "nodejs"])
    }
}

impl Default for JavascriptBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for JavascriptBackend {
    fn language(&self) -> Language {
        Language::Javascript
    }

    fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    fn harness_path(&self) -> &Path {
        &self.harness_path
    }

    fn build_command(&self, _source: &Path) -> Option<BuildCommand> {
        Some(BuildCommand::NotNeeded)
    }

    fn run_command(&self) -> Option<CommandLine> {
        let runtime = self.runtime()?;
        Some(CommandLine::argv([
            runtime.to_string_lossy().into_owned(),
            self.harness_path.to_string_lossy().into_owned(),
        ]))
    }

    fn cleanup(&self) {
        remove_artifact(&self.harness_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::{Suite, TestCase};
    use serde_json::json;

    #[test]
    fn never_requires_a_build_step() {
        let backend = JavascriptBackend::new();
        assert_eq!(
            backend.build_command(Path::new("add.mjs")),
            Some(BuildCommand::NotNeeded)
        );
    }

    #[test]
    fn harness_filename_is_deterministic() {
        let backend = JavascriptBackend::with_paths(PathBuf::from("templates"), Path::new("/w"));
        assert_eq!(backend.harness_path(), Path::new("/w/js_runner.mjs"));
    }

    #[test]
    fn generate_harness_fills_main_and_test_templates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("javascript.main.template"),
            "// from $src\n$test_cases",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("javascript.test.template"),
            "console.log($function($args)); // $index\n",
        )
        .unwrap();
        let backend = JavascriptBackend::with_paths(dir.path().to_path_buf(), dir.path());

        let tests = vec![TestCase::new(1, vec![json!(4), json!(true)], &json!(4))];
        let suite = Suite::new(PathBuf::from("/work/lib.mjs"), "pick".to_string(), tests);

        backend.generate_harness(&suite).unwrap();
        let script = std::fs::read_to_string(backend.harness_path()).unwrap();
        assert!(script.contains("// from /work/lib.mjs"));
        assert!(script.contains("console.log(pick(4, true)); // 1"));
    }
}
