use std::path::{Path, PathBuf};

use crate::language::Language;
use crate::process::CommandLine;
use crate::templates::templates_root;

use super::{remove_artifact, resolve_tool, Backend, BuildCommand};

const HARNESS_FILE: &str = "python_runner.py";

/// Interpreted backend for Python: no build step, the generated script is
/// handed straight to the interpreter.
#[derive(Debug)]
pub struct PythonBackend {
    templates_dir: PathBuf,
    harness_path: PathBuf,
}

impl PythonBackend {
    pub fn new() -> Self {
        let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_paths(templates_root(), &work_dir)
    }

    /// Construct with explicit template and working directories. Used by
    /// tests and by callers that relocate the harness.
    pub fn with_paths(templates_dir: PathBuf, work_dir: &Path) -> Self {
        Self {
            templates_dir,
            harness_path: work_dir.join(HARNESS_FILE),
        }
    }

    fn interpreter(&self) -> Option<PathBuf> {
        // `py` covers the Windows launcher.
        resolve_tool(&["python3", "python", "py"])
    }
}

impl Default for PythonBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for PythonBackend {
    fn language(&self) -> Language {
        Language::Python
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
        let interpreter = self.interpreter()?;
        Some(CommandLine::argv([
            interpreter.to_string_lossy().into_owned(),
            self.harness_path.to_string_lossy().into_owned(),
        ]))
    }

    fn cleanup(&self) {
        remove_artifact(&self.harness_path);
    }
}
