//! Per-language backends.
//!
//! A backend turns a [`Suite`] into a runnable harness for its language,
//! builds it when the language needs a build step, runs it, and maps the
//! captured output back onto the suite's test cases. The provided
//! [`Backend::execute`] drives that sequence; concrete backends only
//! supply the language-specific pieces (toolchain discovery, commands,
//! harness path).

pub mod compiled;
mod javascript;
mod python;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::language::Language;
use crate::process::{run_process, CommandLine, ProcessError, ProcessResult};
use crate::suite::{render_arguments, Suite};
use crate::templates::{TemplateError, TemplateStore, KIND_MAIN, KIND_TEST};

pub use compiled::CompiledBackend;
pub use javascript::JavascriptBackend;
pub use python::PythonBackend;

/// Build-step resolution for a language that has its toolchain present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildCommand {
    /// Interpreted language: the harness runs as-is.
    NotNeeded,
    /// Compile the harness with this invocation first.
    Invoke(CommandLine),
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("build tools for {0} were not found or could not be run")]
    MissingBuildTool(Language),

    #[error("{0} runtime was not found or could not be run")]
    MissingRuntime(Language),

    /// The build ran and exited non-zero. Its output is surfaced verbatim.
    #[error("something went wrong during the build; check the error messages output by the build step")]
    BuildFailed { output: Vec<String> },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("could not write harness to {}: {source}", .path.display())]
    HarnessWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("no backend is registered for language '{0}'")]
    UnsupportedLanguage(Language),
}

pub trait Backend: std::fmt::Debug {
    fn language(&self) -> Language;

    /// Directory the harness templates are loaded from.
    fn templates_dir(&self) -> &Path;

    /// Where the generated harness is written. Backend-owned; recreated
    /// every run.
    fn harness_path(&self) -> &Path;

    /// The toolchain invocation that compiles the harness, `NotNeeded`
    /// for interpreted languages, or `None` when the build tool could not
    /// be located on the host.
    fn build_command(&self, source: &Path) -> Option<BuildCommand>;

    /// The invocation that executes the built or generated harness, or
    /// `None` when the language runtime could not be located.
    fn run_command(&self) -> Option<CommandLine>;

    /// Remove the generated harness and any build byproducts.
    fn cleanup(&self);

    /// Fill the `test` template once per case and the `main` template
    /// once, then write the result to [`Backend::harness_path`].
    fn generate_harness(&self, suite: &Suite) -> Result<(), BackendError> {
        let store = TemplateStore::load(self.templates_dir(), self.language())?;
        let test_template = store.get(KIND_TEST)?;

        let mut fragments = Vec::with_capacity(suite.tests.len());
        for case in &suite.tests {
            let mut values = HashMap::new();
            values.insert("index", case.id.to_string());
            values.insert("function", suite.function_name().to_string());
            values.insert("args", render_arguments(&case.inputs));
            fragments.push(test_template.substitute(&values)?);
        }

        let mut values = HashMap::new();
        values.insert("src", template_path(suite.source_file_path()));
        values.insert("function", suite.function_name().to_string());
        values.insert("test_cases", fragments.join("\n"));
        let mut script = store.get(KIND_MAIN)?.substitute(&values)?;
        if !script.ends_with('\n') {
            script.push('\n');
        }

        let path = self.harness_path();
        std::fs::write(path, script).map_err(|source| BackendError::HarnessWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Carry out the whole sequence for one suite:
    /// generate, build (unless the language needs none), run, and write
    /// the captured output back into the suite's cases. The harness is
    /// removed only after a successful run, so a failing one can be
    /// inspected.
    fn execute(&mut self, suite: &mut Suite) -> Result<(), BackendError> {
        self.generate_harness(suite)?;

        match self.build_command(suite.source_file_path()) {
            None => return Err(BackendError::MissingBuildTool(self.language())),
            Some(BuildCommand::NotNeeded) => {}
            Some(BuildCommand::Invoke(cmd)) => {
                let result = run_process(&cmd).map_err(|err| match err {
                    ProcessError::Spawn { .. } => BackendError::MissingBuildTool(self.language()),
                    other => BackendError::Process(other),
                })?;
                if !result.success() {
                    return Err(BackendError::BuildFailed {
                        output: result.combined_lines().map(str::to_string).collect(),
                    });
                }
            }
        }

        let run_cmd = self
            .run_command()
            .ok_or_else(|| BackendError::MissingRuntime(self.language()))?;
        let result = run_process(&run_cmd).map_err(|err| match err {
            ProcessError::Spawn { .. } => BackendError::MissingRuntime(self.language()),
            other => BackendError::Process(other),
        })?;

        apply_results(suite, &result);
        self.cleanup();
        Ok(())
    }
}

/// Pair captured output lines positionally with the suite's cases:
/// line *i* becomes the actual output of case *i*. Cases beyond the
/// produced line count receive the missing-output sentinel; lines beyond
/// the case count are dropped. Error-stream content attaches at suite
/// level, since a crash rarely belongs to one case.
pub fn apply_results(suite: &mut Suite, result: &ProcessResult) {
    let mut lines = result.output.iter();
    for case in &mut suite.tests {
        match lines.next() {
            Some(line) => case.record_output(line),
            None => case.record_missing_output(),
        }
    }

    if !result.err_lines.is_empty() {
        suite.stderr_lines = result.err_lines.clone();
    }
}

/// Render a path for interpolation into generated source: forward slashes
/// on every platform, since both harness languages accept them.
fn template_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Locate the first of `candidates` on the PATH.
pub(crate) fn resolve_tool(candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .find_map(|name| which::which(name).ok())
}

/// Remove a generated artifact, tolerating it already being gone.
pub(crate) fn remove_artifact(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => eprintln!("could not remove {}: {err}", path.display()),
    }
}

type BackendFactory = fn() -> Box<dyn Backend>;

/// Maps a language to the factory producing its backend. Populated once
/// at process start; resolution is a pure lookup.
pub struct BackendRegistry {
    factories: HashMap<Language, BackendFactory>,
}

impl BackendRegistry {
    pub fn bootstrap() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register(Language::Python, || Box::new(PythonBackend::new()));
        registry.register(Language::Javascript, || Box::new(JavascriptBackend::new()));
        registry
    }

    pub fn register(&mut self, language: Language, factory: BackendFactory) {
        self.factories.insert(language, factory);
    }

    /// A fresh backend instance for `language`, or the distinct
    /// unsupported-language error when none was registered.
    pub fn resolve(&self, language: Language) -> Result<Box<dyn Backend>, BackendError> {
        self.factories
            .get(&language)
            .map(|factory| factory())
            .ok_or(BackendError::UnsupportedLanguage(language))
    }

    pub fn supported_languages(&self) -> Vec<Language> {
        let mut languages: Vec<_> = self.factories.keys().copied().collect();
        languages.sort_by_key(|lang| lang.id());
        languages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::{TestCase, EMPTY_OUTPUT, MISSING_OUTPUT};
    use serde_json::json;

    fn suite_with_cases(n: usize) -> Suite {
        let tests = (1..=n)
            .map(|id| TestCase::new(id, vec![json!(id)], &json!("x")))
            .collect();
        Suite::new(PathBuf::from("/work/subject.py"), "f".to_string(), tests)
    }

    fn result_with(output: &[&str], err_lines: &[&str]) -> ProcessResult {
        ProcessResult {
            exit_code: Some(0),
            output: output.iter().map(|s| s.to_string()).collect(),
            err_lines: err_lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn fewer_lines_than_cases_fills_missing_sentinel() {
        let mut suite = suite_with_cases(3);
        apply_results(&mut suite, &result_with(&["o1", "o2"], &[]));

        assert_eq!(suite.tests[0].stdout.as_deref(), Some("o1"));
        assert_eq!(suite.tests[1].stdout.as_deref(), Some("o2"));
        assert_eq!(suite.tests[2].stdout.as_deref(), Some(MISSING_OUTPUT));
    }

    #[test]
    fn extra_lines_beyond_case_count_are_dropped() {
        let mut suite = suite_with_cases(2);
        apply_results(&mut suite, &result_with(&["o1", "o2", "o3"], &[]));

        assert_eq!(suite.tests[0].stdout.as_deref(), Some("o1"));
        assert_eq!(suite.tests[1].stdout.as_deref(), Some("o2"));

        suite.evaluate();
        let (passed, failed, not_run) = suite.counts();
        assert_eq!(passed + failed + not_run, 2);
    }

    #[test]
    fn empty_line_maps_to_empty_sentinel() {
        let mut suite = suite_with_cases(1);
        apply_results(&mut suite, &result_with(&[""], &[]));
        assert_eq!(suite.tests[0].stdout.as_deref(), Some(EMPTY_OUTPUT));
    }

    #[test]
    fn stderr_attaches_at_suite_level() {
        let mut suite = suite_with_cases(1);
        apply_results(&mut suite, &result_with(&["ok"], &["Traceback", "boom"]));
        assert_eq!(suite.stderr_lines, vec!["Traceback", "boom"]);
        assert!(suite.tests[0].stderr.is_none());
    }

    #[test]
    fn registry_resolves_registered_backends() {
        let registry = BackendRegistry::bootstrap();
        assert!(registry.resolve(Language::Python).is_ok());
        assert!(registry.resolve(Language::Javascript).is_ok());
    }

    #[test]
    fn registry_rejects_language_without_backend() {
        let registry = BackendRegistry::bootstrap();
        let err = registry.resolve(Language::Ruby).unwrap_err();
        assert!(matches!(
            err,
            BackendError::UnsupportedLanguage(Language::Ruby)
        ));
    }

    #[test]
    fn supported_languages_are_sorted_by_id() {
        let registry = BackendRegistry::bootstrap();
        assert_eq!(
            registry.supported_languages(),
            vec![Language::Javascript, Language::Python]
        );
    }

    #[test]
    fn template_path_uses_forward_slashes() {
        assert_eq!(
            template_path(Path::new("/work/src/add.py")),
            "/work/src/add.py"
        );
    }
}
