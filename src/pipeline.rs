//! The per-suite orchestrator: resolves the suite's language from its
//! source file extension, obtains a backend from the registry, and drives
//! generate, build, run, result mapping, evaluation, and reporting in
//! strict order. Suites never run concurrently.

use thiserror::Error;

use crate::backend::{Backend, BackendError, BackendRegistry};
use crate::language::Language;
use crate::output::{Color, Painter};
use crate::suite::Suite;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("file extension of \"{0}\" is not supported")]
    UnsupportedExtension(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug)]
pub struct Pipeline {
    language: Language,
    backend: Box<dyn Backend>,
    suite: Suite,
}

impl Pipeline {
    /// Bind a suite to the backend for its language. Fails when the
    /// extension is unknown or no backend is registered for it; both are
    /// configuration errors fatal to this suite only.
    pub fn new(suite: Suite, registry: &BackendRegistry) -> Result<Self, PipelineError> {
        let language = Language::from_source_path(suite.source_file_path()).ok_or_else(|| {
            PipelineError::UnsupportedExtension(suite.source_file_name())
        })?;
        let backend = registry.resolve(language)?;
        Ok(Self {
            language,
            backend,
            suite,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Execute the suite end to end and print its report. A failed
    /// backend run degrades to a report with every case Not Run; it never
    /// aborts the overall run.
    pub fn run(mut self, painter: &Painter) -> Suite {
        if let Err(err) = self.backend.execute(&mut self.suite) {
            report_backend_error(&err, painter);
            painter.print_error(format!(
                "The suite of {} could not be run; its cases are reported as Not Run",
                self.suite.source_file_name()
            ));
        }

        self.suite.evaluate();
        println!("{}", self.suite.render_report(painter));
        self.suite
    }
}

fn report_backend_error(err: &BackendError, painter: &Painter) {
    painter.print_error(err);
    if let BackendError::BuildFailed { output } = err {
        for line in output {
            println!("{}", painter.paint(line, Color::LightRed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::TestCase;
    use serde_json::json;
    use std::path::PathBuf;

    fn suite_for(file: &str) -> Suite {
        let tests = vec![TestCase::new(1, vec![json!(1)], &json!(1))];
        Suite::new(PathBuf::from(file), "f".to_string(), tests)
    }

    #[test]
    fn resolves_language_from_extension_case_insensitively() {
        let registry = BackendRegistry::bootstrap();
        let pipeline = Pipeline::new(suite_for("/work/Subject.PY"), &registry).unwrap();
        assert_eq!(pipeline.language(), Language::Python);
    }

    #[test]
    fn unknown_extension_is_a_distinct_error() {
        let registry = BackendRegistry::bootstrap();
        let err = Pipeline::new(suite_for("/work/subject.cob"), &registry).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedExtension(name) if name == "subject.cob"));
    }

    #[test]
    fn extension_without_backend_reports_unsupported_language() {
        let registry = BackendRegistry::bootstrap();
        let err = Pipeline::new(suite_for("/work/subject.rb"), &registry).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Backend(BackendError::UnsupportedLanguage(Language::Ruby))
        ));
    }
}
