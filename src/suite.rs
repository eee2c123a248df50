//! In-memory model of a test suite: the source file and function under
//! test, the ordered test cases, their captured output, and the
//! evaluation that turns output into pass/fail status.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::output::{Color, Painter};

/// Actual-output sentinel for a case the harness never printed a line for.
pub const MISSING_OUTPUT: &str = "<missing output>";
/// Actual-output sentinel for a produced-but-empty line, so "printed an
/// empty string" stays distinguishable from "printed nothing".
pub const EMPTY_OUTPUT: &str = "<empty>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    NotRun,
    Passed,
    Failed,
}

impl TestStatus {
    fn color(self) -> Color {
        match self {
            TestStatus::Passed => Color::LightGreen,
            TestStatus::Failed => Color::LightRed,
            TestStatus::NotRun => Color::LightYellow,
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TestStatus::NotRun => "Not Run",
            TestStatus::Passed => "Passed",
            TestStatus::Failed => "Failed",
        })
    }
}

/// Render one input argument the way it is interpolated into a harness:
/// as a JSON literal. The report uses the same rendering, so what you see
/// is exactly what the generated code received.
pub fn render_argument(value: &Value) -> String {
    value.to_string()
}

/// Comma-joined rendering of a case's full argument list.
pub fn render_arguments(inputs: &[Value]) -> String {
    inputs
        .iter()
        .map(render_argument)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Normalize an expected-output value to the text the harness would print:
/// strings stay bare, every other scalar keeps its JSON spelling.
pub fn render_expected(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// One input/expected-output pair, plus everything captured for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub id: usize,
    pub inputs: Vec<Value>,
    pub expected: String,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub status: TestStatus,
}

impl TestCase {
    pub fn new(id: usize, inputs: Vec<Value>, expected: &Value) -> Self {
        Self {
            id,
            inputs,
            expected: render_expected(expected),
            stdout: None,
            stderr: None,
            status: TestStatus::NotRun,
        }
    }

    /// Store one captured stdout line as this case's actual output.
    pub fn record_output(&mut self, line: &str) {
        let trimmed = line.trim_end();
        self.stdout = Some(if trimmed.is_empty() {
            EMPTY_OUTPUT.to_string()
        } else {
            trimmed.to_string()
        });
    }

    /// Mark this case as having received no output line at all.
    pub fn record_missing_output(&mut self) {
        self.stdout = Some(MISSING_OUTPUT.to_string());
    }

    /// Compare captured output against the expectation. A pure function of
    /// (actual, expected): calling it again with unchanged output yields
    /// the same status. A case that never received output stays `NotRun`.
    pub fn evaluate(&mut self) {
        if let Some(actual) = &self.stdout {
            self.status = if actual.trim_end() == self.expected.trim_end() {
                TestStatus::Passed
            } else {
                TestStatus::Failed
            };
        }
    }

    fn render(&self, painter: &Painter) -> String {
        let mut lines = vec![
            painter.banner(&format!("Test #{}", self.id), '-', Color::LightMagenta),
            String::new(),
            format!(
                "{} {}",
                painter.paint("Input Params:", Color::Yellow),
                render_arguments(&self.inputs)
            ),
            painter.paint(format!("Test {}!", self.status), self.status.color()),
        ];

        if self.status == TestStatus::Failed {
            let actual = self.stdout.as_deref().unwrap_or(MISSING_OUTPUT);
            lines.push(format!(
                "{} {}\n{} {}",
                painter.paint("Expected:", Color::LightRed),
                self.expected,
                painter.paint("Actual:", Color::LightRed),
                actual
            ));
        }

        if let Some(stderr) = &self.stderr {
            lines.push(format!(
                "{}\n\n{}",
                painter.paint("There were also other errors:", Color::Red),
                painter.paint(stderr, Color::Red)
            ));
        }

        lines.join("\n")
    }
}

/// A source file, a function, and the cases to run against it. Owns its
/// test-case list exclusively; the list length is fixed at construction.
#[derive(Debug)]
pub struct Suite {
    source_file_path: PathBuf,
    function_name: String,
    pub tests: Vec<TestCase>,
    /// Suite-level error output. A crashing harness usually emits one
    /// error block with no clear per-case attribution.
    pub stderr_lines: Vec<String>,
    passed: usize,
    failed: usize,
    not_run: usize,
}

impl Suite {
    pub fn new(source_file_path: PathBuf, function_name: String, tests: Vec<TestCase>) -> Self {
        Self {
            source_file_path,
            function_name,
            tests,
            stderr_lines: Vec::new(),
            passed: 0,
            failed: 0,
            not_run: 0,
        }
    }

    pub fn source_file_path(&self) -> &Path {
        &self.source_file_path
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn source_file_name(&self) -> String {
        self.source_file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_file_path.display().to_string())
    }

    /// Evaluate every case and recompute the counters. Counters are reset
    /// first, so re-evaluating with unchanged output is idempotent.
    pub fn evaluate(&mut self) {
        self.passed = 0;
        self.failed = 0;
        self.not_run = 0;

        for case in &mut self.tests {
            case.evaluate();
            match case.status {
                TestStatus::Passed => self.passed += 1,
                TestStatus::Failed => self.failed += 1,
                TestStatus::NotRun => self.not_run += 1,
            }
        }
    }

    /// (passed, failed, not run) after the last `evaluate`.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.passed, self.failed, self.not_run)
    }

    /// The full human-readable report for this suite.
    pub fn render_report(&self, painter: &Painter) -> String {
        let mut lines = vec![
            String::from("\n"),
            painter.banner(
                &format!("Suite of {}", self.source_file_name()),
                '*',
                Color::LightBlue,
            ),
            painter.paint(
                format!("\nFunction executed: {}", self.function_name),
                Color::Cyan,
            ),
            String::new(),
            self.tests
                .iter()
                .map(|case| case.render(painter))
                .collect::<Vec<_>>()
                .join("\n\n"),
            String::new(),
            painter.banner("Suite Summary", '=', Color::LightCyan),
            painter.paint(format!("\nPassed: {}", self.passed), Color::LightGreen),
            painter.paint(format!("Failed: {}", self.failed), Color::LightRed),
            painter.paint(format!("Not Run: {}", self.not_run), Color::LightYellow),
        ];

        if !self.stderr_lines.is_empty() {
            lines.push(String::new());
            lines.push(painter.banner("Errors", '=', Color::Red));
            lines.push(String::new());
            lines.push(
                self.stderr_lines
                    .iter()
                    .map(|line| painter.paint(line, Color::Red))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }

        lines.join("\n")
    }
}
