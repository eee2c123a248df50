//! Configuration loading: parses the JSON test description into [`Suite`]
//! values and validates it eagerly, so malformed input fails with clear
//! messages before anything is generated or spawned.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::output::{Color, Painter};
use crate::suite::{Suite, TestCase};

#[derive(Debug, Deserialize)]
struct RawConfig {
    base_path: Option<PathBuf>,
    suites: Option<Vec<RawSuite>>,
}

#[derive(Debug, Deserialize)]
struct RawSuite {
    source_file: Option<PathBuf>,
    function_name: Option<String>,
    test_cases: Option<Vec<RawCase>>,
}

#[derive(Debug, Deserialize)]
struct RawCase {
    input: Option<Vec<Value>>,
    output: Option<Value>,
}

/// Parse and validate the configuration file. Unreadable or structurally
/// broken files are errors; an individually malformed suite only earns a
/// warning and is skipped.
pub fn setup_tests(config_file: &Path, painter: &Painter) -> Result<Vec<Suite>> {
    let text = std::fs::read_to_string(config_file).with_context(|| {
        format!(
            "the file {} was not found or could not be read",
            config_file.display()
        )
    })?;
    let config: RawConfig = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", config_file.display()))?;

    let Some(suites_data) = config.suites.filter(|s| !s.is_empty()) else {
        bail!(
            "the \"suites\" field is missing from {}",
            config_file.display()
        );
    };

    let mut result = Vec::new();
    println!();
    for (index, raw) in suites_data.into_iter().enumerate() {
        println!(
            "{}",
            painter.paint(format!("Processing suite #{}...", index + 1), Color::Cyan)
        );
        if let Some(suite) = parse_suite(config.base_path.as_deref(), raw, painter) {
            result.push(suite);
        }
    }

    Ok(result)
}

fn parse_suite(base_path: Option<&Path>, raw: RawSuite, painter: &Painter) -> Option<Suite> {
    let source_file_path = raw.source_file.as_ref().map(|source| match base_path {
        Some(base) => base.join(source),
        None => source.clone(),
    });

    let errors = validate_suite(source_file_path.as_deref(), &raw);
    if !errors.is_empty() {
        for err in &errors {
            painter.print_error(err);
        }
        painter.print_warning("Suite description was malformed or is missing data. Skipping");
        return None;
    }

    // Validation passed, so every field below is present and well-formed.
    let tests = raw
        .test_cases
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, case)| {
            TestCase::new(
                i + 1,
                case.input.unwrap_or_default(),
                &case.output.unwrap_or(Value::Null),
            )
        })
        .collect();

    Some(Suite::new(
        absolutize(source_file_path?),
        raw.function_name?,
        tests,
    ))
}

fn validate_suite(source_file_path: Option<&Path>, raw: &RawSuite) -> Vec<String> {
    let mut errors = Vec::new();

    match source_file_path {
        Some(path) if path.is_file() => {}
        Some(path) => errors.push(format!("Source file \"{}\" was not found", path.display())),
        None => errors.push("Source file is missing".to_string()),
    }

    if raw
        .function_name
        .as_deref()
        .map_or(true, |name| name.trim().is_empty())
    {
        errors.push("Function name to run is missing".to_string());
    }

    match &raw.test_cases {
        None => errors.push("No test cases were found".to_string()),
        Some(cases) if cases.is_empty() => errors.push("No test cases were found".to_string()),
        Some(cases) => {
            for (i, case) in cases.iter().enumerate() {
                if case.input.as_ref().map_or(true, |input| input.is_empty()) {
                    errors.push(format!("Test Case #{} is missing input arguments", i + 1));
                }
                if case.output.is_none() {
                    errors.push(format!("Test Case #{} is missing expected output", i + 1));
                }
            }
        }
    }

    errors
}

fn absolutize(path: PathBuf) -> PathBuf {
    std::fs::canonicalize(&path).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn quiet() -> Painter {
        Painter::new(false)
    }

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("tests.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn write_source(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "def add(a, b):\n    return a + b\n").unwrap();
        path
    }

    #[test]
    fn loads_a_well_formed_config() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "add.py");
        let config = write_config(
            dir.path(),
            &format!(
                r#"{{
                    "base_path": "{}",
                    "suites": [{{
                        "source_file": "add.py",
                        "function_name": "add",
                        "test_cases": [
                            {{"input": [2, 3], "output": "5"}},
                            {{"input": [1, 1], "output": 2}}
                        ]
                    }}]
                }}"#,
                dir.path().display()
            ),
        );

        let suites = setup_tests(&config, &quiet()).unwrap();
        assert_eq!(suites.len(), 1);
        assert_eq!(suites[0].function_name(), "add");
        assert_eq!(suites[0].tests.len(), 2);
        assert_eq!(suites[0].tests[0].id, 1);
        assert_eq!(suites[0].tests[1].expected, "2");
    }

    #[test]
    fn missing_suites_field_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), r#"{"base_path": "/tmp"}"#);
        let err = setup_tests(&config, &quiet()).unwrap_err();
        assert!(err.to_string().contains("\"suites\" field is missing"));
    }

    #[test]
    fn unreadable_file_is_fatal() {
        let missing = Path::new("/nonexistent/crystalbox/tests.json");
        assert!(setup_tests(missing, &quiet()).is_err());
    }

    #[test]
    fn invalid_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), "{not json");
        let err = setup_tests(&config, &quiet()).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn malformed_suite_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "add.py");
        let config = write_config(
            dir.path(),
            &format!(
                r#"{{
                    "base_path": "{}",
                    "suites": [
                        {{"source_file": "add.py",
                          "test_cases": [{{"input": [1], "output": 1}}]}},
                        {{"source_file": "add.py",
                          "function_name": "add",
                          "test_cases": [{{"input": [2, 3], "output": 5}}]}}
                    ]
                }}"#,
                dir.path().display()
            ),
        );

        let suites = setup_tests(&config, &quiet()).unwrap();
        assert_eq!(suites.len(), 1, "suite without function_name is dropped");
    }

    #[test]
    fn validation_names_each_defect() {
        let raw = RawSuite {
            source_file: Some(PathBuf::from("ghost.py")),
            function_name: None,
            test_cases: Some(vec![RawCase {
                input: Some(vec![]),
                output: None,
            }]),
        };
        let errors = validate_suite(Some(Path::new("/nope/ghost.py")), &raw);
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("was not found"));
        assert!(errors[1].contains("Function name"));
        assert!(errors[2].contains("missing input arguments"));
        assert!(errors[3].contains("missing expected output"));
    }
}
