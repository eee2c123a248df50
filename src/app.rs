//! Top-level application flow: load the configuration, then run each
//! suite through its own pipeline, strictly one after another. A suite
//! that cannot be set up or run is reported and skipped; the rest of the
//! run proceeds.

use anyhow::Result;

use crate::backend::BackendRegistry;
use crate::cli::Cli;
use crate::config;
use crate::output::Painter;
use crate::pipeline::Pipeline;

pub fn run(cli: Cli) -> Result<i32> {
    let painter = Painter::auto(cli.no_color);

    let suites = match config::setup_tests(&cli.config_file, &painter) {
        Ok(suites) => suites,
        Err(err) => {
            painter.print_error(format!("{err:#}"));
            return Ok(1);
        }
    };

    let registry = BackendRegistry::bootstrap();

    for suite in suites {
        match Pipeline::new(suite, &registry) {
            Ok(pipeline) => {
                pipeline.run(&painter);
            }
            Err(err) => {
                painter.print_critical(format!("{err}; skipping this suite"));
            }
        }
    }

    Ok(0)
}
