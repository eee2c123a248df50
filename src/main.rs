use anyhow::Result;
use crystalbox::app;
use crystalbox::cli;

fn main() -> Result<()> {
    let cli = cli::parse();
    let exit_code = app::run(cli)?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
