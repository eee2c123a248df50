//! Contract for compiled-language backends.
//!
//! Languages like C, C++, Go, or Java need a build step between harness
//! generation and execution: the harness source is compiled into a binary
//! artifact, and the run step invokes that artifact instead of an
//! interpreter. This trait pins down those extra pieces so a new compiled
//! backend only has to say where its compiler lives, how to call it, and
//! where the binary lands; the derived build and run commands plug
//! straight into [`Backend::build_command`] and [`Backend::run_command`].

use std::path::{Path, PathBuf};

use crate::process::CommandLine;

use super::{Backend, BuildCommand};

pub trait CompiledBackend: Backend {
    /// Locate the language's compiler on the host, or `None` when absent.
    fn compiler(&self) -> Option<PathBuf>;

    /// Arguments handed to the compiler to build the harness against the
    /// suite's source file, producing [`CompiledBackend::binary_path`].
    fn compiler_args(&self, source: &Path) -> Vec<String>;

    /// Where the compiled harness binary is written. Backend-owned and
    /// removed by `cleanup` along with the harness source.
    fn binary_path(&self) -> &Path;

    /// Default build invocation: the located compiler plus
    /// [`CompiledBackend::compiler_args`]. `None` means the compiler is
    /// missing, which `execute` reports as a missing build tool.
    fn compile_command(&self, source: &Path) -> Option<BuildCommand> {
        let compiler = self.compiler()?;
        let mut argv = vec![compiler.to_string_lossy().into_owned()];
        argv.extend(self.compiler_args(source));
        Some(BuildCommand::Invoke(CommandLine::Argv(argv)))
    }

    /// Default run invocation: the produced binary itself.
    fn binary_run_command(&self) -> CommandLine {
        CommandLine::argv([self.binary_path().to_string_lossy().into_owned()])
    }
}
