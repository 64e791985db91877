//! in2c - compile an in2 template read from stdin into a CMake script on
//! stdout.

use miette::{IntoDiagnostic, Result};
use std::io::{Read, Write};
use std::process::ExitCode;

mod diagnostic;

use diagnostic::CompileDiagnostic;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Set up miette for nice error output
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .into_diagnostic()?;

    let compiled = in2_compiler::compile(&source)
        .map_err(|err| CompileDiagnostic::new("<stdin>", &source, &err))?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(compiled.script.as_bytes()).into_diagnostic()?;
    stdout.flush().into_diagnostic()?;
    Ok(())
}
