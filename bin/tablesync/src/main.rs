#![deny(unsafe_code)]

use std::io::Write;
use std::{env, io, process::ExitCode};

fn main() -> ExitCode {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    run_with(env::args_os(), &mut stdout, &mut stderr)
}

fn run_with<I, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let status = cli::run(args, stdout, stderr);
    cli::exit_code_from(status)
}

#[cfg(test)]
mod tests {
    use super::run_with;
    use std::process::ExitCode;

    #[test]
    fn missing_subcommand_reports_usage_error() {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let exit = run_with(["tablesync"], &mut stdout, &mut stderr);
        assert_ne!(exit, ExitCode::SUCCESS);
        assert!(!stderr.is_empty());
    }
}
