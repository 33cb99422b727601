#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the command-line front-end over [`manager`]: it parses
//! arguments with `clap`, wires verbosity flags to [`logging::init`], and
//! dispatches each subcommand to the corresponding [`manager::ops`]
//! function. [`run`] is the binary-agnostic entry point; the `tablesync`
//! binary crate only supplies `std::env::args_os` and the process streams.
//!
//! # Errors
//!
//! A failed subcommand writes its error to the caller's stderr stream and
//! [`run`] returns a non-zero status; [`exit_code_from`] converts that
//! status to [`std::process::ExitCode`].

mod args;
mod error;

use std::io::Write;
use std::num::NonZeroUsize;
use std::process::ExitCode;

use args::{Cli, Command, FileSpec};
use clap::Parser;
use error::CliError;

fn nproc(n: u32) -> NonZeroUsize {
    NonZeroUsize::new(n as usize).unwrap_or_else(|| NonZeroUsize::new(1).expect("1 is nonzero"))
}

fn entries_from(files: &[FileSpec]) -> Vec<(String, String)> {
    files
        .iter()
        .map(|spec| (spec.name.clone(), spec.path.clone()))
        .collect()
}

fn registration_for(
    table: &str,
    extra: &[String],
) -> Result<manager::ManagerRegistration, CliError> {
    let mut registration = manager::ManagerRegistration::new();
    registration.register(table)?;
    for location in extra {
        if location != table {
            registration.register(location.clone())?;
        }
    }
    Ok(registration)
}

fn dispatch(command: Command, stdout: &mut impl Write) -> Result<(), CliError> {
    match command {
        Command::Create { table, description } => {
            manager::create(&table, &description)?;
            Ok(())
        }
        Command::Add {
            table,
            name,
            path,
            bare,
            remote,
        } => {
            manager::add(&table, &name, &path, bare, remote.as_deref())?;
            Ok(())
        }
        Command::AddMassive {
            table,
            files,
            nproc: n,
            remote,
        } => {
            manager::add_massive(&table, &entries_from(&files), nproc(n), remote.as_deref())?;
            Ok(())
        }
        Command::AddFromDir {
            table,
            dir,
            nproc: n,
            remote,
        } => {
            manager::add_from_dir(&table, &dir, nproc(n), remote.as_deref())?;
            Ok(())
        }
        Command::Remove {
            table,
            pattern,
            regex,
        } => {
            let removed = manager::remove(&table, &pattern, regex)?;
            writeln!(stdout, "removed {removed} entr{}", if removed == 1 { "y" } else { "ies" })
                .ok();
            Ok(())
        }
        Command::Display { table } => {
            let loaded = manager::display(&table)?;
            for entry in loaded.entries() {
                writeln!(
                    stdout,
                    "{}\t{}\t{}\t{}",
                    entry.name(),
                    entry.path(),
                    entry.marks().timestamp(),
                    entry.marks().fingerprint()
                )
                .ok();
            }
            Ok(())
        }
        Command::Update {
            table,
            register,
            nproc: n,
        } => {
            let registration = registration_for(&table, &register)?;
            let mgr = manager::Manager::with_worker_count(registration, nproc(n));
            let report = mgr.update().map_err(CliError::from)?;
            writeln!(
                stdout,
                "scheduled {} succeeded {} failed {}",
                report.scheduled,
                report.succeeded,
                report.failures.len()
            )
            .ok();
            Ok(())
        }
        Command::Replicate {
            table,
            files,
            register,
            nproc: n,
            remote,
        } => {
            let registration = registration_for(&table, &register)?;
            let report = manager::replicate(
                &registration,
                &table,
                &entries_from(&files),
                nproc(n),
                remote.as_deref(),
                nproc(n),
            )
            .map_err(CliError::from)?;
            writeln!(
                stdout,
                "scheduled {} succeeded {} failed {}",
                report.scheduled,
                report.succeeded,
                report.failures.len()
            )
            .ok();
            Ok(())
        }
    }
}

/// Parses `args`, runs the requested subcommand, and writes output to
/// `stdout`/`stderr`. Returns `0` on success and a non-zero status on any
/// error: `2` for an argument-parsing failure (matching `clap`'s own
/// convention), `1` for any other error.
pub fn run<I, T, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = write!(stderr, "{err}");
            return 2;
        }
    };

    let verbosity = logging::Verbosity::from_flags(cli.verbose, cli.quiet);
    logging::init(verbosity);

    match dispatch(cli.command, stdout) {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(stderr, "error: {err}");
            1
        }
    }
}

/// Converts the status returned by [`run`] into a process [`ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> ExitCode {
    ExitCode::from(status.clamp(0, 255) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_add_and_display_round_trip_through_the_cli() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("t.json");
        let table = table.to_str().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"hello").unwrap();

        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = run(["tablesync", "create", table], &mut out, &mut err);
        assert_eq!(status, 0, "stderr: {}", String::from_utf8_lossy(&err));

        let status = run(
            ["tablesync", "add", table, "a", file.to_str().unwrap()],
            &mut out,
            &mut err,
        );
        assert_eq!(status, 0, "stderr: {}", String::from_utf8_lossy(&err));

        out.clear();
        let status = run(["tablesync", "display", table], &mut out, &mut err);
        assert_eq!(status, 0);
        assert!(String::from_utf8_lossy(&out).contains('a'));
    }

    #[test]
    fn missing_subcommand_reports_usage_error() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = run(["tablesync"], &mut out, &mut err);
        assert_eq!(status, 2);
        assert!(!err.is_empty());
    }

    #[test]
    fn unknown_table_reports_runtime_error() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = run(
            ["tablesync", "display", "/nonexistent/dir/t.json"],
            &mut out,
            &mut err,
        );
        assert_eq!(status, 1);
        assert!(String::from_utf8_lossy(&err).starts_with("error: "));
    }
}
