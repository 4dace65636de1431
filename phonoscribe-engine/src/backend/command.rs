//! Running external G2P programs

use crate::error::{BackendError, BackendResult};
use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Environment variable overriding the espeak-ng executable
pub const ESPEAK_PATH_ENV: &str = "PHONOSCRIBE_ESPEAK_PATH";

/// Environment variable overriding the festival executable
pub const FESTIVAL_PATH_ENV: &str = "PHONOSCRIBE_FESTIVAL_PATH";

/// Environment variable overriding the mbrola executable
pub const MBROLA_PATH_ENV: &str = "PHONOSCRIBE_MBROLA_PATH";

/// espeak-ng executable to run
pub fn espeak_program() -> String {
    std::env::var(ESPEAK_PATH_ENV).unwrap_or_else(|_| "espeak-ng".to_string())
}

/// festival executable to run
pub fn festival_program() -> String {
    std::env::var(FESTIVAL_PATH_ENV).unwrap_or_else(|_| "festival".to_string())
}

/// mbrola executable to run
pub fn mbrola_program() -> String {
    std::env::var(MBROLA_PATH_ENV).unwrap_or_else(|_| "mbrola".to_string())
}

/// Run `program` with `args`, feeding `input` on stdin, and return stdout
pub fn run(program: &str, args: &[&str], input: Option<&str>) -> BackendResult<String> {
    log::debug!("running {program} {}", args.join(" "));

    let spawn_error = |source: io::Error| BackendError::Spawn {
        program: program.to_string(),
        source,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?;

    // Feed stdin from its own thread while stdout and stderr are drained,
    // otherwise a child filling its stdout pipe blocks both sides
    let stdin = child.stdin.take();
    let (written, output) = std::thread::scope(|scope| {
        let writer = scope.spawn(move || match (input, stdin) {
            // dropping stdin closes it so the program sees end of input
            (Some(text), Some(mut stdin)) => stdin.write_all(text.as_bytes()),
            _ => Ok(()),
        });
        let output = child.wait_with_output();
        let written = writer
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
        (written, output)
    });

    let output = output.map_err(spawn_error)?;
    // the program may exit without reading all of its input
    if let Err(e) = written {
        if e.kind() != io::ErrorKind::BrokenPipe {
            return Err(spawn_error(e));
        }
    }

    if !output.status.success() {
        return Err(BackendError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout).map_err(|e| BackendError::Failed {
        program: program.to_string(),
        status: "invalid output".to_string(),
        stderr: format!("stdout is not valid UTF-8: {e}"),
    })
}

/// Returns true if `program` can be started at all
pub fn is_installed(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}
