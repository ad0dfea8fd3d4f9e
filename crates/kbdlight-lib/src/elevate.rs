//! Privilege elevation: re-run this program under a helper such as `pkexec`.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Default polkit front-end.
pub const DEFAULT_HELPER: &str = "pkexec";

/// Captured result of one elevated run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevatedOutput {
    /// Exit code, `None` if terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ElevatedOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Text to show the user: stderr, else stdout, else the exit status.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("elevation helper exited with status {code}"),
            None => "elevation helper was terminated by a signal".to_string(),
        }
    }
}

impl From<Output> for ElevatedOutput {
    fn from(out: Output) -> Self {
        ElevatedOutput {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        }
    }
}

// ── Trait ──

/// Runs this program with elevated rights and the given arguments.
///
/// Blocks until the elevated process exits, which may include waiting on
/// an authentication prompt.
pub trait Elevator {
    fn run_elevated(&self, args: &[String]) -> io::Result<ElevatedOutput>;
}

/// Production elevator: `<helper> <program> <args...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperElevator {
    helper: String,
    program: PathBuf,
}

impl HelperElevator {
    pub fn new(helper: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        HelperElevator {
            helper: helper.into(),
            program: program.into(),
        }
    }

    /// Elevator that re-invokes the running executable.
    pub fn for_current_exe(helper: impl Into<String>) -> io::Result<Self> {
        Ok(Self::new(helper, std::env::current_exe()?))
    }

    pub fn helper(&self) -> &str {
        &self.helper
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.helper);
        cmd.arg(&self.program).args(args);
        cmd
    }
}

impl Elevator for HelperElevator {
    fn run_elevated(&self, args: &[String]) -> io::Result<ElevatedOutput> {
        log::info!(
            "running {} {} {}",
            self.helper,
            self.program.display(),
            args.join(" ")
        );
        let output = self.command(args).output()?;
        Ok(output.into())
    }
}

// ── Fake elevator for testing ──

/// Scripted elevator for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use std::cell::RefCell;

    use super::*;
    use crate::apply::parse_elevated_args;
    use crate::device::KeyboardBacklight;

    /// What the fake does when invoked.
    pub enum Behavior {
        /// Exit with the given code and output, touching nothing.
        Exit {
            code: Option<i32>,
            stdout: String,
            stderr: String,
        },
        /// Fail to launch, as if the helper were not installed.
        LaunchError(io::ErrorKind),
        /// Act like a successful elevated child: parse the arguments and
        /// write them to this device.
        WriteTo(KeyboardBacklight),
    }

    pub struct FakeElevator {
        behavior: Behavior,
        /// Recorded argument lists, one per invocation.
        pub calls: RefCell<Vec<Vec<String>>>,
    }

    impl FakeElevator {
        pub fn new(behavior: Behavior) -> Self {
            FakeElevator {
                behavior,
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn succeeding() -> Self {
            Self::exiting(0, "")
        }

        pub fn exiting(code: i32, stderr: &str) -> Self {
            Self::new(Behavior::Exit {
                code: Some(code),
                stdout: String::new(),
                stderr: stderr.into(),
            })
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl Elevator for FakeElevator {
        fn run_elevated(&self, args: &[String]) -> io::Result<ElevatedOutput> {
            self.calls.borrow_mut().push(args.to_vec());
            match &self.behavior {
                Behavior::Exit {
                    code,
                    stdout,
                    stderr,
                } => Ok(ElevatedOutput {
                    code: *code,
                    stdout: stdout.clone(),
                    stderr: stderr.clone(),
                }),
                Behavior::LaunchError(kind) => Err(io::Error::new(*kind, "fake helper missing")),
                Behavior::WriteTo(device) => {
                    let outcome = parse_elevated_args(args)
                        .map_err(|e| e.to_string())
                        .and_then(|state| device.write_state(&state).map_err(|e| e.to_string()));
                    Ok(match outcome {
                        Ok(()) => ElevatedOutput {
                            code: Some(0),
                            stdout: String::new(),
                            stderr: String::new(),
                        },
                        Err(msg) => ElevatedOutput {
                            code: Some(2),
                            stdout: String::new(),
                            stderr: msg,
                        },
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(code: Option<i32>, stdout: &str, stderr: &str) -> ElevatedOutput {
        ElevatedOutput {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    // ── diagnostic ──

    #[test]
    fn diagnostic_prefers_stderr() {
        let out = output(Some(1), "stdout text", "Not authorized\n");
        assert_eq!(out.diagnostic(), "Not authorized");
    }

    #[test]
    fn diagnostic_falls_back_to_stdout() {
        let out = output(Some(2), "Cannot write /x: denied\n", "  \n");
        assert_eq!(out.diagnostic(), "Cannot write /x: denied");
    }

    #[test]
    fn diagnostic_falls_back_to_status() {
        assert_eq!(
            output(Some(126), "", "").diagnostic(),
            "elevation helper exited with status 126"
        );
        assert_eq!(
            output(None, "", "").diagnostic(),
            "elevation helper was terminated by a signal"
        );
    }

    #[test]
    fn success_only_on_zero() {
        assert!(output(Some(0), "", "").success());
        assert!(!output(Some(1), "", "").success());
        assert!(!output(None, "", "").success());
    }

    // ── HelperElevator ──

    #[test]
    fn command_puts_program_before_args() {
        let e = HelperElevator::new("pkexec", "/usr/bin/kbdlight");
        let cmd = e.command(&["--set-backlight".into(), "100".into()]);
        assert_eq!(cmd.get_program(), "pkexec");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["/usr/bin/kbdlight", "--set-backlight", "100"]);
    }

    #[cfg(unix)]
    #[test]
    fn runs_helper_and_captures_output() {
        // `sh <script> args...` stands in for `pkexec <program> args...`.
        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("child.sh");
        std::fs::write(&script, "echo \"got $1\"; echo oops >&2; exit 3\n").unwrap();
        let e = HelperElevator::new("sh", &script);
        let out = e.run_elevated(&["hello".into()]).unwrap();
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stdout.trim(), "got hello");
        assert_eq!(out.diagnostic(), "oops");
    }

    #[test]
    fn missing_helper_is_launch_error() {
        let e = HelperElevator::new("kbdlight-no-such-helper", "/bin/true");
        let err = e.run_elevated(&[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn for_current_exe_resolves_program() {
        let e = HelperElevator::for_current_exe(DEFAULT_HELPER).unwrap();
        assert_eq!(e.helper(), "pkexec");
        assert!(e.program().is_absolute());
    }
}
