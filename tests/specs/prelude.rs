//! Shared helpers for the workspace specs.

use assert_cmd::Command;

/// Start building a `gantry` invocation.
pub fn cli() -> SpecCmd {
    SpecCmd { cmd: Command::cargo_bin("gantry").expect("gantry binary builds") }
}

pub struct SpecCmd {
    cmd: Command,
}

impl SpecCmd {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Run and require exit code 0.
    pub fn passes(mut self) -> SpecOutput {
        let output = self.cmd.output().expect("command runs");
        assert!(
            output.status.success(),
            "expected success, got {:?}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr),
        );
        SpecOutput::from(output)
    }

    /// Run and require the given nonzero exit code.
    pub fn fails_with(mut self, code: i32) -> SpecOutput {
        let output = self.cmd.output().expect("command runs");
        assert_eq!(
            output.status.code(),
            Some(code),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr),
        );
        SpecOutput::from(output)
    }
}

pub struct SpecOutput {
    stdout: String,
    stderr: String,
}

impl From<std::process::Output> for SpecOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl SpecOutput {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing '{needle}':\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing '{needle}':\n{}", self.stderr);
        self
    }
}
