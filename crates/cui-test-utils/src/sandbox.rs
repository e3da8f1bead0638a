//! Hermetic scratch directory for running the `cui` binary in tests.
//!
//! Everything lives under an `assert_fs::TempDir` and is cleaned up on drop.
//! Commands run with colors disabled and without the caller's `RUST_LOG`, so
//! their output is stable enough to snapshot.
//!
//! ## Quick example
//! ```no_run
//! use cui_test_utils::sandbox::Sandbox;
//!
//! let mut sb = Sandbox::new();
//! sb.write("src/App.jsx", "import { Popover } from '@sumup-oss/circuit-ui';\n");
//!
//! let output = sb.snapshot_run("cui", ["migrate", "--transform", "component-names"]);
//! println!("{output}");
//! ```

use assert_fs::TempDir;
use duct::Expression;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Sandbox {
    root: TempDir,
    default_cwd: PathBuf,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    pub fn new() -> Self {
        let root = TempDir::new().expect("create sandbox TempDir");
        let default_cwd = root.path().to_path_buf();
        Self { root, default_cwd }
    }

    /// Get the current default working directory for commands.
    pub fn default_cwd(&self) -> &Path {
        &self.default_cwd
    }

    /// Set the default working directory for commands. Path is relative to sandbox root if not absolute.
    pub fn set_default_cwd<P: AsRef<Path>>(&mut self, cwd: P) -> &mut Self {
        let cwd = cwd.as_ref();
        self.default_cwd = if cwd.is_absolute() {
            cwd.to_path_buf()
        } else {
            self.root_path().join(cwd)
        };
        self
    }

    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Write/overwrite a file relative to the sandbox root.
    pub fn write<P: AsRef<Path>, S: AsRef<[u8]>>(&mut self, rel: P, contents: S) -> &mut Self {
        let p = self.root_path().join(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(p, contents).expect("write file");
        self
    }

    /// Read a file relative to the sandbox root.
    pub fn read<P: AsRef<Path>>(&self, rel: P) -> String {
        let p = self.root_path().join(rel);
        fs::read_to_string(&p).unwrap_or_else(|e| panic!("read {}: {e}", p.display()))
    }

    /// Build a `duct::Expression` for a cargo binary, pre-wired with the sandbox
    /// env and default cwd.
    pub fn cmd<I>(&self, program: &str, args: I) -> Expression
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let bin = assert_cmd::cargo::cargo_bin(program);
        let args: Vec<_> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_os_string())
            .collect();
        duct::cmd(bin, args)
            .dir(&self.default_cwd)
            .env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
            .env_remove("RUST_LOG")
    }

    /// Run a cargo binary inside this sandbox and return stdout as String.
    /// Errors if the process exits with non-zero status.
    pub fn run<I>(&self, program: &str, args: I) -> Result<String, String>
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        self.cmd(program, args)
            .read()
            .map_err(|e| format!("command failed: {e}"))
    }

    /// Run a cargo binary and render its exit code, stdout and stderr into one
    /// string, with the sandbox path replaced by `<SANDBOX>`.
    pub fn snapshot_run<I>(&self, program: &str, args: I) -> String
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let output = self
            .cmd(program, args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .expect("spawn command");

        let code = output
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let rendered = format!(
            "Exit Code: {code}\n\n--- STDOUT ---\n{stdout}\n--- STDERR ---\n{stderr}"
        );
        self.scrub(&rendered)
    }

    fn scrub(&self, text: &str) -> String {
        let mut out = text.to_string();
        let mut roots = vec![self.root_path().to_path_buf()];
        if let Ok(canonical) = self.root_path().canonicalize() {
            roots.push(canonical);
        }
        // Longest first so a canonical path that extends the raw one wins.
        roots.sort_by_key(|p| std::cmp::Reverse(p.as_os_str().len()));
        for root in roots {
            out = out.replace(&root.to_string_lossy().to_string(), "<SANDBOX>");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read() {
        let mut sb = Sandbox::new();
        sb.write("nested/dir/file.txt", "hello");
        assert_eq!(sb.read("nested/dir/file.txt"), "hello");
    }

    #[test]
    fn test_cwd_relative_to_sandbox() {
        let mut sb = Sandbox::new();
        sb.set_default_cwd("sub");
        assert_eq!(sb.default_cwd(), sb.root_path().join("sub"));
    }

    #[test]
    fn test_scrub_replaces_root() {
        let sb = Sandbox::new();
        let text = format!("{}/src/App.jsx", sb.root_path().display());
        assert_eq!(sb.scrub(&text), "<SANDBOX>/src/App.jsx");
    }
}
