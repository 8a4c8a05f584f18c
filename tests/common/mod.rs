#![allow(dead_code)]

//! Shared test utilities: a scripted mock runner and context builders

use airstrap::core::EnvContext;
use airstrap::runner::{CommandOutput, CommandRunner, CommandSpec, RunnerError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Mock command runner
///
/// Mutating commands are recorded and succeed unless a failure rule
/// matches. Probe-style captures answer from scripted machine state: which
/// commands resolve, which packages the dpkg database knows, and what the
/// interpreter reports.
#[derive(Clone)]
pub struct MockRunner {
    inner: Arc<Inner>,
}

struct Inner {
    runs: Mutex<Vec<String>>,
    captures: Mutex<Vec<String>>,
    python: Mutex<Option<String>>,
    present_commands: Mutex<HashSet<String>>,
    installed_packages: Mutex<HashSet<String>>,
    fail_rules: Mutex<Vec<(String, String)>>,
}

impl MockRunner {
    /// A fresh machine with a matching interpreter and nothing installed
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                runs: Mutex::new(Vec::new()),
                captures: Mutex::new(Vec::new()),
                python: Mutex::new(Some("3.10.12".to_string())),
                present_commands: Mutex::new(HashSet::new()),
                installed_packages: Mutex::new(HashSet::new()),
                fail_rules: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn set_python(&self, version: &str) {
        *self.inner.python.lock().unwrap() = Some(version.to_string());
    }

    pub fn remove_python(&self) {
        *self.inner.python.lock().unwrap() = None;
    }

    pub fn mark_command_present(&self, name: &str) {
        self.inner
            .present_commands
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    pub fn mark_package_installed(&self, package: &str) {
        self.inner
            .installed_packages
            .lock()
            .unwrap()
            .insert(package.to_string());
    }

    /// Fail any mutating command whose rendered form contains `needle`
    pub fn fail_on(&self, needle: &str, stderr: &str) {
        self.inner
            .fail_rules
            .lock()
            .unwrap()
            .push((needle.to_string(), stderr.to_string()));
    }

    /// Mutating commands, in the order they ran
    pub fn runs(&self) -> Vec<String> {
        self.inner.runs.lock().unwrap().clone()
    }

    /// Read-only captures, in the order they ran
    pub fn captures(&self) -> Vec<String> {
        self.inner.captures.lock().unwrap().clone()
    }

    pub fn ran(&self, needle: &str) -> bool {
        self.runs().iter().any(|c| c.contains(needle))
    }

    pub fn captured(&self, needle: &str) -> bool {
        self.captures().iter().any(|c| c.contains(needle))
    }

    /// Index of the first mutating command containing `needle`
    pub fn run_position(&self, needle: &str) -> Option<usize> {
        self.runs().iter().position(|c| c.contains(needle))
    }
}

fn exit_ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        code: 0,
        success: true,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

fn exit_code(code: i32) -> CommandOutput {
    CommandOutput {
        code,
        success: code == 0,
        stdout: String::new(),
        stderr: String::new(),
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, RunnerError> {
        let display = spec.to_string();
        self.inner.runs.lock().unwrap().push(display.clone());

        let rule = self
            .inner
            .fail_rules
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| display.contains(needle))
            .cloned();

        match rule {
            Some((_, stderr)) => Ok(CommandOutput {
                code: 100,
                success: false,
                stdout: String::new(),
                stderr,
            }),
            None => Ok(exit_ok("")),
        }
    }

    async fn capture(&self, spec: &CommandSpec) -> Result<CommandOutput, RunnerError> {
        let display = spec.to_string();
        self.inner.captures.lock().unwrap().push(display.clone());

        if display.contains("python3 --version") {
            return match self.inner.python.lock().unwrap().as_ref() {
                Some(version) => Ok(exit_ok(&format!("Python {}", version))),
                None => Err(RunnerError::Spawn {
                    program: "python3".to_string(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "No such file or directory",
                    ),
                }),
            };
        }

        if display.contains("command -v") {
            let present = self
                .inner
                .present_commands
                .lock()
                .unwrap()
                .iter()
                .any(|name| display.contains(&format!("command -v {}", name)));
            return Ok(exit_code(if present { 0 } else { 1 }));
        }

        if display.contains("dpkg-query") {
            let installed = self
                .inner
                .installed_packages
                .lock()
                .unwrap()
                .iter()
                .any(|package| display.contains(package.as_str()));
            return if installed {
                Ok(exit_ok("install ok installed"))
            } else {
                Ok(exit_code(1))
            };
        }

        if display.contains("--print-architecture") {
            return Ok(exit_ok("amd64"));
        }

        Ok(exit_ok(""))
    }
}

/// Environment context anchored inside a scratch directory
pub fn test_context(root: &Path) -> EnvContext {
    let home = root.join("home/pilot");
    std::fs::create_dir_all(&home).unwrap();

    EnvContext {
        user: "pilot".to_string(),
        home: home.clone(),
        system_root: root.to_path_buf(),
        codename: "jammy".to_string(),
        arch: "amd64".to_string(),
        ros_distro: "humble".to_string(),
        workspace_root: home.join("ros2_px4_ws"),
    }
}

/// Lay down every filesystem artifact of an already provisioned machine
///
/// Command-presence and package-database artifacts are scripted on the
/// mock runner by the caller.
pub fn provisioned_layout(ctx: &EnvContext) {
    let sources_dir = ctx.apt_sources_dir();
    std::fs::create_dir_all(&sources_dir).unwrap();
    std::fs::write(sources_dir.join("ros2.list"), "deb ...\n").unwrap();

    std::fs::create_dir_all(ctx.ros_root()).unwrap();
    std::fs::write(
        ctx.profile_path(),
        format!("{}\n", ctx.ros_source_line()),
    )
    .unwrap();

    std::fs::create_dir_all(ctx.px4_root()).unwrap();
    std::fs::write(ctx.qgc_path(), "appimage").unwrap();

    std::fs::create_dir_all(ctx.workspace_src().join("px4_msgs")).unwrap();
    std::fs::create_dir_all(ctx.workspace_src().join("px4_ros_com")).unwrap();
    std::fs::create_dir_all(ctx.workspace_root.join("install")).unwrap();
}
