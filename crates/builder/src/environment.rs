//! Build environment: flag synthesis and command execution

use nutforge_errors::{BuildError, Error};
use nutforge_events::{AppEvent, BuildEvent, EventEmitter, EventSender};
use nutforge_resolver::{DependencyLocation, Resolution};
use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variables the build inherits from the caller
const INHERITED_VARS: &[&str] = &[
    "PATH", "HOME", "USER", "SHELL", "TERM", "LANG", "LC_ALL", "TMPDIR", "CFLAGS", "CPPFLAGS",
    "LDFLAGS",
];

/// Captured output of one build tool invocation
#[derive(Debug, Clone)]
pub struct BuildCommandResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Build environment for one source tree
pub struct BuildEnvironment {
    env_vars: HashMap<String, String>,
    source_dir: PathBuf,
    tx: EventSender,
}

impl BuildEnvironment {
    /// Create an environment seeded from the calling process's environment
    #[must_use]
    pub fn new(source_dir: PathBuf, tx: EventSender) -> Self {
        let mut base = HashMap::new();
        for var in INHERITED_VARS {
            if let Ok(value) = std::env::var(var) {
                base.insert((*var).to_string(), value);
            }
        }
        Self::with_base_env(source_dir, base, tx)
    }

    /// Create an environment with an explicit base (testing hook)
    #[must_use]
    pub fn with_base_env(
        source_dir: PathBuf,
        base: HashMap<String, String>,
        tx: EventSender,
    ) -> Self {
        Self {
            env_vars: base,
            source_dir,
            tx,
        }
    }

    /// Append resolver-derived flags to the compiler/linker variables
    ///
    /// Existing caller flags always come first and are never replaced, so on
    /// conflicting duplicate flags the caller's values win per toolchain
    /// convention. Resolved tools are prepended to `PATH`.
    pub fn inject_dependencies(&mut self, resolution: &Resolution) {
        for dep in resolution.libraries() {
            let DependencyLocation::Library {
                include_dir,
                lib_dir,
            } = &dep.location
            else {
                continue;
            };

            let include_flag = format!("-I{}", include_dir.display());
            self.append_var("CFLAGS", &include_flag);
            self.append_var("CPPFLAGS", &include_flag);
            self.append_var(
                "LDFLAGS",
                &format!("-L{} -l{}", lib_dir.display(), dep.link_name),
            );
        }

        for dep in resolution.tools() {
            let DependencyLocation::Tool { path } = &dep.location else {
                continue;
            };
            if let Some(bin_dir) = path.parent() {
                self.prepend_path(&bin_dir.display().to_string());
            }
        }
    }

    /// Append a space-separated value to a variable, keeping what is there
    fn append_var(&mut self, key: &str, value: &str) {
        let current = self.env_vars.get(key).cloned().unwrap_or_default();
        let new = if current.is_empty() {
            value.to_string()
        } else {
            format!("{current} {value}")
        };
        self.env_vars.insert(key.to_string(), new);
    }

    /// Prepend a directory to `PATH`
    fn prepend_path(&mut self, dir: &str) {
        let current = self.env_vars.get("PATH").cloned().unwrap_or_default();
        let new = if current.is_empty() {
            dir.to_string()
        } else {
            format!("{dir}:{current}")
        };
        self.env_vars.insert("PATH".to_string(), new);
    }

    /// The synthesized environment
    #[must_use]
    pub fn env_vars(&self) -> &HashMap<String, String> {
        &self.env_vars
    }

    /// The source tree this environment builds in
    #[must_use]
    pub fn source_dir(&self) -> &std::path::Path {
        &self.source_dir
    }

    /// Execute a command in the build environment, capturing output
    ///
    /// # Errors
    ///
    /// Returns `BuildError::ToolNotFound` if the program cannot be spawned
    /// and `BuildError::Failed` for other launch failures. A non-zero exit
    /// is reported through the result, not as an error, so the caller can
    /// attach context.
    pub async fn execute_command(
        &self,
        program: &str,
        args: &[&str],
    ) -> Result<BuildCommandResult, Error> {
        self.tx.emit(AppEvent::Build(BuildEvent::CommandStarted {
            command: format!("{program} {}", args.join(" ")),
            working_dir: self.source_dir.clone(),
        }));

        let output = tokio::process::Command::new(program)
            .args(args)
            .envs(&self.env_vars)
            .current_dir(&self.source_dir)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BuildError::ToolNotFound {
                        tool: program.to_string(),
                    }
                } else {
                    BuildError::Failed {
                        message: format!("{program}: {e}"),
                    }
                }
            })?;

        let result = BuildCommandResult {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        self.tx.emit(AppEvent::Build(BuildEvent::CommandCompleted {
            command: format!("{program} {}", args.join(" ")),
            exit_code: result.exit_code.unwrap_or(-1),
        }));

        Ok(result)
    }
}
