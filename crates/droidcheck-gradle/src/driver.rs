//! Gradle build driver
//!
//! [`GradleProject`] resolves the Gradle executable of a project and is the
//! production [`BuildDriver`]. [`GradleTask`] binds a task name to a driver
//! and mirrors the steps of the test run: list variants, build the command,
//! run it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use droidcheck_core::naming::uppercase_first;
use tracing::{debug, info};

use crate::error::{DriverError, Result};
use crate::parse::parse_variants;
use crate::variants::VariantSet;

/// Exit status of a finished Gradle run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Process exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl RunOutcome {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn failed(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for RunOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// A fully resolved Gradle invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleCommand {
    /// Gradle executable (wrapper path or `gradle`)
    pub program: String,
    /// Task paths followed by the extra arguments
    pub args: Vec<String>,
    /// Working directory
    pub dir: PathBuf,
    /// Extra environment for the child process
    pub env: HashMap<String, String>,
}

impl GradleCommand {
    /// Command line as it would be typed, for logging
    pub fn printable(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(quote_arg(&self.program));
        parts.extend(self.args.iter().map(|a| quote_arg(a)));
        parts.join(" ")
    }

    /// Run with inherited stdio and wait for it to exit
    ///
    /// A non-zero exit is reported through [`RunOutcome`], not as an error;
    /// only failing to start the process is an error.
    pub async fn run(&self) -> Result<RunOutcome> {
        info!(command = %self.printable(), dir = %self.dir.display(), "running gradle");

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.dir)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| DriverError::CommandFailed {
                command: self.printable(),
                exit_code: None,
                stderr: e.to_string(),
            })?;

        let outcome = RunOutcome::from(status);
        debug!(code = ?outcome.code, "gradle exited");
        Ok(outcome)
    }
}

fn quote_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
        arg.to_string()
    } else {
        format!("\"{}\"", arg.replace('"', "\\\""))
    }
}

/// The build driver capability the step needs
#[async_trait]
pub trait BuildDriver: Send + Sync {
    /// Project root the driver operates on
    fn project_dir(&self) -> &Path;

    /// Discover the variants `task` can run for
    async fn variants(&self, task: &str, args: &[String]) -> Result<VariantSet>;

    /// Build the command running `task` for every variant in `variants`
    fn command(&self, task: &str, variants: &VariantSet, args: &[String]) -> GradleCommand;

    /// Run a command built by [`BuildDriver::command`]
    async fn run(&self, command: &GradleCommand) -> Result<RunOutcome> {
        command.run().await
    }
}

/// An opened Gradle project
#[derive(Debug, Clone)]
pub struct GradleProject {
    location: PathBuf,
    gradle: String,
}

impl GradleProject {
    /// Open the project at `location`, resolving its Gradle executable
    pub fn open(location: impl Into<PathBuf>) -> Result<Self> {
        let location = location.into();
        let gradle = resolve_gradle(&location)?;
        debug!(project = %location.display(), gradle = %gradle, "opened gradle project");
        Ok(Self { location, gradle })
    }

    /// Gradle executable in use
    pub fn gradle(&self) -> &str {
        &self.gradle
    }

    /// Bind a task of this project
    pub fn task(&self, name: impl Into<String>) -> GradleTask<'_, Self> {
        GradleTask::new(self, name)
    }

    fn child_env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        // Older SDK setups only export ANDROID_SDK_ROOT
        if std::env::var("ANDROID_HOME").is_err() {
            if let Ok(sdk) = std::env::var("ANDROID_SDK_ROOT") {
                env.insert("ANDROID_HOME".to_string(), sdk);
            }
        }
        env
    }
}

#[async_trait]
impl BuildDriver for GradleProject {
    fn project_dir(&self) -> &Path {
        &self.location
    }

    async fn variants(&self, task: &str, args: &[String]) -> Result<VariantSet> {
        let mut cmd_args = vec![
            "tasks".to_string(),
            "--all".to_string(),
            "--console=plain".to_string(),
            "--quiet".to_string(),
        ];
        cmd_args.extend(args.iter().cloned());
        let printable = format!("{} {}", self.gradle, cmd_args.join(" "));
        debug!(command = %printable, "listing gradle tasks");

        let output = Command::new(&self.gradle)
            .args(&cmd_args)
            .current_dir(&self.location)
            .envs(self.child_env())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| DriverError::CommandFailed {
                command: printable.clone(),
                exit_code: None,
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(DriverError::CommandFailed {
                command: printable,
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let variants = parse_variants(task, &stdout);
        debug!(
            task,
            modules = variants.len(),
            variants = variants.variant_count(),
            "parsed variants"
        );
        Ok(variants)
    }

    fn command(&self, task: &str, variants: &VariantSet, args: &[String]) -> GradleCommand {
        let mut cmd_args = task_paths(task, variants);
        cmd_args.extend(args.iter().cloned());

        GradleCommand {
            program: self.gradle.clone(),
            args: cmd_args,
            dir: self.location.clone(),
            env: self.child_env(),
        }
    }
}

/// A task of a project, bound to the driver that runs it
pub struct GradleTask<'a, D: BuildDriver + ?Sized> {
    driver: &'a D,
    name: String,
}

impl<'a, D: BuildDriver + ?Sized> GradleTask<'a, D> {
    pub fn new(driver: &'a D, name: impl Into<String>) -> Self {
        Self {
            driver,
            name: name.into(),
        }
    }

    pub async fn variants(&self, args: &[String]) -> Result<VariantSet> {
        self.driver.variants(&self.name, args).await
    }

    pub fn command(&self, variants: &VariantSet, args: &[String]) -> GradleCommand {
        self.driver.command(&self.name, variants, args)
    }
}

/// One `<module>:<task><Variant>` task path per variant
pub fn task_paths(task: &str, variants: &VariantSet) -> Vec<String> {
    let mut paths = Vec::with_capacity(variants.variant_count());
    for (module, module_variants) in variants.iter() {
        for variant in module_variants {
            let task_name = format!("{}{}", task, uppercase_first(variant));
            if module.is_empty() {
                paths.push(task_name);
            } else {
                paths.push(format!("{}:{}", module, task_name));
            }
        }
    }
    paths
}

/// Prefer the project's wrapper, then a Gradle on PATH
fn resolve_gradle(location: &Path) -> Result<String> {
    let wrapper = if cfg!(windows) {
        location.join("gradlew.bat")
    } else {
        location.join("gradlew")
    };

    if wrapper.is_file() {
        return Ok(wrapper.to_string_lossy().to_string());
    }

    match which::which("gradle") {
        Ok(path) => Ok(path.to_string_lossy().to_string()),
        Err(_) => Err(DriverError::ToolNotFound {
            tool: "gradle".to_string(),
            install_hint: format!(
                "No Gradle wrapper at {} and no gradle on PATH",
                wrapper.display()
            ),
        }),
    }
}
