use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use clap::{Args, Parser, Subcommand, ValueEnum};
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "locations_lambda";
const DIST_DIR: &str = "infra/dist";

/// Every Lambda entry point. `locations_runtime` serves all routes behind a
/// single function; the rest back one route each.
const LAMBDA_BINARIES: [&str; 5] = [
    "locations_runtime",
    "create_location",
    "get_locations",
    "update_location",
    "delete_location",
];

/// A labelled `cargo` invocation.
struct CargoStep {
    label: &'static str,
    args: &'static [&'static str],
}

const LINT_STEPS: &[CargoStep] = &[
    CargoStep {
        label: "rustfmt",
        args: &["fmt", "--all", "--", "--check"],
    },
    CargoStep {
        label: "clippy",
        args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    },
];

const TEST_STEPS: &[CargoStep] = &[
    CargoStep {
        label: "locations_core tests",
        args: &["test", "-p", "locations_core"],
    },
    CargoStep {
        label: "locations_lambda tests",
        args: &["test", "-p", LAMBDA_PACKAGE],
    },
];

#[derive(Parser)]
#[command(name = "xtask", about = "CI checks and Lambda packaging for the locations API")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Run a CI job
    Ci {
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Cross-build the Lambda binaries and zip each one as `bootstrap`
    ServerlessPackage(PackageArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum CiJob {
    /// rustfmt and clippy
    Lint,
    /// Unit tests
    Test,
    /// Lint, then test
    Check,
}

#[derive(Args)]
struct PackageArgs {
    /// Target triple of the Lambda execution environment
    #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
    target: String,
    #[arg(value_enum, long, default_value_t = Profile::Release)]
    profile: Profile,
    /// Binary to package; repeat for several. Defaults to all of them.
    #[arg(long = "bin")]
    binaries: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Debug,
    Release,
}

#[derive(Debug)]
enum TaskError {
    Spawn { program: String, source: io::Error },
    Failed { command: String, code: Option<i32> },
    Usage(String),
    Io { path: PathBuf, source: io::Error },
    Zip { path: PathBuf, source: ZipError },
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { program, source } => write!(f, "could not start `{program}`: {source}"),
            Self::Failed {
                command,
                code: Some(code),
            } => write!(f, "`{command}` exited with status {code}"),
            Self::Failed { command, code: None } => write!(f, "`{command}` was terminated"),
            Self::Usage(message) => f.write_str(message),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Zip { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for TaskError {}

type TaskResult<T = ()> = Result<T, TaskError>;

fn main() -> ExitCode {
    let outcome = match Cli::parse().command {
        Task::Ci { job } => run_ci(job),
        Task::ServerlessPackage(args) => PackagePlan::from_args(args).and_then(|plan| plan.run()),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("xtask: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run_ci(job: CiJob) -> TaskResult {
    let steps: Vec<&CargoStep> = match job {
        CiJob::Lint => LINT_STEPS.iter().collect(),
        CiJob::Test => TEST_STEPS.iter().collect(),
        CiJob::Check => LINT_STEPS.iter().chain(TEST_STEPS).collect(),
    };
    for step in steps {
        banner(step.label);
        cargo(step.args)?;
    }
    eprintln!("\nci: all steps passed");
    Ok(())
}

fn banner(label: &str) {
    eprintln!("\n--- {label} ---");
}

fn cargo<S: AsRef<str>>(args: &[S]) -> TaskResult {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let command = format!("cargo {}", args.join(" "));
    eprintln!("$ {command}");

    let status = Command::new("cargo")
        .args(&args)
        .status()
        .map_err(|source| TaskError::Spawn {
            program: "cargo".to_string(),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(TaskError::Failed {
            command,
            code: status.code(),
        })
    }
}

/// What `serverless-package` builds and where the artifacts land.
struct PackagePlan {
    target: String,
    profile: Profile,
    binaries: Vec<&'static str>,
}

impl PackagePlan {
    fn from_args(args: PackageArgs) -> TaskResult<Self> {
        let binaries = if args.binaries.is_empty() {
            LAMBDA_BINARIES.to_vec()
        } else {
            args.binaries
                .iter()
                .map(|requested| known_binary(requested))
                .collect::<TaskResult<Vec<_>>>()?
        };
        Ok(Self {
            target: args.target,
            profile: args.profile,
            binaries,
        })
    }

    fn run(&self) -> TaskResult {
        require_installed_target(&self.target)?;

        banner(&format!("build {} for {}", LAMBDA_PACKAGE, self.target));
        cargo(&self.build_args())?;

        banner("zip artifacts");
        let dist = Path::new(DIST_DIR);
        fs::create_dir_all(dist).map_err(|source| TaskError::Io {
            path: dist.to_path_buf(),
            source,
        })?;
        for binary in &self.binaries {
            let archive = dist.join(format!("{binary}.zip"));
            write_bootstrap_zip(&self.artifact(binary), &archive)?;
            eprintln!("wrote {}", archive.display());
        }
        Ok(())
    }

    fn build_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["build", "-p", LAMBDA_PACKAGE, "--target", self.target.as_str()]
            .into_iter()
            .map(str::to_string)
            .collect();
        for binary in &self.binaries {
            args.push("--bin".to_string());
            args.push((*binary).to_string());
        }
        if let Profile::Release = self.profile {
            args.push("--release".to_string());
        }
        args
    }

    fn artifact(&self, binary: &str) -> PathBuf {
        let profile_dir = match self.profile {
            Profile::Debug => "debug",
            Profile::Release => "release",
        };
        let file_name = if self.target.contains("windows") {
            format!("{binary}.exe")
        } else {
            binary.to_string()
        };
        ["target", self.target.as_str(), profile_dir, file_name.as_str()]
            .iter()
            .collect()
    }
}

fn known_binary(requested: &str) -> TaskResult<&'static str> {
    LAMBDA_BINARIES
        .into_iter()
        .find(|binary| *binary == requested)
        .ok_or_else(|| {
            TaskError::Usage(format!(
                "`{requested}` is not a Lambda binary (choose from {})",
                LAMBDA_BINARIES.join(", ")
            ))
        })
}

/// Fails early with the `rustup` command to run when the target's standard
/// library is missing. Without `rustup` on PATH the check is skipped.
fn require_installed_target(target: &str) -> TaskResult {
    let output = match Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
    {
        Ok(output) => output,
        Err(error) => {
            eprintln!("note: skipping target check, rustup unavailable ({error})");
            return Ok(());
        }
    };
    if !output.status.success() {
        return Err(TaskError::Failed {
            command: "rustup target list --installed".to_string(),
            code: output.status.code(),
        });
    }

    let installed = String::from_utf8_lossy(&output.stdout);
    if installed.lines().any(|line| line.trim() == target) {
        Ok(())
    } else {
        Err(TaskError::Usage(format!(
            "target `{target}` is not installed; run `rustup target add {target}`"
        )))
    }
}

/// Lambda's `provided` runtimes execute a file named `bootstrap` at the zip
/// root.
fn write_bootstrap_zip(binary: &Path, archive: &Path) -> TaskResult {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| TaskError::Io { path, source }
    };
    let zip_error = |source| TaskError::Zip {
        path: archive.to_path_buf(),
        source,
    };

    let mut executable = File::open(binary).map_err(io_error(binary))?;
    let mut zip = ZipWriter::new(File::create(archive).map_err(io_error(archive))?);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options).map_err(zip_error)?;
    io::copy(&mut executable, &mut zip).map_err(io_error(archive))?;
    zip.finish().map_err(zip_error)?;
    Ok(())
}
