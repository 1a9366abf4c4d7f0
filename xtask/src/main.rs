use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use naming_guard_core::contract::UploadEvent;
use naming_guard_core::decision::{evaluate, Verdict};
use naming_guard_core::naming::{NamingRule, DEFAULT_NAMING_PATTERN};
use naming_guard_core::storage_keys::{normalize_quarantine_prefix, DEFAULT_QUARANTINE_PREFIX};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the upload naming guard workspace",
    long_about = "A unified CLI for CI checks, Lambda packaging, and offline\n\
                  naming-convention checks in the naming guard workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build and package the validator Lambda as a `bootstrap` zip
    LambdaPackage {
        /// Compilation target triple for the Lambda binary
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for the binary
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
        /// Directory receiving `naming_validator.zip`
        #[arg(long, default_value = "dist")]
        output_dir: String,
    },
    /// Show what the validator would do with the given object keys
    CheckName {
        /// Object keys to classify
        #[arg(required = true)]
        names: Vec<String>,
        /// Compliance pattern
        #[arg(long, env = "NAMING_PATTERN", default_value = DEFAULT_NAMING_PATTERN)]
        pattern: String,
        /// Quarantine prefix
        #[arg(long, env = "QUARANTINE_PREFIX", default_value = DEFAULT_QUARANTINE_PREFIX)]
        prefix: String,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Lint,
    /// Workspace tests
    Test,
    /// Lint + test
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn package_validator_lambda(target: &str, profile: BuildProfile, output_dir: &str) {
    ensure_rust_target_installed(target);

    step("Build naming validator binary");

    let mut cargo_args = vec![
        "build",
        "-p",
        "naming_guard_lambda",
        "--target",
        target,
        "--bin",
        "naming_validator",
    ];
    if let Some(flag) = profile.as_cargo_flag() {
        cargo_args.push(flag);
    }
    run_cargo(&cargo_args);

    step("Package lambda zip artifact");
    let target_dir = Path::new("target").join(target).join(profile.dir_name());
    let dist_dir = Path::new(output_dir);
    fs::create_dir_all(dist_dir).expect("failed to create lambda dist directory");

    let zip_path = dist_dir.join("naming_validator.zip");
    package_lambda_zip(
        &target_dir.join(binary_name("naming_validator", target)),
        &zip_path,
    );

    eprintln!("\nPackaged artifact:\n- {}", zip_path.display());
}

fn ensure_rust_target_installed(target: &str) {
    let output = Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output();

    let output = match output {
        Ok(value) => value,
        Err(error) => {
            eprintln!(
                "warning: failed to run `rustup target list --installed` ({error}); continuing without target preflight"
            );
            return;
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "failed to list installed rust targets; run `rustup target list --installed` manually. details: {}",
            stderr.trim()
        );
    }

    let installed = String::from_utf8_lossy(&output.stdout);
    if !installed.lines().any(|line| line.trim() == target) {
        panic!(
            "required rust target `{target}` is not installed. install it with `rustup target add {target}` and re-run `cargo run -p xtask -- lambda-package`"
        );
    }
}

fn binary_name(bin_name: &str, target: &str) -> String {
    if target.contains("windows") {
        format!("{bin_name}.exe")
    } else {
        bin_name.to_string()
    }
}

fn package_lambda_zip(binary_path: &Path, zip_path: &Path) {
    if !binary_path.exists() {
        panic!("expected lambda binary at '{}'", binary_path.display());
    }

    let binary = fs::read(binary_path).expect("failed to read lambda binary");
    let file = fs::File::create(zip_path).expect("failed to create lambda zip");
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)
        .expect("failed to start bootstrap entry in lambda zip");
    zip.write_all(&binary)
        .expect("failed to write bootstrap entry");
    zip.finish().expect("failed to finish lambda zip");
}

// ── name checks ────────────────────────────────────────────────────

/// Returns the number of keys that would be quarantined.
fn check_names(names: &[String], pattern: &str, prefix: &str) -> usize {
    let rule = NamingRule::new(pattern).unwrap_or_else(|error| {
        eprintln!("error: {error}");
        exit(2);
    });
    let prefix = normalize_quarantine_prefix(prefix).unwrap_or_else(|error| {
        eprintln!("error: {error}");
        exit(2);
    });

    let mut violations = 0;
    for name in names {
        let verdict = evaluate(&UploadEvent::new("local", name.as_str()), &rule, &prefix);
        match verdict {
            Verdict::Excluded { reason } => println!("skip        {name} ({})", reason.as_str()),
            Verdict::Compliant => println!("compliant   {name}"),
            Verdict::Quarantine { target_key } => {
                violations += 1;
                println!("quarantine  {name} -> {target_key}");
            }
        }
    }
    violations
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_lint() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);
}

fn ci_test() {
    step("Test naming_guard_core");
    run_cargo(&["test", "-p", "naming_guard_core"]);

    step("Test naming_guard_lambda");
    run_cargo(&["test", "-p", "naming_guard_lambda"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { job } => {
            match job {
                CiJob::Lint => ci_lint(),
                CiJob::Test => ci_test(),
                CiJob::Check => {
                    ci_lint();
                    ci_test();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LambdaPackage {
            target,
            profile,
            output_dir,
        } => {
            package_validator_lambda(&target, profile, &output_dir);
        }
        Commands::CheckName {
            names,
            pattern,
            prefix,
        } => {
            if check_names(&names, &pattern, &prefix) > 0 {
                exit(1);
            }
        }
    }
}
