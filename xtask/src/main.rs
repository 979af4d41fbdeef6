use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "visit_counter_lambda";
const LAMBDA_BIN: &str = "counter_lambda";

#[derive(Parser)]
#[command(name = "xtask", about = "Task runner for the visit counter workspace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Formatting, clippy, and tests for every workspace crate
    Ci,
    /// Build `counter_lambda` and zip it as a `provided.al2023` bootstrap
    ServerlessPackage {
        /// Linux target triple of the Lambda architecture
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        #[arg(value_enum, long, default_value_t = Profile::Release)]
        profile: Profile,
        /// Directory receiving `counter.zip`
        #[arg(long, default_value = "target/lambda")]
        dist_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Debug,
    Release,
}

fn cargo(args: &[&str]) {
    eprintln!("+ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo");
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn ci() {
    cargo(&["fmt", "--all", "--", "--check"]);
    cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]);
    cargo(&["test", "--workspace"]);
}

fn serverless_package(target: &str, profile: Profile, dist_dir: &Path) {
    let mut args = vec!["build", "-p", LAMBDA_PACKAGE, "--bin", LAMBDA_BIN, "--target", target];
    let profile_dir = match profile {
        Profile::Debug => "debug",
        Profile::Release => {
            args.push("--release");
            "release"
        }
    };
    cargo(&args);

    let binary_path = Path::new("target")
        .join(target)
        .join(profile_dir)
        .join(LAMBDA_BIN);
    let binary = fs::read(&binary_path)
        .unwrap_or_else(|error| panic!("failed to read {}: {error}", binary_path.display()));

    fs::create_dir_all(dist_dir).expect("failed to create dist directory");
    let zip_path = dist_dir.join("counter.zip");
    let mut zip = ZipWriter::new(fs::File::create(&zip_path).expect("failed to create zip"));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)
        .expect("failed to start bootstrap entry");
    zip.write_all(&binary).expect("failed to write bootstrap entry");
    zip.finish().expect("failed to finish zip");

    eprintln!("packaged {}", zip_path.display());
}

fn main() {
    match Cli::parse().command {
        Commands::Ci => ci(),
        Commands::ServerlessPackage {
            target,
            profile,
            dist_dir,
        } => serverless_package(&target, profile, &dist_dir),
    }
}
