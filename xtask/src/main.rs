use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for aperture")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt", &["--all", "--", "--check"])?;
            cargo(
                "clippy",
                &["--workspace", "--all-targets", "--", "-D", "warnings"],
            )?;
            cargo("test", &["--workspace"])?;
            cargo("doc", &["--workspace", "--no-deps"])?;
        }
        Commands::Fmt => cargo("fmt", &["--all", "--", "--check"])?,
        Commands::Clippy => cargo(
            "clippy",
            &["--workspace", "--all-targets", "--", "-D", "warnings"],
        )?,
        Commands::Test => cargo("test", &["--workspace"])?,
        Commands::Doc => cargo("doc", &["--workspace", "--no-deps"])?,
        Commands::Build => cargo("build", &["--workspace"])?,
    }

    Ok(())
}

fn cargo(subcommand: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {subcommand}");
    let status = Command::new("cargo").arg(subcommand).args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {subcommand} failed");
    }
    Ok(())
}
