use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use errtab::{generate_from_path, log_level, run};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "parse-errno-table",
    about = "Generate a strerror table from a vendor errno source file"
)]
struct Cli {
    /// linux_musl, android, macos, freebsd, netbsd, openbsd or dragonfly
    os_family: String,

    /// Path to the vendor source file for that family
    source: PathBuf,

    /// Directory that receives `<os_family>.rs`
    #[arg(long, default_value = "src/strerror")]
    out_dir: PathBuf,

    /// Print the generated table instead of writing it
    #[arg(long)]
    stdout: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    if cli.stdout {
        let (_, generated) = generate_from_path(&cli.os_family, &cli.source)
            .with_context(|| format!("failed to generate {} table", cli.os_family))?;
        print!("{generated}");
        return Ok(());
    }

    run(&cli.os_family, &cli.source, &cli.out_dir).with_context(|| {
        format!(
            "failed to generate {} table from {}",
            cli.os_family,
            cli.source.display()
        )
    })?;

    Ok(())
}
