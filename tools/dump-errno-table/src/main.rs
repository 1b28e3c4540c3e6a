use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use errtab::{dense_messages, log_level, ErrnoEntry, ErrnoTable, ErrtabError, Family, Support};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dump-errno-table",
    about = "Print the errno entries found in a vendor source file"
)]
struct Cli {
    #[arg(required_unless_present = "families")]
    os_family: Option<String>,

    #[arg(required_unless_present = "families")]
    source: Option<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    json: bool,

    /// List the known OS families and where their sources live
    #[arg(long, conflicts_with_all = ["os_family", "source", "json"])]
    families: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Dump<'a> {
    family: &'a str,
    entries: &'a [ErrnoEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<TableSummary<'a>>,
}

#[derive(Serialize)]
struct TableSummary<'a> {
    elast: u32,
    gaps: Vec<u32>,
    duplicates: &'a [u32],
    messages: Vec<&'a str>,
}

fn dump_families() {
    for family in Family::ALL {
        let info = family.info();
        let status = match info.support {
            Support::Supported => "supported".to_string(),
            Support::Broken(reason) => format!("broken ({reason})"),
        };
        println!("{:<12} {:<7} {}", info.name, info.layout.name(), status);
        println!("  {}", info.source);
        if let Some(raw) = info.raw_source {
            println!("  {raw}");
        }
    }
}

fn dump_text(family: Family, entries: &[ErrnoEntry], table: Option<&ErrnoTable>) {
    println!("{} ({}):", family.name(), family.info().syntax.name());
    for entry in entries {
        let number = entry
            .number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        let name = entry.name.as_deref().unwrap_or("");
        println!("  {number:>5}  {name:<16} \"{}\"", entry.message);
    }
    println!();

    println!("{} entries", entries.len());
    if let Some(table) = table {
        println!("elast: {}", table.elast().unwrap_or(0));
        println!("gaps: {:?}", table.gaps());
        println!("duplicates: {:?}", table.duplicates());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    if cli.families {
        dump_families();
        return Ok(());
    }

    let (Some(os_family), Some(source_path)) = (&cli.os_family, &cli.source) else {
        anyhow::bail!("missing <OS_FAMILY> or <SOURCE>");
    };

    let family = Family::parse(os_family)?;
    let pipeline = family.pipeline()?;

    let source = fs::read_to_string(source_path).map_err(|e| ErrtabError::Read {
        path: source_path.clone(),
        source: e,
    })?;
    let entries: Vec<ErrnoEntry> = pipeline.entries(&source).collect();
    if entries.is_empty() {
        return Err(ErrtabError::EmptyInput)
            .with_context(|| format!("{} is not a {} source", source_path.display(), family.name()));
    }

    let table = if family.info().syntax.is_numbered() {
        Some(ErrnoTable::from_entries(entries.iter().cloned())?)
    } else {
        None
    };

    if cli.json {
        let summary = match &table {
            Some(table) => Some(TableSummary {
                elast: table.elast().unwrap_or(0),
                gaps: table.gaps(),
                duplicates: table.duplicates(),
                messages: dense_messages(table)?,
            }),
            None => None,
        };
        let dump = Dump {
            family: family.name(),
            entries: &entries,
            table: summary,
        };
        println!("{}", serde_json::to_string_pretty(&dump)?);
    } else {
        dump_text(family, &entries, table.as_ref());
    }

    Ok(())
}
