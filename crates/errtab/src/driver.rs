use crate::family::Family;
use crate::output::write_generated;
use crate::ErrtabError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

/// Resolve `family_name`, then read and convert `source`.
///
/// The family is checked before the source is opened, and nothing is
/// written.
pub fn generate_from_path(
    family_name: &str,
    source: &Path,
) -> Result<(Family, String), ErrtabError> {
    let family = Family::parse(family_name)?;
    let pipeline = family.pipeline()?;

    let text = fs::read_to_string(source).map_err(|e| ErrtabError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;
    let generated = pipeline.generate(&text)?;

    Ok((family, generated))
}

/// Generate the table for `family_name` from `source` into
/// `<out_dir>/<family>.rs`. On any error the destination is left as it was.
pub fn run(family_name: &str, source: &Path, out_dir: &Path) -> Result<PathBuf, ErrtabError> {
    let (family, generated) = generate_from_path(family_name, source)?;
    let path = write_generated(out_dir, family, &generated)?;
    info!("wrote {}", path.display());
    Ok(path)
}

/// Log level for a `-v` count: none warns, then info, debug, trace.
pub fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FREEBSD: &str = "\t\"Undefined error: 0\",\t/* 0 - ENOERROR */\n\
\t\"Operation not permitted\",\t/* 1 - EPERM */\n";

    fn dir_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_run_writes_table() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let source = src.path().join("errlst.c");
        fs::write(&source, FREEBSD).unwrap();

        let path = run("freebsd", &source, out.path()).unwrap();
        assert_eq!(path, out.path().join("freebsd.rs"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("ERRNO_TABLE: [&'static str; 2]"));

        // Same input, same bytes.
        run("freebsd", &source, out.path()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), written);
    }

    #[test]
    fn test_run_failure_leaves_existing_table() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let existing = out.path().join("freebsd.rs");
        fs::write(&existing, "previous table\n").unwrap();

        let empty = src.path().join("empty.c");
        fs::write(&empty, "").unwrap();
        let musl = src.path().join("__strerror.h");
        fs::write(&musl, "E(EPERM, \"Operation not permitted\")\n").unwrap();

        for source in [&empty, &musl] {
            assert!(matches!(
                run("freebsd", source, out.path()),
                Err(ErrtabError::EmptyInput)
            ));
            assert_eq!(fs::read_to_string(&existing).unwrap(), "previous table\n");
            assert_eq!(dir_names(out.path()), vec!["freebsd.rs"]);
        }
    }

    #[test]
    fn test_run_empty_input_creates_nothing() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let empty = src.path().join("strerror.cpp");
        fs::write(&empty, "").unwrap();

        assert!(matches!(
            run("android", &empty, out.path()),
            Err(ErrtabError::EmptyInput)
        ));
        assert!(dir_names(out.path()).is_empty());
    }

    #[test]
    fn test_family_checked_before_source_is_read() {
        let out = TempDir::new().unwrap();
        let missing = out.path().join("does-not-exist.c");

        assert!(matches!(
            run("windows", &missing, out.path()),
            Err(ErrtabError::UnsupportedFamily(_))
        ));
        assert!(matches!(
            run("linux_glibc", &missing, out.path()),
            Err(ErrtabError::BrokenFamily { .. })
        ));
        assert!(matches!(
            run("freebsd", &missing, out.path()),
            Err(ErrtabError::Read { .. })
        ));
        assert!(dir_names(out.path()).is_empty());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), Level::WARN);
        assert_eq!(log_level(1), Level::INFO);
        assert_eq!(log_level(2), Level::DEBUG);
        assert_eq!(log_level(3), Level::TRACE);
        assert_eq!(log_level(9), Level::TRACE);
    }
}
