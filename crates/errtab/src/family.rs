use crate::emit::{emit_dense, emit_sparse, Layout};
use crate::entry::ErrnoEntry;
use crate::extract::{extract, Entries, Syntax};
use crate::table::ErrnoTable;
use crate::ErrtabError;
use tracing::info;

/// OS families with a known errno source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    LinuxGlibc,
    LinuxMusl,
    Android,
    Macos,
    Freebsd,
    Netbsd,
    Openbsd,
    Dragonfly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    Supported,
    /// Parsing is known to produce wrong strings; refuse instead.
    Broken(&'static str),
}

/// Static description of how to process one family.
#[derive(Debug)]
pub struct FamilyInfo {
    pub family: Family,
    pub name: &'static str,
    pub syntax: Syntax,
    pub layout: Layout,
    /// Where to browse the upstream file.
    pub source: &'static str,
    /// Direct download link, where upstream offers one.
    pub raw_source: Option<&'static str>,
    pub support: Support,
}

static FAMILIES: [FamilyInfo; 8] = [
    FamilyInfo {
        family: Family::LinuxGlibc,
        name: "linux_glibc",
        syntax: Syntax::GlibcMacro,
        layout: Layout::Sparse,
        source: "https://sourceware.org/git/?p=glibc.git;a=blob;f=sysdeps/gnu/errlist.h;h=6329e5f393edac2689e7304f04cfa81ce080242c;hb=HEAD",
        raw_source: Some("https://sourceware.org/git/?p=glibc.git;a=blob_plain;f=sysdeps/gnu/errlist.h;h=6329e5f393edac2689e7304f04cfa81ce080242c;hb=HEAD"),
        support: Support::Broken("generated strings do not match glibc's strerror"),
    },
    FamilyInfo {
        family: Family::LinuxMusl,
        name: "linux_musl",
        syntax: Syntax::MuslMacro,
        layout: Layout::Sparse,
        source: "https://git.etalabs.net/cgit/musl/tree/src/errno/__strerror.h",
        raw_source: Some("https://git.etalabs.net/cgit/musl/plain/src/errno/__strerror.h"),
        support: Support::Supported,
    },
    FamilyInfo {
        family: Family::Android,
        name: "android",
        syntax: Syntax::IndexAssignment,
        layout: Layout::Sparse,
        source: "https://android.googlesource.com/platform/bionic/+/master/libc/bionic/strerror.cpp",
        // Served base64-encoded; decode before parsing.
        raw_source: Some("https://android.googlesource.com/platform/bionic/+/master/libc/bionic/strerror.cpp?format=TEXT"),
        support: Support::Supported,
    },
    FamilyInfo {
        family: Family::Macos,
        name: "macos",
        syntax: Syntax::AnnotatedArray,
        layout: Layout::Dense,
        source: "https://opensource.apple.com/source/Libc (latest version, gen/errlst.c)",
        raw_source: None,
        support: Support::Supported,
    },
    FamilyInfo {
        family: Family::Freebsd,
        name: "freebsd",
        syntax: Syntax::AnnotatedArray,
        layout: Layout::Dense,
        source: "https://github.com/freebsd/freebsd-src/blob/main/lib/libc/gen/errlst.c",
        raw_source: Some("https://github.com/freebsd/freebsd-src/raw/main/lib/libc/gen/errlst.c"),
        support: Support::Supported,
    },
    FamilyInfo {
        family: Family::Netbsd,
        name: "netbsd",
        syntax: Syntax::AnnotatedArray,
        layout: Layout::Dense,
        source: "https://github.com/NetBSD/src/blob/trunk/lib/libc/compat/gen/compat_errlist.c",
        raw_source: Some("https://github.com/NetBSD/src/raw/trunk/lib/libc/compat/gen/compat_errlist.c"),
        support: Support::Supported,
    },
    FamilyInfo {
        family: Family::Openbsd,
        name: "openbsd",
        syntax: Syntax::AnnotatedArray,
        layout: Layout::Dense,
        source: "https://github.com/openbsd/src/blob/master/lib/libc/gen/errlist.c",
        raw_source: Some("https://github.com/openbsd/src/raw/master/lib/libc/gen/errlist.c"),
        support: Support::Supported,
    },
    FamilyInfo {
        family: Family::Dragonfly,
        name: "dragonfly",
        syntax: Syntax::AnnotatedArray,
        layout: Layout::Dense,
        source: "https://github.com/DragonFlyBSD/DragonFlyBSD/blob/master/lib/libc/gen/errlst.c",
        raw_source: Some("https://github.com/DragonFlyBSD/DragonFlyBSD/raw/master/lib/libc/gen/errlst.c"),
        support: Support::Supported,
    },
];

impl Family {
    pub const ALL: [Family; 8] = [
        Family::LinuxGlibc,
        Family::LinuxMusl,
        Family::Android,
        Family::Macos,
        Family::Freebsd,
        Family::Netbsd,
        Family::Openbsd,
        Family::Dragonfly,
    ];

    pub fn parse(name: &str) -> Result<Self, ErrtabError> {
        FAMILIES
            .iter()
            .find(|info| info.name == name)
            .map(|info| info.family)
            .ok_or_else(|| ErrtabError::UnsupportedFamily(name.to_string()))
    }

    pub fn info(&self) -> &'static FamilyInfo {
        &FAMILIES[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// File name of the generated table, e.g. `freebsd.rs`.
    pub fn output_file_name(&self) -> String {
        format!("{}.rs", self.name())
    }

    /// Resolve the extractor and emitter for this family, refusing families
    /// marked broken.
    pub fn pipeline(&self) -> Result<Pipeline, ErrtabError> {
        let info = self.info();
        match info.support {
            Support::Supported => Ok(Pipeline { info }),
            Support::Broken(reason) => Err(ErrtabError::BrokenFamily {
                family: info.name,
                reason,
            }),
        }
    }
}

/// Extractor and emitter pair for a supported family.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    info: &'static FamilyInfo,
}

impl Pipeline {
    pub fn info(&self) -> &'static FamilyInfo {
        self.info
    }

    pub fn entries<'a>(&self, text: &'a str) -> Entries<'a> {
        extract(self.info.syntax, text)
    }

    /// Aggregate numbered entries. Symbol-only sources contribute at most their
    /// literal `0` entry.
    pub fn table(&self, text: &str) -> Result<ErrnoTable, ErrtabError> {
        ErrnoTable::from_entries(self.entries(text))
    }

    /// Produce the complete generated file for `text`.
    pub fn generate(&self, text: &str) -> Result<String, ErrtabError> {
        let body = match self.info.layout {
            Layout::Sparse => {
                let entries: Vec<ErrnoEntry> = self.entries(text).collect();
                info!("{}: {} match arms", self.info.name, entries.len());
                emit_sparse(entries)?
            }
            Layout::Dense => {
                let table = self.table(text)?;
                info!(
                    "{}: {} entries, elast {}, {} gaps",
                    self.info.name,
                    table.len(),
                    table.elast().unwrap_or(0),
                    table.gaps().len()
                );
                emit_dense(&table)?
            }
        };

        Ok(format!("{}\n{body}", self.header()))
    }

    fn header(&self) -> String {
        let mut result = format!(
            "// @generated by parse-errno-table from the {} errno table.\n",
            self.info.name
        );
        result.push_str(&format!("// Source: {}\n", self.info.source));
        result.push_str(&format!(
            "// Regenerate with: parse-errno-table {} <path to source file>\n",
            self.info.name
        ));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_names() {
        for family in Family::ALL {
            assert_eq!(Family::parse(family.name()).unwrap(), family);
            assert_eq!(family.info().family, family);
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            Family::parse("windows"),
            Err(ErrtabError::UnsupportedFamily(name)) if name == "windows"
        ));
        assert!(Family::parse("FreeBSD").is_err());
    }

    #[test]
    fn test_glibc_is_rejected() {
        let err = Family::LinuxGlibc.pipeline().unwrap_err();
        assert!(matches!(
            err,
            ErrtabError::BrokenFamily {
                family: "linux_glibc",
                ..
            }
        ));
    }

    #[test]
    fn test_layouts() {
        assert_eq!(Family::LinuxMusl.info().layout, Layout::Sparse);
        assert_eq!(Family::Android.info().layout, Layout::Sparse);
        for family in [
            Family::Macos,
            Family::Freebsd,
            Family::Netbsd,
            Family::Openbsd,
            Family::Dragonfly,
        ] {
            assert_eq!(family.info().layout, Layout::Dense);
            assert_eq!(family.info().syntax, Syntax::AnnotatedArray);
        }
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(Family::Openbsd.output_file_name(), "openbsd.rs");
        assert_eq!(Family::LinuxMusl.output_file_name(), "linux_musl.rs");
    }

    #[test]
    fn test_generate_musl() {
        let pipeline = Family::LinuxMusl.pipeline().unwrap();
        let text = "E(0, \"No error information\")\nE(EPERM, \"Operation not permitted\")\n";
        let out = pipeline.generate(text).unwrap();
        assert!(out.starts_with("// @generated by parse-errno-table from the linux_musl errno table.\n"));
        assert!(out.contains("        0 => \"No error information\",\n"));
        assert!(out.contains("        libc::EPERM => \"Operation not permitted\",\n"));
        assert!(out.ends_with("        _ => \"Unknown error\",\n    }\n}\n"));
    }

    #[test]
    fn test_generate_freebsd() {
        let pipeline = Family::Freebsd.pipeline().unwrap();
        let text = "\t\"Operation not permitted\",\t/* 1 - EPERM */\n";
        let out = pipeline.generate(text).unwrap();
        assert!(out.contains("ERRNO_TABLE: [&'static str; 2]"));
        assert!(out.contains("    \"Unknown error\",\n    \"Operation not permitted\",\n];\n"));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let pipeline = Family::Openbsd.pipeline().unwrap();
        let text = "\"Undefined error: 0\",\t/* 0 - ENOERROR */\n\"Operation not permitted\",\t/* 1 - EPERM */\n";
        assert_eq!(
            pipeline.generate(text).unwrap(),
            pipeline.generate(text).unwrap()
        );
    }

    #[test]
    fn test_generate_wrong_format_is_empty_input() {
        let musl = "E(EPERM, \"Operation not permitted\")\n";
        let pipeline = Family::Freebsd.pipeline().unwrap();
        assert!(matches!(
            pipeline.generate(musl),
            Err(ErrtabError::EmptyInput)
        ));

        let pipeline = Family::Android.pipeline().unwrap();
        assert!(matches!(pipeline.generate(""), Err(ErrtabError::EmptyInput)));
    }
}
