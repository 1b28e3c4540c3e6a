use crate::entry::ErrnoEntry;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::str::Lines;
use tracing::{debug, trace, warn};

/// Largest errno a C `int` can carry.
pub const MAX_ERRNO: u32 = i32::MAX as u32;

/// Source text layouts understood by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// musl `src/errno/__strerror.h`: `E(EPERM, "Operation not permitted")`
    MuslMacro,
    /// glibc `sysdeps/gnu/errlist.h`: `_S(EPERM, N_("Operation not permitted"))`
    GlibcMacro,
    /// bionic `strerror.cpp`: `[EPERM] = "Operation not permitted",`
    IndexAssignment,
    /// BSD `errlst.c`: a string literal paired with a `/* 1 - EPERM */` comment,
    /// in either order.
    AnnotatedArray,
}

static MUSL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^E\((?P<name>0|E[A-Z0-9]+),\s*"(?P<msg>(?:[^"\\]|\\.)*)"\s*\)\s*$"#)
        .expect("musl errno pattern")
});

static GLIBC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^_S\((?P<name>0|E[A-Z0-9]+),\s*N_\(\s*"(?P<msg>(?:[^"\\]|\\.)*)"\s*\)\s*\)\s*$"#,
    )
    .expect("glibc errno pattern")
});

static INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*\[(?P<name>0|E[A-Z0-9]+)\]\s*=\s*"(?P<msg>(?:[^"\\]|\\.)*)"\s*,\s*$"#)
        .expect("bionic errno pattern")
});

// Either `"msg", /* N - NAME */` or `/* N - NAME */ "msg",`, optionally split
// across one line break.
static ANNOTATED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?m)^[ \t]*(?:"#,
        r#""(?P<msg>(?:[^"\\\n]|\\.)*)"[ \t]*,?[ \t]*(?:\r?\n[ \t]*)?"#,
        r#"/\*[ \t]*(?P<num>[0-9]+)[ \t]*-[ \t]*(?P<name>E[A-Z0-9]+)[ \t]*\*/"#,
        r#"|"#,
        r#"/\*[ \t]*(?P<num2>[0-9]+)[ \t]*-[ \t]*(?P<name2>E[A-Z0-9]+)[ \t]*\*/[ \t]*(?:\r?\n[ \t]*)?"#,
        r#""(?P<msg2>(?:[^"\\\n]|\\.)*)"[ \t]*,?"#,
        r#")[ \t]*\r?$"#,
    ))
    .expect("annotated errno pattern")
});

// A bare message line directly after a match. When a split string-first match
// is followed by one, its comment heads a comment-first unit instead.
static NEXT_MESSAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\A\r?\n[ \t]*"(?:[^"\\\n]|\\.)*"[ \t]*,?[ \t]*\r?(?:\n|\z)"#)
        .expect("next message pattern")
});

impl Syntax {
    pub fn name(&self) -> &'static str {
        match self {
            Syntax::MuslMacro => "musl macro",
            Syntax::GlibcMacro => "glibc macro",
            Syntax::IndexAssignment => "index assignment",
            Syntax::AnnotatedArray => "comment-annotated array",
        }
    }

    /// Whether the source states errno numbers, as opposed to symbols only.
    pub fn is_numbered(&self) -> bool {
        matches!(self, Syntax::AnnotatedArray)
    }

    fn line_pattern(&self) -> Option<&'static Regex> {
        match self {
            Syntax::MuslMacro => Some(Lazy::force(&MUSL_RE)),
            Syntax::GlibcMacro => Some(Lazy::force(&GLIBC_RE)),
            Syntax::IndexAssignment => Some(Lazy::force(&INDEX_RE)),
            Syntax::AnnotatedArray => None,
        }
    }
}

/// Lazily extracted entries, in the order they appear in the source.
pub struct Entries<'a> {
    source: Source<'a>,
}

enum Source<'a> {
    Lines {
        pattern: &'static Regex,
        lines: Lines<'a>,
    },
    Annotated { text: &'a str, pos: usize },
}

/// Scan `text` for errno entries written in `syntax`.
///
/// Lines or fragments that do not match are skipped: vendor files interleave
/// comments, includes and preprocessor conditionals with the table itself.
pub fn extract(syntax: Syntax, text: &str) -> Entries<'_> {
    let source = match syntax.line_pattern() {
        Some(pattern) => Source::Lines {
            pattern,
            lines: text.lines(),
        },
        None => Source::Annotated { text, pos: 0 },
    };
    Entries { source }
}

impl<'a> Iterator for Entries<'a> {
    type Item = ErrnoEntry;

    fn next(&mut self) -> Option<ErrnoEntry> {
        match &mut self.source {
            Source::Lines { pattern, lines } => {
                for line in lines.by_ref() {
                    match pattern.captures(line) {
                        Some(caps) => return Some(macro_entry(&caps)),
                        None => trace!("skipping line: {line}"),
                    }
                }
                None
            }
            Source::Annotated { text, pos } => {
                let text: &'a str = *text;
                while let Some(caps) = ANNOTATED_RE.captures_at(text, *pos) {
                    let Some(whole) = caps.get(0) else { break };
                    *pos = whole.end();

                    let split = whole.as_str().find('\n');
                    if let (Some(msg), Some(newline)) = (caps.name("msg"), split) {
                        if NEXT_MESSAGE_RE.is_match(&text[whole.end()..]) {
                            debug!("ignoring {:?}: no errno comment of its own", msg.as_str());
                            *pos = whole.start() + newline + 1;
                            continue;
                        }
                    }

                    if let Some(entry) = annotated_entry(&caps) {
                        return Some(entry);
                    }
                }
                *pos = text.len();
                None
            }
        }
    }
}

fn macro_entry(caps: &Captures) -> ErrnoEntry {
    ErrnoEntry::from_key(&caps["name"], &caps["msg"])
}

fn annotated_entry(caps: &Captures) -> Option<ErrnoEntry> {
    let (num, name, msg) = match caps.name("num") {
        Some(num) => (num.as_str(), &caps["name"], &caps["msg"]),
        None => (&caps["num2"], &caps["name2"], &caps["msg2"]),
    };

    match num.parse::<u32>() {
        Ok(number) if number <= MAX_ERRNO => Some(ErrnoEntry::numbered(number, name, msg)),
        _ => {
            warn!("ignoring {name}: errno {num} is out of range");
            None
        }
    }
}
