use crate::entry::ErrnoEntry;
use crate::table::ErrnoTable;
use crate::ErrtabError;
use tracing::warn;

/// Message for any errno the table does not know.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Highest errno a dense table may span. Real tables stop near 100.
pub const MAX_DENSE_ELAST: u32 = 4095;

/// Shape of the generated lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `match` over `libc` constants, in source order, with a fallback arm.
    Sparse,
    /// Array indexed by errno, spanning `0..=elast`.
    Dense,
}

impl Layout {
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Sparse => "sparse",
            Layout::Dense => "dense",
        }
    }
}

/// What a sparse `match` arm compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Number(u32),
    Symbol(String),
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseCase {
    pub guard: Guard,
    pub message: String,
}

/// Turn raw entries into `match` arms, keeping source order.
///
/// Repeated symbols each keep their arm, so the first one wins in the
/// generated `match`. The last arm is always the single fallback.
pub fn sparse_cases<I>(entries: I) -> Result<Vec<SparseCase>, ErrtabError>
where
    I: IntoIterator<Item = ErrnoEntry>,
{
    let mut cases = Vec::new();

    for entry in entries {
        let guard = match (entry.name, entry.number) {
            (Some(name), _) => Guard::Symbol(name),
            (None, Some(number)) => Guard::Number(number),
            (None, None) => {
                warn!("dropping entry with neither name nor number: {:?}", entry.message);
                continue;
            }
        };
        cases.push(SparseCase {
            guard,
            message: entry.message,
        });
    }

    if cases.is_empty() {
        return Err(ErrtabError::EmptyInput);
    }

    cases.push(SparseCase {
        guard: Guard::Fallback,
        message: UNKNOWN_ERROR.to_string(),
    });
    Ok(cases)
}

/// Render entries as a `strerror_imp` function matching on `libc` constants.
pub fn emit_sparse<I>(entries: I) -> Result<String, ErrtabError>
where
    I: IntoIterator<Item = ErrnoEntry>,
{
    let cases = sparse_cases(entries)?;

    let mut result = String::new();
    result.push_str("#[inline]\n");
    result.push_str("pub(crate) fn strerror_imp(eno: i32) -> &'static str {\n");
    result.push_str("    match eno {\n");
    for case in &cases {
        let pattern = match &case.guard {
            Guard::Number(number) => number.to_string(),
            Guard::Symbol(name) => format!("libc::{name}"),
            Guard::Fallback => "_".to_string(),
        };
        result.push_str(&format!("        {pattern} => \"{}\",\n", case.message));
    }
    result.push_str("    }\n");
    result.push_str("}\n");

    Ok(result)
}

/// Messages for `0..=elast`, gaps filled with [`UNKNOWN_ERROR`].
pub fn dense_messages(table: &ErrnoTable) -> Result<Vec<&str>, ErrtabError> {
    let elast = table.elast().ok_or(ErrtabError::EmptyInput)?;
    if elast > MAX_DENSE_ELAST {
        return Err(ErrtabError::TableTooLarge {
            elast,
            limit: MAX_DENSE_ELAST,
        });
    }
    Ok((0..=elast)
        .map(|eno| table.get(eno).unwrap_or(UNKNOWN_ERROR))
        .collect())
}

/// Render a table as an `ERRNO_TABLE` array indexed by errno.
pub fn emit_dense(table: &ErrnoTable) -> Result<String, ErrtabError> {
    let messages = dense_messages(table)?;

    let mut result = format!(
        "pub(crate) const ERRNO_TABLE: [&'static str; {}] = [\n",
        messages.len()
    );
    for message in &messages {
        result.push_str(&format!("    \"{message}\",\n"));
    }
    result.push_str("];\n");

    Ok(result)
}
