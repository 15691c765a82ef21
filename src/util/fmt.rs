use std::fmt::{self, Debug, Formatter};

/// Writes the contained string verbatim when debug formatted, so that pre-rendered entries can be
/// placed inside of a [`DebugList`](std::fmt::DebugList).
pub struct DebugRaw(pub String);

impl Debug for DebugRaw {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Writes each item of a linked sequence in brackets, joined by `link`, like `(1) -> (2)`. An
/// empty sequence is written as `()`.
#[cfg(feature = "linked")]
pub(crate) fn write_chain<I>(f: &mut Formatter<'_>, items: I, link: &str) -> fmt::Result
where
    I: IntoIterator,
    I::Item: Debug,
{
    write!(f, "(")?;
    for (index, item) in items.into_iter().enumerate() {
        if index != 0 {
            write!(f, "){link}(")?;
        }
        write!(f, "{item:?}")?;
    }
    write!(f, ")")
}
