//! Error types shared by the arithmetic engine and the drivers built on it.

use core::fmt;

/// Failure of an arithmetic operation.
///
/// Both conditions are detected before the overflowing or narrowing step is
/// performed, so a wrapped or truncated value is never observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A product or sum exceeds the width of its destination integer.
    Overflow,
    /// A computed magnitude does not fit the narrower integer required by the
    /// result, e.g. a cycle count that does not fit a 32-bit duty cycle field.
    ValueTooLarge,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Overflow => f.write_str("arithmetic overflow"),
            Error::ValueTooLarge => f.write_str("value too large for destination"),
        }
    }
}

/// An error with a static tag naming the stage it was raised in.
///
/// The wrapped error is kept unchanged and can be recovered with
/// [`Tagged::error`] or [`Tagged::into_inner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tagged<E> {
    tag: &'static str,
    error: E,
}

impl<E> Tagged<E> {
    /// Attach `tag` to `error`.
    pub const fn new(tag: &'static str, error: E) -> Self {
        Self { tag, error }
    }

    /// The stage the error was raised in, e.g. `"setup"`.
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// The wrapped error.
    pub fn error(&self) -> &E {
        &self.error
    }

    /// Drop the tag and return the wrapped error.
    pub fn into_inner(self) -> E {
        self.error
    }
}

impl<E: fmt::Display> fmt::Display for Tagged<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag, self.error)
    }
}

/// Extension for tagging the error of a [`Result`] as it propagates.
pub trait ResultExt<T, E> {
    /// Wrap the error, if any, in a [`Tagged`] carrying `tag`.
    fn tag(self, tag: &'static str) -> Result<T, Tagged<E>>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    #[inline]
    fn tag(self, tag: &'static str) -> Result<T, Tagged<E>> {
        self.map_err(|error| Tagged::new(tag, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_keeps_the_wrapped_error() {
        let result: Result<(), Error> = Err(Error::Overflow);
        let tagged = result.tag("setup").unwrap_err();
        assert_eq!(tagged.tag(), "setup");
        assert_eq!(*tagged.error(), Error::Overflow);
        assert_eq!(tagged.into_inner(), Error::Overflow);
    }

    #[test]
    fn tag_passes_success_through() {
        let result: Result<u32, Error> = Ok(7);
        assert_eq!(result.tag("setup"), Ok(7));
    }
}
