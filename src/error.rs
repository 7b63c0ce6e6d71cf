use alloc::{boxed::Box, string::ToString, sync::Arc};

/// An error that can occur in this crate.
///
/// Only two classes of operations can fail: loading a time zone (an unknown
/// name, or malformed rule data) and parsing a datetime string. Everything
/// else, including the resolution of ambiguous civil times, is total and
/// reports its outcome as data rather than as an error.
///
/// This crate follows the "one error type" pattern: a single opaque error
/// value is used everywhere, with limited introspection. The
/// [`Error::is_load`] and [`Error::is_parse`] predicates report which class
/// an error belongs to.
///
/// The `Display` implementation writes the full chain of context, from the
/// outermost message down to the root cause.
#[derive(Clone)]
pub struct Error {
    /// The internal representation of an error.
    ///
    /// An `Arc` makes cloning cheap and keeps the size of `Error` to one
    /// word, which in turn keeps `Result<T, Error>` small for the common
    /// `T`s in this crate.
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    message: Box<str>,
    cause: Option<Error>,
}

/// The class of failure an error represents.
///
/// `Adhoc` is used for errors created inside the crate before they cross a
/// public boundary; the fallible entry points re-tag their errors with `Load`
/// or `Parse` as appropriate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ErrorKind {
    Adhoc,
    Load,
    Parse,
}

impl Error {
    /// Creates a new ad hoc error value from `core::fmt::Arguments`.
    ///
    /// Callers should generally use the `err!` macro instead of calling this
    /// directly.
    pub(crate) fn adhoc(message: core::fmt::Arguments<'_>) -> Error {
        Error::new(ErrorKind::Adhoc, message)
    }

    fn new(kind: ErrorKind, message: core::fmt::Arguments<'_>) -> Error {
        let message = match message.as_str() {
            Some(literal) => Box::from(literal),
            None => message.to_string().into_boxed_str(),
        };
        Error { inner: Arc::new(ErrorInner { kind, message, cause: None }) }
    }

    /// Re-tags this error as a time zone loading failure.
    ///
    /// This is called at the public boundary of the fallible zone
    /// constructors so that callers can distinguish the error class without
    /// the internal code threading a kind through every call site.
    pub(crate) fn load(self) -> Error {
        self.retag(ErrorKind::Load)
    }

    /// Re-tags this error as a datetime parsing failure.
    pub(crate) fn parse(self) -> Error {
        self.retag(ErrorKind::Parse)
    }

    fn retag(self, kind: ErrorKind) -> Error {
        match Arc::try_unwrap(self.inner) {
            Ok(mut inner) => {
                inner.kind = kind;
                Error { inner: Arc::new(inner) }
            }
            Err(inner) => Error {
                inner: Arc::new(ErrorInner {
                    kind,
                    message: inner.message.clone(),
                    cause: inner.cause.clone(),
                }),
            },
        }
    }

    /// Returns true when this error came from loading time zone rule data,
    /// e.g. an unknown zone name or malformed TZif bytes.
    pub fn is_load(&self) -> bool {
        self.inner.kind == ErrorKind::Load
    }

    /// Returns true when this error came from parsing a datetime string.
    pub fn is_parse(&self) -> bool {
        self.inner.kind == ErrorKind::Parse
    }

    /// Attaches `consequent` as the outer layer of context on this error.
    ///
    /// The outer error keeps the kind of `self` so that re-tagging at the
    /// public boundary composes with context attached along the way.
    pub(crate) fn context(self, consequent: Error) -> Error {
        let kind = self.inner.kind;
        Error {
            inner: Arc::new(ErrorInner {
                kind,
                message: consequent.inner.message.clone(),
                cause: Some(self),
            }),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut err = self;
        write!(f, "{}", err.inner.message)?;
        while let Some(ref cause) = err.inner.cause {
            write!(f, ": {}", cause.inner.message)?;
            err = cause;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("message", &self.inner.message)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Creates a new ad hoc error with no causal chain.
///
/// This accepts the same arguments as the `format!` macro. The error it
/// creates is meant to be attached to a class (load or parse) at the public
/// boundary it eventually escapes through.
macro_rules! err {
    ($($tt:tt)*) => {{
        crate::error::Error::adhoc(format_args!($($tt)*))
    }}
}

pub(crate) use err;

/// A simple trait to encapsulate adding context to an error.
pub(crate) trait ErrorContext {
    /// Attaches the given error as the outer context of this result's error.
    fn context(self, consequent: Error) -> Self;

    /// Like `context`, but builds the contextual error lazily. Use this when
    /// rendering the message itself allocates.
    fn with_context<F: FnOnce() -> Error>(self, consequent: F) -> Self;
}

impl<T> ErrorContext for Result<T, Error> {
    fn context(self, consequent: Error) -> Result<T, Error> {
        self.map_err(|err| err.context(consequent))
    }

    fn with_context<F: FnOnce() -> Error>(
        self,
        consequent: F,
    ) -> Result<T, Error> {
        self.map_err(|err| err.context(consequent()))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_chains_context() {
        let err = err!("invalid magic")
            .context(err!("failed to parse rule data"))
            .context(err!("failed to load time zone \"Bad/Zone\""));
        assert_eq!(
            err.to_string(),
            "failed to load time zone \"Bad/Zone\": \
             failed to parse rule data: invalid magic",
        );
    }

    #[test]
    fn retag_survives_context() {
        let err = err!("oops").context(err!("outer")).load();
        assert!(err.is_load());
        assert!(!err.is_parse());
    }

    // The size of an error matters a fair bit since `Result<T, Error>` is
    // returned from the zone constructors and the string parser.
    #[test]
    fn error_is_one_word() {
        assert_eq!(
            core::mem::size_of::<Error>(),
            core::mem::size_of::<usize>(),
        );
    }
}
