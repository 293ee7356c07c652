//! Opaque cursor and page limit primitives shared by list endpoints.
//!
//! List endpoints hand callers a continuation token that encodes wherever
//! the underlying store stopped reading. Callers must treat the token as
//! opaque: they echo it back verbatim to resume and never construct one.
//!
//! Public surface:
//! - [`Cursor`] wraps a serialisable store key and converts it to and from
//!   a URL-safe token.
//! - [`PageLimit`] validates caller supplied page sizes.

mod cursor;
mod limit;

pub use cursor::{Cursor, CursorError};
pub use limit::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, PageLimit, PageLimitError};
