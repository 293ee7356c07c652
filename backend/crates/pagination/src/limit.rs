//! Page size validation.

use thiserror::Error;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_LIMIT: usize = 20;
/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Errors raised when validating a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageLimitError {
    /// A page size of zero was requested.
    #[error("limit must be at least 1")]
    Zero,
    /// The requested page size exceeds [`MAX_PAGE_LIMIT`].
    #[error("limit must be at most {max}")]
    TooLarge {
        /// Largest accepted value.
        max: usize,
    },
}

/// Validated number of records per page.
///
/// # Examples
/// ```
/// use pagination::{DEFAULT_PAGE_LIMIT, PageLimit};
///
/// assert_eq!(PageLimit::from_query(None).map(PageLimit::get), Ok(DEFAULT_PAGE_LIMIT));
/// assert!(PageLimit::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageLimit(usize);

impl PageLimit {
    /// The largest page a caller may request.
    pub const MAX: Self = Self(MAX_PAGE_LIMIT);

    /// Validate an explicit page size.
    ///
    /// # Errors
    /// Returns [`PageLimitError`] when `value` is zero or above
    /// [`MAX_PAGE_LIMIT`].
    pub const fn new(value: usize) -> Result<Self, PageLimitError> {
        if value == 0 {
            return Err(PageLimitError::Zero);
        }
        if value > MAX_PAGE_LIMIT {
            return Err(PageLimitError::TooLarge {
                max: MAX_PAGE_LIMIT,
            });
        }
        Ok(Self(value))
    }

    /// Validate an optional query parameter, defaulting when absent.
    ///
    /// # Errors
    /// Propagates [`PageLimit::new`] failures for present values.
    pub const fn from_query(value: Option<usize>) -> Result<Self, PageLimitError> {
        match value {
            Some(limit) => Self::new(limit),
            None => Ok(Self(DEFAULT_PAGE_LIMIT)),
        }
    }

    /// Page size as a plain integer.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self(DEFAULT_PAGE_LIMIT)
    }
}
