//! Error types shared by the storage layer, the repository and the browser.

/// A recipe or a piece of user input that breaks a record invariant.
///
/// These are raised before anything reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field was empty after trimming.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// An ingredient search was submitted with no text.
    #[error("Please enter an ingredient to search for")]
    EmptySearch,

    /// A category label that is not one of the fixed categories.
    #[error("Unknown category '{0}'. Must be one of: Breakfast, Main Course, Dessert, Snack")]
    UnknownCategory(String),
}

/// The errors that may occur when working with the recipe store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An update or lookup targeted a recipe id that does not exist.
    ///
    /// Deleting an absent recipe is not an error, see
    /// [`crate::db::Database::delete_recipe`].
    #[error("Recipe {0} not found")]
    NotFound(i64),

    /// An export file written by a newer format than this build reads.
    #[error("Export version {found} is newer than the supported version {supported}")]
    UnsupportedVersion { found: i64, supported: i64 },

    /// The underlying SQLite call failed.
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The database handle could not be used at all, e.g. the lock was
    /// poisoned or the blocking task running the call panicked.
    #[error("Database unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
