//! Reading the `.proc` level description.
//!
//! Area loading only needs a typed, sequential view of the file: the
//! [`TokenStream`] trait. [`ProcLexer`] implements it over the text format and
//! additionally exposes the raw token level the scene loader uses to walk
//! sections.

mod lexer;

pub use lexer::{ProcLexer, Token};

use crate::error::Result;

/// Typed sequential reads over a level description.
///
/// Values are consumed strictly in order. Running out of input or finding a
/// value of the wrong type is a [`crate::error::ViewerError::MalformedInput`].
pub trait TokenStream {
    fn next_int(&mut self) -> Result<i32>;
    fn next_float(&mut self) -> Result<f32>;
    fn next_string(&mut self) -> Result<String>;

    /// Reads a count and rejects negative values.
    fn next_count(&mut self, what: &str) -> Result<usize> {
        let n = self.next_int()?;
        usize::try_from(n)
            .map_err(|_| crate::error::ViewerError::malformed(format!("negative {what}: {n}")))
    }
}
