use thiserror::Error;
use yarnbook_store::{StoreError, MAX_PROJECT_IMAGES};

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Please give your pattern a title before saving.")]
    MissingTitle,

    #[error("Please choose a category before saving.")]
    MissingCategory,

    #[error("Please give the stitch a name.")]
    MissingStitchName,

    #[error("Please give the stitch a description.")]
    MissingStitchDescription,

    #[error("You must be signed in to save.")]
    SignedOut,

    #[error("A pattern can have at most {MAX_PROJECT_IMAGES} project images.")]
    TooManyImages,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Markup(#[from] yarnbook_markup::ParseError),
}
