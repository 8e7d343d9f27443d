use thiserror::Error;
use yarnbook_store::StoreError;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("You must be signed in for this.")]
    SignedOut,

    #[error(transparent)]
    Store(#[from] StoreError),
}
