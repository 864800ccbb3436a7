pub mod error;
pub mod key;
pub mod store;
pub mod testing;

pub use error::StateError;
pub use key::{Collection, DocKey};
pub use store::{BoundedIncrement, DocumentStore};
