pub mod error;
pub mod sanitize;
pub mod service;
pub mod suggest;

pub use error::BlogError;
pub use sanitize::sanitize_html;
pub use service::{ArticleFilter, ArticleUpdate, BlogService};
pub use suggest::SuggestionService;
