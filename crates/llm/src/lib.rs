pub mod config;
pub mod error;
pub mod generator;
pub mod http;
pub mod mock;
pub mod prompt;

pub use config::GeneratorConfig;
pub use error::GeneratorError;
pub use generator::{InsightGenerator, UploadPrompt};
pub use http::HttpInsightGenerator;
pub use mock::{FailingInsightGenerator, MockInsightGenerator};
