pub mod error;
pub mod models;
mod store;

pub use error::{Result, StoreError};
pub use models::{AlternativeView, News, NewsDetail, Paragraph, ParagraphDetail};
pub use store::NewsStore;
