pub mod mock;
pub mod repository;
pub mod resolver;

pub use repository::DictionaryRepository;
pub use resolver::{Origin, Translation, TranslationResolver};
