pub mod dictionary;
pub mod errors;
pub mod format;
pub mod lang;
pub mod models;
pub mod source;
pub mod substitute;

pub use dictionary::Dictionary;
pub use errors::{ApiError, TranslateError};
pub use lang::{Direction, Language};
pub use source::{DictionarySource, RemoteTranslation, RemoteTranslator};
