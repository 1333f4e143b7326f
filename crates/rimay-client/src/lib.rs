pub mod client;
pub mod dictionary;
pub mod media;
pub mod study;

pub use client::{ApiClient, ClientConfig};
pub use media::speech_lang;
