pub mod error;
pub mod request;
pub mod response;
pub mod interface;
pub mod client;
pub mod factory;

pub use error::{Severity, TranslateError};
pub use request::{LanguagePair, TranslationRequest};
pub use interface::{Translator, TranslateRequest, TranslateResponse};
pub use client::APERTIUM_ENDPOINT;
pub use factory::TranslatorFactory;
