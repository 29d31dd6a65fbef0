//! Translation, speech synthesis, and temporary audio handling.

pub mod error;
pub mod spool;
pub mod translate;
pub mod tts;

pub use error::{SpeechError, SpoolError};
pub use spool::AudioSpool;
pub use translate::{GoogleTranslator, Translator};
pub use tts::{chunk_text, GoogleTts, SpeechSynthesizer};
