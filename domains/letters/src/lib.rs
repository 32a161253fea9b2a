//! Letters domain: letter codec, music references, letter persistence strategies

pub mod api;
pub mod domain;
pub mod persistence;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::codec::{decode, encode, encode_with_nonce, CodecError};
pub use domain::entities::{LetterId, LetterRecord, Theme};
pub use domain::music::extract_music_reference;

pub use persistence::{
    IssuedLetter, LetterError, LetterStore, RecordLetterStore, ResolvedLetter, TokenLetterStore,
};

// Re-export repository types
pub use repository::{InMemoryLetterRepository, LetterRepository, PgLetterRepository};

// Re-export API types
pub use api::routes;
pub use api::LettersState;
