//! Letters domain logic

pub mod codec;
pub mod entities;
pub mod lz;
pub mod music;
