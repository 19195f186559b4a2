// src/lib.rs

pub mod dates;
pub mod extract;
pub mod fetch;
pub mod headers;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod summary;
pub mod text;
