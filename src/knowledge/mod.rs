//! Documentation store — indexing markdown into vectors and searching it.
//!
//! Project knowledge lives in a vector store so an agent can pull up prior
//! write-ups before acting. Documents and their embeddings both live in
//! SQLite: one `documents` row per markdown file, one `documents_vec` (vec0)
//! row per embedding.

pub mod index;
pub mod search;
