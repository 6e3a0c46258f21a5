//! Handles d'accès aux playlists

mod write;

pub use write::WriteHandle;
