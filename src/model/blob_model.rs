use std::path::PathBuf;

use bytes::Bytes;

pub type BlobId = String;

/// A file received from a client, buffered by the multipart reader.
#[derive(Debug, Clone)]
pub struct Upload {
    pub original_name: String,
    pub content_type: String,
    pub content: Bytes,
}

/// Blob content as handed back by a store.
#[derive(Debug, Clone)]
pub enum BlobBody {
    Bytes(Bytes),
    /// Content lives on disk and is streamed from there.
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Blob {
    pub id: BlobId,
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub body: BlobBody,
}
