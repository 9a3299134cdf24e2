#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("map document is not valid XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("map document has no `{layer}` layer")]
    MissingLayer { layer: &'static str },
    #[error("room `{raw_id}` normalizes to `{id}`, which is already taken")]
    DuplicateRoom { raw_id: String, id: String },
    #[error("floor plan has already been enhanced")]
    AlreadyEnhanced,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
