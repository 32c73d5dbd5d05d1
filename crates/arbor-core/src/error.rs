pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("data file not found under any fallback prefix: {name}")]
    DataUnavailable { name: String },

    #[error("invalid data file {path}: {message}")]
    InvalidData { path: String, message: String },

    #[error(
        "link {from} -> {to} is not monotonic in time-height ({from_time} vs {to_time}); \
         roots must be earlier and shoots later than the node itself"
    )]
    NonMonotonicLink {
        from: String,
        to: String,
        from_time: f64,
        to_time: f64,
    },

    #[error("credential relations contain a cycle through {id}")]
    CyclicRelations { id: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
