use derive_more::From;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, BoxedError>;

/// Handle of a task spawned by an [`crate::Operator`].
pub type JoinHandle<T> = tokio::task::JoinHandle<Result<T>>;

// -- Errors

#[derive(Debug, From)]
pub enum ServerError {
    #[from(ignore)]
    BindFailed(std::io::Error),

    #[from(ignore)]
    AcceptFailed(std::io::Error),

    ServingFailed(hyper::Error),
}

impl std::error::Error for ServerError {}

impl core::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
