use thiserror::Error;

/// Errors from the preferences file
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to load preferences")]
    Load(#[source] confy::ConfyError),

    #[error("failed to save preferences")]
    Save(#[source] confy::ConfyError),
}

/// Errors from the stopwatch service. Timer transitions themselves never fail.
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("a subscriber is already attached to the stopwatch")]
    SubscriberActive,

    #[error("failed to spawn ticker thread")]
    Spawn(#[source] std::io::Error),
}
