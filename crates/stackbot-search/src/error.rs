use stackbot_engine::PieceKind;

/// Failure of a best-move search.
///
/// Placements that cannot be performed are not errors: they become invalid candidates (see
/// [`InvalidPlacement`](crate::InvalidPlacement)) and rank last.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SearchError {
    /// The weight vector does not line up with the heuristic feature vector.
    #[display("weight vector has {actual} entries, but fields have {expected} heuristic features")]
    ConfigurationMismatch { expected: usize, actual: usize },
    /// A weight is NaN or infinite.
    #[display("weight {index} is not a finite number")]
    NonFiniteWeight { index: usize },
    /// The piece has no placement that can be performed on the field.
    #[display("no legal placement exists for piece {piece}")]
    EmptyEnumeration { piece: PieceKind },
    /// Training mode is enabled but the caller did not supply weights.
    #[display("training mode requires a weight vector on every call")]
    MissingTrainingWeights,
    /// The worker pool could not be started.
    #[display("failed to build worker pool: {_0}")]
    ThreadPool(#[error(source)] rayon::ThreadPoolBuildError),
}
