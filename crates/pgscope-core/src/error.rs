use thiserror::Error;

/// Failures surfaced by the schema orchestrator. Nothing is retried
/// internally; retries belong to the document-source collaborator.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The document source failed mid-iteration. The run aborts; the
    /// count of documents already processed is reported so the caller can
    /// tell aborted-with-partial-state from a completed run.
    #[error("document source failed after {docs_processed} document(s): {source}")]
    Source {
        docs_processed: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl AnalyzeError {
    pub fn source_failure<E>(docs_processed: u64, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AnalyzeError::Source {
            docs_processed,
            source: Box::new(source),
        }
    }
}
