use crate::config::SchemaOptions;
use crate::error::AnalyzeError;
use crate::filter::FieldFilter;
use crate::finalize::{SchemaReport, finalize_all};
use crate::stats::Aggregation;
use crate::walker::{WalkConfig, accumulate};
use serde_json::Value;

/// Drives the map/merge/finalize pipeline over a stream of documents.
///
/// `ingest` is the sequential shape; a parallel caller can instead run
/// [`accumulate`] per document on any number of workers, fold partials
/// with [`Aggregation::merge`], and hand the combined partial to `absorb`.
/// Either way the result is identical.
pub struct SchemaAnalyzer {
    walk: WalkConfig,
    filter: FieldFilter,
    result: Aggregation,
}

impl SchemaAnalyzer {
    pub fn new(options: &SchemaOptions) -> Self {
        Self {
            walk: options.walk_config(),
            filter: options.field_filter(),
            result: Aggregation::new(),
        }
    }

    /// Map one document and merge its local stats into the running total.
    pub fn ingest(&mut self, doc: &Value) {
        let local = accumulate(doc, &self.walk, &self.filter);
        self.result.absorb_local(local);
    }

    /// Merge a partial aggregation produced elsewhere (another worker,
    /// another partition) into the running total.
    pub fn absorb(&mut self, partial: Aggregation) {
        self.result.merge(partial);
    }

    /// Accumulate one partition of documents into a standalone partial,
    /// using this analyzer's configuration but none of its state.
    pub fn accumulate_partition<'a, I>(&self, docs: I) -> Aggregation
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut partial = Aggregation::new();
        for doc in docs {
            partial.absorb_local(accumulate(doc, &self.walk, &self.filter));
        }
        partial
    }

    pub fn docs_sampled(&self) -> u64 {
        self.result.docs_sampled
    }

    /// Consume the analyzer and finalize every path. The aggregation is
    /// used exactly once; a new run starts from a fresh analyzer.
    pub fn finish(self) -> SchemaReport {
        finalize_all(&self.result)
    }

    /// Hand back the raw merged aggregation instead of finalizing, for
    /// callers that want to keep merging.
    pub fn into_aggregation(self) -> Aggregation {
        self.result
    }
}

/// Run a whole analysis: draw up to the configured limit from the source
/// iterator, accumulate and merge each document, finalize.
///
/// `docs_sampled` is fixed to however many documents were actually drawn,
/// so a source that runs dry early is not an error. A source failure
/// aborts immediately and reports how far the run got.
pub fn analyze<I, E>(options: &SchemaOptions, docs: I) -> Result<SchemaReport, AnalyzeError>
where
    I: IntoIterator<Item = Result<Value, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut analyzer = SchemaAnalyzer::new(options);
    let limit = options.effective_limit();

    // The cap is checked before drawing, so the source is pulled exactly
    // once per retained document and never past the limit
    let mut docs = docs.into_iter();
    while limit.is_none_or(|cap| analyzer.docs_sampled() < cap) {
        let Some(item) = docs.next() else {
            break;
        };
        match item {
            Ok(doc) => analyzer.ingest(&doc),
            Err(e) => return Err(AnalyzeError::source_failure(analyzer.docs_sampled(), e)),
        }
    }

    Ok(analyzer.finish())
}
