use crate::catalog::{count_documents, quote_identifier};
use futures::TryStreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use sqlx::PgPool;

/// Sequential document source over one `schema.table.column`.
///
/// Exposes the two things the orchestrator needs from a collaborator: a
/// count of available documents and one-at-a-time iteration. Row order is
/// whatever the database returns; nothing here depends on it.
pub struct JsonbSource {
    schema: String,
    table: String,
    column: String,
    show_progress: bool,
}

impl JsonbSource {
    pub fn new(schema: &str, table: &str, column: &str) -> Self {
        Self {
            schema: schema.to_string(),
            table: table.to_string(),
            column: column.to_string(),
            show_progress: true,
        }
    }

    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Exact number of non-null documents available.
    pub async fn total(&self, pool: &PgPool) -> Result<u64, sqlx::Error> {
        let count = count_documents(pool, &self.schema, &self.table, &self.column).await?;
        Ok(count.max(0) as u64)
    }

    fn build_query(&self, limit: Option<u64>) -> String {
        let column = quote_identifier(&self.column);
        let mut query = format!(
            "SELECT {} FROM {}.{} WHERE {} IS NOT NULL",
            column,
            quote_identifier(&self.schema),
            quote_identifier(&self.table),
            column
        );
        if let Some(limit) = limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }
        query
    }

    /// Stream up to `limit` documents (all when `None`). The source may
    /// yield fewer than requested; that is not an error.
    pub async fn fetch(&self, pool: &PgPool, limit: Option<u64>) -> Result<Vec<Value>, sqlx::Error> {
        let query = self.build_query(limit);

        let progress = if self.show_progress {
            let pb = match limit {
                Some(n) => {
                    let pb = ProgressBar::new(n);
                    pb.set_style(
                        ProgressStyle::default_bar()
                            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} documents")
                            .expect("Invalid progress bar template")
                            .progress_chars("█▓▒░"),
                    );
                    pb
                }
                None => ProgressBar::new_spinner(),
            };
            Some(pb)
        } else {
            None
        };

        let mut documents = Vec::new();
        let mut rows = sqlx::query_scalar::<_, Value>(&query).fetch(pool);
        while let Some(doc) = rows.try_next().await? {
            documents.push(doc);
            if let Some(ref pb) = progress {
                pb.set_position(documents.len() as u64);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message(format!("Fetched {} document(s)", documents.len()));
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_with_limit() {
        let source = JsonbSource::new("public", "users", "metadata");
        let query = source.build_query(Some(500));

        assert!(query.contains("\"public\""));
        assert!(query.contains("\"users\""));
        assert!(query.contains("\"metadata\""));
        assert!(query.contains("IS NOT NULL"));
        assert!(query.ends_with("LIMIT 500"));
    }

    #[test]
    fn test_build_query_without_limit() {
        let source = JsonbSource::new("public", "users", "metadata");
        let query = source.build_query(None);
        assert!(!query.contains("LIMIT"));
    }

    #[test]
    fn test_build_query_quotes_hostile_identifiers() {
        let source = JsonbSource::new("public", "users\"; --", "metadata");
        let query = source.build_query(None);
        assert!(query.contains("\"users\"\"; --\""));
    }

    #[test]
    fn test_progress_toggle() {
        let source = JsonbSource::new("public", "users", "metadata").show_progress(false);
        assert!(!source.show_progress);
    }
}
