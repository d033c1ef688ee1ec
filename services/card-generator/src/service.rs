//! Async front end that runs generation on the blocking thread pool.

use bytes::Bytes;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use card_common::{CardError, CardResult};
use renderer::encode::OutputFormat;

use crate::pipeline::Generator;
use crate::request::GenerationRequest;

/// Bounded pool of generation workers shared by async callers.
///
/// At most `workers` cards are rendered at once; further calls wait for a
/// permit. Cloning is cheap and clones share the same pool.
#[derive(Clone)]
pub struct GenerationService {
    generator: Arc<Generator>,
    permits: Arc<Semaphore>,
    workers: usize,
}

impl GenerationService {
    pub fn new(generator: Arc<Generator>, workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            generator,
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    pub fn generator(&self) -> &Arc<Generator> {
        &self.generator
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Generate a PNG card.
    pub async fn generate(&self, request: GenerationRequest) -> CardResult<Bytes> {
        self.generate_with_format(request, OutputFormat::Png).await
    }

    /// Generate a card in `format` on the blocking pool.
    pub async fn generate_with_format(
        &self,
        request: GenerationRequest,
        format: OutputFormat,
    ) -> CardResult<Bytes> {
        let _permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| CardError::Internal(format!("generation pool closed: {}", e)))?;

        let start = Instant::now();
        let template = request.template.clone();
        let generator = Arc::clone(&self.generator);

        let result = tokio::task::spawn_blocking(move || {
            generator.generate_with_format(&request.template, &request.values, format)
        })
        .await
        .unwrap_or_else(|e| Err(CardError::Internal(format!("generation task failed: {}", e))));

        record_outcome(&template, &result, start.elapsed());
        result
    }

    /// Generate every request concurrently, bounded by the worker count.
    /// Results are returned in request order.
    pub async fn generate_all(
        &self,
        requests: Vec<(GenerationRequest, OutputFormat)>,
    ) -> Vec<CardResult<Bytes>> {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|(request, format)| {
                let service = self.clone();
                tokio::spawn(async move { service.generate_with_format(request, format).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(
                handle
                    .await
                    .unwrap_or_else(|e| Err(CardError::Internal(format!("generation task failed: {}", e)))),
            );
        }
        results
    }
}

fn record_outcome(template: &str, result: &CardResult<Bytes>, elapsed: Duration) {
    let outcome = match result {
        Ok(bytes) => {
            info!(
                template,
                duration_ms = elapsed.as_millis() as u64,
                size = bytes.len(),
                "Generated card"
            );
            "ok"
        }
        Err(e) => {
            warn!(
                template,
                duration_ms = elapsed.as_millis() as u64,
                code = e.code(),
                error = %e,
                "Card generation failed"
            );
            e.code()
        }
    };

    metrics::counter!(
        "card_generate_total",
        "template" => template.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("card_generate_duration_seconds", "template" => template.to_string())
        .record(elapsed.as_secs_f64());
}
