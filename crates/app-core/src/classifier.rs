//! Batch and single-cast embed classification
//!
//! Every cast in a batch is classified independently. Probes run concurrently
//! up to [`ClassifierConfig::max_concurrent_probes`], and results always come
//! back in input order regardless of completion order.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use networking::{ContentProbe, HttpClient, ProbeError};

use crate::casts::{Cast, CastContext, ClassifiedCast};
use crate::config::ClassifierConfig;
use crate::embeds::{resolve_url, ClassifyError, ClassifyMode, EmbedType, Result};

/// Classifies casts into renderable embed types
#[derive(Debug)]
pub struct EmbedClassifier<P = HttpClient> {
    probe: Arc<P>,
    config: ClassifierConfig,
}

impl<P> Clone for EmbedClassifier<P> {
    fn clone(&self) -> Self {
        Self {
            probe: self.probe.clone(),
            config: self.config.clone(),
        }
    }
}

impl EmbedClassifier<HttpClient> {
    /// Create a classifier backed by a real HTTP client built from `config.http`
    pub fn with_http(config: ClassifierConfig) -> std::result::Result<Self, ProbeError> {
        let client = HttpClient::new(config.http.clone())?;
        Ok(Self::new(client, config))
    }
}

impl<P: ContentProbe> EmbedClassifier<P> {
    /// Create a classifier using `probe` for content-type lookups
    pub fn new(probe: P, config: ClassifierConfig) -> Self {
        Self {
            probe: Arc::new(probe),
            config,
        }
    }

    /// Get the classifier configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Get the underlying probe
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Resolve the embed type of a single URL
    pub async fn classify_url(&self, url: &str, mode: ClassifyMode) -> Result<EmbedType> {
        resolve_url(self.probe.as_ref(), url, mode).await
    }

    /// Classify one cast
    ///
    /// Frames win over everything else. Otherwise the first embed URL is
    /// resolved in `mode`; a cast without any URL is `other` in comment
    /// context and [`ClassifyError::NoEmbedUrl`] elsewhere.
    pub async fn classify_cast(
        &self,
        cast: &Cast,
        context: CastContext,
        mode: ClassifyMode,
    ) -> Result<ClassifiedCast> {
        if cast.has_frames() {
            return Ok(ClassifiedCast::new(cast, EmbedType::Frame));
        }

        if let Some(url) = cast.first_embed_url() {
            let embed_type = self.classify_url(url, mode).await?;
            return Ok(ClassifiedCast::new(cast, embed_type));
        }

        match context {
            CastContext::Comment => Ok(ClassifiedCast::new(cast, EmbedType::Other)),
            CastContext::Normal => Err(ClassifyError::NoEmbedUrl),
        }
    }

    /// Classify a batch in strict mode, returning one outcome per input
    ///
    /// The output has the same length and order as `casts`.
    pub async fn classify_batch_detailed(
        &self,
        casts: &[Cast],
        context: CastContext,
    ) -> Vec<Result<ClassifiedCast>> {
        tracing::debug!(count = casts.len(), ?context, "Classifying cast batch");

        stream::iter(casts)
            .map(|cast| self.classify_cast(cast, context, ClassifyMode::Strict))
            .buffered(self.config.concurrency())
            .collect()
            .await
    }

    /// Classify a batch in strict mode, dropping casts that fail
    ///
    /// Survivors keep their relative order. Every dropped cast is logged with
    /// the reason it was dropped.
    pub async fn classify_batch(&self, casts: &[Cast], context: CastContext) -> Vec<ClassifiedCast> {
        let outcomes = self.classify_batch_detailed(casts, context).await;

        outcomes
            .into_iter()
            .enumerate()
            .filter_map(|(index, outcome)| match outcome {
                Ok(classified) => Some(classified),
                Err(e) => {
                    tracing::warn!(
                        index,
                        hash = casts[index].hash().unwrap_or("<none>"),
                        "Dropping cast from batch: {}",
                        e
                    );
                    None
                }
            })
            .collect()
    }

    /// Classify a single cast permissively
    ///
    /// Never fails: a missing URL, an unrecognised content type or a failed
    /// probe all fall back to `other`.
    pub async fn classify_single(&self, cast: &Cast) -> ClassifiedCast {
        match self
            .classify_cast(cast, CastContext::Comment, ClassifyMode::Permissive)
            .await
        {
            Ok(classified) => classified,
            Err(e) => {
                tracing::debug!(
                    hash = cast.hash().unwrap_or("<none>"),
                    "Falling back to other: {}",
                    e
                );
                ClassifiedCast::new(cast, EmbedType::Other)
            }
        }
    }
}
