//! End-to-end analysis for one company: collect, summarise, translate, voice.

use newspulse_core::AppConfig;
use newspulse_news::{
    collect_articles, summarize, Article, CollectionPlan, FeedSource, FetchError, GoogleNewsFeed,
    LexiconScorer, SentimentScorer, SentimentSummary,
};
use newspulse_speech::{
    AudioSpool, GoogleTranslator, GoogleTts, SpeechError, SpeechSynthesizer, SpoolError,
    Translator,
};
use thiserror::Error;

/// Request-fatal failures of an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("news fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Synthesis failed or the audio could not be spooled.
    #[error("audio generation failed: {0}")]
    AudioGeneration(String),

    #[error("failed to read generated audio: {0}")]
    AudioRead(#[source] SpoolError),

    /// Anything else, translation failures included.
    #[error("{0}")]
    Unexpected(String),
}

impl From<SpeechError> for AnalysisError {
    fn from(e: SpeechError) -> Self {
        Self::AudioGeneration(e.to_string())
    }
}

/// Everything the API returns for one company.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub company: String,
    pub articles: Vec<Article>,
    pub summary: SentimentSummary,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub source_audio: Vec<u8>,
    pub translated_audio: Vec<u8>,
}

/// The pipeline wired to the live Google services.
pub type LivePipeline = Pipeline<GoogleNewsFeed, LexiconScorer, GoogleTranslator, GoogleTts>;

/// Owns the injected services; shared read-only across requests.
pub struct Pipeline<F, S, T, V> {
    feed: F,
    scorer: S,
    translator: T,
    synthesizer: V,
    spool: AudioSpool,
    plan: CollectionPlan,
    source_language: String,
    target_language: String,
}

impl LivePipeline {
    /// # Errors
    ///
    /// Returns an error if any HTTP client cannot be built from `config`.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Pipeline::new(
            GoogleNewsFeed::from_config(config)?,
            LexiconScorer::new(),
            GoogleTranslator::from_config(config)?,
            GoogleTts::from_config(config)?,
            AudioSpool::from_config(config),
        )
        .with_languages(&config.source_language, &config.target_language))
    }
}

impl<F, S, T, V> Pipeline<F, S, T, V>
where
    F: FeedSource,
    S: SentimentScorer,
    T: Translator,
    V: SpeechSynthesizer,
{
    /// Builds a pipeline translating `en` → `hi` with the default collection plan.
    pub fn new(feed: F, scorer: S, translator: T, synthesizer: V, spool: AudioSpool) -> Self {
        Self {
            feed,
            scorer,
            translator,
            synthesizer,
            spool,
            plan: CollectionPlan::default(),
            source_language: "en".to_string(),
            target_language: "hi".to_string(),
        }
    }

    #[must_use]
    pub fn with_languages(mut self, source: &str, target: &str) -> Self {
        self.source_language = source.to_string();
        self.target_language = target.to_string();
        self
    }

    /// Run every stage for `company`, strictly in sequence.
    ///
    /// # Errors
    ///
    /// Returns the first [`AnalysisError`]; later stages are not attempted.
    pub async fn analyze(&self, company: &str) -> Result<AnalysisReport, AnalysisError> {
        tracing::info!(company, "starting analysis");

        let collection = collect_articles(&self.feed, &self.scorer, company, &self.plan).await?;
        let summary = summarize(company, &collection.articles);

        let translated_text = self
            .translator
            .translate(&summary.text, &self.source_language, &self.target_language)
            .await
            .map_err(|e| AnalysisError::Unexpected(format!("translation failed: {e}")))?;

        let source_audio = self
            .synthesizer
            .synthesize(&summary.text, &self.source_language)
            .await?;
        let translated_audio = self
            .synthesizer
            .synthesize(&translated_text, &self.target_language)
            .await?;

        let (source_audio, translated_audio) =
            self.round_trip(&source_audio, &translated_audio).await?;

        tracing::info!(
            company,
            articles = collection.articles.len(),
            pages = collection.pages_fetched,
            "analysis complete"
        );

        Ok(AnalysisReport {
            company: company.to_string(),
            articles: collection.articles,
            summary,
            translated_text,
            source_language: self.source_language.clone(),
            target_language: self.target_language.clone(),
            source_audio,
            translated_audio,
        })
    }

    /// Spool both clips, read them back, and remove the files.
    ///
    /// Removal is attempted whether or not the reads succeed.
    async fn round_trip(
        &self,
        source: &[u8],
        translated: &[u8],
    ) -> Result<(Vec<u8>, Vec<u8>), AnalysisError> {
        let source_path = self
            .spool
            .write(&self.source_language, source)
            .await
            .map_err(|e| AnalysisError::AudioGeneration(e.to_string()))?;
        let translated_path = match self.spool.write(&self.target_language, translated).await {
            Ok(path) => path,
            Err(e) => {
                self.spool.remove(&source_path).await;
                return Err(AnalysisError::AudioGeneration(e.to_string()));
            }
        };

        let source_read = self.spool.read(&source_path).await;
        let translated_read = self.spool.read(&translated_path).await;

        self.spool.remove(&source_path).await;
        self.spool.remove(&translated_path).await;

        Ok((
            source_read.map_err(AnalysisError::AudioRead)?,
            translated_read.map_err(AnalysisError::AudioRead)?,
        ))
    }
}
