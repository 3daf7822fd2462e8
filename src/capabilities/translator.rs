use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// BCP-47-ish source/target tags understood by the shell's translator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl Default for LanguagePair {
    /// English to Spanish, the pair the product finder ships with.
    fn default() -> Self {
        Self::new("en", "es")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslatorOperation {
    /// One-time on-device model provisioning; idempotent on the shell side.
    DownloadModel { pair: LanguagePair },
    Translate { pair: LanguagePair, text: String },
}

impl Operation for TranslatorOperation {
    type Output = TranslateResult;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslatorOutput {
    ModelReady,
    Translated { text: String },
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslationError {
    #[error("translation model not downloaded")]
    ModelNotDownloaded,

    #[error("translator unavailable")]
    Unavailable,

    #[error("translation failed: {reason}")]
    TranslationFailed { reason: String },
}

pub type TranslateResult = Result<TranslatorOutput, TranslationError>;

/// Capability wrapping the shell's on-device translation service.
pub struct Translator<Ev> {
    context: CapabilityContext<TranslatorOperation, Ev>,
}

impl<Ev> Capability<Ev> for Translator<Ev> {
    type Operation = TranslatorOperation;
    type MappedSelf<MappedEv> = Translator<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Translator::new(self.context.map_event(f))
    }
}

impl<Ev> Translator<Ev>
where
    Ev: 'static,
{
    #[must_use]
    pub fn new(context: CapabilityContext<TranslatorOperation, Ev>) -> Self {
        Self { context }
    }

    /// Provision the on-device model for `pair`. Dispatched once at startup;
    /// the completion is informational only.
    pub fn download_model<F>(&self, pair: LanguagePair, make_event: F)
    where
        F: FnOnce(TranslateResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(TranslatorOperation::DownloadModel { pair })
                .await;
            context.update_app(make_event(result));
        });
    }

    /// Translate one text. Batch fan-out dispatches these unordered; the
    /// caller tags each completion with its own identity.
    pub fn translate<F>(&self, pair: LanguagePair, text: impl Into<String>, make_event: F)
    where
        F: FnOnce(TranslateResult) -> Ev + Send + 'static,
    {
        let text = text.into();
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(TranslatorOperation::Translate { pair, text })
                .await;
            context.update_app(make_event(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pair_is_english_to_spanish() {
        let pair = LanguagePair::default();
        assert_eq!(pair.source, "en");
        assert_eq!(pair.target, "es");
    }

    #[test]
    fn translation_errors_render_a_reason() {
        let error = TranslationError::TranslationFailed {
            reason: "model busy".into(),
        };
        assert!(error.to_string().contains("model busy"));
        assert_eq!(
            TranslationError::ModelNotDownloaded.to_string(),
            "translation model not downloaded"
        );
    }

    #[test]
    fn translate_operation_round_trips_through_serde() {
        let op = TranslatorOperation::Translate {
            pair: LanguagePair::default(),
            text: "Shoe".into(),
        };
        let bytes = serde_json::to_vec(&op).expect("serialize");
        let back: TranslatorOperation = serde_json::from_slice(&bytes).expect("deserialize");
        assert_eq!(op, back);
    }
}
