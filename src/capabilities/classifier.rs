use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One label the on-device image classifier reported for a scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedLabel {
    pub name: String,
    /// Probability-like score in `[0, 1]`.
    pub confidence: f32,
}

impl DetectedLabel {
    #[must_use]
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Input contract of the classifier: decoded-and-bounded image bytes
/// produced by [`crate::image_prep`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedImage {
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassificationError {
    #[error("classifier model unavailable")]
    ModelUnavailable,

    #[error("classifier rejected input: {reason}")]
    InvalidInput { reason: String },

    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },
}

pub type ClassifyResult = Result<Vec<DetectedLabel>, ClassificationError>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifierOperation {
    Classify { image: PreparedImage },
}

impl Operation for ClassifierOperation {
    type Output = ClassifyResult;
}

/// Capability wrapping the shell's on-device image classification service.
pub struct Classifier<Ev> {
    context: CapabilityContext<ClassifierOperation, Ev>,
}

impl<Ev> Capability<Ev> for Classifier<Ev> {
    type Operation = ClassifierOperation;
    type MappedSelf<MappedEv> = Classifier<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Classifier::new(self.context.map_event(f))
    }
}

impl<Ev> Classifier<Ev>
where
    Ev: 'static,
{
    #[must_use]
    pub fn new(context: CapabilityContext<ClassifierOperation, Ev>) -> Self {
        Self { context }
    }

    /// Ask the shell to classify a prepared image. Success or failure comes
    /// back as a single event; this capability never blocks the core.
    pub fn classify<F>(&self, image: PreparedImage, make_event: F)
    where
        F: FnOnce(ClassifyResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(ClassifierOperation::Classify { image })
                .await;
            context.update_app(make_event(result));
        });
    }
}
