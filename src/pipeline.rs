//! Transform pipeline applied to a parsed [`Document`] before it is encoded.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::document::Document;
use crate::error::{BoxError, Error, Result};

/// A document rewriting step.
///
/// Processors edit the document in place. Any closure with the matching
/// signature is a processor.
pub trait Processor: Send + Sync {
    fn process(&self, doc: &mut Document) -> Result<(), BoxError>;
}

impl<F> Processor for F
where
    F: Fn(&mut Document) -> Result<(), BoxError> + Send + Sync,
{
    fn process(&self, doc: &mut Document) -> Result<(), BoxError> {
        self(doc)
    }
}

/// Ordered, fail-fast list of processors.
///
/// ```rust
/// use mapslice::{Document, Pipeline};
///
/// let pipeline = Pipeline::new().with_processor(|doc: &mut Document| {
///     doc.push("x-generated", true);
///     Ok(())
/// });
/// let json = mapslice::yaml_to_json_with_options(
///     b"name: petstore\n",
///     &mapslice::Options::default(),
///     &pipeline,
/// )
/// .unwrap();
/// assert_eq!(json, br#"{"name":"petstore","x-generated":true}"#);
/// ```
#[derive(Clone, Default)]
pub struct Pipeline {
    processors: Vec<Arc<dyn Processor>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a closure; processors run in the order they were added.
    pub fn with_processor<F>(mut self, processor: F) -> Self
    where
        F: Fn(&mut Document) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.push(processor);
        self
    }

    /// Append any [`Processor`] implementation.
    pub fn push<P: Processor + 'static>(&mut self, processor: P) {
        self.processors.push(Arc::new(processor));
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn has_transforms(&self) -> bool {
        !self.is_empty()
    }

    /// Run every processor on `doc`.
    ///
    /// The first failure stops the pipeline. The returned
    /// [`Error::Processor`] holds the processor's error and the document as
    /// that processor left it; later processors never see it.
    pub fn apply(&self, mut doc: Document) -> Result<Document> {
        for (index, processor) in self.processors.iter().enumerate() {
            trace!(index, entries = doc.len(), "running document processor");
            if let Err(cause) = processor.process(&mut doc) {
                return Err(Error::Processor {
                    cause,
                    document: Box::new(doc),
                });
            }
        }
        Ok(doc)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("processors", &self.processors.len())
            .finish()
    }
}
