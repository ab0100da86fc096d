//! Pipeline orchestration for one extract → transform → load run

use super::{Extractor, Loader, Transformer};
use crate::error::PipelineError;
use std::fmt;

/// Progress of a pipeline run
///
/// `run` walks `Idle → Extracting → Transforming → Loading → Done`; a stage
/// failure moves straight to the terminal `Failed` state and no further
/// stage executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Extracting,
    Transforming,
    Loading,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Extracting => "extracting",
            PipelineState::Transforming => "transforming",
            PipelineState::Loading => "loading",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Pipeline that orchestrates one Extract, Transform, Load run
///
/// Holds exactly one instance of each role, fixed at construction. The
/// orchestrator never inspects its collaborators beyond their contracted
/// operations: stages run strictly in sequence, with no retry, no rollback,
/// and no partial commit. `run` consumes the pipeline, so a configuration
/// lives for exactly one run.
///
/// # Example
/// ```no_run
/// use tabular_etl::etl::Pipeline;
/// use tabular_etl::sink::SqliteLoader;
/// use tabular_etl::source::DelimitedExtractor;
/// use tabular_etl::transform::BasicTransformer;
///
/// # async fn example() -> Result<(), tabular_etl::PipelineError> {
/// let pipeline = Pipeline::new(
///     DelimitedExtractor::new("sales.csv"),
///     BasicTransformer::new(),
///     SqliteLoader::new("warehouse.db", "sales"),
/// );
///
/// let count = pipeline.run().await?;
/// println!("Loaded {count} records");
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
    state: PipelineState,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer,
    L: Loader,
{
    /// Create a pipeline from its three collaborators
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
            state: PipelineState::Idle,
        }
    }

    /// Current state; `Idle` until `run` is called
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run the pipeline to completion
    ///
    /// Returns the number of records loaded. The first stage error halts the
    /// run and is surfaced unmodified — the [`PipelineError`] variant names
    /// the stage, the inner error its sub-kind. Partial results (an
    /// extracted-but-not-loaded batch) are discarded, never exposed.
    pub async fn run(mut self) -> Result<usize, PipelineError> {
        log::info!("Starting ETL pipeline run");

        self.state = PipelineState::Extracting;
        log::debug!("Extracting from source...");
        let extracted = match self.extractor.extract().await {
            Ok(batch) => batch,
            Err(error) => return Err(self.fail(error)),
        };
        log::info!(
            "Extracted {} record(s) tagged '{}'",
            extracted.len(),
            extracted.source()
        );

        self.state = PipelineState::Transforming;
        log::debug!("Transforming batch...");
        let transformed = match self.transformer.transform(extracted) {
            Ok(batch) => batch,
            Err(error) => return Err(self.fail(error)),
        };
        log::info!("Transformed batch holds {} record(s)", transformed.len());

        self.state = PipelineState::Loading;
        log::debug!("Loading to destination...");
        let count = match self.loader.load(transformed).await {
            Ok(count) => count,
            Err(error) => return Err(self.fail(error)),
        };

        self.state = PipelineState::Done;
        log::info!("Pipeline done, loaded {} record(s)", count);

        Ok(count)
    }

    fn fail<Error: Into<PipelineError>>(&mut self, error: Error) -> PipelineError {
        let error = error.into();
        log::error!("Pipeline failed while {}: {}", self.state, error);
        self.state = PipelineState::Failed;
        error
    }
}
