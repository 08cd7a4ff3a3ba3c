//! One narration run: generate, save the text, synthesize, save the audio.
//!
//! Runs are serialized through [`RunSlot`]: at most one is in flight and a
//! second trigger is rejected instead of queued.

use log::{error, info};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{NarratorError, NarratorResult};
use crate::models::{AudioArtifact, GenerationRequest, NarrativeResult, RunState};
use crate::services::narrative::NarrativeGenerator;
use crate::services::output::OutputManager;
use crate::services::synthesis::{audio_extension, NarratorSynthesizer, SynthesisRequest};

/// Single-slot gate for generation runs.
#[derive(Debug, Clone, Default)]
pub struct RunSlot {
    busy: Arc<AtomicBool>,
}

impl RunSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot, or `RunInFlight` if a run already holds it.
    pub fn try_acquire(&self) -> NarratorResult<RunGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| NarratorError::RunInFlight)?;
        Ok(RunGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the slot when dropped.
#[derive(Debug)]
pub struct RunGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct CompletedRun {
    pub narrative: NarrativeResult,
    pub text_path: PathBuf,
    pub audio: AudioArtifact,
}

#[derive(Debug)]
pub struct FailedRun {
    pub error: NarratorError,
    /// Set when generation succeeded but a later stage failed.
    pub text_path: Option<PathBuf>,
}

impl FailedRun {
    fn before_text(error: NarratorError) -> Self {
        Self { error, text_path: None }
    }
}

pub type RunOutcome = Result<CompletedRun, FailedRun>;

impl From<&RunOutcome> for RunState {
    fn from(outcome: &RunOutcome) -> Self {
        match outcome {
            Ok(run) => RunState::Ready {
                text_path: run.text_path.clone(),
                audio_path: run.audio.file_path.clone(),
            },
            Err(failed) => RunState::Failed {
                kind: failed.error.kind().to_string(),
                message: failed.error.to_string(),
                text_path: failed.text_path.clone(),
            },
        }
    }
}

pub struct NarrationPipeline {
    generator: Box<dyn NarrativeGenerator>,
    synthesizer: Box<dyn NarratorSynthesizer>,
}

impl NarrationPipeline {
    pub fn new(generator: Box<dyn NarrativeGenerator>, synthesizer: Box<dyn NarratorSynthesizer>) -> Self {
        Self { generator, synthesizer }
    }

    /// Checks that need no network or disk, so a bad request costs nothing.
    pub fn validate(request: &GenerationRequest) -> NarratorResult<()> {
        if request.source_text.trim().is_empty() {
            return Err(NarratorError::EmptyInput);
        }
        if request.voice_id.trim().is_empty() {
            return Err(NarratorError::InvalidVoice("no voice selected".to_string()));
        }
        Ok(())
    }

    pub fn synthesizer(&self) -> &dyn NarratorSynthesizer {
        self.synthesizer.as_ref()
    }

    /// Execute one run, reporting every state transition through `on_state`.
    ///
    /// Synthesis only starts after the narrative has been generated and its
    /// text file written. A synthesis failure leaves that text file in place
    /// and reports it in the `FailedRun`.
    pub async fn run<F>(
        &self,
        request: &GenerationRequest,
        output: &OutputManager,
        output_format: &str,
        mut on_state: F,
    ) -> RunOutcome
    where
        F: FnMut(&RunState) + Send,
    {
        on_state(&RunState::Generating);
        let outcome = self.execute(request, output, output_format, &mut on_state).await;

        match &outcome {
            Ok(run) => info!(
                "Narration ready: {} / {}",
                run.text_path.display(),
                run.audio.file_path.display()
            ),
            Err(failed) => error!("Narration failed: {}", failed.error),
        }
        on_state(&RunState::from(&outcome));
        outcome
    }

    async fn execute<F>(
        &self,
        request: &GenerationRequest,
        output: &OutputManager,
        output_format: &str,
        on_state: &mut F,
    ) -> RunOutcome
    where
        F: FnMut(&RunState) + Send,
    {
        Self::validate(request).map_err(FailedRun::before_text)?;

        let narrative = self
            .generator
            .generate(&request.source_text, request.style)
            .await
            .map_err(FailedRun::before_text)?;

        let audio_ext = audio_extension(output_format);
        let basename = output
            .reserve_basename(&narrative.generated_text, audio_ext)
            .await
            .map_err(FailedRun::before_text)?;
        let text_path = output
            .write_text(&basename, &narrative.generated_text)
            .await
            .map_err(FailedRun::before_text)?;

        on_state(&RunState::Synthesizing {
            text_path: text_path.clone(),
        });

        let synthesis = SynthesisRequest {
            text: &narrative.generated_text,
            voice_id: &request.voice_id,
            tone: request.tone_settings,
            output_format,
        };
        let audio_path = output.audio_path(&basename, audio_ext);
        let audio = match self.synthesizer.synthesize_to_file(&synthesis, &audio_path).await {
            Ok(audio) => audio,
            Err(error) => {
                return Err(FailedRun {
                    error,
                    text_path: Some(text_path),
                });
            }
        };

        Ok(CompletedRun {
            narrative,
            text_path,
            audio,
        })
    }
}
