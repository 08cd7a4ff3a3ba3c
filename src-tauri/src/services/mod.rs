// Services module
// Remote APIs, file output, playback and the run that chains them

pub mod narrative;
pub mod output;
pub mod pipeline;
pub mod playback;
pub mod synthesis;

pub use narrative::{NarrativeGenerator, XaiClient};
pub use output::OutputManager;
pub use pipeline::{CompletedRun, FailedRun, NarrationPipeline, RunGuard, RunOutcome, RunSlot};
pub use playback::{PlaybackController, PlaybackState, PlaybackStatus};
pub use synthesis::{ElevenLabsClient, NarratorSynthesizer, SynthesisRequest};

#[cfg(test)]
mod tests {
    mod test_narrative;
    mod test_pipeline;
    mod test_synthesis;
}
