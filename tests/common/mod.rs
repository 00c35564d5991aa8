// Host-side fakes for the browser collaborators.
#![allow(dead_code)]

use playing_pad::core::{
    FrameHandle, FrameScheduler, PadError, PadResult, ParameterSet, SourceKind, Waveform, WireOp,
};
use playing_pad::gesture::AudioBackend;

/// Frame scheduler driven by hand. Tracks outstanding requests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: FrameHandle,
    pub pending: Vec<FrameHandle>,
    pub requests: usize,
    pub cancels: usize,
    pub fail: bool,
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> PadResult<FrameHandle> {
        if self.fail {
            return Err(PadError::Render("no animation frames".into()));
        }
        self.next += 1;
        self.requests += 1;
        self.pending.push(self.next);
        Ok(self.next)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancels += 1;
        self.pending.retain(|h| *h != handle);
    }
}

impl ManualScheduler {
    /// Deliver every outstanding frame; returns how many fired.
    pub fn fire(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }
}

/// Records every call the mapper makes into the audio engine.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub resume_fails: bool,
    /// Resume is accepted but the context never leaves "suspended".
    pub stays_suspended: bool,
    pub mic_ready: bool,
    pub attacks: Vec<(f32, String)>,
    pub releases: usize,
    pub applied: Vec<ParameterSet>,
    pub waveform: Option<Waveform>,
    pub wire_log: Vec<WireOp>,
}

impl AudioBackend for RecordingAudio {
    fn resume(&mut self) -> PadResult<()> {
        if self.resume_fails {
            Err(PadError::AudioUnavailable("autoplay blocked".into()))
        } else if self.stays_suspended {
            Err(PadError::AudioUnavailable("audio context still suspended".into()))
        } else {
            Ok(())
        }
    }

    fn trigger_attack(&mut self, frequency_hz: f32, note: &str) {
        self.attacks.push((frequency_hz, note.to_string()));
    }

    fn trigger_release(&mut self) {
        self.releases += 1;
    }

    fn apply(&mut self, params: &ParameterSet) {
        self.applied.push(*params);
    }

    fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = Some(waveform);
    }

    fn rewire(&mut self, plan: &[WireOp]) {
        self.wire_log.extend_from_slice(plan);
    }

    fn has_source(&self, source: SourceKind) -> bool {
        match source {
            SourceKind::Oscillator => true,
            SourceKind::Microphone => self.mic_ready,
        }
    }
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}
