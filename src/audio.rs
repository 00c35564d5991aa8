use crate::constants::*;
use crate::core::{
    db_to_gain, semitones_to_ratio, DelayParams, EffectParams, LowpassParams, Node, PadError,
    PadResult, ParameterSet, PitchShiftParams, ReverbParams, SourceKind, Waveform, WireOp,
};
use crate::gesture::AudioBackend;
use crate::mic::Microphone;
use crate::renderer::AnalysisSource;
use rand::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn js_err(label: &str, e: wasm_bindgen::JsValue) -> PadError {
    PadError::AudioUnavailable(format!("{} error: {:?}", label, e))
}

#[inline]
fn audio_node<T: AsRef<web::AudioNode>>(n: &T) -> web::AudioNode {
    n.as_ref().clone()
}

fn create_gain(ctx: &web::AudioContext, value: f32, label: &str) -> PadResult<web::GainNode> {
    let g = web::GainNode::new(ctx).map_err(|e| js_err(label, e))?;
    g.gain().set_value(value);
    Ok(g)
}

// Smoothly move a parameter to `value` without zipper noise.
#[inline]
fn glide(param: &web::AudioParam, value: f32, now: f64) {
    if param.set_target_at_time(value, now, PARAM_SMOOTHING_SEC).is_err() {
        param.set_value(value);
    }
}

/// Input/output pair wrapped around every effect, with a dry/wet split.
struct FxSlot {
    input: web::GainNode,
    output: web::GainNode,
    dry: web::GainNode,
    wet: web::GainNode,
}

impl FxSlot {
    fn new(ctx: &web::AudioContext, label: &str) -> PadResult<Self> {
        let input = create_gain(ctx, 1.0, label)?;
        let output = create_gain(ctx, 1.0, label)?;
        let dry = create_gain(ctx, 1.0, label)?;
        let wet = create_gain(ctx, 0.0, label)?;
        _ = input.connect_with_audio_node(&dry);
        _ = dry.connect_with_audio_node(&output);
        _ = wet.connect_with_audio_node(&output);
        Ok(Self {
            input,
            output,
            dry,
            wet,
        })
    }

    fn set_wet(&self, wet: f32, now: f64) {
        let w = wet.clamp(0.0, 1.0);
        glide(&self.wet.gain(), w, now);
        glide(&self.dry.gain(), 1.0 - w, now);
    }
}

struct Synth {
    osc: web::OscillatorNode,
    env: web::GainNode,
    volume: web::GainNode,
}

impl Synth {
    fn new(ctx: &web::AudioContext) -> PadResult<Self> {
        let osc = web::OscillatorNode::new(ctx).map_err(|e| js_err("OscillatorNode", e))?;
        osc.set_type(web::OscillatorType::Sine);
        osc.frequency().set_value(FREQ_MIN_HZ);
        let env = create_gain(ctx, 0.0, "Synth env")?;
        let volume = create_gain(ctx, db_to_gain(VOLUME_MAX_DB), "Synth volume")?;
        _ = osc.connect_with_audio_node(&env);
        _ = env.connect_with_audio_node(&volume);
        #[allow(deprecated)]
        let started = osc.start();
        started.map_err(|e| js_err("Oscillator start", e))?;
        Ok(Self { osc, env, volume })
    }
}

struct FeedbackDelay {
    slot: FxSlot,
    delay: web::DelayNode,
    feedback: web::GainNode,
}

impl FeedbackDelay {
    fn new(ctx: &web::AudioContext) -> PadResult<Self> {
        let slot = FxSlot::new(ctx, "Delay")?;
        let delay = ctx
            .create_delay_with_max_delay_time(DELAY_MAX_TIME_SEC)
            .map_err(|e| js_err("DelayNode", e))?;
        delay.delay_time().set_value(DELAY_TIME_BASE_SEC);
        let feedback = create_gain(ctx, 0.0, "Delay feedback")?;
        _ = slot.input.connect_with_audio_node(&delay);
        _ = delay.connect_with_audio_node(&feedback);
        _ = feedback.connect_with_audio_node(&delay);
        _ = delay.connect_with_audio_node(&slot.wet);
        Ok(Self {
            slot,
            delay,
            feedback,
        })
    }

    fn set(&self, p: &DelayParams, now: f64) {
        self.slot.set_wet(p.wet, now);
        glide(&self.delay.delay_time(), p.delay_time_sec, now);
        glide(&self.feedback.gain(), p.feedback.clamp(0.0, 0.95), now);
    }
}

/// Two convolvers (small and large room) crossfaded by room size, then a
/// lowpass for dampening.
struct Reverb {
    slot: FxSlot,
    small: web::GainNode,
    large: web::GainNode,
    damp: web::BiquadFilterNode,
}

impl Reverb {
    fn new(ctx: &web::AudioContext) -> PadResult<Self> {
        let slot = FxSlot::new(ctx, "Reverb")?;
        let small_conv = web::ConvolverNode::new(ctx).map_err(|e| js_err("ConvolverNode", e))?;
        let large_conv = web::ConvolverNode::new(ctx).map_err(|e| js_err("ConvolverNode", e))?;
        small_conv.set_normalize(true);
        large_conv.set_normalize(true);
        small_conv.set_buffer(Some(&impulse_response(ctx, REVERB_IR_SECONDS * 0.15, 0x5EED_0001)?));
        large_conv.set_buffer(Some(&impulse_response(ctx, REVERB_IR_SECONDS, 0x5EED_0002)?));
        let small = create_gain(ctx, 1.0, "Reverb small")?;
        let large = create_gain(ctx, 0.0, "Reverb large")?;
        let damp = web::BiquadFilterNode::new(ctx).map_err(|e| js_err("BiquadFilterNode", e))?;
        damp.set_type(web::BiquadFilterType::Lowpass);
        damp.frequency().set_value(REVERB_DAMPENING_BASE_HZ);

        _ = slot.input.connect_with_audio_node(&small_conv);
        _ = slot.input.connect_with_audio_node(&large_conv);
        _ = small_conv.connect_with_audio_node(&small);
        _ = large_conv.connect_with_audio_node(&large);
        _ = small.connect_with_audio_node(&damp);
        _ = large.connect_with_audio_node(&damp);
        _ = damp.connect_with_audio_node(&slot.wet);
        Ok(Self {
            slot,
            small,
            large,
            damp,
        })
    }

    fn set(&self, p: &ReverbParams, now: f64) {
        self.slot.set_wet(p.wet, now);
        let room = p.room_size.clamp(0.0, 1.0);
        glide(&self.small.gain(), 1.0 - room, now);
        glide(&self.large.gain(), room, now);
        glide(&self.damp.frequency(), p.dampening_hz, now);
    }
}

// Stereo decaying noise; deterministic per seed.
fn impulse_response(
    ctx: &web::AudioContext,
    seconds: f32,
    seed: u64,
) -> PadResult<web::AudioBuffer> {
    let sr = ctx.sample_rate();
    let len = ((sr * seconds) as u32).max(1);
    let ir = ctx
        .create_buffer(2, len, sr)
        .map_err(|e| js_err("AudioBuffer", e))?;
    let mut rng = StdRng::seed_from_u64(seed);
    let tau = (seconds / 3.0).max(1e-3);
    for ch in 0..2 {
        let mut buf: Vec<f32> = (0..len as usize)
            .map(|i| {
                let t = i as f32 / sr;
                let n: f32 = rng.gen_range(-1.0..1.0);
                n * (-t / tau).exp()
            })
            .collect();
        _ = ir.copy_to_channel(&mut buf, ch);
    }
    Ok(ir)
}

/// Delay-line pitch shifter: two modulated delay lines half a cycle apart,
/// each faded out around its wrap point.
struct PitchShifter {
    slot: FxSlot,
    lfos: [web::OscillatorNode; 4],
    depths: [web::GainNode; 2],
}

impl PitchShifter {
    fn new(ctx: &web::AudioContext) -> PadResult<Self> {
        let slot = FxSlot::new(ctx, "PitchShift")?;
        let window = PITCH_SHIFT_WINDOW_SEC;

        // Sawtooth partials; the second line is shifted by half a period,
        // which flips the sign of the even partials.
        let harmonics = 64;
        let mut saw_a = vec![0.0_f32; harmonics];
        let mut saw_b = vec![0.0_f32; harmonics];
        for k in 1..harmonics {
            let amp = 2.0 / (std::f32::consts::PI * k as f32);
            saw_a[k] = if k % 2 == 1 { amp } else { -amp };
            saw_b[k] = -amp;
        }
        let mut zeros = vec![0.0_f32; harmonics];
        // Raised-cosine fades, silent where the matching saw wraps.
        let mut fade_a = vec![0.0_f32, 1.0];
        let mut fade_b = vec![0.0_f32, -1.0];
        let mut fade_imag = vec![0.0_f32, 0.0];

        let wave = |real: &mut [f32], imag: &mut [f32]| -> PadResult<web::PeriodicWave> {
            ctx.create_periodic_wave(real, imag)
                .map_err(|e| js_err("PeriodicWave", e))
        };
        let waves = [
            wave(zeros.as_mut_slice(), saw_a.as_mut_slice())?,
            wave(zeros.clone().as_mut_slice(), saw_b.as_mut_slice())?,
            wave(fade_a.as_mut_slice(), fade_imag.as_mut_slice())?,
            wave(fade_b.as_mut_slice(), fade_imag.clone().as_mut_slice())?,
        ];

        let mut lfos = Vec::with_capacity(4);
        for w in &waves {
            let osc = web::OscillatorNode::new(ctx).map_err(|e| js_err("OscillatorNode", e))?;
            osc.set_periodic_wave(w);
            osc.frequency().set_value(0.0);
            lfos.push(osc);
        }

        let mut depths = Vec::with_capacity(2);
        for line in 0..2 {
            let delay = ctx
                .create_delay_with_max_delay_time((window * 2.0) as f64)
                .map_err(|e| js_err("DelayNode", e))?;
            delay.delay_time().set_value(window * 0.5);
            let depth = create_gain(ctx, 0.0, "Pitch depth")?;
            _ = lfos[line].connect_with_audio_node(&depth);
            _ = depth.connect_with_audio_param(&delay.delay_time());

            let fade = create_gain(ctx, 0.5, "Pitch fade")?;
            let fade_depth = create_gain(ctx, 0.5, "Pitch fade depth")?;
            _ = lfos[line + 2].connect_with_audio_node(&fade_depth);
            _ = fade_depth.connect_with_audio_param(&fade.gain());

            _ = slot.input.connect_with_audio_node(&delay);
            _ = delay.connect_with_audio_node(&fade);
            _ = fade.connect_with_audio_node(&slot.wet);
            depths.push(depth);
        }

        // Start together so the four LFOs keep their phase relationship.
        let t0 = ctx.current_time();
        for osc in &lfos {
            #[allow(deprecated)]
            let started = osc.start_with_when(t0);
            started.map_err(|e| js_err("LFO start", e))?;
        }

        let lfos: [web::OscillatorNode; 4] = lfos
            .try_into()
            .map_err(|_| PadError::AudioUnavailable("pitch LFO setup".into()))?;
        let depths: [web::GainNode; 2] = depths
            .try_into()
            .map_err(|_| PadError::AudioUnavailable("pitch depth setup".into()))?;
        Ok(Self {
            slot,
            lfos,
            depths,
        })
    }

    fn set(&self, p: &PitchShiftParams, now: f64) {
        self.slot.set_wet(p.wet, now);
        let ratio = semitones_to_ratio(p.semitones);
        let window = PITCH_SHIFT_WINDOW_SEC;
        let rate = (ratio - 1.0).abs() / window;
        // Delay must shrink to raise pitch.
        let depth = if ratio > 1.0 {
            -window * 0.5
        } else if ratio < 1.0 {
            window * 0.5
        } else {
            0.0
        };
        for osc in &self.lfos {
            glide(&osc.frequency(), rate, now);
        }
        for d in &self.depths {
            glide(&d.gain(), depth, now);
        }
    }
}

struct Lowpass {
    slot: FxSlot,
    filter: web::BiquadFilterNode,
}

impl Lowpass {
    fn new(ctx: &web::AudioContext) -> PadResult<Self> {
        let slot = FxSlot::new(ctx, "Lowpass")?;
        let filter = web::BiquadFilterNode::new(ctx).map_err(|e| js_err("BiquadFilterNode", e))?;
        filter.set_type(web::BiquadFilterType::Lowpass);
        filter.frequency().set_value(LOWPASS_CUTOFF_MAX_HZ);
        filter.q().set_value(LOWPASS_Q_MIN);
        _ = slot.input.connect_with_audio_node(&filter);
        _ = filter.connect_with_audio_node(&slot.wet);
        Ok(Self { slot, filter })
    }

    fn set(&self, p: &LowpassParams, now: f64) {
        self.slot.set_wet(p.wet, now);
        glide(&self.filter.frequency(), p.cutoff_hz, now);
        glide(&self.filter.q(), p.q, now);
    }
}

struct MicInput {
    source: web::MediaStreamAudioSourceNode,
    gate: web::GainNode,
    volume: web::GainNode,
}

/// The WebAudio graph behind the pad.
pub struct WebAudioEngine {
    ctx: web::AudioContext,
    synth: Synth,
    mic: Option<MicInput>,
    delay: FeedbackDelay,
    reverb: Reverb,
    pitch: PitchShifter,
    lowpass: Lowpass,
    analyser: web::AnalyserNode,
    sounding: Node,
    mic_gain: f32,
    resume_pending: Rc<Cell<bool>>,
    on_blocked: Option<Rc<dyn Fn(PadError)>>,
}

impl WebAudioEngine {
    pub fn new(ctx: web::AudioContext, fft_size: u32) -> PadResult<Self> {
        let synth = Synth::new(&ctx)?;
        let delay = FeedbackDelay::new(&ctx)?;
        let reverb = Reverb::new(&ctx)?;
        let pitch = PitchShifter::new(&ctx)?;
        let lowpass = Lowpass::new(&ctx)?;
        let analyser = web::AnalyserNode::new(&ctx).map_err(|e| js_err("AnalyserNode", e))?;
        analyser.set_fft_size(fft_size);
        log::info!(
            "[audio] graph ready sr={} fft={}",
            ctx.sample_rate(),
            analyser.fft_size()
        );
        Ok(Self {
            ctx,
            synth,
            mic: None,
            delay,
            reverb,
            pitch,
            lowpass,
            analyser,
            sounding: Node::Synth,
            mic_gain: 1.0,
            resume_pending: Rc::new(Cell::new(false)),
            on_blocked: None,
        })
    }

    /// Called when a resume settles without the context running. Fires from
    /// a spawned task, never from inside an `AudioBackend` call.
    pub fn set_blocked_listener(&mut self, f: impl Fn(PadError) + 'static) {
        self.on_blocked = Some(Rc::new(f));
    }

    pub fn analyser(&self) -> WebAnalyser {
        WebAnalyser {
            node: Some(self.analyser.clone()),
        }
    }

    /// Wrap an opened microphone stream as a gated source node.
    pub fn attach_microphone(&mut self, mic: &Microphone) -> PadResult<()> {
        self.detach_microphone();
        let source = self
            .ctx
            .create_media_stream_source(mic.stream())
            .map_err(|e| PadError::DeviceUnavailable(format!("{:?}", e)))?;
        let gate = create_gain(&self.ctx, 0.0, "Mic gate")?;
        let volume = create_gain(&self.ctx, self.mic_gain, "Mic volume")?;
        _ = source.connect_with_audio_node(&gate);
        _ = gate.connect_with_audio_node(&volume);
        self.mic = Some(MicInput {
            source,
            gate,
            volume,
        });
        log::info!("[mic] attached");
        Ok(())
    }

    pub fn detach_microphone(&mut self) {
        if let Some(m) = self.mic.take() {
            _ = m.volume.disconnect();
            _ = m.gate.disconnect();
            _ = m.source.disconnect();
            log::info!("[mic] detached");
        }
    }

    pub fn suspend(&self) {
        if let Ok(p) = self.ctx.suspend() {
            spawn_local(async move {
                if let Err(e) = JsFuture::from(p).await {
                    log::warn!("[audio] suspend failed: {:?}", e);
                }
            });
        }
    }

    fn output_of(&self, node: Node) -> Option<web::AudioNode> {
        match node {
            Node::Synth => Some(audio_node(&self.synth.volume)),
            Node::Microphone => self.mic.as_ref().map(|m| audio_node(&m.volume)),
            Node::Delay => Some(audio_node(&self.delay.slot.output)),
            Node::Reverb => Some(audio_node(&self.reverb.slot.output)),
            Node::PitchShift => Some(audio_node(&self.pitch.slot.output)),
            Node::Lowpass => Some(audio_node(&self.lowpass.slot.output)),
            Node::Analyser => Some(audio_node(&self.analyser)),
            Node::Output => None,
        }
    }

    fn input_of(&self, node: Node) -> Option<web::AudioNode> {
        match node {
            Node::Synth | Node::Microphone => None,
            Node::Delay => Some(audio_node(&self.delay.slot.input)),
            Node::Reverb => Some(audio_node(&self.reverb.slot.input)),
            Node::PitchShift => Some(audio_node(&self.pitch.slot.input)),
            Node::Lowpass => Some(audio_node(&self.lowpass.slot.input)),
            Node::Analyser => Some(audio_node(&self.analyser)),
            Node::Output => Some(audio_node(&self.ctx.destination())),
        }
    }

    fn gate(&self) -> Option<web::AudioParam> {
        match self.sounding {
            Node::Microphone => self.mic.as_ref().map(|m| m.gate.gain()),
            _ => Some(self.synth.env.gain()),
        }
    }
}

impl AudioBackend for WebAudioEngine {
    fn resume(&mut self) -> PadResult<()> {
        match self.ctx.state() {
            web::AudioContextState::Running => {
                self.resume_pending.set(false);
                return Ok(());
            }
            web::AudioContextState::Closed => {
                return Err(PadError::AudioUnavailable("audio context closed".into()));
            }
            _ => {}
        }
        // An earlier gesture's resume never settled: the browser is holding
        // the context. Ask again for this gesture but keep it silent.
        let stalled = self.resume_pending.replace(true);
        let p = self
            .ctx
            .resume()
            .map_err(|e| PadError::AudioUnavailable(format!("{:?}", e)))?;
        let ctx = self.ctx.clone();
        let pending = self.resume_pending.clone();
        let on_blocked = self.on_blocked.clone();
        spawn_local(async move {
            let outcome = JsFuture::from(p).await;
            pending.set(false);
            let error = match outcome {
                Err(e) => PadError::AudioUnavailable(format!("resume rejected: {:?}", e)),
                Ok(_) if ctx.state() != web::AudioContextState::Running => {
                    PadError::AudioUnavailable("audio context still suspended".into())
                }
                Ok(_) => {
                    log::info!("[audio] running");
                    return;
                }
            };
            log::warn!("[audio] {}", error);
            if let Some(f) = on_blocked {
                f(error);
            }
        });
        if stalled {
            return Err(PadError::AudioUnavailable(
                "audio context still suspended".into(),
            ));
        }
        Ok(())
    }

    fn trigger_attack(&mut self, frequency_hz: f32, note: &str) {
        let now = self.ctx.current_time();
        if self.sounding == Node::Synth {
            _ = self
                .synth
                .osc
                .frequency()
                .set_value_at_time(frequency_hz, now);
        }
        let Some(gain) = self.gate() else { return };
        let ramp = if self.sounding == Node::Microphone {
            MIC_GATE_RAMP_SEC
        } else {
            ENVELOPE_ATTACK_SEC
        };
        _ = gain.cancel_scheduled_values(now);
        _ = gain.set_value_at_time(gain.value(), now);
        // level lives on the volume node after this gate
        _ = gain.linear_ramp_to_value_at_time(1.0, now + ramp);
        log::debug!("[audio] attack {} via {:?}", note, self.sounding);
    }

    fn trigger_release(&mut self) {
        let now = self.ctx.current_time();
        let Some(gain) = self.gate() else { return };
        let tau = if self.sounding == Node::Microphone {
            MIC_GATE_RAMP_SEC
        } else {
            ENVELOPE_RELEASE_SEC / 5.0
        };
        _ = gain.cancel_scheduled_values(now);
        _ = gain.set_value_at_time(gain.value(), now);
        _ = gain.set_target_at_time(0.0, now, tau);
    }

    fn apply(&mut self, params: &ParameterSet) {
        let now = self.ctx.current_time();
        glide(&self.synth.osc.frequency(), params.frequency_hz, now);
        let gain = params.source_gain();
        glide(&self.synth.volume.gain(), gain, now);
        self.mic_gain = gain;
        if let Some(m) = &self.mic {
            glide(&m.volume.gain(), gain, now);
        }
        match &params.effect {
            EffectParams::None => {}
            EffectParams::Delay(p) => self.delay.set(p, now),
            EffectParams::Reverb(p) => self.reverb.set(p, now),
            EffectParams::PitchShift(p) => self.pitch.set(p, now),
            EffectParams::Lowpass(p) => self.lowpass.set(p, now),
        }
    }

    fn set_waveform(&mut self, waveform: Waveform) {
        self.synth.osc.set_type(match waveform {
            Waveform::Sine => web::OscillatorType::Sine,
            Waveform::Triangle => web::OscillatorType::Triangle,
            Waveform::Square => web::OscillatorType::Square,
        });
    }

    fn rewire(&mut self, plan: &[WireOp]) {
        for op in plan {
            match *op {
                WireOp::Disconnect(node) => {
                    if let Some(out) = self.output_of(node) {
                        _ = out.disconnect();
                    }
                }
                WireOp::Connect(from, to) => {
                    if matches!(from, Node::Synth | Node::Microphone) {
                        self.sounding = from;
                    }
                    match (self.output_of(from), self.input_of(to)) {
                        (Some(out), Some(inp)) => {
                            if let Err(e) = out.connect_with_audio_node(&inp) {
                                log::error!("[audio] connect {:?}->{:?}: {:?}", from, to, e);
                            }
                        }
                        _ => log::warn!("[audio] skipping {:?}->{:?}: node missing", from, to),
                    }
                }
            }
        }
    }

    fn has_source(&self, source: SourceKind) -> bool {
        match source {
            SourceKind::Oscillator => true,
            SourceKind::Microphone => self.mic.is_some(),
        }
    }
}

/// Time-domain snapshots from the shared analyser.
#[derive(Clone, Default)]
pub struct WebAnalyser {
    node: Option<web::AnalyserNode>,
}

impl AnalysisSource for WebAnalyser {
    fn snapshot(&mut self, buf: &mut Vec<f32>) -> bool {
        let Some(a) = &self.node else { return false };
        let len = a.fft_size() as usize;
        if len == 0 {
            return false;
        }
        if buf.len() != len {
            buf.resize(len, 0.0);
        }
        a.get_float_time_domain_data(buf.as_mut_slice());
        true
    }
}
