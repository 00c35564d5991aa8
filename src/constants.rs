/// Mapping and render tuning constants.
///
/// These constants express intended behavior (frequency range, effect curves,
/// level scaling) and keep magic numbers out of the mapping code. They are the
/// defaults behind `PadConfig`; a page can override some of them through
/// `data-*` attributes on the pad element.
// Horizontal axis -> oscillator frequency (Hz)
pub const FREQ_MIN_HZ: f32 = 200.0;
pub const FREQ_MAX_HZ: f32 = 1000.0;

// Vertical axis -> synth volume in the dry mode (dB)
pub const VOLUME_MIN_DB: f32 = -24.0;
pub const VOLUME_MAX_DB: f32 = 0.0;

// Feedback delay curves
pub const DELAY_TIME_BASE_SEC: f32 = 0.05;
pub const DELAY_TIME_SPAN_SEC: f32 = 0.5;
pub const DELAY_FEEDBACK_MAX: f32 = 0.7;
pub const DELAY_MAX_TIME_SEC: f64 = 1.0; // DelayNode allocation

// Reverb curves
pub const REVERB_DAMPENING_BASE_HZ: f32 = 500.0;
pub const REVERB_DAMPENING_SPAN_HZ: f32 = 5000.0;
pub const REVERB_IR_SECONDS: f32 = 3.0;

// Pitch shift curves
pub const PITCH_SHIFT_MAX_SEMITONES: f32 = 12.0;
pub const PITCH_SHIFT_WINDOW_SEC: f32 = 0.1;

// Lowpass curves
pub const LOWPASS_CUTOFF_MIN_HZ: f32 = 300.0;
pub const LOWPASS_CUTOFF_MAX_HZ: f32 = 8000.0;
pub const LOWPASS_Q_MIN: f32 = 0.7;
pub const LOWPASS_Q_MAX: f32 = 8.0;

// Synth envelope (seconds)
pub const ENVELOPE_ATTACK_SEC: f64 = 0.005;
pub const ENVELOPE_RELEASE_SEC: f64 = 1.0;
pub const PARAM_SMOOTHING_SEC: f64 = 0.01; // setTargetAtTime time constant

// Microphone input gate (seconds)
pub const MIC_GATE_RAMP_SEC: f64 = 0.02;

// Audio-reactive drive
pub const LEVEL_RMS_SCALE: f32 = 1.8;
pub const LEVEL_CEILING: f32 = 1.0;
pub const ANALYSER_FFT_SIZE: u32 = 1024;
pub const WAVEFORM_UNIFORM_SAMPLES: usize = 256; // samples forwarded to the shader

// Visual
pub const CLEAR_COLOR: [f64; 3] = [0.05, 0.05, 0.1];
pub const CURSOR_RADIUS_PX: f32 = 10.0;
