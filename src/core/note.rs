const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * (2.0_f32).powf((midi - 69.0) / 12.0)
}

/// Nearest MIDI note for a frequency (A4 = 440 Hz). Non-positive input maps to 0.
pub fn hz_to_midi(hz: f32) -> i32 {
    if !(hz > 0.0) || !hz.is_finite() {
        return 0;
    }
    (69.0 + 12.0 * (hz / 440.0).log2()).round() as i32
}

/// Scientific pitch name with sharps, e.g. `"C#4"`.
pub fn note_name(midi: i32) -> String {
    let pc = midi.rem_euclid(12) as usize;
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", NOTE_NAMES[pc], octave)
}

#[inline]
pub fn note_name_for_hz(hz: f32) -> String {
    note_name(hz_to_midi(hz))
}

pub fn db_to_gain(db: f32) -> f32 {
    if db <= -120.0 {
        0.0
    } else {
        10.0_f32.powf(db / 20.0)
    }
}

/// Playback-rate ratio for a pitch offset in semitones.
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    (2.0_f32).powf(semitones / 12.0)
}
