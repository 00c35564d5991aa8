// Host-side sanity checks on the tuning constants.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn ranges_are_ordered() {
    assert!(FREQ_MIN_HZ > 0.0 && FREQ_MAX_HZ > FREQ_MIN_HZ);
    assert!(VOLUME_MAX_DB >= VOLUME_MIN_DB);
    assert!(LOWPASS_CUTOFF_MAX_HZ > LOWPASS_CUTOFF_MIN_HZ);
    assert!(LOWPASS_Q_MAX > LOWPASS_Q_MIN);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn delay_stays_stable_and_within_buffer() {
    assert!(DELAY_FEEDBACK_MAX >= 0.0 && DELAY_FEEDBACK_MAX < 1.0);
    let longest = (DELAY_TIME_BASE_SEC + DELAY_TIME_SPAN_SEC) as f64;
    assert!(longest <= DELAY_MAX_TIME_SEC);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn analyser_and_uniform_sizes_fit() {
    assert!(ANALYSER_FFT_SIZE.is_power_of_two());
    assert!((32..=32768).contains(&ANALYSER_FFT_SIZE));
    assert_eq!(WAVEFORM_UNIFORM_SAMPLES % 4, 0);
    assert!(ANALYSER_FFT_SIZE as usize >= WAVEFORM_UNIFORM_SAMPLES);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn level_mapping_constants() {
    assert!(LEVEL_RMS_SCALE > 0.0);
    assert!(LEVEL_CEILING > 0.0 && LEVEL_CEILING <= 1.0);
    assert!(ENVELOPE_ATTACK_SEC > 0.0 && ENVELOPE_RELEASE_SEC > ENVELOPE_ATTACK_SEC);
    assert!(CLEAR_COLOR.iter().all(|c| (0.0..=1.0).contains(c)));
}
