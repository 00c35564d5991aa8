// Host-side tests for data-attribute configuration.

use playing_pad::config::*;
use playing_pad::core::PadError;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn no_attributes_gives_defaults() {
    let (cfg, err) = PadConfig::from_lookup(lookup(&[]));
    assert!(err.is_none());
    assert_eq!(cfg, PadConfig::default());
    assert!(cfg.validate().is_ok());
}

#[test]
fn attributes_override_defaults() {
    let (cfg, err) = PadConfig::from_lookup(lookup(&[
        (KEY_FREQ_MIN, "110"),
        (KEY_FREQ_MAX, "880"),
        (KEY_VOLUME_MIN, "-30"),
        (KEY_LEVEL_SCALE, "2.5"),
        (KEY_FFT_SIZE, "2048"),
    ]));
    assert!(err.is_none());
    assert_eq!(cfg.mapping.freq_min_hz, 110.0);
    assert_eq!(cfg.mapping.freq_max_hz, 880.0);
    assert_eq!(cfg.mapping.volume_min_db, -30.0);
    assert_eq!(cfg.level.rms_scale, 2.5);
    assert_eq!(cfg.fft_size, 2048);
}

#[test]
fn unparseable_values_are_skipped() {
    let (cfg, err) = PadConfig::from_lookup(lookup(&[
        (KEY_FREQ_MIN, "low"),
        (KEY_FREQ_MAX, "NaN"),
        (KEY_FFT_SIZE, "big"),
    ]));
    assert!(err.is_none());
    assert_eq!(cfg, PadConfig::default());
}

#[test]
fn invalid_combinations_fall_back_to_defaults() {
    let (cfg, err) = PadConfig::from_lookup(lookup(&[(KEY_FREQ_MIN, "2000")]));
    assert!(matches!(err, Some(PadError::Config(_))));
    assert_eq!(cfg, PadConfig::default());

    let (_, err) = PadConfig::from_lookup(lookup(&[(KEY_FFT_SIZE, "1000")]));
    assert!(err.is_some());
    let (_, err) = PadConfig::from_lookup(lookup(&[(KEY_FFT_SIZE, "16")]));
    assert!(err.is_some());
    let (_, err) = PadConfig::from_lookup(lookup(&[(KEY_LEVEL_SCALE, "0")]));
    assert!(err.is_some());
}
