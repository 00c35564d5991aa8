// Host-side tests for keyboard shortcuts and form control parsing.

use playing_pad::core::*;

#[test]
fn digits_select_effects_in_order() {
    let keys = ["1", "2", "3", "4", "5"];
    for (key, kind) in keys.iter().zip(EffectKind::ALL) {
        assert_eq!(effect_for_digit(key), Some(kind));
        assert_eq!(command_for_key(key), Some(ControlCommand::Effect(kind)));
    }
    assert_eq!(effect_for_digit("0"), None);
    assert_eq!(effect_for_digit("6"), None);
}

#[test]
fn waveform_keys_ignore_case() {
    assert_eq!(waveform_for_key("s"), Some(Waveform::Sine));
    assert_eq!(waveform_for_key("T"), Some(Waveform::Triangle));
    assert_eq!(waveform_for_key("q"), Some(Waveform::Square));
    assert_eq!(waveform_for_key("x"), None);
}

#[test]
fn other_shortcuts() {
    assert_eq!(command_for_key("m"), Some(ControlCommand::ToggleSource));
    assert_eq!(command_for_key("M"), Some(ControlCommand::ToggleSource));
    assert_eq!(command_for_key("Escape"), Some(ControlCommand::Release));
    assert_eq!(command_for_key("Enter"), None);
    assert_eq!(command_for_key(""), None);
}

#[test]
fn form_inputs_map_to_commands() {
    assert_eq!(
        command_for_input("effect", "reverb").ok(),
        Some(ControlCommand::Effect(EffectKind::Reverb))
    );
    assert_eq!(
        command_for_input("filter", "Pitch-Shift").ok(),
        Some(ControlCommand::Effect(EffectKind::PitchShift))
    );
    assert_eq!(
        command_for_input("waveform", " square ").ok(),
        Some(ControlCommand::Waveform(Waveform::Square))
    );
    assert_eq!(
        command_for_input("source", "mic").ok(),
        Some(ControlCommand::Source(SourceKind::Microphone))
    );
    assert!(matches!(
        command_for_input("effect", "flanger"),
        Err(PadError::Config(_))
    ));
    assert!(command_for_input("volume", "3").is_err());
}

#[test]
fn display_names_parse_back() {
    for kind in EffectKind::ALL {
        assert_eq!(kind.to_string().parse::<EffectKind>().ok(), Some(kind));
    }
    for w in [Waveform::Sine, Waveform::Triangle, Waveform::Square] {
        assert_eq!(w.to_string().parse::<Waveform>().ok(), Some(w));
    }
    for s in [SourceKind::Oscillator, SourceKind::Microphone] {
        assert_eq!(s.to_string().parse::<SourceKind>().ok(), Some(s));
    }
}
