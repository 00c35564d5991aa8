// Host-side tests for the gesture mapper with fake audio and frames.

mod common;

use common::{approx, ManualScheduler, RecordingAudio};
use playing_pad::core::*;
use playing_pad::gesture::GestureMapper;
use std::cell::RefCell;
use std::rc::Rc;

type Mapper = GestureMapper<RecordingAudio, ManualScheduler>;

fn mapper_with(audio: RecordingAudio) -> Mapper {
    GestureMapper::new(audio, ManualScheduler::default(), MappingConfig::default())
        .expect("default config is valid")
}

fn mapper() -> Mapper {
    mapper_with(RecordingAudio::default())
}

fn pad() -> PadRect {
    PadRect::square(300.0)
}

fn at(x: f32, y: f32) -> PointerSample {
    PointerSample::new(x, y)
}

#[test]
fn construction_wires_the_default_chain() {
    let m = mapper();
    assert_eq!(m.route(), Route::default());
    assert_eq!(
        m.audio().wire_log,
        vec![
            WireOp::Connect(Node::Synth, Node::Analyser),
            WireOp::Connect(Node::Analyser, Node::Output)
        ]
    );
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = MappingConfig {
        freq_max_hz: 10.0,
        ..MappingConfig::default()
    };
    let r = GestureMapper::new(RecordingAudio::default(), ManualScheduler::default(), cfg);
    assert!(matches!(r, Err(PadError::Config(_))));
}

#[test]
fn release_without_press_is_noop() {
    let mut m = mapper();
    assert!(!m.on_release());
    assert_eq!(m.audio().releases, 0);
    assert!(!m.is_active());
}

#[test]
fn press_triggers_attack_at_mapped_frequency() {
    let mut m = mapper();
    m.on_press(at(150.0, 150.0), pad());
    assert!(m.is_active());
    let (hz, note) = &m.audio().attacks[0];
    assert!(approx(*hz, 600.0));
    assert_eq!(note, "D5");
    assert_eq!(m.coordinate(), Some(NormalizedCoordinate::new(0.5, 0.5)));
    assert_eq!(m.cursor_px(), Some(glam::Vec2::new(150.0, 150.0)));
    assert_eq!(m.audio().applied.len(), 1);

    assert!(m.on_release());
    assert_eq!(m.audio().releases, 1);
    assert_eq!(m.cursor_px(), None);
    assert!(!m.on_release());
    assert_eq!(m.audio().releases, 1);
}

#[test]
fn moves_within_one_frame_coalesce_to_the_last() {
    let mut m = mapper();
    m.on_press(at(150.0, 150.0), pad());
    for x in [10.0, 50.0, 90.0, 240.0] {
        m.on_move(at(x, 60.0), pad());
    }
    assert_eq!(m.audio().applied.len(), 1, "moves must wait for the frame");
    assert_eq!(m.scheduler().pending.len(), 1);
    assert!(m.has_pending_move());

    assert_eq!(m.scheduler_mut().fire(), 1);
    assert!(m.flush());
    assert_eq!(m.audio().applied.len(), 2);
    let last = m.audio().applied[1];
    assert!(approx(last.frequency_hz, 840.0));
    assert!(approx(m.coordinate().map(|c| c.v).unwrap_or(0.0), 0.2));

    // nothing left for a second callback
    assert!(!m.flush());
    assert_eq!(m.audio().applied.len(), 2);
}

#[test]
fn moves_without_press_are_ignored() {
    let mut m = mapper();
    m.on_move(at(20.0, 20.0), pad());
    assert!(!m.has_pending_move());
    assert_eq!(m.scheduler().requests, 0);
    assert!(!m.flush());
}

#[test]
fn release_drops_a_queued_move() {
    let mut m = mapper();
    m.on_press(at(0.0, 0.0), pad());
    m.on_move(at(300.0, 0.0), pad());
    m.on_release();
    assert!(m.scheduler().pending.is_empty());
    assert!(!m.flush());
    assert_eq!(m.audio().applied.len(), 1);
}

#[test]
fn move_flushes_inline_when_frames_are_unavailable() {
    let mut m = mapper();
    m.on_press(at(0.0, 150.0), pad());
    m.scheduler_mut().fail = true;
    m.on_move(at(300.0, 150.0), pad());
    assert_eq!(m.audio().applied.len(), 2);
    assert!(approx(m.audio().applied[1].frequency_hz, 1000.0));
}

#[test]
fn blocked_audio_keeps_pad_responsive_but_silent() {
    let mut m = mapper_with(RecordingAudio {
        resume_fails: true,
        ..RecordingAudio::default()
    });
    m.on_press(at(100.0, 100.0), pad());
    assert!(m.is_active());
    assert!(m.audio().attacks.is_empty());
    assert!(matches!(m.error(), Some(PadError::AudioUnavailable(_))));
    assert!(m.cursor_px().is_some());
    m.on_release();

    // a later gesture that resumes clears the error and sounds
    m.audio_mut().resume_fails = false;
    m.on_press(at(100.0, 100.0), pad());
    assert!(m.error().is_none());
    assert_eq!(m.audio().attacks.len(), 1);
}

#[test]
fn still_suspended_context_reports_blocked_audio() {
    let mut m = mapper_with(RecordingAudio {
        stays_suspended: true,
        ..RecordingAudio::default()
    });
    m.on_press(at(60.0, 90.0), pad());
    assert!(m.audio().attacks.is_empty());
    assert!(matches!(m.error(), Some(PadError::AudioUnavailable(_))));
    assert!(!m.is_audible());

    m.on_move(at(240.0, 90.0), pad());
    m.scheduler_mut().fire();
    m.flush();
    assert!(approx(m.cursor_px().expect("tracked").x, 240.0));
    m.on_release();

    m.audio_mut().stays_suspended = false;
    m.on_press(at(60.0, 90.0), pad());
    assert!(m.error().is_none());
    assert_eq!(m.audio().attacks.len(), 1);
}

#[test]
fn late_resume_failure_silences_the_held_note() {
    let mut m = mapper();
    m.on_press(at(150.0, 150.0), pad());
    assert_eq!(m.audio().attacks.len(), 1);

    m.audio_blocked(PadError::AudioUnavailable("resume rejected".into()));
    assert_eq!(m.audio().releases, 1, "held note is cut");
    assert!(m.is_active());
    assert!(matches!(m.error(), Some(PadError::AudioUnavailable(_))));

    // still tracks, but nothing new sounds until a press resumes
    m.on_move(at(30.0, 30.0), pad());
    m.flush();
    assert!(approx(m.cursor_px().expect("tracked").x, 30.0));
    assert_eq!(m.audio().attacks.len(), 1);
}

#[test]
fn late_resume_failure_outside_a_gesture_only_records() {
    let mut m = mapper();
    m.audio_blocked(PadError::AudioUnavailable("resume rejected".into()));
    assert_eq!(m.audio().releases, 0);
    assert!(m.error().is_some());
}

#[test]
fn effect_change_rewires_and_reapplies_while_held() {
    let mut m = mapper();
    m.on_press(at(150.0, 0.0), pad());
    let wires_before = m.audio().wire_log.len();
    m.set_effect_mode(EffectKind::Delay).expect("rewire");
    assert_eq!(m.route().effect, EffectKind::Delay);
    assert!(m.audio().wire_log.len() > wires_before);
    assert_eq!(m.graph().effects_on_path(Node::Synth).as_slice(), &[Node::Delay]);
    let last = m.audio().applied.last().copied().expect("params re-applied");
    assert_eq!(last.effect.kind(), EffectKind::Delay);
    assert!(approx(last.effect.wet(), 1.0));

    // selecting the same mode again is a no-op
    let wires = m.audio().wire_log.len();
    m.set_effect_mode(EffectKind::Delay).expect("no-op");
    assert_eq!(m.audio().wire_log.len(), wires);
}

#[test]
fn microphone_is_inert_until_attached() {
    let mut m = mapper();
    m.on_press(at(150.0, 150.0), pad());
    m.set_source(SourceKind::Microphone).expect("swap source");
    assert!(!m.is_active(), "swapping source releases the held note");
    assert_eq!(m.audio().releases, 1);

    m.on_press(at(150.0, 150.0), pad());
    assert_eq!(m.audio().attacks.len(), 1, "no attack without a stream");
    assert!(!m.is_audible());
    m.on_release();

    m.audio_mut().mic_ready = true;
    m.reattach_source().expect("reattach");
    assert_eq!(
        m.audio().wire_log.last(),
        Some(&WireOp::Connect(Node::Microphone, Node::Analyser))
    );
    m.on_press(at(150.0, 150.0), pad());
    assert_eq!(m.audio().attacks.len(), 2);
}

#[test]
fn microphone_follows_vertical_volume_without_effect() {
    let mut m = mapper_with(RecordingAudio {
        mic_ready: true,
        ..RecordingAudio::default()
    });
    m.set_source(SourceKind::Microphone).expect("swap source");
    m.on_press(at(150.0, 300.0), pad());
    assert_eq!(m.audio().attacks.len(), 1);
    let p = m.audio().applied.last().copied().expect("applied");
    assert!(approx(p.volume_db, -24.0));
    assert!(approx(p.source_gain(), 0.0631));

    m.on_move(at(150.0, 0.0), pad());
    m.flush();
    let p = m.audio().applied.last().copied().expect("applied");
    assert!(approx(p.source_gain(), 1.0));
}

#[test]
fn late_microphone_failure_is_ignored_after_switching_back() {
    let mut m = mapper();
    m.set_source(SourceKind::Microphone).expect("to mic");
    m.set_source(SourceKind::Oscillator).expect("back to osc");
    assert!(!m.report_device_error(PadError::DeviceUnavailable("denied".into())));
    assert!(m.error().is_none());

    m.set_source(SourceKind::Microphone).expect("to mic");
    assert!(m.report_device_error(PadError::DeviceUnavailable("denied".into())));
    assert!(matches!(m.error(), Some(PadError::DeviceUnavailable(_))));
}

#[test]
fn device_error_is_reported_and_cleared() {
    let mut m = mapper();
    m.report_error(PadError::DeviceUnavailable("denied".into()));
    assert!(m.error().is_some_and(|e| e.is_recoverable()));
    m.clear_error();
    assert!(m.error().is_none());
}

#[test]
fn waveform_reaches_the_engine() {
    let mut m = mapper();
    m.set_waveform(Waveform::Square);
    assert_eq!(m.waveform(), Waveform::Square);
    assert_eq!(m.audio().waveform, Some(Waveform::Square));
}

#[test]
fn listener_sees_every_applied_coordinate() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut m = mapper();
    let sink = seen.clone();
    m.set_on_change(Box::new(move |c| sink.borrow_mut().push(c)));
    m.on_press(at(0.0, 300.0), pad());
    m.on_move(at(150.0, 150.0), pad());
    m.on_move(at(300.0, 0.0), pad());
    m.flush();
    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], NormalizedCoordinate::new(0.0, 1.0));
    assert_eq!(seen[1], NormalizedCoordinate::new(1.0, 0.0));
}
