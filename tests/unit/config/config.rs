use super::*;

#[test]
fn empty_json_yields_defaults() {
    let cfg: RenderConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, RenderConfig::default());
    assert_eq!(cfg.canvas, Canvas { width: 1080, height: 1920 });
    assert_eq!(cfg.fps, Fps { num: 24, den: 1 });
    assert!((cfg.audio.music_gain - 0.2).abs() < f32::EPSILON);
    assert_eq!(cfg.audio.music_fit, MusicFit::PadSilence);
    assert_eq!(cfg.encode.preset.as_deref(), Some("faster"));
    assert!((cfg.subtitle.min_fade_duration - 0.2).abs() < 1e-12);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_overrides_single_fields() {
    let cfg: RenderConfig = serde_json::from_str(
        r#"{ "fps": { "num": 30, "den": 1 }, "audio": { "music_fit": "loop" },
             "subtitle": { "base_font_size": 64.0 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.fps.num, 30);
    assert_eq!(cfg.audio.music_fit, MusicFit::Loop);
    assert!((cfg.audio.music_gain - 0.2).abs() < f32::EPSILON);
    assert!((cfg.subtitle.base_font_size - 64.0).abs() < f32::EPSILON);
    assert!((cfg.subtitle.fit_height_fraction - 0.15).abs() < f32::EPSILON);
}

#[test]
fn profiles_differ_where_expected() {
    let compact = SubtitleStyle::compact();
    let classic = SubtitleStyle::classic();
    assert!(compact.pop);
    assert!(!classic.pop);
    assert!((compact.fit_height_fraction - 0.15).abs() < f32::EPSILON);
    assert!((classic.fit_height_fraction - 0.2).abs() < f32::EPSILON);
    assert_eq!(SubtitleStyle::default(), compact);
}

#[test]
fn validate_rejects_bad_values() {
    let mut cfg = RenderConfig::default();
    cfg.canvas.width = 1081;
    assert!(matches!(cfg.validate(), Err(ReelError::InvalidInput(_))));

    let mut cfg = RenderConfig::default();
    cfg.audio.music_gain = -1.0;
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.subtitle.vertical_anchor = 1.5;
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.threading.chunk_size = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn from_path_reads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.json");
    std::fs::write(&good, r#"{ "accel": { "enabled": false } }"#).unwrap();
    let cfg = RenderConfig::from_path(&good).unwrap();
    assert!(!cfg.accel.enabled);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{ "fps": { "num": 0, "den": 1 } }"#).unwrap();
    assert!(RenderConfig::from_path(&bad).is_err());

    assert!(RenderConfig::from_path(&dir.path().join("missing.json")).is_err());
}
