use super::*;

#[test]
fn defaults_validate() {
    MorphConfig::default().validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = MorphConfig::from_json_str(
        r#"{ "physics": { "stiffness": 0.4, "body_type": "stiff" }, "adaptive": { "enabled": false } }"#,
    )
    .unwrap();
    assert_eq!(cfg.physics.stiffness, 0.4);
    assert_eq!(cfg.physics.body_type, BodyType::Stiff);
    assert_eq!(cfg.physics.damping, PhysicsConfig::default().damping);
    assert!(!cfg.adaptive.enabled);
    assert_eq!(cfg.extract, ExtractConfig::default());
    assert!((cfg.physics.effective_stiffness() - 1.2).abs() < 1e-12);
}

#[test]
fn fragment_detection_parses_both_modes() {
    let cfg = MorphConfig::from_json_str(
        r#"{ "physics": { "breaking": { "fragment_detection": "every_break" } } }"#,
    )
    .unwrap();
    assert_eq!(
        cfg.physics.breaking.fragment_detection,
        FragmentDetection::EveryBreak
    );

    let cfg = MorphConfig::from_json_str(
        r#"{ "physics": { "breaking": { "fragment_detection": { "broken_ratio": 0.5 } } } }"#,
    )
    .unwrap();
    assert_eq!(
        cfg.physics.breaking.fragment_detection,
        FragmentDetection::BrokenRatio(0.5)
    );
}

#[test]
fn json_roundtrip_preserves_config() {
    let mut cfg = MorphConfig::default();
    cfg.transition.morph_duration = 2.5;
    cfg.physics.parallel = true;
    let text = cfg.to_json_string().unwrap();
    assert_eq!(MorphConfig::from_json_str(&text).unwrap(), cfg);
}

#[test]
fn invalid_values_are_rejected() {
    let err = MorphConfig::from_json_str(r#"{ "physics": { "damping": 1.5 } }"#).unwrap_err();
    assert!(err.to_string().contains("physics.damping"));

    let err = MorphConfig::from_json_str(
        r#"{ "extract": { "min_vertex_count": 50, "max_vertex_count": 10 } }"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("max_vertex_count"));

    let err = MorphConfig::from_json_str(r#"{ "extract": { "padding": 100000 } }"#).unwrap_err();
    assert!(err.to_string().contains("extract.padding"));
    assert!(MorphConfig::from_json_str(r#"{ "extract": { "padding": 64 } }"#).is_ok());

    let err = MorphConfig::from_json_str(r#"{ "transition": { "morph_duration": 0 } }"#)
        .unwrap_err();
    assert!(err.to_string().contains("morph_duration"));

    assert!(matches!(
        MorphConfig::from_json_str("{ nope").unwrap_err(),
        MorphError::Serde(_)
    ));
}

#[test]
fn missing_file_is_wrapped() {
    let err = MorphConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, MorphError::Other(_)));
}
