use std::fs;
use symbios_flora::{Grammar, ModelParams, Preset, PresetError};

#[test]
fn test_capture_apply_round_trip() {
    let grammar = Grammar::new("X", "X:F[+X]F\nF : FF", 4);
    let params = ModelParams {
        init_angle: 10.0,
        rot_angle: 22.5,
        dev_angle: 3.0,
        sides: 12,
        segment_length: 7.0,
        cut_len_factor: 0.8,
        segment_thickness: 2.5,
        cut_thi_factor: 0.7,
    };

    let json = Preset::capture(&grammar, &params).to_json().unwrap();
    assert!(json.contains("\"l-system\""));
    assert!(json.contains("\"model-param\""));
    assert!(json.contains("\"nrSides\": \"12\""));
    assert!(json.contains("\"cutThicknessFactor\""));

    let mut g = Grammar::default();
    let mut p = ModelParams::default();
    Preset::from_json(&json).unwrap().apply(&mut g, &mut p);

    assert_eq!(g.axiom, "X");
    assert_eq!(g.rule_lines(), grammar.rule_lines());
    assert_eq!(g.iterations(), 4);
    assert_eq!(g.derive(), grammar.derive());
    assert_eq!(p, params);
}

#[test]
fn test_numeric_values_are_accepted() {
    let json = r#"{
        "l-system": { "axiom": "F", "rules": ["F:FF"], "iterations": 3 },
        "model-param": { "rotAngle": 30, "nrSides": 6, "segmentLength": 2.5 }
    }"#;
    let mut g = Grammar::default();
    let mut p = ModelParams::default();
    Preset::from_json(json).unwrap().apply(&mut g, &mut p);

    assert_eq!(g.iterations(), 3);
    assert_eq!(p.rot_angle, 30.0);
    assert_eq!(p.sides, 6);
    assert_eq!(p.segment_length, 2.5);
}

#[test]
fn test_missing_fields_keep_current_values() {
    let mut g = Grammar::new("A", "A:B", 2);
    let mut p = ModelParams {
        dev_angle: 1.0,
        ..Default::default()
    };
    Preset::from_json(r#"{ "model-param": { "rotAngle": "45" } }"#)
        .unwrap()
        .apply(&mut g, &mut p);

    assert_eq!(g.axiom, "A");
    assert_eq!(g.iterations(), 2);
    assert_eq!(p.rot_angle, 45.0);
    assert_eq!(p.dev_angle, 1.0);
}

#[test]
fn test_values_go_through_setters() {
    let json = r#"{
        "l-system": { "iterations": "zero" },
        "model-param": { "nrSides": "abc", "segmentLength": "900", "cutLengthFactor": "x" }
    }"#;
    let mut g = Grammar::new("F", "F:FF", 5);
    let mut p = ModelParams {
        sides: 20,
        ..Default::default()
    };
    Preset::from_json(json).unwrap().apply(&mut g, &mut p);

    assert_eq!(g.iterations(), 1);
    assert_eq!(p.sides, 8);
    assert_eq!(p.segment_length, 50.0);
    assert_eq!(p.cut_len_factor, 1.0);
}

#[test]
fn test_unknown_fields_are_invalid() {
    for json in [
        r#"{ "l-system": { "axiom": "F", "colour": "red" } }"#,
        r#"{ "model-param": { "nrSides": "8", "leafSize": "2" } }"#,
        r#"{ "l-system": {}, "extras": {} }"#,
    ] {
        let err = Preset::from_json(json).unwrap_err();
        assert!(matches!(err, PresetError::Invalid(_)), "{json}: {err}");
    }
}

#[test]
fn test_malformed_json_is_json_error() {
    let err = Preset::from_json("{ \"l-system\": ").unwrap_err();
    assert!(matches!(err, PresetError::Json(_)), "{err}");

    let err = Preset::from_json("not json").unwrap_err();
    assert!(matches!(err, PresetError::Json(_)), "{err}");
}

#[test]
fn test_save_and_load_file() {
    let dir = std::env::temp_dir().join(format!("symbios_flora_preset_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("fern.json");

    let grammar = Grammar::new("X", "X:F-[[X]+X]+F[+FX]-X\nF:FF", 5);
    let params = ModelParams {
        rot_angle: 25.0,
        ..Default::default()
    };
    let preset = Preset::capture(&grammar, &params);
    preset.save(&path).unwrap();

    assert_eq!(Preset::load(&path).unwrap(), preset);
    assert!(matches!(
        Preset::load(&dir.join("missing.json")),
        Err(PresetError::Io(_))
    ));

    fs::remove_dir_all(&dir).ok();
}
