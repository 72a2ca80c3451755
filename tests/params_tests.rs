use rand::SeedableRng;
use rand::rngs::StdRng;
use symbios_flora::ModelParams;

#[test]
fn test_defaults() {
    let p = ModelParams::default();
    assert_eq!(p.init_angle, 0.0);
    assert_eq!(p.rot_angle, 60.0);
    assert_eq!(p.dev_angle, 5.0);
    assert_eq!(p.sides, 8);
    assert_eq!(p.segment_length, 5.0);
    assert_eq!(p.cut_len_factor, 0.9);
    assert_eq!(p.segment_thickness, 1.0);
    assert_eq!(p.cut_thi_factor, 0.9);
}

#[test]
fn test_sides_clamp_and_fallback() {
    let mut p = ModelParams::default();
    p.set_sides_str("100");
    assert_eq!(p.sides, 64);
    p.set_sides_str("2");
    assert_eq!(p.sides, 3);
    p.set_sides_str("-12");
    assert_eq!(p.sides, 12);

    // A bad side count resets the side count itself, never the length.
    p.set_segment_length(7.0);
    p.set_sides_str("many");
    assert_eq!(p.sides, 8);
    assert_eq!(p.segment_length, 7.0);
}

#[test]
fn test_segment_length_clamp_and_fallback() {
    let mut p = ModelParams::default();
    p.set_segment_length_str("0.2");
    assert_eq!(p.segment_length, 1.0);
    p.set_segment_length_str("70");
    assert_eq!(p.segment_length, 50.0);
    p.set_segment_length_str("-7");
    assert_eq!(p.segment_length, 7.0);
    p.set_segment_length_str("long");
    assert_eq!(p.segment_length, 1.0);
}

#[test]
fn test_thickness_clamp_and_fallback() {
    let mut p = ModelParams::default();
    p.set_segment_thickness_str("25");
    assert_eq!(p.segment_thickness, 20.0);
    p.set_segment_thickness_str("0.5");
    assert_eq!(p.segment_thickness, 1.0);
    p.set_segment_thickness_str("3.5");
    assert_eq!(p.segment_thickness, 3.5);
    p.set_segment_thickness_str("");
    assert_eq!(p.segment_thickness, 1.0);
}

#[test]
fn test_taper_factors() {
    let mut p = ModelParams::default();
    p.set_cut_len_factor_str("0.1");
    assert_eq!(p.cut_len_factor, 0.5);
    p.set_cut_len_factor_str("5");
    assert_eq!(p.cut_len_factor, 3.0);
    p.set_cut_len_factor_str("?");
    assert_eq!(p.cut_len_factor, 1.0);

    p.set_cut_thi_factor_str("0.75");
    assert_eq!(p.cut_thi_factor, 0.75);
    p.set_cut_thi_factor_str("NaN");
    assert_eq!(p.cut_thi_factor, 1.0);
}

#[test]
fn test_angles() {
    let mut p = ModelParams::default();
    p.set_dev_angle_str("-3");
    assert_eq!(p.dev_angle, 0.0);
    p.set_dev_angle_str("x");
    assert_eq!(p.dev_angle, 5.0);
    p.set_rot_angle_str("22.5");
    assert_eq!(p.rot_angle, 22.5);
    p.set_rot_angle_str("x");
    assert_eq!(p.rot_angle, 60.0);
    p.set_init_angle_str("-45");
    assert_eq!(p.init_angle, -45.0);
    p.set_init_angle_str("x");
    assert_eq!(p.init_angle, 0.0);
}

#[test]
fn test_sanitized_clamps_every_field() {
    let p = ModelParams {
        init_angle: 10.0,
        rot_angle: 30.0,
        dev_angle: -1.0,
        sides: 1,
        segment_length: 100.0,
        cut_len_factor: 0.0,
        segment_thickness: -30.0,
        cut_thi_factor: 9.0,
    }
    .sanitized();

    assert_eq!(p.init_angle, 10.0);
    assert_eq!(p.rot_angle, 30.0);
    assert_eq!(p.dev_angle, 0.0);
    assert_eq!(p.sides, 3);
    assert_eq!(p.segment_length, 50.0);
    assert_eq!(p.cut_len_factor, 0.5);
    assert_eq!(p.segment_thickness, 20.0);
    assert_eq!(p.cut_thi_factor, 3.0);
}

#[test]
fn test_sampled_angles_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(42);
    let p = ModelParams {
        rot_angle: 30.0,
        dev_angle: 10.0,
        ..Default::default()
    };
    for _ in 0..1000 {
        let a = p.sample_angle(&mut rng);
        assert!((20.0..=40.0).contains(&a), "angle {a} out of range");
    }

    let fixed = ModelParams {
        rot_angle: 25.0,
        dev_angle: 0.0,
        ..Default::default()
    };
    assert_eq!(fixed.sample_angle(&mut rng), 25.0);
}
