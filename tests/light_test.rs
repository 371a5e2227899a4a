//! Light phase model tests

use signal_timing::simulation::Light;

#[test]
fn test_green_then_red_within_cycle() {
    let light = Light::new("a", 30.0, 20.0, 0.0);
    assert_eq!(light.cycle(), 50.0);

    assert!(light.is_green(0.0));
    assert!(light.is_green(29.5));
    assert!(!light.is_green(30.0));
    assert!(!light.is_green(49.5));
    assert!(light.is_green(50.0));
}

#[test]
fn test_time_to_next_green() {
    let light = Light::new("a", 30.0, 20.0, 0.0);

    assert_eq!(light.time_to_next_green(10.0), 0.0);
    assert_eq!(light.time_to_next_green(30.0), 20.0);
    assert_eq!(light.time_to_next_green(45.0), 5.0);
    assert_eq!(light.time_to_next_green(95.0), 5.0);
}

#[test]
fn test_negative_offset_shifts_phase() {
    // Phase position is (t + 5) mod 20
    let light = Light::new("a", 10.0, 10.0, -5.0);

    assert!(light.is_green(0.0));
    assert!(!light.is_green(6.0));
    assert_eq!(light.time_to_next_green(6.0), 9.0);
}

#[test]
fn test_offset_beyond_cycle_is_normalized() {
    let wrapped = Light::new("a", 12.0, 8.0, 45.0);
    let plain = Light::new("b", 12.0, 8.0, 5.0);

    for step in 0..200 {
        let t = step as f64 * 0.5;
        assert_eq!(wrapped.is_green(t), plain.is_green(t), "mismatch at t={}", t);
        assert_eq!(
            wrapped.time_to_next_green(t),
            plain.time_to_next_green(t),
            "mismatch at t={}",
            t
        );
    }
}

#[test]
fn test_negative_time_is_handled() {
    let light = Light::new("a", 10.0, 10.0, 0.0);

    // (-1) mod 20 = 19, the last second of red
    assert!(!light.is_green(-1.0));
    assert_eq!(light.time_to_next_green(-1.0), 1.0);
    assert!(light.is_green(-15.0));
}

#[test]
fn test_phase_is_periodic() {
    let lights = [
        Light::new("a", 33.0, 22.0, 0.0),
        Light::new("b", 22.0, 33.0, 7.0),
        Light::new("c", 5.0, 1.0, -13.0),
        Light::new("d", 40.0, 0.0, 3.0),
    ];

    for light in &lights {
        let cycle = light.cycle();
        for t in -100..300 {
            let t = t as f64;
            assert_eq!(
                light.is_green(t),
                light.is_green(t + cycle),
                "light {} not periodic at t={}",
                light.id,
                t
            );
        }
    }
}

#[test]
fn test_zero_red_is_always_green() {
    let light = Light::new("a", 10.0, 0.0, 0.0);

    for t in 0..100 {
        let t = t as f64 * 0.7;
        assert!(light.is_green(t));
        assert_eq!(light.time_to_next_green(t), 0.0);
    }
}

#[test]
fn test_non_positive_cycle_is_always_red() {
    let empty = Light::new("a", 0.0, 0.0, 0.0);
    let negative = Light::new("b", -5.0, 2.0, 0.0);

    for light in [&empty, &negative] {
        for t in [0.0, 1.0, -3.0, 1e6] {
            assert!(!light.is_green(t));
            assert!(light.time_to_next_green(t).is_infinite());
        }
    }
}
