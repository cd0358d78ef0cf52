use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::integer(30).unwrap(), Fps { num: 30, den: 1 });
}

#[test]
fn fps_display_and_timing() {
    let fps = Fps::integer(30).unwrap();
    assert_eq!(fps.to_string(), "30");
    assert_eq!(Fps::new(30000, 1001).unwrap().to_string(), "30000/1001");
    assert!((fps.frames_to_secs(90) - 3.0).abs() < 1e-9);
    assert!((fps.as_f64() - 30.0).abs() < 1e-9);
}

#[test]
fn resolution_parses_width_x_height() {
    assert_eq!("1920x1080".parse::<Resolution>().unwrap(), Resolution::FULL_HD);
    assert_eq!(
        " 1080X720 ".parse::<Resolution>().unwrap(),
        Resolution::HD_720_WIDE
    );
}

#[test]
fn resolution_parse_rejects_garbage_and_zero() {
    assert!("1920".parse::<Resolution>().is_err());
    assert!("axb".parse::<Resolution>().is_err());
    assert!("0x10".parse::<Resolution>().is_err());
    assert!("10x-1".parse::<Resolution>().is_err());
}

#[test]
fn resolution_caps_each_dimension() {
    let max = Resolution::MAX_DIMENSION;
    Resolution::new(max, max).validate().unwrap();
    assert!(Resolution::new(max + 1, 10).validate().is_err());
    assert!(Resolution::new(10, max + 1).validate().is_err());
    assert!("100000x100000".parse::<Resolution>().is_err());
    assert!("4294967295x4294967295".parse::<Resolution>().is_err());
}

#[test]
fn odd_resolutions_are_valid() {
    let r: Resolution = "1921x1081".parse().unwrap();
    assert_eq!(r, Resolution::new(1921, 1081));
    assert!(!r.is_even());
    assert!(Resolution::FULL_HD.is_even());
    assert!(!Resolution::new(10, 7).is_even());
}

#[test]
fn resolution_area_and_len() {
    let r = Resolution::new(4, 3);
    assert_eq!(r.area(), 12);
    assert_eq!(r.rgba_len(), 48);
    assert_eq!(r.to_string(), "4x3");
}

#[test]
fn rgba_len_saturates_for_unvalidated_sizes() {
    let huge = Resolution::new(u32::MAX, u32::MAX);
    assert_eq!(huge.area(), u64::from(u32::MAX) * u64::from(u32::MAX));
    assert_eq!(huge.rgba_len(), usize::MAX);
}
