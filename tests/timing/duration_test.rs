//! Duration arithmetic and OS timestamp interop.

use super::common::{ms, us};
use chronon_core::{Duration, TimeError, Timespec};

#[test]
fn test_five_seconds_minus_two() {
    let five = Duration::from_lower_seconds_i64(5).unwrap();
    let two = Duration::from_seconds_f32(2.0).unwrap();

    let three = five.checked_sub(two).unwrap();
    assert_eq!(three.as_microseconds_i64(), 3_000_000);
    assert_eq!(three.as_lower_seconds_i64(), 3);
    assert_eq!(three.as_milliseconds_i32().unwrap(), 3_000);
    assert!((three.as_seconds_f32() - 3.0).abs() < f32::EPSILON);
}

#[test]
fn test_max_plus_one_overflows() {
    let err = Duration::MAX.checked_add(us(1)).unwrap_err();
    assert!(err.is_overflow());
    assert!(Duration::MIN.checked_sub(us(1)).unwrap_err().is_overflow());
}

#[test]
fn test_divide_by_zero_is_reported() {
    assert_eq!(ms(10).checked_div(0), Err(TimeError::DivideByZero));
}

#[test]
fn test_timespec_round_trip() {
    for value in [
        us(0),
        us(1),
        us(-1),
        us(1_500_000),
        us(-1_500_000),
        us(86_400_000_123),
    ] {
        let ts = value.to_os_timespec().unwrap();
        assert!(ts.is_normalized(), "{ts:?} not normalized");
        let back = Duration::from_os_timespec(ts).unwrap();
        assert_eq!(back, value);
    }
}

#[test]
fn test_timespec_from_os_drops_sub_microsecond() {
    let reading = Duration::from_os_timespec(Timespec {
        seconds: 12,
        nanoseconds: 345_678_999,
    })
    .unwrap();
    assert_eq!(reading, us(12_345_678));
}

#[test]
fn test_platform_reading_converts_to_timespec() {
    let reading = chronon_platform::now();
    let ts = reading.to_os_timespec().unwrap();
    assert!(ts.is_normalized());
    assert_eq!(Duration::from_os_timespec(ts).unwrap(), reading);
}
