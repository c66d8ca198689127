mod tests {
    use clock_pixel_engine::transition::ValueTransition;
    use embassy_time::{Duration, Instant};

    #[test]
    fn test_value_transition_u8() {
        let mut transition = ValueTransition::new_u8(0);
        assert_eq!(transition.current(), 0);
        assert_eq!(transition.is_transitioning(), false);
        transition.set(100, Duration::from_millis(100), Instant::from_millis(0));
        assert_eq!(transition.is_transitioning(), true);

        transition.tick(Instant::from_millis(50));
        assert_eq!(transition.current(), 50);

        transition.tick(Instant::from_millis(100));
        assert_eq!(transition.current(), 100);
        assert_eq!(transition.is_transitioning(), false);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut transition = ValueTransition::new_u8(0);
        transition.set(200, Duration::from_millis(0), Instant::from_millis(10));
        assert_eq!(transition.current(), 200);
        assert_eq!(transition.is_transitioning(), false);
    }

    #[test]
    fn test_retarget_starts_from_reached_value() {
        let mut transition = ValueTransition::new_u8(0);
        transition.set(100, Duration::from_millis(100), Instant::from_millis(0));
        transition.tick(Instant::from_millis(50));
        assert_eq!(transition.current(), 50);

        transition.set(0, Duration::from_millis(100), Instant::from_millis(50));
        transition.tick(Instant::from_millis(50));
        assert_eq!(transition.current(), 50);

        transition.tick(Instant::from_millis(150));
        assert_eq!(transition.current(), 0);
        assert_eq!(transition.is_transitioning(), false);
    }
}
