mod tests {
    use clock_pixel_engine::color::{Color, PixelFormat};
    use clock_pixel_engine::effect::{EffectId, SPEED_MAX, SPEED_MIN};
    use clock_pixel_engine::error::InputError;
    use clock_pixel_engine::persistence::ConfigRecord;
    use clock_pixel_engine::state::{ChannelConfig, ChannelState, EffectSettings, clamp_speed};

    fn backlight() -> ChannelState<16> {
        ChannelState::new(ChannelConfig::new("backlight", 6, PixelFormat::Rgbw))
    }

    #[test]
    fn test_defaults() {
        let state = backlight();
        assert_eq!(state.name(), "backlight");
        assert_eq!(state.pixel_count(), 6);
        assert_eq!(state.effect(), EffectId::Solid);
        assert_eq!(state.color(), Color::rgbw(255, 255, 255, 0));
        assert_eq!(state.brightness(), 255);
        assert_eq!(state.speed(), 10);
        assert!(state.is_on());
        assert_eq!(state.mask().as_slice(), [true; 6]);
        assert_eq!(state.settings(), EffectSettings::default());
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = ConfigRecord {
            effect: EffectId::Rainbow,
            speed: 0,
            ..ConfigRecord::DEFAULT
        };
        let state: ChannelState<8> = ChannelState::new(
            ChannelConfig::new("main", 4, PixelFormat::Rgb).with_defaults(defaults),
        );
        assert_eq!(state.effect(), EffectId::Rainbow);
        assert_eq!(state.speed(), SPEED_MIN);
    }

    #[test]
    fn test_color_and_brightness_clamp() {
        let state = backlight();
        state.set_color(-20, 300, 128, 1_000);
        assert_eq!(state.color(), Color::rgbw(0, 255, 128, 255));

        state.set_brightness(-1);
        assert_eq!(state.brightness(), 0);
        state.set_brightness(256);
        assert_eq!(state.brightness(), 255);
        state.set_brightness(77);
        assert_eq!(state.brightness(), 77);
    }

    #[test]
    fn test_speed_clamp() {
        let state = backlight();
        state.set_speed(0);
        assert_eq!(state.speed(), SPEED_MIN);
        state.set_speed(5_000);
        assert_eq!(state.speed(), SPEED_MAX);
        state.set_speed(42);
        assert_eq!(state.speed(), 42);

        assert_eq!(clamp_speed(-3), SPEED_MIN);
        assert_eq!(clamp_speed(101), SPEED_MAX);
    }

    #[test]
    fn test_effect_selection() {
        let state = backlight();
        assert_eq!(state.set_effect_raw(5), Ok(EffectId::Rainbow));
        assert_eq!(state.effect(), EffectId::Rainbow);

        assert_eq!(state.set_effect_raw(42), Err(InputError::UnknownEffectId(42)));
        assert_eq!(state.effect(), EffectId::Rainbow);

        assert_eq!(state.set_effect_by_name("Sparkle"), Ok(EffectId::Sparkle));
        assert_eq!(
            state.set_effect_by_name("plasma"),
            Err(InputError::UnknownEffectName)
        );
        assert_eq!(state.effect(), EffectId::Sparkle);

        state.set_effect(EffectId::Off);
        assert_eq!(state.effect(), EffectId::Off);
    }

    #[test]
    fn test_mask_length_is_checked() {
        let state = backlight();
        assert_eq!(
            state.set_mask(&[true, false]),
            Err(InputError::Length {
                expected: 6,
                actual: 2
            })
        );
        assert_eq!(state.mask().as_slice(), [true; 6]);

        let mask = [true, false, true, false, false, true];
        assert_eq!(state.set_mask(&mask), Ok(()));
        assert_eq!(state.mask().as_slice(), mask);

        assert_eq!(state.set_mask_bytes(&[1, 1, 0, 0, 7, 0]), Ok(()));
        assert_eq!(
            state.mask().as_slice(),
            [true, true, false, false, true, false]
        );
        assert!(state.set_mask_bytes(&[1; 7]).is_err());

        state.clear_mask();
        assert_eq!(state.mask().as_slice(), [true; 6]);
    }

    #[test]
    fn test_raw_writes_are_checked() {
        let state = backlight();
        assert!(state.write_raw(&[Color::WHITE; 6]).is_ok());
        assert_eq!(
            state.write_raw(&[Color::WHITE; 3]),
            Err(InputError::Length {
                expected: 6,
                actual: 3
            })
        );
        assert!(state.set_raw_pixel(5, Color::WHITE).is_ok());
        assert_eq!(
            state.set_raw_pixel(6, Color::WHITE),
            Err(InputError::PixelIndex { index: 6, count: 6 })
        );
    }

    #[test]
    fn test_record_round_trip_in_memory() {
        let state = backlight();
        state.set_effect(EffectId::Breathe);
        state.set_color(1, 2, 3, 4);
        state.set_brightness(99);
        state.set_speed(33);
        state.set_on_state(false);

        let record = state.get_persistent_config();
        assert_eq!(
            record,
            ConfigRecord {
                effect: EffectId::Breathe,
                color: Color::rgbw(1, 2, 3, 4),
                brightness: 99,
                speed: 33,
                on: false,
            }
        );

        let other = backlight();
        other.apply_record(&record);
        assert_eq!(other.settings(), state.settings());
    }

    #[test]
    fn test_apply_record_clamps_speed() {
        let state = backlight();
        state.apply_record(&ConfigRecord {
            speed: 250,
            ..ConfigRecord::DEFAULT
        });
        assert_eq!(state.speed(), SPEED_MAX);
    }

    #[test]
    fn test_health_starts_clean() {
        let state = backlight();
        let health = state.health();
        assert_eq!(health.frames_sent, 0);
        assert_eq!(health.failed_frames, 0);
        assert!(!health.stalled);
        assert_eq!(health.last_error, None);
    }

    #[test]
    fn test_storage_location() {
        let config = ChannelConfig::new("nixie", 6, PixelFormat::Rgb);
        assert_eq!(config.storage_namespace, "pixel_cfg");
        assert_eq!(config.storage_key, "nixie");

        let config = config.with_storage("clock", "backlight_v2");
        assert_eq!(config.storage_namespace, "clock");
        assert_eq!(config.storage_key, "backlight_v2");
    }
}
