mod tests {
    use clock_pixel_engine::color::{Color, PixelFormat};
    use clock_pixel_engine::filter::{Current, CurrentLimit, CurrentModel, Scale};

    const PLAIN: CurrentModel = CurrentModel {
        per_subchannel_ma: 20,
        reserve_ma: 0,
    };

    #[test]
    fn test_estimate() {
        let model = CurrentModel::DEFAULT;
        assert_eq!(model.per_subchannel_ma, 20);
        assert_eq!(model.reserve_ma, 400);

        let frame = [Color::WHITE; 10];
        assert_eq!(model.estimate_ma(&frame, PixelFormat::Rgb), 600);

        let frame = [Color::rgbw(255, 255, 255, 255); 10];
        assert_eq!(model.estimate_ma(&frame, PixelFormat::Rgbw), 800);
        // White is not wired on RGB strips
        assert_eq!(model.estimate_ma(&frame, PixelFormat::Rgb), 600);
    }

    #[test]
    fn test_within_budget_passes_unchanged() {
        let model = CurrentModel::DEFAULT;
        let mut frame = [Color::rgb(200, 10, 3); 10];
        let original = frame;

        // 213 * 10 * 20 / 255 = 167 mA, budget 1000 - 400 reserve
        assert_eq!(
            model.limit(Current::Milliamps(1_000), &mut frame, PixelFormat::Rgb),
            None
        );
        assert_eq!(frame, original);

        assert_eq!(
            model.limit(Current::Unlimited, &mut frame, PixelFormat::Rgb),
            None
        );
        assert_eq!(frame, original);
    }

    #[test]
    fn test_exact_half_scale() {
        let model = CurrentModel {
            per_subchannel_ma: 51,
            reserve_ma: 0,
        };
        let mut frame = [Color::rgb(128, 0, 0); 10];
        let scale = model.limit(Current::Milliamps(128), &mut frame, PixelFormat::Rgb);

        assert_eq!(scale.map(|scale| scale.as_permille()), Some(500));
        assert_eq!(frame, [Color::rgb(64, 0, 0); 10]);
    }

    #[test]
    fn test_budget_is_never_exceeded() {
        let frames: [[Color; 6]; 3] = [
            [Color::WHITE; 6],
            [
                Color::rgbw(255, 0, 0, 255),
                Color::rgbw(1, 2, 3, 4),
                Color::rgbw(250, 250, 0, 0),
                Color::BLACK,
                Color::rgbw(17, 99, 201, 33),
                Color::rgbw(255, 255, 255, 255),
            ],
            [Color::rgb(3, 7, 11); 6],
        ];

        for frame in frames {
            for budget in [0, 1, 50, 133, 399, 401, 450, 777, 2_000] {
                let model = CurrentModel::DEFAULT;
                let mut limited = frame;
                model.limit(Current::Milliamps(budget), &mut limited, PixelFormat::Rgbw);

                let ceiling = u64::from(budget.saturating_sub(400)) * 255;
                let estimate = model.estimate_units(&limited, PixelFormat::Rgbw);
                assert!(
                    estimate <= ceiling,
                    "budget {budget}: estimate {estimate} over ceiling {ceiling}"
                );
            }
        }
    }

    #[test]
    fn test_reserve_above_budget_blanks_output() {
        let model = CurrentModel::DEFAULT;
        let mut frame = [Color::WHITE; 4];
        let scale = model.limit(Current::Milliamps(300), &mut frame, PixelFormat::Rgb);

        assert_eq!(scale.map(|scale| scale.as_permille()), Some(0));
        assert_eq!(frame, [Color::BLACK; 4]);
    }

    #[test]
    fn test_scaling_keeps_color_ratio() {
        let mut frame = [Color::rgb(200, 100, 50); 10];
        // 350 * 10 * 20 units estimated against 100 mA
        let scale = PLAIN.limit(Current::Milliamps(100), &mut frame, PixelFormat::Rgb);

        assert!(scale.is_some());
        assert_eq!(frame, [Color::rgb(72, 36, 18); 10]);
    }

    #[test]
    fn test_scale_apply_to() {
        let half = Scale::new(1, 2);
        assert_eq!(half.apply_to(255), 127);
        assert_eq!(half.apply_to(1), 0);
        assert_eq!(half.as_permille(), 500);

        // Never amplifies
        let clamped = Scale::new(5, 2);
        assert_eq!(clamped.apply_to(100), 100);

        let degenerate = Scale::new(0, 0);
        assert_eq!(degenerate.apply_to(255), 0);
    }

    #[test]
    fn test_shared_limit() {
        let limit = CurrentLimit::default();
        assert_eq!(limit.get(), Current::Unlimited);
        limit.set(Current::Milliamps(1_500));
        assert_eq!(limit.get(), Current::Milliamps(1_500));
    }
}
