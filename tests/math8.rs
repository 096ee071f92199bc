mod tests {
    use myrtio_strip_engine::math8::{scale_brightness, scale_unit};

    #[test]
    fn test_scale_brightness() {
        assert_eq!(scale_brightness(255, 255), 255);
        assert_eq!(scale_brightness(200, 0), 0);
        assert_eq!(scale_brightness(255, 128), 128);
        assert_eq!(scale_brightness(100, 128), 50);
        assert_eq!(scale_brightness(1, 127), 0);
        assert_eq!(scale_brightness(1, 128), 1);
    }

    #[test]
    fn test_scale_unit() {
        assert_eq!(scale_unit(255, 0.0), 0);
        assert_eq!(scale_unit(255, 0.5), 128);
        assert_eq!(scale_unit(255, 1.0), 255);
        assert_eq!(scale_unit(101, 0.55), 56);
        assert_eq!(scale_unit(200, -3.0), 0);
        assert_eq!(scale_unit(200, 7.0), 200);
    }
}
