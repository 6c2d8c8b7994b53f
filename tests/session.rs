mod tests {
    use photometric_capture::{ColorName, ConfigError, Rgb, SessionConfig};

    #[test]
    fn test_brightness_range() {
        let mut config = SessionConfig::default();
        assert_eq!(config.set_brightness(0), Ok(0));
        assert_eq!(config.set_brightness(255), Ok(255));
        assert_eq!(config.set_brightness(256), Err(ConfigError::Brightness));
        assert_eq!(config.set_brightness(-1), Err(ConfigError::Brightness));
        assert_eq!(config.brightness(), 255);
    }

    #[test]
    fn test_non_square_led_count_keeps_previous() {
        let mut config = SessionConfig::default();
        config.set_active_leds(16).unwrap();

        let err = config.set_active_leds(5).unwrap_err();
        assert_eq!(err.to_string(), "Must be square number ≤ 64.");
        assert_eq!(config.active_leds().count(), 16);

        for count in [0, -9, 65, 100] {
            assert_eq!(config.set_active_leds(count), Err(ConfigError::ActiveLeds));
        }
        assert_eq!(config.active_leds().count(), 16);
    }

    #[test]
    fn test_exposure_must_be_positive() {
        let mut config = SessionConfig::default();
        assert_eq!(config.set_exposure(0), Err(ConfigError::Exposure));
        assert_eq!(config.set_exposure(-100), Err(ConfigError::Exposure));
        assert_eq!(config.exposure().get(), 10_000);
        assert_eq!(config.set_exposure(2_500).map(|e| e.get()), Ok(2_500));
    }

    #[test]
    fn test_exposure_beyond_u32_has_own_message() {
        let mut config = SessionConfig::default();
        let err = config.set_exposure(5_000_000_000).unwrap_err();
        assert_eq!(err, ConfigError::ExposureTooLong);
        assert_eq!(err.to_string(), "Exposure must be at most 4294967295 µs.");
        assert_eq!(
            config.set_exposure(i64::from(u32::MAX)).map(|e| e.get()),
            Ok(u32::MAX)
        );
    }

    #[test]
    fn test_color_selection() {
        let mut config = SessionConfig::default();
        assert_eq!(config.set_color("BLUE"), Ok(ColorName::Blue));
        assert_eq!(config.set_color("off"), Err(ConfigError::Color));
        assert_eq!(config.set_color("purple"), Err(ConfigError::Color));
        assert_eq!(config.color(), ColorName::Blue);
        assert_eq!(ConfigError::Color.to_string(), "Invalid color.");
    }

    #[test]
    fn test_folder_trimmed_and_non_empty() {
        let mut config = SessionConfig::default();
        assert_eq!(config.set_folder("  Mug Scan "), Ok("Mug Scan"));
        assert_eq!(config.set_folder("   "), Err(ConfigError::Folder));
        assert_eq!(config.folder(), Some("Mug Scan"));
    }

    #[test]
    fn test_color_palette() {
        assert_eq!(ColorName::Red.to_rgb(), Rgb::new(255, 0, 0));
        assert_eq!(ColorName::White.to_rgb(), Rgb::new(255, 255, 255));
        assert_eq!(ColorName::Off.to_rgb(), Rgb::new(0, 0, 0));
        assert_eq!(ColorName::parse_from_str("Green"), Some(ColorName::Green));
        assert_eq!(ColorName::default(), ColorName::Green);
    }
}
