mod tests {
    use photometric_capture::command::HELP;
    use photometric_capture::{Command, ParseError};

    #[test]
    fn test_parse_numeric_commands() {
        assert_eq!(Command::parse("brightness 120"), Ok(Command::Brightness(120)));
        assert_eq!(Command::parse("LEDS 16"), Ok(Command::Leds(16)));
        assert_eq!(Command::parse("  exposure   -5 "), Ok(Command::Exposure(-5)));
    }

    #[test]
    fn test_malformed_arguments_print_usage() {
        assert_eq!(
            Command::parse("brightness"),
            Err(ParseError::Usage("Usage: brightness <value>"))
        );
        assert_eq!(
            Command::parse("brightness bright"),
            Err(ParseError::Usage("Usage: brightness <value>"))
        );
        assert_eq!(
            Command::parse("leds 4 9"),
            Err(ParseError::Usage("Usage: leds <value>"))
        );
        assert_eq!(
            Command::parse("color"),
            Err(ParseError::Usage("Usage: color <name>"))
        );
        assert_eq!(
            Command::parse("folder   "),
            Err(ParseError::Usage("Usage: folder <folder_name>"))
        );
    }

    #[test]
    fn test_oversized_numbers_saturate() {
        assert_eq!(
            Command::parse("brightness 99999999999999999999"),
            Ok(Command::Brightness(i64::MAX))
        );
        assert_eq!(
            Command::parse("exposure -99999999999999999999"),
            Ok(Command::Exposure(i64::MIN))
        );
        assert_eq!(
            Command::parse("leds 9x"),
            Err(ParseError::Usage("Usage: leds <value>"))
        );
    }

    #[test]
    fn test_help_lists_every_keyword() {
        for line in ["capture", "status", "help", "exit", "quit"] {
            assert!(HELP.contains(line), "help text is missing {line}");
            assert!(Command::parse(line).is_ok());
        }
        for keyword in ["brightness", "leds", "exposure", "color", "folder"] {
            assert!(HELP.contains(keyword), "help text is missing {keyword}");
        }
    }

    #[test]
    fn test_color_is_case_insensitive() {
        assert_eq!(Command::parse("Color RED"), Ok(Command::Color("red".into())));
    }

    #[test]
    fn test_folder_keeps_rest_of_line() {
        assert_eq!(
            Command::parse("folder  Mug Scan 01 "),
            Ok(Command::Folder("Mug Scan 01".into()))
        );
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::parse("capture"), Ok(Command::Capture));
        assert_eq!(Command::parse("STATUS"), Ok(Command::Status));
        assert_eq!(Command::parse("help"), Ok(Command::Help));
        assert_eq!(Command::parse("exit"), Ok(Command::Exit));
        assert_eq!(Command::parse("Quit"), Ok(Command::Exit));
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(Command::parse("focus"), Err(ParseError::Unknown));
        assert_eq!(Command::parse("capture now"), Err(ParseError::Unknown));
        assert_eq!(ParseError::Unknown.to_string(), "Unknown command.");
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
    }
}
