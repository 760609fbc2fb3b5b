#[cfg(test)]
mod tests {
    use super::super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.bind, "127.0.0.1:3001");
        assert_eq!(config.scoring, ScoringRules::default());
        assert!(config.sample.seed);
    }

    #[test]
    fn test_partial_scoring_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [scoring]
            no_step = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.scoring.no_step, 10);
        assert_eq!(config.scoring.yes_step, 5);
        assert_eq!(config.scoring.support_denominator, 3);
    }

    #[test]
    fn test_question_catalog_override() {
        let config = Config::from_toml_str(
            r#"
            [[questions.catalog]]
            id = "dose"
            text = "Is the dosage feasible?"

            [[questions.catalog]]
            id = "contra"
            text = "Any contraindications?"
            "#,
        )
        .unwrap();
        assert_eq!(config.questions.catalog.len(), 2);
        assert_eq!(config.questions.catalog[0].id.as_str(), "dose");
    }

    #[test]
    fn test_duplicate_question_rejected() {
        let err = Config::from_toml_str(
            r#"
            [[questions.catalog]]
            id = "q1"
            text = "a"

            [[questions.catalog]]
            id = "q1"
            text = "b"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("q1")));
    }

    #[test]
    fn test_zero_support_denominator_rejected() {
        let err = Config::from_toml_str("[scoring]\nsupport_denominator = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = Config::from_toml_str("[server\nbind = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_named_file_is_error() {
        let err = Config::from_path("/nonexistent/repurview.toml").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
