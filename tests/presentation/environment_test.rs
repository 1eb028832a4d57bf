use chat_relay::presentation::Environment;

#[test]
fn given_known_names_when_parsing_environment_then_ignores_case() {
    assert_eq!(
        Environment::try_from("Local".to_string()).unwrap(),
        Environment::Local
    );
    assert_eq!(
        Environment::try_from("TEST".to_string()).unwrap(),
        Environment::Test
    );
    assert_eq!(
        Environment::try_from("production".to_string()).unwrap(),
        Environment::Prod
    );
}

#[test]
fn given_unknown_name_when_parsing_environment_then_returns_error() {
    let error = Environment::try_from("staging".to_string()).unwrap_err();
    assert!(error.contains("staging"));
}

#[test]
fn given_environment_when_displaying_then_matches_settings_file_suffix() {
    assert_eq!(Environment::Prod.to_string(), "prod");
    assert_eq!(Environment::default(), Environment::Local);
}
