use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    assert!(SlashCommand::parse("").is_none());
}

#[test]
fn it_parse_space_only() {
    assert!(SlashCommand::parse("   ").is_none());
}

#[test]
fn it_parse_single_slash() {
    assert!(SlashCommand::parse("/").is_none());
}

#[test]
fn it_parse_invalid_prefix() {
    assert!(SlashCommand::parse("!q").is_none());
}

#[test]
fn it_parse_regular_text() {
    assert!(SlashCommand::parse("Write a function that adds two numbers").is_none());
}

#[test]
fn it_parse_valid_prefix() {
    let cmd = SlashCommand::parse("/q").unwrap();
    assert_eq!(cmd.command, "/q");
    assert!(cmd.args.is_empty());
}

#[test]
fn it_parse_args_ignoring_extra_spaces() {
    let cmd = SlashCommand::parse("  /persona    programmer ").unwrap();
    assert_eq!(cmd.command, "/persona");
    assert_eq!(cmd.args, vec!["programmer".to_string()]);
    assert_eq!(cmd.arg(), Some("programmer"));
}

#[test]
fn it_is_quit() {
    for text in ["/q", "/quit", "/exit"] {
        assert!(SlashCommand::parse(text).unwrap().is_quit());
    }
    assert!(!SlashCommand::parse("/h").unwrap().is_quit());
}

#[test]
fn it_is_help() {
    assert!(SlashCommand::parse("/h").unwrap().is_help());
    assert!(SlashCommand::parse("/help").unwrap().is_help());
}

#[test]
fn it_is_persona_list() {
    assert!(SlashCommand::parse("/pl").unwrap().is_persona_list());
    assert!(SlashCommand::parse("/personas").unwrap().is_persona_list());
    assert!(!SlashCommand::parse("/persona").unwrap().is_persona_list());
}

#[test]
fn it_is_persona_set() {
    let cmd = SlashCommand::parse("/p 2").unwrap();
    assert!(cmd.is_persona_set());
    assert_eq!(cmd.arg(), Some("2"));
}

#[test]
fn it_is_model_list() {
    for text in ["/ml", "/models", "/modellist"] {
        assert!(SlashCommand::parse(text).unwrap().is_model_list());
    }
    assert!(!SlashCommand::parse("/m").unwrap().is_model_list());
}

#[test]
fn it_is_model_set() {
    let cmd = SlashCommand::parse("/model gemini-2.5-pro").unwrap();
    assert!(cmd.is_model_set());
    assert_eq!(cmd.arg(), Some("gemini-2.5-pro"));
}

#[test]
fn it_is_clear() {
    assert!(SlashCommand::parse("/c").unwrap().is_clear());
    assert!(SlashCommand::parse("/clear").unwrap().is_clear());
}

#[test]
fn it_is_reset() {
    assert!(SlashCommand::parse("/reset").unwrap().is_reset());
    assert!(SlashCommand::parse("/r").is_none());
}
