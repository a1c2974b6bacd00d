use anyhow::Result;

use super::build;
use super::help_text;

#[test]
fn it_builds_a_valid_command() {
    build().debug_assert();
}

#[test]
fn it_parses_ask_prompts() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "medichat",
        "ask",
        "What",
        "is",
        "a",
        "fever?",
    ])?;

    let (name, subcmd_matches) = matches.subcommand().unwrap();
    assert_eq!(name, "ask");
    let prompt = subcmd_matches
        .get_many::<String>("prompt")
        .unwrap()
        .cloned()
        .collect::<Vec<String>>()
        .join(" ");
    assert_eq!(prompt, "What is a fever?");

    return Ok(());
}

#[test]
fn it_parses_global_urls_after_subcommands() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "medichat",
        "ocr",
        "./scan.png",
        "--ocr-url",
        "http://ocr.internal/ocr",
    ])?;

    let (_, subcmd_matches) = matches.subcommand().unwrap();
    assert_eq!(
        subcmd_matches.get_one::<String>("ocr-url"),
        Some(&"http://ocr.internal/ocr".to_string())
    );
    assert_eq!(
        subcmd_matches.get_one::<String>("file"),
        Some(&"./scan.png".to_string())
    );

    return Ok(());
}

#[test]
fn it_requires_a_file_for_ocr() {
    let res = build().try_get_matches_from(vec!["medichat", "ocr"]);
    assert!(res.is_err());
}

#[test]
fn it_documents_the_newline_hotkey() {
    assert!(help_text().contains("ALT+Enter - Insert a new line in the prompt."));
}
