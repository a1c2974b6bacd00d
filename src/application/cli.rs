#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use owo_colors::OwoColorize;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::MessageType;
use crate::domain::services::ChatSession;
use crate::domain::services::OcrUpload;
use crate::infrastructure::backends::BackendManager;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /ocr (/o) [FILE_PATH] - Uploads a document or image and shows the text extracted from it.
- /quit /exit (/q) - Exit Medichat.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Enter - Send the prompt.
- ALT+Enter - Insert a new line in the prompt.
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+C - Exit.

Only one prompt is sent at a time. Prompts submitted while a reply is still streaming are ignored.
        "#;

    return text.trim().to_string();
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

/// Sends a single prompt and prints the reply to stdout as it streams in.
async fn ask(prompt: &str) -> Result<()> {
    let session = ChatSession::new(BackendManager::chat());
    let mut rx = session.subscribe();
    if !session.submit(prompt) {
        bail!("The prompt must not be empty");
    }

    let mut stdout = tokio::io::stdout();
    let mut printed = 0;
    loop {
        rx.changed().await?;
        let state = rx.borrow_and_update().clone();

        if let Some(buffer) = &state.streaming_buffer {
            stdout.write_all(buffer[printed..].as_bytes()).await?;
            stdout.flush().await?;
            printed = buffer.len();
        }

        if state.is_idle() {
            break;
        }
    }

    let state = session.wait_idle().await;
    if let Some(reply) = state.history.last() {
        if reply.message_type() == MessageType::Error {
            bail!(reply.content.to_string());
        }
        if reply.content.len() > printed {
            stdout.write_all(reply.content[printed..].as_bytes()).await?;
        }
    }
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;

    return Ok(());
}

/// Uploads a single document and prints the extracted text.
async fn ocr(file_path: &str) -> Result<()> {
    let file = path::PathBuf::from(file_path);
    if !file.is_file() {
        bail!(format!("No file found at {file_path}"));
    }

    let upload = OcrUpload::new(BackendManager::ocr());
    upload.select(file);
    upload.upload();
    let state = upload.wait_idle().await;

    println!("{}", state.extracted_text.unwrap_or_default());
    return Ok(());
}

fn arg_chat_url() -> Arg {
    return Arg::new(ConfigKey::ChatURL.to_string())
        .long(ConfigKey::ChatURL.to_string())
        .env("MEDICHAT_CHAT_URL")
        .num_args(1)
        .help(format!(
            "Endpoint streaming chat replies. The prompt is sent as the `prompt` query parameter. [default: {}]",
            Config::default(ConfigKey::ChatURL)
        ))
        .global(true);
}

fn arg_connect_timeout() -> Arg {
    return Arg::new(ConfigKey::ConnectTimeout.to_string())
        .long(ConfigKey::ConnectTimeout.to_string())
        .env("MEDICHAT_CONNECT_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time to wait in milliseconds when connecting to the chat or OCR endpoints. [default: {}]",
            Config::default(ConfigKey::ConnectTimeout)
        ))
        .global(true);
}

fn arg_ocr_url() -> Arg {
    return Arg::new(ConfigKey::OcrURL.to_string())
        .long(ConfigKey::OcrURL.to_string())
        .env("MEDICHAT_OCR_URL")
        .num_args(1)
        .help(format!(
            "Endpoint extracting text from uploaded documents. [default: {}]",
            Config::default(ConfigKey::OcrURL)
        ))
        .global(true);
}

fn arg_config_file() -> Arg {
    return Arg::new(ConfigKey::ConfigFile.to_string())
        .short('c')
        .long(ConfigKey::ConfigFile.to_string())
        .env("MEDICHAT_CONFIG_FILE")
        .num_args(1)
        .help(format!(
            "Path to configuration file [default: {}]",
            Config::default(ConfigKey::ConfigFile)
        ))
        .global(true);
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Send a single prompt and stream the reply to stdout.")
        .arg(
            Arg::new("prompt")
                .help("Prompt to send.")
                .required(true)
                .num_args(1..)
                .trailing_var_arg(true),
        );
}

fn subcommand_ocr() -> Command {
    return Command::new("ocr")
        .about("Extract text from a document or image.")
        .arg(
            Arg::new("file")
                .help("Path to the document or image to upload.")
                .required(true),
        );
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for Medichat")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running Medichat with environment variable RUST_LOG=medichat")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = std::env::var("MEDICHAT_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir()
        .unwrap_or_else(|| return path::PathBuf::from("."))
        .join("medichat");
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return format!("CHAT {line}").underline().bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("medichat")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start a new chat session."))
        .subcommand(subcommand_ask())
        .subcommand(subcommand_ocr())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(arg_config_file())
        .arg(arg_chat_url())
        .arg(arg_ocr_url())
        .arg(arg_connect_timeout());
}

/// Parses the command line and runs one-shot commands. Returns true when the
/// interactive chat should start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_dir().join("debug.log").to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    println!("{}", ConfigKey::VARIANTS.join("\n"));
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
        }
        Some(("ask", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            let prompt = subcmd_matches
                .get_many::<String>("prompt")
                .map(|words| return words.cloned().collect::<Vec<String>>().join(" "))
                .unwrap_or_default();
            ask(&prompt).await?;
            return Ok(false);
        }
        Some(("ocr", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            if let Some(file_path) = subcmd_matches.get_one::<String>("file") {
                ocr(file_path).await?;
            }
            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(false);
        }
        _ => {
            Config::load(vec![&matches]).await?;
        }
    }

    return Ok(true);
}
