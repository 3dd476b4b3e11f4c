use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};

use relaychat::chat::{format_help, parse_input, ChatCommand, ChatInput};
use relaychat::{ChatClient, ChatError, Config, Notification, OutboundDraft};

#[derive(Parser)]
#[command(name = "relaychat")]
#[command(about = "Chat with rooms and peers through a relay")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Relay WebSocket endpoint (overrides config and environment)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Log level (overrides config and environment)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = Config::load_with_env(&cli.config).unwrap_or_else(|e| {
        eprintln!("Failed to load {}: {e}", cli.config.display());
        eprintln!("Using default configuration.");
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    });
    if let Some(endpoint) = cli.endpoint {
        config.relay.endpoint = endpoint;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    if let Err(e) = relaychat::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        relaychat::logging::init_console_only(&config.logging.level);
    }

    let mut client = ChatClient::new(&config.relay);
    println!("Connecting to {} ...", config.relay.endpoint);
    if let Err(e) = client.connect(&config.relay.endpoint).await {
        error!(error = %e, "could not connect");
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let code = run(&mut client).await;
    client.close().await;
    info!("bye");
    code
}

/// Interleave stdin lines and relay events until the user quits.
async fn run(client: &mut ChatClient) -> ExitCode {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut draft = OutboundDraft::default();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !handle_line(client, &mut draft, &line) {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "failed to read stdin");
                    return ExitCode::FAILURE;
                }
            },

            Some(event) = client.next_event() => {
                if let Some(notification) = client.handle_event(event) {
                    render(&notification);
                }
            }

            _ = tokio::signal::ctrl_c() => break,
        }
    }

    ExitCode::SUCCESS
}

/// Apply one input line. Returns false when the user asked to quit.
fn handle_line(client: &mut ChatClient, draft: &mut OutboundDraft, line: &str) -> bool {
    match parse_input(line) {
        ChatInput::Message(text) => {
            draft.text = text;
            match client.send(draft) {
                Ok(_) => {}
                Err(ChatError::Validation(e)) => println!("! {e}"),
                Err(e) => println!("! {e}"),
            }
        }
        ChatInput::Command(command) => {
            debug!(command = command.name(), "input command");
            match command {
                ChatCommand::Join(room_id) => {
                    if !client.join_room(&room_id) {
                        println!("usage: /join <room>");
                    }
                }
                ChatCommand::To(user) => {
                    if user.is_empty() {
                        println!("Private target cleared; messages go to the room.");
                    } else {
                        println!("Messages now go privately to {user}. Use /to to clear.");
                    }
                    draft.target_user_id = user;
                }
                ChatCommand::WhoAmI => {
                    let session = client.session();
                    if session.local_identity().is_empty() {
                        println!("No identity yet ({}).", session.state());
                    } else {
                        println!("Your id: {}", session.local_identity());
                    }
                    if let Some(room) = session.current_room() {
                        println!("Room: {room}");
                    }
                }
                ChatCommand::Log => {
                    println!("Room messages:");
                    for line in client.session().log().render() {
                        println!("  {line}");
                    }
                }
                ChatCommand::Help => println!("{}", format_help()),
                ChatCommand::Quit => return false,
                unknown @ ChatCommand::Unknown(_) => {
                    println!("! unknown command {unknown}; try /help");
                }
            }
        }
    }
    true
}

fn render(notification: &Notification) {
    match notification {
        Notification::Registered { identity } => println!("Connected. Your id: {identity}"),
        Notification::PrivateMessage { sender_id, message } => {
            println!("** Private message from {sender_id}: {message}");
        }
        Notification::RoomMessage(entry) => println!("{}", entry.format()),
        Notification::Disconnected { reason } => {
            println!("*** Disconnected ({reason}). /quit to exit.");
        }
    }
}
