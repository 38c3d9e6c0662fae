use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use log::*;
use serde_json::Value;
use service::{config::Config, logging::Logger, AppState};
use sse::{Broadcaster, Message, DEFAULT_CHANNEL};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

#[derive(Parser)]
#[command(author, version, about = "Server-sent events broadcast server", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server streaming channels as server-sent events (the default)
    Serve,

    /// Publish a message
    Publish {
        /// File holding the event data, standard input when omitted or `-`.
        /// Published as a JSON list of the input lines, line endings included
        data: Option<PathBuf>,

        /// Parse the input as a single JSON document and publish it as-is
        #[arg(long)]
        json: bool,

        /// The event's type. If specified, the browser dispatches the event to the listener
        /// for that event name; the onmessage handler is called otherwise
        #[arg(long = "type")]
        type_: Option<String>,

        /// The event ID to set the EventSource object's last event ID value
        #[arg(long)]
        id: Option<String>,

        /// The reconnection time to use when attempting to send the event (milliseconds)
        #[arg(long)]
        retry: Option<String>,

        /// Channel to direct events to different clients
        #[arg(long, default_value = DEFAULT_CHANNEL)]
        channel: String,
    },

    /// Subscribe to a channel and print every frame received
    Subscribe {
        /// Channel to listen on
        #[arg(long, default_value = DEFAULT_CHANNEL)]
        channel: String,
    },
}

#[tokio::main]
async fn main() {
    Config::load_env();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve);

    match command {
        Command::Serve => Logger::init_logger(&cli.config),
        // Keep stdout free for command output.
        _ => Logger::init_stderr_logger(&cli.config),
    }

    let broadcaster = match service::init_broadcaster(&cli.config) {
        Ok(broadcaster) => broadcaster,
        Err(e) => {
            error!("Failed to initialize the message bus: {e}");
            std::process::exit(1);
        }
    };

    let result = match command {
        Command::Serve => serve(cli.config, broadcaster).await,
        Command::Publish {
            data,
            json,
            type_,
            id,
            retry,
            channel,
        } => {
            publish(
                &broadcaster,
                data,
                json,
                MessageOptions { type_, id, retry },
                &channel,
            )
            .await
        }
        Command::Subscribe { channel } => subscribe(&broadcaster, &channel).await,
    };

    if let Err(e) = result {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn serve(config: Config, broadcaster: Arc<Broadcaster>) -> Result<()> {
    let app_state = AppState::new(config, &broadcaster);
    web::init_server(app_state).await?;
    Ok(())
}

struct MessageOptions {
    type_: Option<String>,
    id: Option<String>,
    retry: Option<String>,
}

async fn publish(
    broadcaster: &Broadcaster,
    data: Option<PathBuf>,
    json: bool,
    options: MessageOptions,
    channel: &str,
) -> Result<()> {
    let text = match data {
        Some(path) if path.as_os_str() != "-" => tokio::fs::read_to_string(&path).await?,
        _ => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            text
        }
    };

    let payload = if json {
        serde_json::from_str(&text)?
    } else {
        input_lines(&text)
    };
    let message = build_message(payload, options);
    broadcaster.publish(channel, message).await?;
    info!("Published message to channel {channel}");
    Ok(())
}

async fn subscribe(broadcaster: &Broadcaster, channel: &str) -> Result<()> {
    let mut frames = Box::pin(broadcaster.messages(channel).await?);

    loop {
        tokio::select! {
            frame = frames.next() => match frame {
                Some(frame) => println!("{}", frame?),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, closing subscription to channel {channel}");
                break;
            }
        }
    }

    Ok(())
}

/// Splits the input into a JSON list of lines, each keeping its line ending.
fn input_lines(text: &str) -> Value {
    text.split_inclusive('\n')
        .map(|line| Value::String(line.to_string()))
        .collect()
}

fn build_message(payload: Value, options: MessageOptions) -> Message {
    let mut message = Message::new(payload);
    if let Some(type_) = options.type_ {
        message = message.with_event_type(type_);
    }
    if let Some(id) = options.id {
        message = message.with_id(id);
    }
    if let Some(retry) = options.retry {
        message = message.with_retry(retry);
    }
    message
}
