use log::{error, warn};
use relay_chat::client::emoji::expand_shortcodes;
use relay_chat::client::mention::Token;
use relay_chat::client::{ChatClient, Key};
use relay_chat::config::HUB_ENDPOINT;
use relay_chat::roster::Roster;
use relay_chat::transport::{Transport, WsTransport};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Type a message and press Enter. Commands: /like <n>, /mention <name>, /quit";

#[tokio::main]
async fn main() {
    env_logger::init();

    let (transport, mut incoming) = match WsTransport::connect(HUB_ENDPOINT).await {
        Ok(pair) => pair,
        Err(e) => {
            error!("Could not reach hub at {}: {}", HUB_ENDPOINT, e);
            std::process::exit(1);
        }
    };

    let mut client = ChatClient::new(Roster::default(), transport);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };
                if !handle_line(&mut client, &line).await {
                    break;
                }
            }
            frame = incoming.recv() => {
                let Some(frame) = frame else {
                    warn!("Disconnected from hub");
                    client.on_disconnect();
                    break;
                };
                match client.on_broadcast(&frame) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        warn!("Dropping frame from hub: {}", e);
                        continue;
                    }
                }
            }
        }
        print_feed(&client);
    }

    if let Err(e) = client.transport().close().await {
        warn!("Failed to close connection: {}", e);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Like(usize),
    Mention(&'a str),
    Usage,
    Say(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    let (word, arg) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(word, arg)| (word, arg.trim()));

    match word {
        "/quit" => Command::Quit,
        "/like" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Like(n),
            _ => Command::Usage,
        },
        "/mention" if !arg.is_empty() => Command::Mention(arg),
        "/mention" => Command::Usage,
        _ => Command::Say(line),
    }
}

/// Returns `false` when the user asked to quit.
async fn handle_line<T: Transport>(client: &mut ChatClient<T>, line: &str) -> bool {
    match parse_command(line) {
        Command::Quit => return false,
        Command::Usage => println!("{HELP}"),
        Command::Like(n) => {
            if !client.like(n - 1) {
                println!("No message #{n}");
            }
        }
        Command::Mention(name) => {
            if !client.add_pending_mention(name) {
                println!("Pick one of: {}", client.roster().names().join(", "));
            }
        }
        Command::Say(text) => {
            client.on_input_change(expand_shortcodes(text));
            if !client.suggestions().is_empty() {
                println!("Suggestions: {}", client.suggestions().join(", "));
            }
            client.on_key(Key::Enter).await;
        }
    }
    true
}

fn print_feed<T: Transport>(client: &ChatClient<T>) {
    println!();
    for (index, message) in client.messages().iter().enumerate() {
        let rendered: Vec<String> = client
            .render(index)
            .unwrap_or_default()
            .into_iter()
            .map(|token| match token {
                Token::Mention(word) => format!("[{word}]"),
                Token::Plain(word) => word,
            })
            .collect();
        println!(
            "#{} {}: {}  ♥ {}",
            index + 1,
            message.user,
            rendered.join(" "),
            message.likes
        );
    }
    if !client.pending_mentions().is_empty() {
        println!("Mentioning: {}", client.pending_mentions().join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_with_arguments() {
        assert_eq!(parse_command("/like 2"), Command::Like(2));
        assert_eq!(parse_command("  /mention  Bob "), Command::Mention("Bob"));
        assert_eq!(parse_command("/quit"), Command::Quit);
    }

    #[test]
    fn bare_or_bad_commands_show_usage() {
        assert_eq!(parse_command("/like"), Command::Usage);
        assert_eq!(parse_command("/like "), Command::Usage);
        assert_eq!(parse_command("/like 0"), Command::Usage);
        assert_eq!(parse_command("/like two"), Command::Usage);
        assert_eq!(parse_command("/mention"), Command::Usage);
        assert_eq!(parse_command("/mention   "), Command::Usage);
    }

    #[test]
    fn everything_else_is_chat_text() {
        assert_eq!(parse_command("hello @Bob"), Command::Say("hello @Bob"));
        assert_eq!(parse_command("/likes are nice"), Command::Say("/likes are nice"));
    }
}
