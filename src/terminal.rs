//! Line-oriented front-end: stdin is the composer, stdout the conversation.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::common::{ChatMessage, SendOutcome};
use crate::session::{ChatSession, SessionUpdate};

const QUIT_COMMAND: &str = "/quit";

pub async fn run(mut session: ChatSession) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut listening = true;

    println!(
        "Signed in as {}. Type a message and press Enter, {QUIT_COMMAND} to leave.",
        session.identity().display_name()
    );

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim() == QUIT_COMMAND {
                    break;
                }
                match session.send(&line) {
                    SendOutcome::Empty => continue,
                    SendOutcome::Sent => {}
                    other => eprintln!("(not delivered: {other:?})"),
                }
                if let Some(message) = session.store().messages().last() {
                    println!("{}", format_line(message));
                }
            }
            update = session.next_event(), if listening => {
                match update {
                    Some(SessionUpdate::Appended) => {
                        if let Some(message) = session.store().messages().last() {
                            println!("{}", format_line(message));
                        }
                    }
                    Some(SessionUpdate::StateChanged(state)) => eprintln!("-- {}", state.label()),
                    Some(SessionUpdate::EchoSuppressed) => {}
                    None => listening = false,
                }
            }
        }
    }

    session.close();
    Ok(())
}

pub fn format_line(message: &ChatMessage) -> String {
    format!(
        "[{}] {}: {}",
        message.timestamp.format("%H:%M:%S"),
        message.sender,
        message.text
    )
}
