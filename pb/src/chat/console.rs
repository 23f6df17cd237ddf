//! Interactive console transport

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use super::Dialogue;

/// Line-editing console over a `Dialogue` for a single user
pub struct ChatConsole {
    dialogue: Dialogue,
    user_id: String,
}

impl ChatConsole {
    pub fn new(dialogue: Dialogue, user_id: impl Into<String>) -> Self {
        Self {
            dialogue,
            user_id: user_id.into(),
        }
    }

    /// Run until `/quit` or end of input
    pub async fn run(&self) -> Result<()> {
        debug!(user_id = %self.user_id, "ChatConsole::run: called");
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            match rl.readline(&format!("{} ", ">".bright_green())) {
                Ok(line) => {
                    let input = match classify(&line) {
                        LineAction::Skip => continue,
                        LineAction::Quit => break,
                        LineAction::Send(input) => input,
                    };
                    let _ = rl.add_history_entry(input.trim());

                    match self.dialogue.handle(&self.user_id, input).await {
                        Ok(replies) => {
                            for reply in replies {
                                println!("{}", reply);
                                println!();
                            }
                        }
                        Err(e) => println!("{} {}", "Error:".red(), e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => return Err(eyre::eyre!("Readline error: {}", err)),
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Planbot".bright_cyan().bold());
        println!("Chatting as {}", self.user_id.bright_white());
        println!(
            "Type {} to set up your profile, {} for help, {} to quit",
            "/start".yellow(),
            "/help".yellow(),
            "/quit".yellow()
        );
        println!();
    }
}

/// What the console does with one line of input
#[derive(Debug, PartialEq)]
enum LineAction<'a> {
    Skip,
    Quit,
    /// Forward the line as typed; free text is stored verbatim
    Send(&'a str),
}

fn classify(line: &str) -> LineAction<'_> {
    match line.trim() {
        "" => LineAction::Skip,
        "/quit" | "/q" | "/exit" => LineAction::Quit,
        _ => LineAction::Send(line),
    }
}
