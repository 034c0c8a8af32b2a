//! Interactive chat loop
//!
//! A rustyline-driven prompt over an active [`Session`]. Plain input is
//! dispatched to the chat endpoint; slash commands manage history, theme,
//! and the session itself. At the start of an empty chat the configured
//! suggested prompts are offered and can be picked by number, which sends
//! them immediately.

use crate::config::Config;
use crate::error::Result;
use crate::session::{SendOutcome, Session};
use crate::storage::KeyValueStore;
use crate::theme::Theme;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    New,
    List,
    Load(String),
    Delete(String),
    Theme,
    Regen,
    Help,
    Quit,
    Unknown(String),
}

/// Parse a line starting with `/` into a command
fn parse_command(line: &str) -> ReplCommand {
    let mut parts = line.trim_start_matches('/').split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::to_string);

    match (name.as_str(), arg) {
        ("new", _) => ReplCommand::New,
        ("list", _) => ReplCommand::List,
        ("load", Some(id)) => ReplCommand::Load(id),
        ("delete", Some(id)) => ReplCommand::Delete(id),
        ("theme", _) => ReplCommand::Theme,
        ("regen", _) => ReplCommand::Regen,
        ("help", _) => ReplCommand::Help,
        ("quit" | "exit", _) => ReplCommand::Quit,
        (other, _) => ReplCommand::Unknown(other.to_string()),
    }
}

/// Run the interactive loop until the user quits
///
/// The active conversation is saved on exit when it has messages.
pub async fn run(
    session: &mut Session,
    theme_store: Box<dyn KeyValueStore>,
    config: &Config,
) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut theme = Theme::load(theme_store.as_ref())?;

    println!("{}", "bubbly chat".bold());
    print_help();
    if session.messages().is_empty() {
        print_suggestions(config);
    }

    loop {
        let prompt = prompt_label(theme);
        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);

                if line.starts_with('/') {
                    match parse_command(&line) {
                        ReplCommand::Quit => break,
                        ReplCommand::New => {
                            session.start_new()?;
                            println!("Started a new chat");
                            print_suggestions(config);
                        }
                        ReplCommand::List => {
                            crate::commands::history_list(session.history())?;
                        }
                        ReplCommand::Load(id) => {
                            if session.load(&id)? {
                                println!("Loaded chat {} ({} messages)", id, session.messages().len());
                            } else {
                                println!("{}", format!("No stored chat with id {}", id).red());
                            }
                        }
                        ReplCommand::Delete(id) => {
                            session.delete(&id)?;
                            println!("Deleted chat {}", id);
                        }
                        ReplCommand::Theme => {
                            theme = theme.toggled();
                            theme.store(theme_store.as_ref())?;
                            println!("Theme set to {}", theme);
                        }
                        ReplCommand::Regen => {
                            let outcome = session.regenerate().await?;
                            print_outcome(&outcome);
                        }
                        ReplCommand::Help => print_help(),
                        ReplCommand::Unknown(name) => {
                            println!("{}", format!("Unknown command: /{}", name).red());
                        }
                    }
                    continue;
                }

                // A bare number at the start of an empty chat picks a
                // suggested prompt and sends it immediately
                let input = if session.messages().is_empty() {
                    resolve_suggestion(&line, config).unwrap_or(line)
                } else {
                    line
                };

                println!("{}", "thinking...".dimmed());
                let outcome = session.send(&input).await?;
                print_outcome(&outcome);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if !session.messages().is_empty() {
        session
            .history()
            .save(session.current_id(), session.messages())?;
    }
    println!("bye");
    Ok(())
}

/// Map a bare suggestion number to its prompt text, if valid
fn resolve_suggestion(line: &str, config: &Config) -> Option<String> {
    let index: usize = line.parse().ok()?;
    config
        .chat
        .suggested_prompts
        .get(index.checked_sub(1)?)
        .cloned()
}

fn prompt_label(theme: Theme) -> String {
    match theme {
        Theme::Light => format!("{} ", "you >>".green()),
        Theme::Dark => format!("{} ", "you >>".bright_green()),
    }
}

fn print_outcome(outcome: &SendOutcome) {
    match outcome {
        SendOutcome::Replied {
            content,
            search_info,
        } => {
            if let Some(info) = search_info {
                if !info.searches.is_empty() {
                    println!("{}", "Searched the web:".dimmed());
                    for search in &info.searches {
                        println!("  {}", search.query.dimmed());
                    }
                }
            }
            println!("{} {}", "assistant >>".cyan().bold(), content);
        }
        SendOutcome::Fallback(message) => {
            println!("{} {}", "assistant >>".cyan().bold(), message.red());
        }
        SendOutcome::Busy => println!("{}", "A request is already in flight".yellow()),
        SendOutcome::Ignored => {}
    }
}

fn print_suggestions(config: &Config) {
    if config.chat.suggested_prompts.is_empty() {
        return;
    }
    println!("{}", "Try one of these (enter its number):".dimmed());
    for (index, prompt) in config.chat.suggested_prompts.iter().enumerate() {
        println!("  {}. {}", index + 1, prompt);
    }
}

fn print_help() {
    println!(
        "Commands: /new, /list, /load <id>, /delete <id>, /theme, /regen, /help, /quit"
    );
}
