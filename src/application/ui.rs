#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use dialoguer::Input;
use dialoguer::Password;
use strum::IntoEnumIterator;
use tokio::task;
use yansi::Paint;

use crate::application::cli::format_personas;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Persona;
use crate::domain::models::Role;
use crate::domain::models::SlashCommand;
use crate::domain::models::Turn;
use crate::domain::services::Orchestrator;
use crate::domain::services::OrchestratorState;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /personas (/pl) - Lists all available personas.
- /persona (/p) [PERSONA_ID,PERSONA_INDEX] - Switches persona. The conversation is kept, the new persona applies from the next message on.
- /models (/ml) - Lists all models available to your API key.
- /model (/m) [MODEL_NAME,MODEL_INDEX] - Sets the model used for the next messages. You can pass either the model name, or the index from /models.
- /clear (/c) - Clears the conversation after confirmation.
- /reset - Deletes the stored API key and clears the conversation.
- /quit /exit (/q) - Exit.
- /help (/h) - Provides this help menu.
        "#;

    return text.trim().to_string();
}

/// Resolves a persona from its id or its 1-based position in the list.
pub fn resolve_persona(arg: &str) -> Option<Persona> {
    if let Ok(idx) = arg.parse::<usize>() {
        if idx < 1 {
            return None;
        }
        return Persona::iter().nth(idx - 1);
    }

    return Persona::parse(arg);
}

/// Resolves a model from its name or its 1-based position in `models`.
pub fn resolve_model(arg: &str, models: &[String]) -> Result<String, String> {
    if let Ok(idx) = arg.parse::<usize>() {
        if idx < 1 || idx > models.len() {
            return Err(format!("{idx} is not a valid index from the model list."));
        }
        return Ok(models[idx - 1].to_string());
    }

    let name = arg.trim_start_matches("models/");
    if !models.iter().any(|model| return model == name) {
        return Err(format!(
            "No model named {name} found. Did you mistype it?"
        ));
    }

    return Ok(name.to_string());
}

pub fn format_models(models: &[String]) -> String {
    return models
        .iter()
        .enumerate()
        .map(|(idx, model)| {
            let n = idx + 1;
            return format!("- ({n}) {model}");
        })
        .collect::<Vec<String>>()
        .join("\n");
}

pub fn turn_author(turn: &Turn, username: &str, persona: Persona) -> String {
    match turn.role() {
        Role::User => return username.to_string(),
        Role::Model => return persona.display_name().to_string(),
    }
}

fn print_notice(text: &str) {
    println!("{}\n", Paint::yellow(text));
}

fn print_error(text: &str) {
    println!("{}\n", Paint::red(text));
}

fn print_turn(turn: &Turn, persona: Persona) {
    let author = turn_author(turn, &Config::get(ConfigKey::Username), persona);
    let label = match turn.role() {
        Role::User => Paint::cyan(author).bold(),
        Role::Model => Paint::green(author).bold(),
    };

    if turn.role() == Role::Model && turn.content().starts_with("Error:") {
        println!("{label}\n{}\n", Paint::red(turn.content()));
    } else {
        println!("{label}\n{}\n", turn.content());
    }
}

fn print_greeting(orchestrator: &Orchestrator) {
    let persona = orchestrator.persona();
    println!(
        "{}\n",
        Paint::green(format!(
            "Hey there! {} here, running on {}. What can I do for you? Type /help for commands.",
            persona.display_name(),
            orchestrator.model()
        ))
    );
}

/// Runs a blocking terminal prompt off the async runtime. `None` means the
/// user closed the input (Ctrl-C / Ctrl-D).
async fn prompt<T, F>(f: F) -> Result<Option<T>>
where
    T: Send + 'static,
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
{
    match task::spawn_blocking(f).await? {
        Ok(res) => return Ok(Some(res)),
        Err(err) => {
            tracing::debug!(error = ?err, "Prompt closed");
            return Ok(None);
        }
    }
}

async fn read_credential() -> Result<Option<String>> {
    return prompt(|| {
        return Password::with_theme(&ColorfulTheme::default())
            .with_prompt("API KEY")
            .allow_empty_password(true)
            .interact();
    })
    .await;
}

async fn read_message() -> Result<Option<String>> {
    let username = Config::get(ConfigKey::Username);
    return prompt(move || {
        return Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(username)
            .allow_empty(true)
            .interact_text();
    })
    .await;
}

async fn confirm(text: &'static str) -> Result<bool> {
    let res = prompt(move || {
        return Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(text)
            .default(false)
            .interact();
    })
    .await?;

    return Ok(res.unwrap_or(false));
}

/// Prompts for a key until one is accepted. Returns false when the user quits.
async fn credential_loop(orchestrator: &mut Orchestrator) -> Result<bool> {
    println!(
        "{}\n\n{}\n",
        Paint::new("Setup Gemini API").bold(),
        "To chat you need a free API key from Google AI Studio (https://aistudio.google.com/app/apikey). Your key is stored locally and only ever sent to the Gemini API."
    );

    while orchestrator.state() == OrchestratorState::AwaitingCredential {
        let text = match read_credential().await? {
            Some(text) => text,
            None => return Ok(false),
        };

        if let Some(command) = SlashCommand::parse(&text) {
            if command.is_quit() {
                return Ok(false);
            }
        }

        if let Err(err) = orchestrator.submit_credential(&text).await {
            print_error(&err.to_string());
        }
    }

    print_greeting(orchestrator);
    return Ok(true);
}

async fn handle_persona_set(orchestrator: &mut Orchestrator, command: &SlashCommand) {
    let persona = match command.arg().and_then(resolve_persona) {
        Some(persona) => persona,
        None => {
            print_error("You must specify a persona id or index with `/persona` or `/p`. Run `/personas` to list them.");
            return;
        }
    };

    if let Err(err) = orchestrator.select_persona(persona).await {
        print_error(&err.to_string());
        return;
    }

    print_notice(&format!(
        "{} has entered the chat.",
        persona.display_name()
    ));
}

async fn handle_model_list(orchestrator: &Orchestrator) {
    match orchestrator.list_models().await {
        Ok(models) => print_notice(&format_models(&models)),
        Err(err) => print_error(&format!("Error: {err}")),
    }
}

async fn handle_model_set(orchestrator: &mut Orchestrator, command: &SlashCommand) {
    let arg = match command.arg() {
        Some(arg) => arg.to_string(),
        None => {
            print_error("You must specify a model name with `/model` or `/m`. Run `/help` more details.");
            return;
        }
    };

    let models = match orchestrator.list_models().await {
        Ok(models) => models,
        Err(err) => {
            print_error(&format!("Error: {err}"));
            return;
        }
    };

    match resolve_model(&arg, &models) {
        Ok(model) => {
            orchestrator.set_model(&model);
            print_notice(&format!("{model} has entered the chat."));
        }
        Err(err) => print_error(&err),
    }
}

/// Handles a slash command. Returns false when the session should end.
async fn handle_slash_command(
    orchestrator: &mut Orchestrator,
    command: &SlashCommand,
) -> Result<bool> {
    if command.is_quit() {
        return Ok(false);
    }

    if command.is_help() {
        print_notice(&help_text());
    } else if command.is_persona_list() {
        print_notice(&format_personas());
    } else if command.is_persona_set() {
        handle_persona_set(orchestrator, command).await;
    } else if command.is_model_list() {
        handle_model_list(orchestrator).await;
    } else if command.is_model_set() {
        handle_model_set(orchestrator, command).await;
    } else if command.is_clear() {
        let confirmed = confirm("Are you sure you want to clear the conversation?").await?;
        if orchestrator.clear_conversation(|| return confirmed) {
            print_notice("Conversation cleared.");
        }
    } else if command.is_reset() {
        if let Err(err) = orchestrator.reset_credential().await {
            print_error(&err.to_string());
        }
        return credential_loop(orchestrator).await;
    }

    return Ok(true);
}

async fn start_loop(orchestrator: &mut Orchestrator) -> Result<()> {
    if orchestrator.state() == OrchestratorState::AwaitingCredential {
        if !credential_loop(orchestrator).await? {
            return Ok(());
        }
    } else {
        print_greeting(orchestrator);
    }

    loop {
        let text = match read_message().await? {
            Some(text) => text,
            None => break,
        };

        if let Some(command) = SlashCommand::parse(&text) {
            if !handle_slash_command(orchestrator, &command).await? {
                break;
            }
            continue;
        }

        if text.trim().is_empty() {
            continue;
        }

        println!("{}", Paint::new("Thinking...").dimmed());
        if !orchestrator.send_message(&text).await {
            continue;
        }

        if let Some(turn) = orchestrator.turns().last() {
            print_turn(turn, orchestrator.persona());
        }
    }

    return Ok(());
}

pub async fn start(mut orchestrator: Orchestrator) -> Result<()> {
    start_loop(&mut orchestrator).await?;
    return Ok(());
}
