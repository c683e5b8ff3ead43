use clap::Subcommand;
use zenith_core::coach::{Conversation, Credentials, GeminiClient};
use zenith_core::Config;

use crate::common::{runtime, stdin_lines, CliResult};

#[derive(Subcommand)]
pub enum CoachAction {
    /// Chat with the coach (`exit` or EOF quits, `/link KEY` re-links)
    Chat,
    /// Store an API key in the OS keyring
    Link { api_key: String },
    /// Remove the stored API key
    Unlink,
    /// Show whether an account is linked
    Status,
}

pub fn run(action: CoachAction, config: &Config) -> CliResult {
    let mut credentials = Credentials::from_env();
    match action {
        CoachAction::Chat => {
            let client = GeminiClient::from_config(&config.coach, credentials.api_key()?)?;
            runtime()?.block_on(chat(config, &mut credentials, client))?;
        }
        CoachAction::Link { api_key } => {
            credentials.link(&api_key)?;
            println!("coach account linked");
        }
        CoachAction::Unlink => {
            credentials.unlink()?;
            println!("coach account unlinked");
        }
        CoachAction::Status => {
            let status = match (credentials.is_linked(), credentials.is_env_override()) {
                (true, true) => "linked (environment)",
                (true, false) => "linked",
                (false, _) => "not linked",
            };
            println!("{status}");
        }
    }
    Ok(())
}

async fn chat<S>(
    config: &Config,
    credentials: &mut Credentials<S>,
    client: GeminiClient,
) -> CliResult
where
    S: zenith_core::coach::SecretStore,
{
    let mut conversation = Conversation::new(client);
    if let Some(greeting) = conversation.history().first() {
        println!("coach> {}", greeting.text);
    }

    let mut lines = stdin_lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") {
            break;
        }
        if let Some(key) = input.strip_prefix("/link ") {
            credentials.link(key)?;
            conversation.relink(GeminiClient::from_config(&config.coach, credentials.api_key()?)?);
            println!("coach account linked");
            continue;
        }
        if let Some(reply) = conversation.send(input).await {
            println!("coach> {reply}");
            if !conversation.is_linked() {
                println!("(type /link KEY to re-link)");
            }
        }
    }
    Ok(())
}
