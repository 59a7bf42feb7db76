//! Chat command parsing and dispatch onto the campaign store and paste cache.

use dungeonbot_core::{CampaignStore, PasteCache, PasteService, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `!campaign <name…>`
    Notes { campaign: String },
    /// `!add campaign <name…>`
    Create { campaign: String },
    /// `!append <name|"multi word name"> <note…>`
    Append { campaign: String, note: String },
    /// `!adduser <name|"multi word name"> <user>`
    AddUser { campaign: String, user: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Missing campaign name. Eg: !campaign gronkulousness")]
    MissingCampaign,
    #[error("Missing subcommand: campaign")]
    MissingSubcommand,
    #[error("Unknown subcommand '{0}'. Eg: !add campaign gronkulousness")]
    UnknownSubcommand(String),
    #[error("Missing note. Eg: !append gronkulousness slew the dragon")]
    MissingNote,
    #[error("Missing user. Eg: !adduser gronkulousness bob")]
    MissingUser,
    #[error("Unterminated quote in campaign name. Eg: !append \"curse of strahd\" met the count")]
    UnterminatedQuote,
}

impl Command {
    /// Parses one chat message. Returns `Ok(None)` for messages that aren't commands.
    pub fn parse(message: &str) -> Result<Option<Self>, UsageError> {
        let message = message.trim();
        let (head, rest) = split_token(message);

        let command = match head {
            "!campaign" => Command::Notes {
                campaign: required(whole_name(rest)?, UsageError::MissingCampaign)?,
            },
            "!add" => {
                let (subcommand, rest) = split_token(rest);
                match subcommand {
                    "" => return Err(UsageError::MissingSubcommand),
                    "campaign" => Command::Create {
                        campaign: required(whole_name(rest)?, UsageError::MissingCampaign)?,
                    },
                    other => return Err(UsageError::UnknownSubcommand(other.to_string())),
                }
            }
            "!append" => {
                let (campaign, note) = split_name(rest)?;
                Command::Append {
                    campaign: required(campaign, UsageError::MissingCampaign)?,
                    note: required(note, UsageError::MissingNote)?,
                }
            }
            "!adduser" => {
                let (campaign, user) = split_name(rest)?;
                Command::AddUser {
                    campaign: required(campaign, UsageError::MissingCampaign)?,
                    user: required(user, UsageError::MissingUser)?,
                }
            }
            _ => return Ok(None),
        };

        Ok(Some(command))
    }
}

fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (s, ""),
    }
}

/// Splits a leading campaign name off `s`. Names with spaces must be double-quoted.
fn split_name(s: &str) -> Result<(&str, &str), UsageError> {
    let s = s.trim_start();
    match s.strip_prefix('"') {
        Some(quoted) => {
            let (name, rest) = quoted
                .split_once('"')
                .ok_or(UsageError::UnterminatedQuote)?;
            Ok((name.trim(), rest.trim()))
        }
        None => Ok(split_token(s)),
    }
}

/// A name that runs to the end of the line, optionally double-quoted.
fn whole_name(s: &str) -> Result<&str, UsageError> {
    if s.starts_with('"') {
        let (name, _) = split_name(s)?;
        Ok(name)
    } else {
        Ok(s)
    }
}

fn required(s: &str, missing: UsageError) -> Result<String, UsageError> {
    if s.is_empty() {
        Err(missing)
    } else {
        Ok(s.to_string())
    }
}

/// Runs commands against shared core handles and renders replies.
pub struct Dispatcher<S> {
    store: Arc<CampaignStore>,
    cache: Arc<PasteCache<S>>,
}

impl<S: PasteService> Dispatcher<S> {
    pub fn new(store: Arc<CampaignStore>, cache: Arc<PasteCache<S>>) -> Self {
        Self { store, cache }
    }

    /// Executes `command` on behalf of `nick` and returns the reply lines.
    pub fn handle(&self, nick: &str, command: Command) -> Vec<String> {
        match command {
            Command::Notes { campaign } => {
                let mut replies = vec![format!("Looking for {campaign} campaign notes...")];
                match self.store.notes(&campaign) {
                    Ok(notes) => replies.push(self.cache.obtain_url(&notes)),
                    Err(err) => replies.push(render_error(&err)),
                }
                replies
            }
            Command::Create { campaign } => {
                let reply = match self.store.create_campaign(&campaign, nick) {
                    Ok(()) => format!("Created campaign {campaign}"),
                    Err(err) => render_error(&err),
                };
                vec![reply]
            }
            Command::Append { campaign, note } => {
                let reply = match self.store.append_notes(&campaign, &note, nick) {
                    Ok(()) => format!("Added notes to {campaign}"),
                    Err(err) => render_error(&err),
                };
                vec![reply]
            }
            Command::AddUser { campaign, user } => {
                let reply = match self.store.add_authorized_user(&campaign, nick, &user) {
                    Ok(()) => format!("{user} can now edit {campaign}"),
                    Err(err) => render_error(&err),
                };
                vec![reply]
            }
        }
    }
}

fn render_error(err: &StoreError) -> String {
    match err {
        StoreError::NotFound(name) => format!("No campaign named {name}"),
        StoreError::NoNotesYet(name) => format!("No campaign notes for {name}"),
        StoreError::DuplicateName(name) => format!("Campaign {name} already exists"),
        StoreError::Unauthorized(name) => format!("Not authorized to modify campaign {name}"),
        StoreError::AlreadyAuthorized(user) => format!("{user} is already authorized"),
        StoreError::InvalidArgument(reason) => format!("Invalid request: {reason}"),
        StoreError::StoreUnavailable | StoreError::Backend => {
            error!(%err, "command failed");
            "Something went wrong, try again later".to_string()
        }
    }
}
