//! User commands

use clap::{ArgAction, Args, Subcommand};
use rota_core::{Config, Directory};

use super::open_database;

/// User commands
#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Mark a user available or unavailable for review
    SetActive {
        /// User identifier
        user_id: String,

        /// true or false
        #[arg(action = ArgAction::Set)]
        active: bool,
    },

    /// List the pull requests a user is reviewing
    Reviews {
        /// User identifier
        user_id: String,
    },
}

impl UserArgs {
    /// Execute the user command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let directory = Directory::new(open_database(config).await?);

        match &self.command {
            UserCommand::SetActive { user_id, active } => {
                let user = directory.set_is_active(user_id, *active).await?;
                println!(
                    "{} ({}) in team {} is now {}",
                    user.id,
                    user.name,
                    user.team_name.as_deref().unwrap_or("-"),
                    if user.is_active { "active" } else { "inactive" }
                );
            }
            UserCommand::Reviews { user_id } => {
                let reviews = directory.get_review(user_id).await?;
                if reviews.is_empty() {
                    println!("{} has no pull requests to review", user_id);
                }
                for pr in reviews {
                    println!(
                        "{:<20} {:<7} {} (by {})",
                        pr.id,
                        pr.status.as_str(),
                        pr.name,
                        pr.author_id
                    );
                }
            }
        }

        Ok(())
    }
}
