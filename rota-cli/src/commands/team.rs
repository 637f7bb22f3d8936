//! Team management commands

use clap::{Args, Subcommand};
use rota_core::{Config, Directory, Member, Team};

use super::open_database;

/// Team management commands
#[derive(Args, Debug)]
pub struct TeamArgs {
    #[command(subcommand)]
    pub command: TeamCommand,
}

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// Create a team
    Add {
        /// Team name
        name: String,

        /// Member as `id:name`, or `id:name:inactive` (repeatable)
        #[arg(short, long = "member", value_parser = parse_member)]
        members: Vec<Member>,
    },

    /// Show a team and its members
    Show {
        /// Team name
        name: String,
    },
}

impl TeamArgs {
    /// Execute the team command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let directory = Directory::new(open_database(config).await?);

        let team = match &self.command {
            TeamCommand::Add { name, members } => {
                directory
                    .add_team(Team::new(name.clone(), members.clone()))
                    .await?
            }
            TeamCommand::Show { name } => directory.get_team(name).await?,
        };

        print_team(&team);
        Ok(())
    }
}

fn print_team(team: &Team) {
    println!("Team: {}", team.name);
    for member in &team.members {
        let state = if member.is_active { "active" } else { "inactive" };
        println!("  {} ({}) [{}]", member.user_id, member.username, state);
    }
}

/// Parse a member given as `id:name[:inactive]`
pub fn parse_member(value: &str) -> Result<Member, String> {
    let mut parts = value.splitn(3, ':');
    let user_id = parts.next().unwrap_or_default().trim();
    let username = parts.next().map(str::trim).unwrap_or_default();

    if user_id.is_empty() || username.is_empty() {
        return Err(format!("expected id:name[:inactive], got '{}'", value));
    }

    let is_active = match parts.next() {
        None => true,
        Some("inactive") => false,
        Some("active") => true,
        Some(other) => return Err(format!("unknown member state '{}'", other)),
    };

    Ok(Member::new(user_id, username).with_active(is_active))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member() {
        assert_eq!(parse_member("u1:Alice").unwrap(), Member::new("u1", "Alice"));
        assert_eq!(
            parse_member("u2:Bob:inactive").unwrap(),
            Member::new("u2", "Bob").with_active(false)
        );
    }

    #[test]
    fn test_parse_member_rejects_malformed() {
        assert!(parse_member("u1").is_err());
        assert!(parse_member(":Alice").is_err());
        assert!(parse_member("u1:Alice:away").is_err());
    }
}
