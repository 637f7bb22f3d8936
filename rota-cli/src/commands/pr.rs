//! Pull request commands

use clap::{Args, Subcommand};
use rota_core::{AssignmentEngine, Config, PullRequest};

use super::open_database;

/// Pull request commands
#[derive(Args, Debug)]
pub struct PrArgs {
    #[command(subcommand)]
    pub command: PrCommand,
}

#[derive(Subcommand, Debug)]
pub enum PrCommand {
    /// Open a pull request and assign reviewers
    Create {
        /// Pull request identifier
        id: String,

        /// Title
        name: String,

        /// Author user identifier
        #[arg(short, long)]
        author: String,
    },

    /// Mark a pull request merged
    Merge {
        /// Pull request identifier
        id: String,
    },

    /// Replace a reviewer with another active teammate
    Reassign {
        /// Pull request identifier
        id: String,

        /// Reviewer to replace
        #[arg(long)]
        old: String,
    },

    /// Show a pull request
    Show {
        /// Pull request identifier
        id: String,
    },
}

impl PrArgs {
    /// Execute the pr command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let engine = AssignmentEngine::new(open_database(config).await?);

        match &self.command {
            PrCommand::Create { id, name, author } => {
                let pr = engine.create_pull_request(id, name, author).await?;
                print_pull_request(&pr);
            }
            PrCommand::Merge { id } => {
                let pr = engine.merge_pull_request(id).await?;
                print_pull_request(&pr);
            }
            PrCommand::Reassign { id, old } => {
                let reassignment = engine.reassign_reviewer(id, old).await?;
                println!("{} replaced by {}", old, reassignment.replaced_by);
                print_pull_request(&reassignment.pull_request);
            }
            PrCommand::Show { id } => {
                let pr = engine.get_pull_request(id).await?;
                print_pull_request(&pr);
            }
        }

        Ok(())
    }
}

fn print_pull_request(pr: &PullRequest) {
    println!("Pull request: {} ({})", pr.id, pr.status);
    println!("  Title:     {}", pr.name);
    println!("  Author:    {}", pr.author_id);
    if pr.assigned_reviewers.is_empty() {
        println!("  Reviewers: (none)");
    } else {
        println!("  Reviewers: {}", pr.assigned_reviewers.join(", "));
    }
    println!(
        "  Created:   {}",
        pr.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(merged_at) = pr.merged_at {
        println!("  Merged:    {}", merged_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}
