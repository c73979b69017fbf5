use std::path::Path;

use clap::Subcommand;

use crate::output::print_json;

#[derive(Subcommand)]
pub enum MemberSubcommand {
    /// List current members in rotation order
    List,

    /// Add a member (no-op if already present)
    Add { name: String },

    /// Remove a member (no-op if absent)
    Remove { name: String },
}

pub fn run(config: &Path, subcommand: MemberSubcommand, json: bool) -> anyhow::Result<()> {
    let (_, team) = super::open_team(config)?;

    match subcommand {
        MemberSubcommand::List => {
            let members = team.list_members()?;
            if json {
                print_json(&members)?;
            } else {
                for member in members {
                    println!("{member}");
                }
            }
        }
        MemberSubcommand::Add { name } => {
            team.add_member(&name)?;
            if json {
                print_json(&serde_json::json!({ "added": name }))?;
            } else {
                println!("added {name}");
            }
        }
        MemberSubcommand::Remove { name } => {
            team.remove_member(&name)?;
            if json {
                print_json(&serde_json::json!({ "removed": name }))?;
            } else {
                println!("removed {name}");
            }
        }
    }
    Ok(())
}
