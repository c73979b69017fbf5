use std::path::Path;

use anyhow::bail;
use clap::Subcommand;
use rota_core::date;

use crate::output::{print_json, print_table};

#[derive(Subcommand)]
pub enum OooSubcommand {
    /// Record an absence window (dates are DD-MM-YYYY, inclusive)
    Set {
        name: String,
        from: String,
        to: String,
    },

    /// Show recorded windows for the team or one member
    Show {
        /// Member name (omit for the whole team)
        name: Option<String>,
    },
}

pub fn run(config: &Path, subcommand: OooSubcommand, json: bool) -> anyhow::Result<()> {
    let (_, team) = super::open_team(config)?;

    match subcommand {
        OooSubcommand::Set { name, from, to } => {
            let from = date::parse_day(&from)?;
            let to = date::parse_day(&to)?;
            if from > to {
                bail!("from date cannot be greater than to date");
            }
            if to < date::today() {
                bail!("to date cannot be in the past");
            }
            team.set_out_of_office(&name, from, to)?;
            if json {
                print_json(&serde_json::json!({ "recorded": name }))?;
            } else {
                println!(
                    "{name} out of office {} to {}",
                    date::format_day(from),
                    date::format_day(to)
                );
            }
        }
        OooSubcommand::Show { name } => {
            let records = match name {
                Some(member) => match team.get_out_of_office(&member)? {
                    Some(window) => vec![rota_core::team::MemberOutOfOffice {
                        name: member,
                        window,
                    }],
                    None => Vec::new(),
                },
                None => team.team_out_of_office()?,
            };
            if json {
                print_json(&records)?;
            } else {
                print_table(
                    &["NAME", "FROM", "TO"],
                    records
                        .iter()
                        .map(|r| {
                            vec![
                                r.name.clone(),
                                date::format_day(r.window.from),
                                date::format_day(r.window.to),
                            ]
                        })
                        .collect(),
                );
            }
        }
    }
    Ok(())
}
