use std::path::Path;

use rota_core::picker::NextPick;

use crate::output::print_json;

pub fn run(config: &Path, json: bool) -> anyhow::Result<()> {
    let (_, team) = super::open_team(config)?;

    let pick = team.select_next()?;
    if json {
        let body = match &pick {
            NextPick::Member(name) => serde_json::json!({ "next": name }),
            NextPick::NoHistory => {
                serde_json::json!({ "next": null, "reason": "team has no recorded history" })
            }
            NextPick::NoneEligible => {
                serde_json::json!({ "next": null, "reason": "no eligible candidate" })
            }
        };
        print_json(&body)?;
    } else {
        match pick {
            NextPick::Member(name) => println!("{name}"),
            NextPick::NoHistory => println!("team has no recorded history"),
            NextPick::NoneEligible => println!("no eligible candidate"),
        }
    }
    Ok(())
}
