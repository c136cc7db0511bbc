//! The presets command: enumerate registered deployment targets.

use skiff_preset::PresetRegistry;

use crate::cli::PresetsArgs;
use crate::error::Result;

pub fn execute(args: PresetsArgs) -> Result<()> {
    let registry = PresetRegistry::builtin();

    if args.json {
        let list: Vec<serde_json::Value> = registry
            .targets()
            .filter_map(|target| registry.get(target).map(|entries| (target, entries)))
            .map(|(target, entries)| {
                serde_json::json!({
                    "target": target,
                    "artifacts": entries
                        .iter()
                        .map(|entry| serde_json::json!({
                            "entry": entry.definition.entry,
                            "adapter": entry.adapter.as_str(),
                        }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for target in registry.targets() {
        let entries = registry.get(target).unwrap_or_default();
        for entry in entries {
            println!(
                "{target:<20} {:<8} {}",
                entry.adapter.as_str(),
                entry.definition.entry
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_succeeds_in_both_formats() {
        execute(PresetsArgs { json: false }).unwrap();
        execute(PresetsArgs { json: true }).unwrap();
    }
}
