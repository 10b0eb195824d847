//! Factory preset listing.

use clap::Args;
use squash_config::{FACTORY_PRESET_NAMES, get_factory_preset, get_param, param_specs};

#[derive(Args)]
pub struct PresetsArgs {
    /// Also print every parameter value
    #[arg(short, long)]
    verbose: bool,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    println!("Factory Presets:");
    println!("================");
    for id in FACTORY_PRESET_NAMES {
        let Some(preset) = get_factory_preset(id) else {
            tracing::warn!(id, "factory preset failed to load");
            continue;
        };
        let desc = preset.description.as_deref().unwrap_or("");
        println!(
            "  {:20} {:18} [{}] {}",
            id,
            preset.name,
            preset.settings.kind(),
            desc
        );

        if args.verbose {
            for spec in param_specs(&preset.settings) {
                if let Some(value) = get_param(&preset.settings, spec.key) {
                    println!("      {:14} {} {}", spec.key, value, spec.unit);
                }
            }
        }
    }
    println!();
    println!("Use with: squash render IN OUT --factory <name>");

    Ok(())
}
