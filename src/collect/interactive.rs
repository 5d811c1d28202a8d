//! Prompt-driven mode: pick a country and options from a menu.

use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};

use school_collector::regions::REGIONS;
use school_collector::ApiKey;

use crate::{collector_config, execute, load_rules, Args, RunRequest};

pub(crate) async fn run(args: &Args) -> Result<()> {
    let theme = ColorfulTheme::default();

    let labels: Vec<String> = REGIONS
        .iter()
        .map(|r| format!("{} ({})", r.label, r.code))
        .collect();
    let default_region = REGIONS
        .iter()
        .position(|r| r.code.eq_ignore_ascii_case(args.country.trim()))
        .unwrap_or(0);

    let choice = Select::with_theme(&theme)
        .with_prompt("Select a country to collect schools for")
        .items(&labels)
        .default(default_region)
        .interact()?;
    let region = &REGIONS[choice];

    let tiles_input: String = Input::with_theme(&theme)
        .with_prompt("Tiles per axis (8-12 recommended)")
        .default(args.tiles.to_string())
        .interact_text()?;
    let tiles = parse_tiles(&tiles_input, args.tiles);

    let strict = Confirm::with_theme(&theme)
        .with_prompt("Keep only general-education schools?")
        .default(args.strict())
        .interact()?;

    let output_dir: String = Input::with_theme(&theme)
        .with_prompt("Output directory")
        .default(args.output_dir.display().to_string())
        .interact_text()?;

    let api_key = match args.api_key.clone().filter(|k| !k.trim().is_empty()) {
        Some(key) => key,
        None => Password::with_theme(&theme)
            .with_prompt("Yandex Maps API key")
            .allow_empty_password(true)
            .interact()?,
    };
    let api_key = match ApiKey::new(api_key) {
        Ok(key) => key,
        Err(_) => bail!("An API key is required"),
    };

    let lang: String = Input::with_theme(&theme)
        .with_prompt("Result language (e.g. ru_RU)")
        .default(args.lang.clone())
        .interact_text()?;

    println!("Starting collection... this may take several minutes.");

    let request = RunRequest {
        config: collector_config(args, region.code.to_string(), tiles, strict, lang),
        rules: load_rules(args)?,
        output_dir: output_dir.into(),
        api_key,
    };
    let (paths, report) = execute(request).await?;

    println!(
        "Done! Records found: {}\n- {}\n- {}",
        report.retained(),
        paths.csv.display(),
        paths.json.display()
    );
    Ok(())
}

/// Parse a tile count; unparsable input falls back, values below one become one.
fn parse_tiles(input: &str, fallback: usize) -> usize {
    input
        .trim()
        .parse::<i64>()
        .map(|n| n.max(1) as usize)
        .unwrap_or(fallback)
}
