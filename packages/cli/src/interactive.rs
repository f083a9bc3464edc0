//! Interactive menu shown when no subcommand is given.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use indicatif::MultiProgress;
use listing_enrich::Columns;
use listing_enrich::listing::EnrichOptions;
use listing_enrich_address::AddressMatcher;

use crate::commands;

/// Top-level tool selection.
enum Tool {
    Clean,
    StreetImages,
    Enrich,
    Geocode,
    Hero,
}

impl Tool {
    const ALL: &[Self] = &[
        Self::Clean,
        Self::StreetImages,
        Self::Enrich,
        Self::Geocode,
        Self::Hero,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Clean => "Clean mismatched listing URLs",
            Self::StreetImages => "Add street view image URLs",
            Self::Enrich => "Search listings & hero images",
            Self::Geocode => "Geocode addresses",
            Self::Hero => "Look up a single address",
        }
    }
}

fn prompt_path(prompt: &str, default: Option<&str>) -> Result<PathBuf, dialoguer::Error> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    Ok(PathBuf::from(input.interact_text()?))
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected tool fails.
pub async fn run(multi: &MultiProgress, columns: &Columns) -> Result<(), Box<dyn std::error::Error>> {
    println!("Listing Enrichment Tools");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Clean => {
            let input = prompt_path("Input CSV", None)?;
            let overwrite = Confirm::new()
                .with_prompt("Overwrite the input file?")
                .default(true)
                .interact()?;
            let output = if overwrite {
                None
            } else {
                Some(prompt_path("Output CSV", None)?)
            };
            commands::clean(
                multi,
                columns,
                AddressMatcher::default(),
                &input,
                output.as_deref(),
            )
            .await?;
        }
        Tool::StreetImages => {
            let input = prompt_path("Input CSV", None)?;
            let output = prompt_path("Output CSV", None)?;
            commands::street_images(multi, columns, &input, &output).await?;
        }
        Tool::Enrich => {
            let input = prompt_path("Input CSV", None)?;
            let output = prompt_path("Output CSV", None)?;
            commands::enrich(multi, columns, &input, &output, EnrichOptions::default()).await?;
        }
        Tool::Geocode => {
            let input = prompt_path("Input CSV", None)?;
            let output = prompt_path("Output CSV", None)?;
            commands::geocode(multi, columns, &input, &output, &[]).await?;
        }
        Tool::Hero => {
            let address: String = Input::new()
                .with_prompt("Address")
                .default("4260 SW Council Crest Dr, Portland, OR".to_string())
                .interact_text()?;
            let download = Confirm::new()
                .with_prompt("Download the hero image?")
                .default(false)
                .interact()?;
            let dir = if download {
                Some(prompt_path("Image directory", Some("images"))?)
            } else {
                None
            };
            commands::hero(&address, dir.as_deref()).await?;
        }
    }

    Ok(())
}
