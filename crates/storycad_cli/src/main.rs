//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `storycad_core` linkage.
//! - Build a fixed sample outline and print the resulting Narrator view.
//!
//! Usage: `storycad_cli [config.json]`

use std::process::ExitCode;
use storycad_core::{api, CoreConfig, StoryDocument, StoryItemType, StoryViewType};

fn main() -> ExitCode {
    println!("storycad_core ping={}", storycad_core::ping());
    println!("storycad_core version={}", storycad_core::core_version());

    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<String>) -> Result<(), String> {
    let config = match config_path {
        Some(path) => CoreConfig::from_path(path).map_err(|err| err.to_string())?,
        None => CoreConfig::default(),
    };
    if config.init_logging().map_err(|err| err.to_string())? {
        if let Some((level, dir)) = storycad_core::logging_status() {
            println!("logging level={level} dir={}", dir.display());
        }
    }

    let document_config = config.document_config().map_err(|err| err.to_string())?;
    let mut doc =
        StoryDocument::with_config("Sample Story", &document_config).map_err(|err| err.to_string())?;
    build_sample(&mut doc).map_err(|err| err.to_string())?;

    let response = api::copy_all_unused_scenes(&mut doc);
    println!("copy_all ok={} message={}", response.ok, response.message);

    let snapshot = doc
        .snapshot(StoryViewType::Narrator)
        .ok_or_else(|| "narrator view is missing".to_string())?;
    for line in snapshot.to_indented_lines() {
        println!("{line}");
    }
    Ok(())
}

fn build_sample(doc: &mut StoryDocument) -> Result<(), storycad_core::DocumentError> {
    let root = doc.root(StoryViewType::Explorer);
    doc.add_element(root, StoryItemType::Problem, "Will the heist succeed?")?;
    doc.add_element(root, StoryItemType::Character, "Mara")?;
    let act_one = doc.add_element(root, StoryItemType::Folder, "Act I")?;
    doc.add_element(act_one, StoryItemType::Scene, "The job is offered")?;
    doc.add_element(act_one, StoryItemType::Scene, "Casing the vault")?;
    let act_two = doc.add_element(root, StoryItemType::Folder, "Act II")?;
    doc.add_element(act_two, StoryItemType::Setting, "Harbor warehouse")?;
    doc.add_element(act_two, StoryItemType::Scene, "The double cross")?;
    Ok(())
}
