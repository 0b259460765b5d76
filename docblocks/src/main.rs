//! docblocks - structured document editing tool
//!
//! A CLI for editing block-structured documents stored as JSON files and
//! syncing them with the document API.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use docblocks::api_client::DocumentApiClient;
use docblocks::app_config::AppConfig;
use docblocks::document_model::{Document, MetadataUpdate};
use docblocks::edit::{self, Edit};
use docblocks::{chat_marker, image_refs, markdown_exporter, outline};
use std::path::{Path, PathBuf};

/// Main entry point for the docblocks CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::New { file, title, force } => handle_new_command(&file, title, force)?,

        Commands::Edit { file, yes, command } => {
            handle_edit_command(&file, &[Edit::from(command)], yes)?;
        }

        Commands::Apply { file, script, yes } => {
            let content = std::fs::read_to_string(&script)
                .with_context(|| format!("Failed to read edit script {}", script.display()))?;
            let edits: Vec<Edit> = serde_json::from_str(&content)
                .with_context(|| format!("Invalid edit script {}", script.display()))?;
            handle_edit_command(&file, &edits, yes)?;
        }

        Commands::Settings {
            file,
            client,
            authors,
            classified,
            last_revision,
            contacts,
        } => {
            let doc = load(&file)?;
            let current = MetadataUpdate::from_document(&doc);
            let current_authors = current.authors.map(|a| a.join(", ")).unwrap_or_default();

            let update = MetadataUpdate::from_form(
                client
                    .as_deref()
                    .unwrap_or(current.client.as_deref().unwrap_or("")),
                authors.as_deref().unwrap_or(&current_authors),
                classified.unwrap_or(current.classified),
                last_revision
                    .as_deref()
                    .unwrap_or(current.last_revision.as_deref().unwrap_or("")),
                contacts
                    .as_deref()
                    .unwrap_or(current.contacts.as_deref().unwrap_or("")),
            )?;

            save(&doc.with_metadata(update), &file)?;
            println!("✓ Updated settings of {}", file.display());
        }

        Commands::Outline { file } => handle_outline_command(&file)?,

        Commands::Export { file, output } => {
            let doc = load(&file)?;
            let output = output.unwrap_or_else(|| file.with_extension("md"));
            markdown_exporter::to_markdown(&doc, &output)
                .with_context(|| format!("Failed to export Markdown to {}", output.display()))?;
            println!("✓ Successfully wrote: {}", output.display());
        }

        Commands::Check { file } => {
            let doc = load(&file)?;
            doc.validate()
                .with_context(|| format!("{} failed validation", file.display()))?;
            println!(
                "✓ {} is valid ({} sections, {} blocks)",
                file.display(),
                doc.section_count(),
                doc.block_count()
            );
        }

        Commands::Orphans { old, new } => {
            let config = AppConfig::resolve(cli.config.as_deref())?;
            let orphans = image_refs::orphaned_between(&load(&old)?, &load(&new)?);
            print_orphans(&orphans, &config.storage_bucket);
        }

        Commands::Chat { text, doc, file } => {
            let id = match (doc, file) {
                (Some(id), _) => Some(id),
                (None, Some(file)) => Some(load(&file)?.id),
                (None, None) => None,
            };
            println!("{}", chat_marker::tag_message(id.as_deref(), &text));
        }

        Commands::List => {
            let api = api_client(cli.config.as_deref())?;
            let documents = api.list_documents()?;
            if documents.is_empty() {
                println!("No documents");
            }
            for doc in documents {
                println!(
                    "{}  {}  ({} sections, updated {})",
                    doc.id,
                    if doc.title.is_empty() { "Untitled Document" } else { doc.title.as_str() },
                    doc.section_count(),
                    doc.updated_at.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Pull { id, output } => {
            let api = api_client(cli.config.as_deref())?;
            let doc = api.get_document(&id)?;
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.json", id)));
            save(&doc, &output)?;
            println!("✓ Pulled '{}' into {}", doc.title, output.display());
        }

        Commands::Push { file } => handle_push_command(cli.config.as_deref(), &file)?,

        Commands::Delete { id, yes } => {
            if !yes {
                anyhow::bail!("Deleting document {} cannot be undone; confirm with --yes", id);
            }
            let api = api_client(cli.config.as_deref())?;
            api.delete_document(&id)?;
            println!("✓ Deleted document {}", id);
        }
    }

    Ok(())
}

/// Handle the new command
fn handle_new_command(file: &Path, title: String, force: bool) -> Result<()> {
    if file.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it",
            file.display()
        );
    }

    save(&Document::new(title), file)?;
    println!("✓ Created {}", file.display());
    Ok(())
}

/// Handle the edit and apply commands
fn handle_edit_command(file: &Path, edits: &[Edit], confirmed: bool) -> Result<()> {
    let doc = load(file)?;
    let doc = edit::apply_all(doc, edits, confirmed)
        .with_context(|| format!("Failed to edit {}", file.display()))?;
    save(&doc, file)?;

    println!(
        "✓ Applied {} edit(s); {} now has {} sections and {} blocks",
        edits.len(),
        file.display(),
        doc.section_count(),
        doc.block_count()
    );
    Ok(())
}

/// Handle the outline command
fn handle_outline_command(file: &Path) -> Result<()> {
    let doc = load(file)?;
    let entries = outline::build_outline(&doc);

    if !doc.title.is_empty() {
        println!("{}\n", doc.title);
    }
    if entries.is_empty() {
        println!("No sections yet");
    }
    for entry in entries {
        println!("{}", entry);
    }
    Ok(())
}

/// Handle the push command
///
/// An unsaved document is created and the file is rewritten with the id the
/// server assigned. A saved document overwrites the server copy; images the
/// old copy referenced and the new version does not are reported when the
/// old copy could be fetched.
fn handle_push_command(config_path: Option<&Path>, file: &Path) -> Result<()> {
    let config = AppConfig::resolve(config_path)?;
    let api = DocumentApiClient::from_config(&config)?;
    let doc = load(file)?;

    if let Err(e) = doc.validate() {
        log::warn!("Pushing {} despite validation problems: {}", file.display(), e);
    }

    let was_saved = doc.is_saved();
    let outcome = api.save_replacing(&doc)?;
    save(&outcome.stored, file)?;

    if !was_saved {
        println!("✓ Created document {}", outcome.stored.id);
        return Ok(());
    }

    println!("✓ Saved document {}", outcome.stored.id);
    match &outcome.replaced {
        Some(previous) => print_orphans(
            &image_refs::orphaned_between(previous, &outcome.stored),
            &config.storage_bucket,
        ),
        None => println!("Previous copy unavailable; skipped orphaned image check"),
    }
    Ok(())
}

/// Print orphaned image URLs with their storage paths
fn print_orphans(orphans: &[String], bucket: &str) {
    if orphans.is_empty() {
        println!("No orphaned images");
        return;
    }

    println!("{} image(s) no longer referenced:", orphans.len());
    for url in orphans {
        match image_refs::storage_path_from_url(url, bucket) {
            Some(path) => println!("  {} ({}/{})", url, bucket, path),
            None => println!("  {} (outside bucket {})", url, bucket),
        }
    }
}

fn api_client(config_path: Option<&Path>) -> Result<DocumentApiClient> {
    let config = AppConfig::resolve(config_path)?;
    log::debug!("Using document API at {}", config.api_url);
    Ok(DocumentApiClient::from_config(&config)?)
}

fn load(file: &Path) -> Result<Document> {
    Document::load(file).with_context(|| format!("Failed to load {}", file.display()))
}

fn save(doc: &Document, file: &Path) -> Result<()> {
    doc.save(file)
        .with_context(|| format!("Failed to save {}", file.display()))
}
