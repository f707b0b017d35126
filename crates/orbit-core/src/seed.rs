//! First-run onboarding content.
//!
//! An empty vault gets one folder and three example projects with
//! illustrative logs so a new user sees the tracker populated instead of
//! blank. Runs at most once: the only guard is the emptiness check, and
//! calling it on a non-empty vault is a caller error.

use crate::error::Result;
use crate::model::{LogKind, ProjectDraft, VisualType};
use crate::vault::Vault;

/// Seed onboarding content into an empty vault.
///
/// Returns `Ok(false)` without writing anything when the folder
/// collection is non-empty, `Ok(true)` after seeding.
pub fn seed_demo_data(vault: &Vault, user_id: &str) -> Result<bool> {
    if !vault.folders(user_id)?.is_empty() {
        return Ok(false);
    }

    log::debug!("Seeding demo data into empty vault");

    let folder = vault.create_folder(user_id, "Getting Started", 0)?;

    let welcome = vault.create_project(
        user_id,
        &folder.id,
        ProjectDraft::new("Welcome to Orbit", VisualType::Icon, "Zap"),
    )?;
    vault.create_log(
        user_id,
        &welcome.id,
        "<p>This is your <b>mission log</b>. Every project keeps its own trail of \
         sightings, gains, and notes.</p>",
        LogKind::Note,
    )?;
    vault.create_log(
        user_id,
        &welcome.id,
        "<p>Drag the progress slider as a project moves from \
         <i>Discovered</i> toward <i>Completed</i>.</p>",
        LogKind::Note,
    )?;

    let tracker = vault.create_project(
        user_id,
        &folder.id,
        ProjectDraft::new("Track a protocol", VisualType::Icon, "Globe")
            .with_link("https://example.com"),
    )?;
    vault.create_log(
        user_id,
        &tracker.id,
        "<p>Spotted on a launch announcement. Link saved above.</p>",
        LogKind::Seen,
    )?;

    let rewards = vault.create_project(
        user_id,
        &folder.id,
        ProjectDraft::new("Log your rewards", VisualType::Text, "GM"),
    )?;
    vault.create_log(
        user_id,
        &rewards.id,
        "<p>Claimed <b>120 tokens</b> from the first distribution.</p>",
        LogKind::Gained,
    )?;

    Ok(true)
}
