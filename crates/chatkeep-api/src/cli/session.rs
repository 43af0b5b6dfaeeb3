//! Session maintenance CLI commands.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Delete every session whose expiry has passed.
pub async fn purge_sessions(state: &AppState, json: bool) -> Result<()> {
    let removed = state.identity_service.purge_expired_sessions().await?;

    if json {
        println!("{}", serde_json::json!({"purged": removed}));
    } else {
        println!(
            "  {} Removed {} expired session{}",
            style("✓").green().bold(),
            removed,
            if removed == 1 { "" } else { "s" }
        );
    }

    Ok(())
}
