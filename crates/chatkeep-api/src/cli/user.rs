//! User account CLI commands.

use anyhow::Result;
use console::style;
use dialoguer::Password;

use crate::state::AppState;

/// Register a user, prompting for the password when none is given.
///
/// # Examples
///
/// ```bash
/// # Secure prompt (recommended)
/// chatkeep register alice
///
/// # Script/automation mode
/// chatkeep register alice --password s3cret
/// ```
pub async fn register_user(
    state: &AppState,
    username: &str,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt(format!("Password for {}", style(username).bold()))
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let user = state.identity_service.register(username, &password).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"registered": true, "id": user.id, "username": user.username})
        );
    } else {
        println!(
            "  {} User '{}' registered (id {})",
            style("✓").green().bold(),
            style(&user.username).bold(),
            user.id
        );
    }

    Ok(())
}
