//! Auth command handlers

use anyhow::{bail, Context, Result};

use stash_core::{AuthService, Session};

use crate::output::Output;
use crate::prompt;

/// Create an account and start a session
pub async fn signup(
    auth: &AuthService,
    name: String,
    email: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt::password("Choose a password")?,
    };

    let session = auth
        .signup(&name, &email, &password)
        .await
        .context("Signup failed")?;

    output.success(&format!("Account created for {}", session.user.email));
    output.print_session(&session);
    Ok(())
}

/// Log in with an existing account
pub async fn login(
    auth: &AuthService,
    email: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt::password("Password")?,
    };

    let session = auth
        .login(&email, &password)
        .await
        .context("Login failed")?;

    output.success(&format!("Logged in as {}", session.user.email));
    Ok(())
}

/// Clear the current session
pub async fn logout(auth: &AuthService, output: &Output) -> Result<()> {
    auth.logout().await.context("Logout failed")?;
    output.success("Logged out");
    Ok(())
}

/// Show who is logged in
pub async fn whoami(auth: &AuthService, output: &Output) -> Result<()> {
    match auth.restore_session().await? {
        Some(session) => output.print_session(&session),
        None => output.message("Not logged in."),
    }
    Ok(())
}

/// Restore the persisted session, failing with a hint when logged out
pub async fn require_session(auth: &AuthService) -> Result<Session> {
    match auth.restore_session().await? {
        Some(session) => Ok(session),
        None => bail!("Not logged in. Run `stash login` or `stash signup` first."),
    }
}
