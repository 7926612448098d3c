// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::App;
use crate::session::AuthProvider;
use anyhow::{Context, Result};

pub async fn login(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub
        .get_one::<String>("user")
        .context("missing user")?
        .trim()
        .to_string();
    let session = app
        .auth
        .sign_in(&user)
        .await
        .with_context(|| format!("Sign in as '{}'", user))?;
    app.store.process_identity_changes().await?;
    println!(
        "Signed in as '{}' ({} transactions)",
        session.user,
        app.store.transactions().len()
    );
    Ok(())
}

pub async fn logout(app: &mut App) -> Result<()> {
    app.auth.sign_out().await.context("Sign out")?;
    app.store.process_identity_changes().await?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(app: &App) {
    match app.store.identity() {
        Some(identity) => println!("{}", identity),
        None => println!("Not signed in"),
    }
}
