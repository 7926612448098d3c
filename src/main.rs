// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::sync::Arc;

use fintrack::{cli, commands::App, config, error::LedgerError, notify::LogNotifier};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let settings = config::Settings::from_matches(&matches)?;
    config::init_logging(&settings.log_filter);

    let mut app = App::open(&settings.db_path, Arc::new(LogNotifier::new()))?;
    let outcome = match app.store.initialize().await {
        Ok(()) => app.dispatch(&matches).await,
        Err(err) => Err(err.into()),
    };
    app.store.dispose();

    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => {
            cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
        // already reported through the notifier
        Err(err) if err.downcast_ref::<LedgerError>().is_some() => std::process::exit(1),
        Err(err) => Err(err),
    }
}
