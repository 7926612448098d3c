// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "fintrack=error";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Settings {
    /// Flags win over environment (both handled by clap), then defaults.
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let db_path = match m.get_one::<String>("db") {
            Some(p) if !p.trim().is_empty() => PathBuf::from(p.trim()),
            _ => crate::db::default_db_path()?,
        };
        let log_filter = m
            .get_one::<String>("log")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Ok(Self {
            db_path,
            log_filter,
        })
    }
}

/// Install the global `tracing` subscriber, writing to stderr.
pub fn init_logging(filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
