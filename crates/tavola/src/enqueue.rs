// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tavola enqueue` command implementation.
//!
//! A thin CLI front-end to the intake seam, useful for smoke-testing a
//! deployment without a dialog layer in front of it.

use std::sync::Arc;

use clap::Args;

use tavola_config::model::TavolaConfig;
use tavola_core::{StorageAdapter, TavolaError};
use tavola_intake::{IntakeError, IntakeService, RawSlots};
use tavola_storage::SqliteStorage;

#[derive(Args, Debug)]
pub struct EnqueueArgs {
    /// Service area, e.g. "Manhattan" or "Jersey City".
    #[arg(long)]
    pub location: String,

    /// Cuisine, e.g. "Japanese".
    #[arg(long)]
    pub cuisine: String,

    /// Party size, 1 to 20.
    #[arg(long, default_value = "2")]
    pub party_size: String,

    /// Dining date: "today", "tomorrow", a weekday, or YYYY-MM-DD.
    #[arg(long, default_value = "today")]
    pub date: String,

    /// Dining time: "HH:MM", "7 pm", or "tonight".
    #[arg(long, default_value = "tonight")]
    pub time: String,

    /// Email address the recommendations go to.
    #[arg(long)]
    pub email: String,

    /// Session identifier the user key is derived from.
    #[arg(long, default_value = "cli")]
    pub session: String,
}

/// Run the `tavola enqueue` command.
pub async fn run_enqueue(config: &TavolaConfig, args: EnqueueArgs) -> Result<(), TavolaError> {
    let zone = config
        .service
        .offset()
        .ok_or_else(|| TavolaError::Config("service.timezone_offset is not parseable".into()))?;

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let intake = IntakeService::new(
        storage.clone(),
        config.worker.queue_name.clone(),
        zone,
    );

    let slots = RawSlots {
        location: args.location,
        cuisine: args.cuisine,
        party_size: args.party_size,
        dining_date: args.date,
        dining_time: args.time,
        contact_address: args.email,
    };

    match intake.on_slots_complete(&args.session, &slots).await {
        Ok(request_id) => {
            println!("enqueued request {request_id}");
        }
        Err(IntakeError::Validation(e)) => {
            storage.close().await?;
            return Err(TavolaError::Config(format!(
                "invalid slot '{}': {e}",
                e.violated_slot()
            )));
        }
        Err(IntakeError::Service(e)) => {
            storage.close().await?;
            return Err(e);
        }
    }

    storage.close().await?;
    Ok(())
}
