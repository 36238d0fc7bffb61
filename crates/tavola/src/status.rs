// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tavola status` command implementation.
//!
//! Opens the configured database read path and prints queue depth,
//! in-flight count, dead-letter count, and recent dead letters.

use std::sync::Arc;

use tavola_config::model::TavolaConfig;
use tavola_core::{StorageAdapter, TavolaError};
use tavola_storage::SqliteStorage;

/// Run the `tavola status` command.
pub async fn run_status(config: &TavolaConfig) -> Result<(), TavolaError> {
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let queue_name = &config.worker.queue_name;
    let stats = storage.queue_stats(queue_name).await?;

    println!("queue: {queue_name}");
    println!("  pending:      {}", stats.pending);
    println!("  processing:   {}", stats.processing);
    println!("  completed:    {}", stats.completed);
    println!("  dead-letters: {}", stats.dead_lettered);
    println!("  notified:     {}", stats.notified);

    let letters = storage.list_dead_letters(5).await?;
    if !letters.is_empty() {
        println!("\nmost recent dead letters:");
        for letter in letters {
            println!(
                "  #{} [{}] {} (deliveries: {})",
                letter.id, letter.created_at, letter.reason, letter.deliveries
            );
        }
    }

    storage.close().await?;
    Ok(())
}
