use anyhow::Result;
use serde_json::json;

use super::Context;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub async fn show_schedule(ctx: &mut Context, instructor_id: &str) -> Result<()> {
    let store = ctx.store().await?;

    let availability = store.schedule.list_availability(instructor_id).await?;
    let blockouts = store.schedule.list_blockouts(instructor_id).await?;

    let value = json!({ "availability": &availability, "blockouts": &blockouts });
    ctx.emit(&value, || {
        println!("Weekly availability");
        for window in &availability {
            println!(
                "  {}  {} - {}",
                DAY_NAMES[usize::from(window.day_of_week)],
                window.start_time.format("%H:%M"),
                window.end_time.format("%H:%M")
            );
        }

        println!();
        println!("Blockouts");
        for blockout in &blockouts {
            let window = match (blockout.start_time, blockout.end_time) {
                (Some(start), Some(end)) => format!("{} - {}", start.format("%H:%M"), end.format("%H:%M")),
                _ => "all day".to_string(),
            };
            println!(
                "  {}  {}  {}",
                blockout.date,
                window,
                blockout.reason.as_deref().unwrap_or("")
            );
        }
    })
}
