use anyhow::Result;

use super::Context;

pub async fn show_settings(ctx: &mut Context) -> Result<()> {
    let store = ctx.store().await?;
    let settings = store.settings.get_settings().await?;

    ctx.emit(&settings, || {
        println!("Studio Settings");
        println!("────────────────────────────────");
        println!("  Pool capacity:        {}", settings.pool_capacity);
        println!("  Cancellation window:  {}h", settings.cancellation_window_hours);
        println!("  Maintenance mode:     {}", if settings.maintenance_mode { "on" } else { "off" });
        println!("  Contact email:        {}", settings.contact_email);
    })
}

pub async fn set_maintenance(ctx: &mut Context, enabled: bool) -> Result<()> {
    let store = ctx.store().await?;

    let mut settings = store.settings.get_settings().await?;
    settings.maintenance_mode = enabled;
    store.settings.save_settings(&settings).await?;

    println!("✓ Maintenance mode {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}
