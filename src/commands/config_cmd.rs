use anyhow::Result;

use classbook::config::Config;

use super::Context;

pub fn show_config(ctx: &Context) -> Result<()> {
    let mut shown = ctx.config.clone();
    if shown.is_authenticated() {
        shown.auth.access_token = "<hidden>".to_string();
        shown.auth.refresh_token = "<hidden>".to_string();
    }
    let config_str = toml::to_string_pretty(&shown)?;

    println!("Current Configuration ({})", ctx.config_path.display());
    println!("────────────────────────────────");
    println!();
    println!("{}", config_str);

    Ok(())
}

pub fn init_config(ctx: &Context, force: bool) -> Result<()> {
    if ctx.config_path.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            ctx.config_path.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    Config::default().save_to(&ctx.config_path)?;

    println!("✓ Configuration initialized at: {}", ctx.config_path.display());
    println!();
    println!("Set backend.url and backend.anon_key before signing in.");

    Ok(())
}
