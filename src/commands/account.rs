use anyhow::Result;
use dialoguer::{Input, Password};

use super::Context;

pub async fn login(ctx: &mut Context) -> Result<()> {
    println!("Classbook - Login");
    println!();

    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let password = Password::new().with_prompt("Password").interact()?;

    println!();
    println!("Signing in as {}...", email);

    let store = ctx.connect()?;

    match store.auth.sign_in(&email, &password).await {
        Ok(session) => {
            ctx.remember_session(&session);
            ctx.save_config()?;

            println!("✓ Login successful!");
            if let Some(profile) = store.auth.current_profile().await {
                println!();
                println!("Welcome, {}!", profile.name);
                println!("Credits: {}", profile.package_credits);
            }
            Ok(())
        }
        Err(e) => {
            println!("✗ Login failed: {}", e);
            Err(e.into())
        }
    }
}

pub async fn logout(ctx: &mut Context) -> Result<()> {
    if !ctx.config.is_authenticated() {
        println!("You are not logged in.");
        return Ok(());
    }

    let store = ctx.store().await?;
    let result = store.auth.sign_out().await;

    // the local session is forgotten even when the backend call fails
    ctx.config.clear_session();
    ctx.save_config()?;

    match result {
        Ok(()) => println!("✓ Logged out successfully!"),
        Err(e) => println!("✓ Logged out locally (backend sign-out failed: {})", e),
    }

    Ok(())
}

pub async fn whoami(ctx: &mut Context) -> Result<()> {
    if !ctx.config.is_authenticated() {
        println!("You are not logged in.");
        println!();
        println!("Use 'classbook login' to authenticate.");
        return Ok(());
    }

    let store = ctx.store().await?;

    match store.auth.current_profile().await {
        Some(profile) => ctx.emit(&profile, || {
            println!("✓ Signed in as:");
            println!();
            println!("  Name:     {}", profile.name);
            println!("  Email:    {}", profile.email);
            println!("  Role:     {}", profile.role);
            println!("  Credits:  {}", profile.package_credits);
            println!("  User ID:  {}", profile.id);
        }),
        None => {
            println!("✗ Could not load your profile.");
            println!();
            println!("Your session may have expired.");
            println!("Use 'classbook login' to authenticate again.");
            anyhow::bail!("No profile for the saved session")
        }
    }
}
