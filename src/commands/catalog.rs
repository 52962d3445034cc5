use anyhow::Result;

use super::Context;

pub async fn list_classes(ctx: &mut Context) -> Result<()> {
    let store = ctx.store().await?;
    let classes = store.classes.list_classes().await?;

    ctx.emit(&classes, || {
        if classes.is_empty() {
            println!("No classes found.");
            return;
        }
        for class in &classes {
            println!(
                "{}  {} ({} min, {}) - {:.2}",
                class.id,
                class.name,
                class.duration_minutes,
                class.difficulty.as_deref().unwrap_or("all levels"),
                class.price_single
            );
        }
    })
}

pub async fn list_packages(ctx: &mut Context) -> Result<()> {
    let store = ctx.store().await?;
    let packages = store.packages.list_active_packages().await?;

    ctx.emit(&packages, || {
        if packages.is_empty() {
            println!("No packages on sale.");
            return;
        }
        for package in &packages {
            println!(
                "{}  {} - {} credits for {:.2}",
                package.id, package.name, package.credits, package.price
            );
        }
    })
}

pub async fn buy_package(ctx: &mut Context, package_id: &str) -> Result<()> {
    let store = ctx.store().await?;
    let user_id = ctx.user_id()?;

    let purchase = store.packages.purchase_package(package_id, user_id).await?;

    ctx.emit(&purchase, || {
        println!(
            "✓ Bought {} ({} credits for {:.2})",
            purchase.package_name, purchase.credits, purchase.price
        );
    })
}

pub async fn list_purchases(ctx: &mut Context) -> Result<()> {
    let store = ctx.store().await?;
    let purchases = store.packages.list_purchases(ctx.user_id()?).await?;

    ctx.emit(&purchases, || {
        if purchases.is_empty() {
            println!("No purchases yet.");
            return;
        }
        for purchase in &purchases {
            println!(
                "{}  {} - {} credits, {:.2}",
                purchase.date.format("%Y-%m-%d"),
                purchase.package_name,
                purchase.credits,
                purchase.price
            );
        }
    })
}
