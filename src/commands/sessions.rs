use anyhow::Result;
use classbook::models::LessonSession;

use super::Context;

pub async fn list_sessions(ctx: &mut Context, mine: bool) -> Result<()> {
    let store = ctx.store().await?;

    let sessions = if mine {
        store.sessions.list_sessions_for_user(ctx.user_id()?).await?
    } else {
        store.sessions.list_sessions().await?
    };

    ctx.emit(&sessions, || print_sessions(&sessions))
}

fn print_sessions(sessions: &[LessonSession]) {
    if sessions.is_empty() {
        println!("No sessions found.");
        return;
    }

    println!("{:<38} {:<18} {:<8} {:>6}", "ID", "Starts", "Length", "Spots");
    for session in sessions {
        let minutes = (session.end_time - session.start_time).num_minutes();
        println!(
            "{:<38} {:<18} {:<8} {:>6}",
            session.id,
            session.start_time.format("%Y-%m-%d %H:%M"),
            format!("{}m", minutes),
            format!("{}/{}", session.spots_left(), session.capacity)
        );
    }
}

pub async fn book_session(ctx: &mut Context, session_id: &str) -> Result<()> {
    let store = ctx.store().await?;
    let user_id = ctx.user_id()?;

    let enrollment = store.sessions.book_session(session_id, user_id).await?;

    ctx.emit(&enrollment, || {
        println!("✓ Booked session {}", session_id);
    })
}

pub async fn cancel_booking(ctx: &mut Context, session_id: &str) -> Result<()> {
    let store = ctx.store().await?;
    let user_id = ctx.user_id()?;

    let settings = store.settings.get_settings().await?;
    store
        .sessions
        .cancel_booking(session_id, user_id, settings.cancellation_window_hours)
        .await?;

    println!("✓ Cancelled booking for session {}", session_id);
    Ok(())
}
