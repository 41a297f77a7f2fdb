//! Session Discord commands - `login` and `logout`.
//!
//! Replies are ephemeral so credentials and session details stay private to the caller.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Opens a session for the calling Discord account.
    #[poise::command(slash_command, ephemeral)]
    pub async fn login(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Operator email address"] email: String,
        #[description = "Operator password"] password: String,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let data = ctx.data();

        let outcome = data
            .sessions
            .lock()
            .await
            .login(&user_id, &email, &password, &data.credentials);

        match outcome {
            Ok(session) => {
                ctx.say(format!(
                    "✅ Logged in as **{}**. Session valid until {} UTC.",
                    session.email,
                    session.expires_at.format("%Y-%m-%d %H:%M")
                ))
                .await?;
            }
            Err(e) if e.is_user_facing() => {
                ctx.say(format!("❌ {e}")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Ends the calling account's session.
    #[poise::command(slash_command, ephemeral)]
    pub async fn logout(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let ended = ctx.data().sessions.lock().await.logout(&user_id);

        if ended {
            ctx.say("👋 Logged out.").await?;
        } else {
            ctx.say("You were not logged in.").await?;
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
