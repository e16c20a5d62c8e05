//! Account commands.

use anyhow::{Context as _, Result};
use dialoguer::Password;

use super::{LoginArgs, RegisterArgs};
use crate::context::Context;

pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.open_shop()?;
    let password = match args.password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let user = shop.login(&args.login, &password).context("Login failed")?;
    ctx.save_session(&shop)?;

    if ctx.output.is_json() {
        ctx.output.json(&user);
    } else {
        ctx.output
            .success(&format!("Logged in as {} ({})", user.username, user.role));
    }
    Ok(())
}

pub async fn register(args: RegisterArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.open_shop()?;
    let password = match args.password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?,
    };

    let user = shop
        .register(&args.username, args.email.as_deref(), &password)
        .context("Registration failed")?;
    ctx.save_session(&shop)?;

    if ctx.output.is_json() {
        ctx.output.json(&user);
    } else {
        ctx.output
            .success(&format!("Account created, logged in as {}", user.username));
    }
    Ok(())
}

pub async fn logout(ctx: &Context) -> Result<()> {
    let mut shop = ctx.open_shop()?;
    let was = shop.current_user().map(|u| u.username.clone());
    shop.logout()?;
    ctx.clear_session()?;

    match was {
        Some(name) => ctx.output.success(&format!("Logged out {}", name)),
        None => ctx.output.info("Not logged in."),
    }
    Ok(())
}

pub async fn whoami(ctx: &Context) -> Result<()> {
    let shop = ctx.open_shop()?;
    let user = shop.current_user();

    if ctx.output.is_json() {
        ctx.output.json(&user);
        return Ok(());
    }

    match user {
        Some(user) => {
            ctx.output.kv("username", &user.username);
            if let Some(email) = &user.email {
                ctx.output.kv("email", email);
            }
            ctx.output.kv("role", user.role.as_str());
        }
        None => ctx.output.info("Not logged in."),
    }
    Ok(())
}
