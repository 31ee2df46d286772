use pftracker_client::{Client, controllers::SIGN_IN_FALLBACK, storage::Theme};

use super::require_session;
use crate::{
    error::{AppError, Result},
    prompt,
};

pub async fn login(client: &Client, email: &str) -> Result<()> {
    let password = prompt::password("Password: ")?;
    let user = client
        .auth()
        .login(email, &password)
        .await
        .map_err(|err| AppError::client(err, SIGN_IN_FALLBACK))?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub async fn register(client: &Client, name: &str, email: &str) -> Result<()> {
    let password = prompt::new_password()?;
    let user = client
        .auth()
        .register(name, email, &password)
        .await
        .map_err(|err| AppError::client(err, "Unable to create account. Please try again."))?;
    println!("Account created, signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub async fn demo(client: &Client) -> Result<()> {
    let user = client
        .auth()
        .demo()
        .await
        .map_err(|err| AppError::client(err, SIGN_IN_FALLBACK))?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub async fn refresh(client: &Client) -> Result<()> {
    require_session(client)?;
    client
        .auth()
        .refresh_tokens()
        .await
        .map_err(|err| AppError::client(err, "Could not refresh the session."))?;
    println!("Session refreshed.");
    Ok(())
}

pub fn logout(client: &Client) {
    client.auth().logout();
    println!("Signed out.");
}

pub fn whoami(client: &Client) -> Result<()> {
    require_session(client)?;
    if let Some(user) = client.session().user() {
        println!("{} <{}> (id {})", user.name, user.email, user.id);
    }
    Ok(())
}

pub fn theme(client: &Client, theme: Option<Theme>) -> Result<()> {
    match theme {
        Some(theme) => {
            client
                .theme()
                .set(theme)
                .map_err(|err| AppError::client(err.into(), "Could not save the theme."))?;
            println!("Theme set to {theme}.");
        }
        None => println!("{}", client.theme().get()),
    }
    Ok(())
}
