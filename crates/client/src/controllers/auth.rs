use api_types::auth::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, User};

use crate::{
    Client,
    api::AuthApi,
    error::{Error, Result},
    session::Session,
    validation,
};

pub const SIGN_IN_FALLBACK: &str = "Unable to sign in. Please try again.";

/// Sign-in flows. Every successful flow ends in [`Session::set_auth`].
#[derive(Clone)]
pub struct AuthController {
    api: AuthApi,
    session: Session,
}

impl AuthController {
    pub fn new(client: &Client) -> Self {
        Self {
            api: client.auth_api(),
            session: client.session().clone(),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        validation::login(&request)?;
        let response = self.api.login(&request).await?;
        self.establish(response)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        validation::register(&request)?;
        let response = self.api.register(&request).await?;
        self.establish(response)
    }

    /// Signs in to the shared demo account.
    pub async fn demo(&self) -> Result<User> {
        let response = self.api.demo().await?;
        self.establish(response)
    }

    /// Trades the stored refresh token for a new pair, keeping the user.
    pub async fn refresh_tokens(&self) -> Result<()> {
        let refresh_token = self
            .session
            .snapshot()
            .tokens
            .map(|tokens| tokens.refresh_token)
            .filter(|token| !token.is_empty())
            .ok_or(Error::SignedOut)?;

        let tokens = self.api.refresh(&RefreshRequest { refresh_token }).await?;
        self.session.set_tokens(tokens)?;
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(Error::SignedOut)
        }
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    fn establish(&self, response: AuthResponse) -> Result<User> {
        let AuthResponse { user, tokens } = response;
        self.session.set_auth(user.clone(), tokens)?;
        Ok(user)
    }
}
