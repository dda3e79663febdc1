//! Login, signup and logout

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};

use super::recoverable;
use crate::{
    error::AppResult,
    models::{
        user::{LoginForm, SignupForm},
        Identity,
    },
    session::{FlashRedirect, IdentityChange, RequestContext},
    views::{self, Chrome},
    AppState,
};

pub async fn login_page(State(state): State<AppState>, context: RequestContext) -> Response {
    let chrome = Chrome::new(&context, &state.config.catalogue.admin_username);
    views::account::login(&chrome, "").into_response()
}

pub async fn login(
    State(state): State<AppState>,
    context: RequestContext,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    match state.services.users.authenticate(&form).await {
        Ok(user) => Ok(FlashRedirect::success(
            "/",
            format!("You are now logged in as {}.", user.username),
        )
        .with_identity(IdentityChange::SignIn(Identity::from(&user)))
        .into_response()),
        Err(e) => {
            let chrome = Chrome::new(&context, &state.config.catalogue.admin_username)
                .with_error(recoverable(e)?);
            Ok(views::account::login(&chrome, &form.username.to_lowercase()).into_response())
        }
    }
}

pub async fn signup_page(State(state): State<AppState>, context: RequestContext) -> Response {
    let chrome = Chrome::new(&context, &state.config.catalogue.admin_username);
    views::account::signup(&chrome, &SignupForm::default()).into_response()
}

pub async fn signup(
    State(state): State<AppState>,
    context: RequestContext,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    match state.services.users.signup(&form).await {
        Ok(_) => Ok(FlashRedirect::success("/login", "You have successfully signed up.").into_response()),
        Err(e) => {
            let chrome = Chrome::new(&context, &state.config.catalogue.admin_username)
                .with_error(recoverable(e)?);
            Ok(views::account::signup(&chrome, &form).into_response())
        }
    }
}

pub async fn logout(context: RequestContext) -> FlashRedirect {
    if let Some(identity) = &context.identity {
        tracing::info!("User '{}' logged out", identity.username);
    }
    FlashRedirect::success("/login", "You logged out.").with_identity(IdentityChange::SignOut)
}
