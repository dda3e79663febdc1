//! Profile pages, open to their owner and the admin

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};

use super::{recoverable, redirect_with};
use crate::{
    authorization::PRIVATE_PAGE,
    error::AppResult,
    models::{user::ProfileForm, Identity, User},
    session::{CurrentUser, FlashRedirect, IdentityChange, RequestContext},
    views::{self, Chrome},
    AppState,
};

/// The user behind `username`, or the redirect to send when the caller may
/// not see them
async fn visible_user(state: &AppState, context: &RequestContext, username: &str) -> Result<User, Response> {
    let user = state
        .services
        .users
        .get_user(username)
        .await
        .map_err(|e| redirect_with(e, "/").into_response())?;

    if !context.is_self_or_admin(&user.username, &state.config.catalogue.admin_username) {
        return Err(FlashRedirect::error("/", PRIVATE_PAGE).into_response());
    }

    Ok(user)
}

pub async fn own_profile(CurrentUser(user): CurrentUser) -> Redirect {
    Redirect::to(&format!("/profile/{}", user.username))
}

pub async fn view_profile(
    State(state): State<AppState>,
    context: RequestContext,
    Path(username): Path<String>,
) -> AppResult<Response> {
    let user = match visible_user(&state, &context, &username).await {
        Ok(user) => user,
        Err(refusal) => return Ok(refusal),
    };

    let profile = state.services.users.profile(user).await?;
    let chrome = Chrome::new(&context, &state.config.catalogue.admin_username);
    Ok(views::account::profile(&chrome, &profile).into_response())
}

pub async fn edit_profile_page(
    State(state): State<AppState>,
    context: RequestContext,
    Path(username): Path<String>,
) -> AppResult<Response> {
    let user = match visible_user(&state, &context, &username).await {
        Ok(user) => user,
        Err(refusal) => return Ok(refusal),
    };

    let form = ProfileForm {
        full_name: user.full_name.clone(),
        new_username: user.username.clone(),
    };
    let chrome = Chrome::new(&context, &state.config.catalogue.admin_username);
    Ok(views::account::edit_profile(&chrome, &user.username, &form).into_response())
}

pub async fn edit_profile(
    State(state): State<AppState>,
    context: RequestContext,
    Path(username): Path<String>,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    let user = match visible_user(&state, &context, &username).await {
        Ok(user) => user,
        Err(refusal) => return Ok(refusal),
    };

    match state.services.users.edit_profile(&user.username, &form).await {
        Ok(updated) => {
            let mut redirect = FlashRedirect::success("/", "Profile has been updated.");
            // Editing your own profile refreshes what the session knows about you
            if context.identity.as_ref().is_some_and(|me| me.id == updated.id) {
                redirect = redirect.with_identity(IdentityChange::Refresh(Identity::from(&updated)));
            }
            Ok(redirect.into_response())
        }
        Err(e) => {
            let chrome = Chrome::new(&context, &state.config.catalogue.admin_username)
                .with_error(recoverable(e)?);
            Ok(views::account::edit_profile(&chrome, &user.username, &form).into_response())
        }
    }
}
