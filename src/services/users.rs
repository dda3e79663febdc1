//! Accounts: signup, authentication, profiles and the admin account

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookStatus},
        user::{normalize_username, LoginForm, ProfileForm, SignupForm, User},
    },
    repository::{users::USERNAME_TAKEN, Repository},
    services::validation,
};

pub fn user_not_found(username: &str) -> String {
    format!("We cannot find anyone with the username '{}'.", username)
}

pub const WRONG_PASSWORD: &str = "Incorrect password entered.";

/// A user with the books they currently hold
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub reserved: Vec<Book>,
    pub checked_out: Vec<Book>,
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    admin_username: String,
}

impl UsersService {
    pub fn new(repository: Repository, admin_username: String) -> Self {
        Self {
            repository,
            admin_username: normalize_username(&admin_username),
        }
    }

    /// Create an account. The username is lower-cased before any rule is checked.
    pub async fn signup(&self, form: &SignupForm) -> AppResult<User> {
        let form = SignupForm {
            username: normalize_username(&form.username),
            ..form.clone()
        };
        validation::validate_signup(&form)?;

        if self.repository.users.exists(&form.username).await? {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let hash = self.hash_password(&form.password)?;
        let user = self
            .repository
            .users
            .create(&form.username, &hash, &form.full_name)
            .await?;

        tracing::info!("New account '{}' (id={})", user.username, user.id);
        Ok(user)
    }

    /// Check credentials and return the matching user
    pub async fn authenticate(&self, form: &LoginForm) -> AppResult<User> {
        let username = normalize_username(&form.username);
        validation::validate_login(&LoginForm {
            username: username.clone(),
            password: form.password.clone(),
        })?;

        let user = self
            .repository
            .users
            .get_by_username(&username)
            .await?
            .ok_or_else(|| AppError::Authentication(user_not_found(&username)))?;

        if !self.verify_password(&user, &form.password)? {
            tracing::info!("Rejected login for '{}': wrong password", username);
            return Err(AppError::Authentication(WRONG_PASSWORD.to_string()));
        }

        tracing::info!("User '{}' logged in", user.username);
        Ok(user)
    }

    /// Hash password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Verify password against the stored hash
    pub fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Get user by username or fail with the lookup message
    pub async fn get_user(&self, username: &str) -> AppResult<User> {
        self.repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(user_not_found(username)))
    }

    /// The user's reserved and checked-out books
    pub async fn profile(&self, user: User) -> AppResult<Profile> {
        let reserved = self
            .repository
            .books
            .held_by(user.id, BookStatus::Reserved)
            .await?;
        let checked_out = self
            .repository
            .books
            .held_by(user.id, BookStatus::Unavailable)
            .await?;

        Ok(Profile {
            user,
            reserved,
            checked_out,
        })
    }

    /// Change name and username of `current_username`
    pub async fn edit_profile(&self, current_username: &str, form: &ProfileForm) -> AppResult<User> {
        let user = self.get_user(current_username).await?;

        let form = ProfileForm {
            new_username: normalize_username(&form.new_username),
            ..form.clone()
        };
        validation::validate_profile(&form)?;

        if form.new_username != user.username && self.repository.users.exists(&form.new_username).await? {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let updated = self
            .repository
            .users
            .update_profile(user.id, &form.new_username, &form.full_name)
            .await?
            .ok_or_else(|| AppError::NotFound(user_not_found(current_username)))?;

        tracing::info!("Profile of '{}' updated (now '{}')", user.username, updated.username);
        Ok(updated)
    }

    /// Everyone but the admin
    pub async fn list_members(&self) -> AppResult<Vec<User>> {
        self.repository.users.list_members(&self.admin_username).await
    }

    pub async fn delete_user(&self, username: &str) -> AppResult<()> {
        if normalize_username(username) == self.admin_username {
            return Err(AppError::Authorization(
                "The administrator account cannot be removed.".to_string(),
            ));
        }

        if !self.repository.users.delete(username).await? {
            return Err(AppError::NotFound(user_not_found(username)));
        }

        tracing::info!("User '{}' removed", username);
        Ok(())
    }

    /// Create the admin account if it does not exist yet
    pub async fn ensure_admin(&self, password: Option<&str>) -> AppResult<()> {
        if self.repository.users.exists(&self.admin_username).await? {
            return Ok(());
        }

        match password {
            Some(password) if !password.is_empty() => {
                let hash = self.hash_password(password)?;
                self.repository
                    .users
                    .create(&self.admin_username, &hash, "Administrator")
                    .await?;
                tracing::info!("Created administrator account '{}'", self.admin_username);
            }
            _ => tracing::warn!(
                "No administrator account '{}' and no admin password configured",
                self.admin_username
            ),
        }

        Ok(())
    }
}
