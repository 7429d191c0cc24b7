//! Account service for Ventaura
//!
//! This module provides:
//! - Account creation with Argon2id password hashing
//! - Credential checks that take the same time whether or not the email exists
//! - Login bookkeeping (`is_logged_in`, `last_activity`, location)
//! - Partial profile updates

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{ApiError, ApiResult};
use crate::models::user::{NewUser, User, UserProfileUpdate};
use crate::repositories::UserRepository;
use crate::services::distance::validate_coordinates;

/// Message returned for any failed login, so callers cannot probe for accounts
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";

const MIN_PASSWORD_LENGTH: usize = 8;

/// Input for creating an account, as received from the client
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub preferences: Option<String>,
    pub dislikes: Option<String>,
    pub price_range: Option<String>,
    pub max_distance: Option<f64>,
    pub crowd_size: Option<String>,
}

/// Account registration and login
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    argon2: Argon2<'static>,
    /// Verified against when the email is unknown so both paths cost one hash
    dummy_password_hash: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(users: UserRepository) -> ApiResult<Self> {
        let argon2 = Argon2::default();

        let dummy_salt = SaltString::generate(&mut OsRng);
        let dummy_password_hash = argon2
            .hash_password(b"ventaura-dummy-password", &dummy_salt)
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(Self {
            users,
            argon2,
            dummy_password_hash,
        })
    }

    /// Register a new user account
    ///
    /// # Errors
    /// - `ApiError::ValidationError` if a field is invalid
    /// - `ApiError::Conflict` if the email is already registered
    pub async fn register(&self, registration: Registration) -> ApiResult<User> {
        validate_registration(&registration)?;

        let email = registration.email.trim().to_lowercase();
        if self.users.email_exists(&email).await? {
            return Err(ApiError::conflict("user", email));
        }

        let password_hash = self.hash_password(&registration.password)?;

        let new_user = NewUser {
            email: email.clone(),
            first_name: registration.first_name.trim().to_string(),
            last_name: registration.last_name.trim().to_string(),
            password_hash,
            latitude: registration.latitude,
            longitude: registration.longitude,
            preferences: registration.preferences,
            dislikes: registration.dislikes,
            price_range: registration.price_range,
            max_distance: registration.max_distance,
            crowd_size: registration.crowd_size,
        };

        // Two concurrent sign-ups can both pass the exists check
        let user = self
            .users
            .create(&new_user)
            .await
            .map_err(|e| ApiError::from_unique_violation(e, "user", email))?;

        tracing::info!(user_id = user.user_id, "User registered successfully");

        Ok(user)
    }

    /// Authenticate a user and mark them logged in
    ///
    /// `coordinates`, when given, replace the stored location.
    ///
    /// # Errors
    /// - `ApiError::Unauthorized` with [`INVALID_CREDENTIALS`] for an unknown
    ///   email or a wrong password
    /// - `ApiError::ValidationError` for out-of-range coordinates
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        coordinates: Option<(f64, f64)>,
    ) -> ApiResult<User> {
        if let Some((lat, lon)) = coordinates {
            validate_coordinates(lat, lon)?;
        }

        let user = self.users.find_by_email(email).await?;

        let (user, password_valid) = match user {
            Some(u) => {
                let valid = self.verify_password(password, &u.password_hash)?;
                (Some(u), valid)
            }
            None => {
                let _ = self.verify_password(password, &self.dummy_password_hash);
                (None, false)
            }
        };

        let user = match (user, password_valid) {
            (Some(u), true) => u,
            (Some(u), false) => {
                tracing::warn!(user_id = u.user_id, "Login failed: invalid password");
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            (None, _) => {
                tracing::warn!("Login failed: unknown email");
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        self.users.mark_logged_in(user.user_id, coordinates).await?;

        tracing::info!(user_id = user.user_id, "User logged in successfully");

        Ok(user)
    }

    /// Apply a partial profile update
    ///
    /// # Errors
    /// - `ApiError::ValidationError` if nothing is being changed or a field is invalid
    /// - `ApiError::NotFound` if the user does not exist
    /// - `ApiError::Conflict` if the new email belongs to another account
    pub async fn update_profile(
        &self,
        user_id: i32,
        update: &UserProfileUpdate,
    ) -> ApiResult<User> {
        validate_profile_update(update)?;

        let email = update
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .unwrap_or_default();

        let user = self
            .users
            .update_profile(user_id, update)
            .await
            .map_err(|e| ApiError::from_unique_violation(e, "user", email))?
            .ok_or_else(|| ApiError::not_found("user", user_id))?;

        tracing::info!(user_id, "User profile updated");

        Ok(user)
    }

    /// Hash a password with Argon2id
    fn hash_password(&self, password: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against an Argon2id hash
    fn verify_password(&self, password: &str, hash: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| ApiError::Internal(format!("Invalid password hash format: {}", e)))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

fn validate_registration(registration: &Registration) -> ApiResult<()> {
    if !is_valid_email(&registration.email) {
        return Err(ApiError::ValidationError(
            "invalid email format".to_string(),
        ));
    }
    if registration.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::ValidationError(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if registration.first_name.trim().is_empty() || registration.last_name.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "first and last name are required".to_string(),
        ));
    }
    match (registration.latitude, registration.longitude) {
        (Some(lat), Some(lon)) => validate_coordinates(lat, lon)?,
        (None, None) => {}
        _ => {
            return Err(ApiError::ValidationError(
                "latitude and longitude must be provided together".to_string(),
            ))
        }
    }
    if registration.max_distance.is_some_and(|d| d < 0.0) {
        return Err(ApiError::ValidationError(
            "maxDistance cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_profile_update(update: &UserProfileUpdate) -> ApiResult<()> {
    if update.is_empty() {
        return Err(ApiError::ValidationError(
            "no fields to update".to_string(),
        ));
    }
    if update.email.as_deref().is_some_and(|e| !is_valid_email(e)) {
        return Err(ApiError::ValidationError(
            "invalid email format".to_string(),
        ));
    }
    let blank = |name: &Option<String>| name.as_deref().is_some_and(|n| n.trim().is_empty());
    if blank(&update.first_name) || blank(&update.last_name) {
        return Err(ApiError::ValidationError(
            "first and last name cannot be blank".to_string(),
        ));
    }
    validate_coordinates(
        update.latitude.unwrap_or_default(),
        update.longitude.unwrap_or_default(),
    )?;
    if update.max_distance.is_some_and(|d| d < 0.0) {
        return Err(ApiError::ValidationError(
            "maxDistance cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// Simple email validation
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.len() > 254 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }

    if !domain.contains('.') || domain.contains(char::is_whitespace) {
        return false;
    }

    domain.split('.').all(|part| !part.is_empty())
}
