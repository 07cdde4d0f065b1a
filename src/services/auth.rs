use std::fmt::Display;
use std::sync::Arc;

use crate::errors::{AppError, map_unique_violation};
use crate::models::user::UserModel;
use crate::store::UserRepository;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

impl Claims {
    /// The authenticated caller.
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub.parse().map_err(|_| AppError::InvalidToken)
    }
}

impl Display for Claims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User: {}", self.sub)
    }
}

#[derive(Clone)]
pub struct AuthService {
    repo: UserRepository,
    keys: Arc<Keys>,
    token_ttl: chrono::Duration,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("repo", &self.repo)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(repo: UserRepository, keys: Keys, token_ttl: chrono::Duration) -> Self {
        Self {
            repo,
            keys: Arc::new(keys),
            token_ttl,
        }
    }

    #[instrument(name = "AuthService: Register", skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, AppError> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username, email and password are required".into(),
            ));
        }
        if !email.contains('@') {
            return Err(AppError::Validation("Email address is malformed".into()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| anyhow::anyhow!("failed to hash password"))?
            .to_string();

        self.repo
            .create_user(username, email, &hash)
            .await
            .map_err(|e| map_unique_violation(e, AppError::UserAlreadyExists))
    }

    #[instrument(
        name = "AuthService: Login attempt",
        skip(self, password),
        fields(username = %username)
    )]
    pub async fn login(&self, username: &str, password: &str) -> Result<UserModel, AppError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".into(),
            ));
        }

        // 1. Fetch User
        let user = match self.repo.find_by_username(username.trim()).await? {
            Some(u) => u,
            None => {
                tracing::warn!("Login failed: User not found");
                return Err(AppError::WrongCredentials);
            }
        };

        // 2. Parse Hash
        // Hashes carried over from older databases may not be PHC strings.
        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            tracing::warn!("Login failed: stored password hash is not verifiable: {:?}", e);
            AppError::WrongCredentials
        })?;

        // 3. Verify Password
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            tracing::warn!("Login failed: Invalid password provided");
            return Err(AppError::WrongCredentials);
        }

        tracing::info!(user_id = user.id, "User authenticated successfully");
        Ok(user)
    }

    pub fn issue_token(&self, user_id: i64) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (chrono::Utc::now() + self.token_ttl).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.keys.encoding).map_err(|e| {
            tracing::error!("JWT Encoding failed: {:?}", e);
            AppError::TokenCreation
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| {
                tracing::warn!("JWT decoding failed: {:?}", e);
                AppError::InvalidToken
            })?;
        Ok(token_data.claims)
    }
}
