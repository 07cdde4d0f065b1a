use crate::{
    errors::AppError,
    models::user::Profile,
    store::UserRepository,
};
use tracing::instrument;

pub const MAX_BIO_CHARS: usize = 500;

#[derive(Clone, Debug)]
pub struct ProfileService {
    users: UserRepository,
}

impl ProfileService {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    #[instrument(name = "Service: Get profile", skip(self))]
    pub async fn get_profile(&self, user_id: i64) -> Result<Profile, AppError> {
        let user = self
            .users
            .find_summary(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        let (followers_count, following_count) = self.users.follow_counts(user_id).await?;
        Ok(Profile {
            user,
            followers_count,
            following_count,
        })
    }

    /// An empty or blank bio clears it.
    #[instrument(name = "Service: Update bio", skip(self, bio))]
    pub async fn update_bio(&self, user_id: i64, caller_id: i64, bio: &str) -> Result<(), AppError> {
        if user_id != caller_id {
            return Err(AppError::Forbidden);
        }
        let bio = bio.trim();
        if bio.chars().count() > MAX_BIO_CHARS {
            return Err(AppError::Validation(format!(
                "Bio cannot exceed {MAX_BIO_CHARS} characters"
            )));
        }
        let bio = (!bio.is_empty()).then_some(bio);
        if self.users.update_bio(user_id, bio).await? == 0 {
            return Err(AppError::NotFound("User"));
        }
        Ok(())
    }

    #[instrument(name = "Service: Update avatar", skip(self))]
    pub async fn update_avatar(
        &self,
        user_id: i64,
        caller_id: i64,
        avatar_url: &str,
    ) -> Result<(), AppError> {
        if user_id != caller_id {
            return Err(AppError::Forbidden);
        }
        let avatar_url = avatar_url.trim();
        if avatar_url.is_empty() {
            return Err(AppError::Validation("Avatar URL is required".into()));
        }
        if self.users.update_avatar(user_id, avatar_url).await? == 0 {
            return Err(AppError::NotFound("User"));
        }
        Ok(())
    }
}
