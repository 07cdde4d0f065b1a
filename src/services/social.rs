use crate::{
    errors::{AppError, map_unique_violation},
    models::follow::FollowUser,
    store::{FollowRepository, UserRepository},
};
use tracing::instrument;

#[derive(Clone, Debug)]
pub struct SocialService {
    follows: FollowRepository,
    users: UserRepository,
}

impl SocialService {
    pub fn new(follows: FollowRepository, users: UserRepository) -> Self {
        Self { follows, users }
    }

    /// Adds the edge `follower_id -> followee_id`. Following someone twice
    /// is a `Conflict`.
    #[instrument(name = "Service: Follow", skip(self))]
    pub async fn follow(&self, follower_id: i64, followee_id: i64) -> Result<(), AppError> {
        if follower_id == followee_id {
            return Err(AppError::SelfFollow);
        }
        if !self.users.exists(followee_id).await? || !self.users.exists(follower_id).await? {
            return Err(AppError::NotFound("User"));
        }
        self.follows
            .insert(follower_id, followee_id)
            .await
            .map_err(|e| map_unique_violation(e, AppError::Conflict("Already following".into())))?;
        tracing::info!("Follow edge created");
        Ok(())
    }

    #[instrument(name = "Service: Unfollow", skip(self))]
    pub async fn unfollow(&self, follower_id: i64, followee_id: i64) -> Result<(), AppError> {
        let removed = self.follows.delete(follower_id, followee_id).await?;
        if removed == 0 {
            tracing::debug!("No follow edge to remove");
        }
        Ok(())
    }

    pub async fn is_following(&self, follower_id: i64, followee_id: i64) -> Result<bool, AppError> {
        Ok(self.follows.exists(follower_id, followee_id).await?)
    }

    pub async fn list_followers(&self, user_id: i64) -> Result<Vec<FollowUser>, AppError> {
        Ok(self.follows.followers_of(user_id).await?)
    }

    pub async fn list_following(&self, user_id: i64) -> Result<Vec<FollowUser>, AppError> {
        Ok(self.follows.following_of(user_id).await?)
    }
}
