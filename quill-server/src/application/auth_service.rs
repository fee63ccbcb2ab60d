use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::info;
use uuid::Uuid;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest, User, profile_url,
};
use crate::infrastructure::jwt::JwtService;

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(users: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self { users, jwt }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let password_hash = self.hash_password(&req.password)?;

        let new_user = Self::into_new_user(req, password_hash);
        let user = self.users.create_user(new_user).await?;
        info!(user_id = user.id, username = %user.username, "user registered");

        let access_token = self.issue_token(&user)?;
        Ok(AuthResult { user, access_token })
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.users.find_by_username(&req.username).await? {
            Some(user_creds) => user_creds,
            None => {
                // keep timing close to the "user exists" branch
                match self.verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                return Err(DomainError::InvalidCredentials);
            }
        };

        self.verify_password(&req.password, &user_creds.password_hash)?;

        let access_token = self.issue_token(&user_creds.user)?;
        Ok(AuthResult {
            user: user_creds.user,
            access_token,
        })
    }

    /// Resolves the acting user behind a verified token.
    pub(crate) async fn current_user(&self, user_id: i64) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user id", user_id))
    }

    pub(crate) async fn find_user(&self, uuid: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(|| DomainError::not_found("user", uuid))
    }

    /// Renames the acting user; the profile url follows the new username and
    /// a fresh token is issued since the old one carries the old username.
    pub(crate) async fn update_profile(
        &self,
        actor_user_id: i64,
        req: UpdateProfileRequest,
    ) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;
        let current = self.current_user(actor_user_id).await?;
        let url = profile_url(&req.username, current.uuid);

        let user = self
            .users
            .update_profile(actor_user_id, &req.username, &url)
            .await?
            .ok_or_else(|| DomainError::not_found("user id", actor_user_id))?;
        info!(user_id = user.id, username = %user.username, "user profile updated");

        let access_token = self.issue_token(&user)?;
        Ok(AuthResult { user, access_token })
    }

    pub(crate) async fn change_password(
        &self,
        actor_user_id: i64,
        req: ChangePasswordRequest,
    ) -> Result<(), DomainError> {
        let req = req.validate()?;
        let creds = self
            .users
            .find_credentials_by_id(actor_user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user id", actor_user_id))?;

        self.verify_password(&req.current_password, &creds.password_hash)?;
        let password_hash = self.hash_password(&req.new_password)?;

        if !self
            .users
            .update_password_hash(actor_user_id, &password_hash)
            .await?
        {
            return Err(DomainError::not_found("user id", actor_user_id));
        }
        info!(user_id = actor_user_id, "user password changed");
        Ok(())
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Self::argon2()?
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Unexpected(err.to_string()),
            })?;

        Ok(())
    }

    fn issue_token(&self, user: &User) -> Result<String, DomainError> {
        self.jwt
            .generate_token(user.id, &user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }

    fn into_new_user(req: RegisterRequest, password_hash: String) -> NewUser {
        let uuid = Uuid::new_v4();
        NewUser {
            uuid,
            url: profile_url(&req.username, uuid),
            username: req.username,
            password_hash,
        }
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
