use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::debug;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{Actor, LoginRequest, RegisterRequest, User};
use crate::infrastructure::jwt::JwtService;

/// A signed-in user together with the token that carries their session.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    jwt: JwtService,
}

impl<R: UserRepository> AuthService<R> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(repo: R, jwt: JwtService) -> Self {
        Self { repo, jwt }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<Session, DomainError> {
        let req = req.validate()?;

        let password_hash = self.hash_password(&req.password)?;

        let new_user = Self::into_new_user(req, password_hash);
        let user = self.repo.create_user(new_user).await?;

        self.open_session(user)
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<Session, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.repo.find_by_username(&req.username).await? {
            Some(user_creds) => user_creds,
            None => {
                // keep timing close to the found-user path
                match self.verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                return Err(DomainError::InvalidCredentials);
            }
        };

        self.verify_password(&req.password, &user_creds.password_hash)?;
        self.open_session(user_creds.user)
    }

    /// Maps a session token back to the user it was issued for. Expired or
    /// tampered tokens yield `None`: the request is treated as anonymous.
    pub(crate) fn resolve_session(&self, token: &str) -> Option<Actor> {
        match self.jwt.verify_token(token) {
            Ok(claims) => Some(Actor {
                user_id: claims.user_id,
                username: claims.username,
            }),
            Err(err) => {
                debug!(error = %err, "ignoring invalid session token");
                None
            }
        }
    }

    pub(crate) fn session_ttl_seconds(&self) -> i64 {
        self.jwt.ttl_seconds()
    }

    pub(crate) async fn find_user(&self, username: &str) -> Result<User, DomainError> {
        self.repo
            .find_by_username(username)
            .await?
            .map(|creds| creds.user)
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))
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

    fn open_session(&self, user: User) -> Result<Session, DomainError> {
        let access_token = self
            .jwt
            .generate_token(user.id, &user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(Session { user, access_token })
    }

    fn into_new_user(req: RegisterRequest, password_hash: String) -> NewUser {
        NewUser {
            username: req.username,
            email: req.email,
            password_hash,
        }
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
