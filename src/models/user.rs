use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type UserId = i32;

/// 账户 (所有权的根)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId, // 数据库自增ID
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新建账户，密码已经哈希过
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
}

impl NewUser {
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        full_name: Option<String>,
    ) -> Self {
        NewUser {
            username,
            email,
            password_hash,
            full_name: full_name.filter(|name| !name.trim().is_empty()),
        }
    }
}

impl User {
    /// 用 argon2 校验密码
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// 用 argon2 哈希密码
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_password(password: &str) -> User {
        User {
            user_id: 1,
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: User::hash_password(password).unwrap(),
            full_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn password_round_trips_through_hash() {
        let user = user_with_password("correct horse");
        assert!(user.verify_password("correct horse").unwrap());
        assert!(!user.verify_password("wrong horse").unwrap());
    }

    #[test]
    fn hash_is_never_serialized() {
        let user = user_with_password("correct horse");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["username"], "jane");
    }

    #[test]
    fn blank_full_name_is_dropped() {
        let user = NewUser::new("a".into(), "b".into(), "c".into(), Some("  ".into()));
        assert_eq!(user.full_name, None);
    }
}
