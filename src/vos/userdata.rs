use serde::Serialize;

use crate::models::{User, UserId};

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        UserData {
            user_id: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
        }
    }
}

/// 登录成功后返回的令牌和账户信息
#[derive(Serialize, Debug)]
pub struct LoginData {
    pub token: String,
    pub user: UserData,
}
