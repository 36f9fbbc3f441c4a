use serde::{Deserialize, Serialize};

use super::user::UserId;

/// 已认证的请求主体 (由身份协作者解析出的用户 ID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Principal(pub UserId);

impl Principal {
    pub fn user_id(self) -> UserId {
        self.0
    }
}

/// 行的归属
///
/// `Shared` 对应数据库里 `owner_id IS NULL` 的预置数据，对所有主体可见。
/// 通过正常写入路径创建的行总是 `OwnedBy(创建者)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<UserId>", into = "Option<UserId>")]
pub enum Owner {
    OwnedBy(UserId),
    Shared,
}

impl Owner {
    /// 主体 `p` 能否读取或修改该行
    pub fn is_visible_to(self, principal: Principal) -> bool {
        match self {
            Owner::OwnedBy(id) => id == principal.0,
            Owner::Shared => true,
        }
    }

    pub fn owner_id(self) -> Option<UserId> {
        match self {
            Owner::OwnedBy(id) => Some(id),
            Owner::Shared => None,
        }
    }

    pub fn is_owned_by(self, user_id: UserId) -> bool {
        self == Owner::OwnedBy(user_id)
    }
}

impl From<Principal> for Owner {
    fn from(principal: Principal) -> Self {
        Owner::OwnedBy(principal.0)
    }
}

impl From<Option<UserId>> for Owner {
    fn from(owner_id: Option<UserId>) -> Self {
        match owner_id {
            Some(id) => Owner::OwnedBy(id),
            None => Owner::Shared,
        }
    }
}

impl From<Owner> for Option<UserId> {
    fn from(owner: Owner) -> Self {
        owner.owner_id()
    }
}

/// 带归属信息的实体
pub trait Owned {
    fn owner(&self) -> Owner;

    fn is_visible_to(&self, principal: Principal) -> bool {
        self.owner().is_visible_to(principal)
    }
}

/// 按主体过滤出可见的行
pub fn visible_to<'a, T, I>(rows: I, principal: Principal) -> impl Iterator<Item = &'a T>
where
    T: Owned + 'a,
    I: IntoIterator<Item = &'a T>,
{
    rows.into_iter().filter(move |row| row.is_visible_to(principal))
}
