use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, prelude::Type};

use super::ownership::{Owned, Owner};

/// 性别枚举，对应数据库里的 `gender` 枚举类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Type)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Other => "other",
        };
        f.write_str(text)
    }
}

impl TryFrom<&str> for Gender {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "female" => Ok(Gender::Female),
            "male" => Ok(Gender::Male),
            "other" => Ok(Gender::Other),
            _ => Err(format!("Invalid gender: {}", s)),
        }
    }
}

/// 员工实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub employee_number: i32, // 数据库自增
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub address: Option<String>,
    pub position: String,
    pub department_code: String,
    #[serde(rename = "ownerId")]
    #[sqlx(rename = "owner_id", try_from = "Option<i32>")]
    pub owner: Owner,
}

/// 员工的可编辑字段，新建和更新共用
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeProfile {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub address: Option<String>,
    pub position: String,
    pub department_code: String,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub profile: EmployeeProfile,
    pub owner: Owner,
}

impl Employee {
    pub fn from_new(employee_number: i32, new: NewEmployee) -> Self {
        let NewEmployee { profile, owner } = new;
        Employee {
            employee_number,
            first_name: profile.first_name,
            last_name: profile.last_name,
            gender: profile.gender,
            address: profile.address,
            position: profile.position,
            department_code: profile.department_code,
            owner,
        }
    }

    pub fn apply(&mut self, profile: &EmployeeProfile) {
        self.first_name = profile.first_name.clone();
        self.last_name = profile.last_name.clone();
        self.gender = profile.gender;
        self.address = profile.address.clone();
        self.position = profile.position.clone();
        self.department_code = profile.department_code.clone();
    }
}

impl Owned for Employee {
    fn owner(&self) -> Owner {
        self.owner
    }
}
