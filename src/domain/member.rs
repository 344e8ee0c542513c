use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::UserId;

/// プロフィール画像がない場合の代替画像
pub const DEFAULT_AVATAR: &str = "/img/default_user.png";

/// 会員の役割
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Member,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
            Role::Other(raw) => raw.as_str(),
        }
    }

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "admin" => Role::Admin,
            "member" => Role::Member,
            _ => Role::Other(trimmed.to_string()),
        }
    }

    /// 役割の変更要求として送れるか（空は不可）
    pub fn is_assignable(&self) -> bool {
        !self.as_str().trim().is_empty()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Role::parse(&raw))
    }
}

/// 会員（/api/members の要素、フィールド名は PascalCase）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Member {
    #[serde(rename = "ID")]
    pub id: UserId,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub profile_picture: String,
}

impl Member {
    pub fn avatar(&self) -> &str {
        if self.profile_picture.trim().is_empty() {
            DEFAULT_AVATAR
        } else {
            &self.profile_picture
        }
    }

    /// 削除前の確認文
    pub fn delete_prompt(&self) -> String {
        format!("Hapus akun {}?", self.username)
    }

    /// 役割変更の入力欄に表示する文
    pub fn role_prompt(&self) -> String {
        format!("Ubah role untuk {}", self.username)
    }
}

/// 役割変更の要求ボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleUpdate {
    pub role: Role,
}
