use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{BookId, HistoryId, catalog::cover_or_default, timestamp};

/// 電子書籍の閲覧履歴（/api/ebook/history の要素）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbookHistoryItem {
    pub id: HistoryId,
    pub book_id: BookId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cover_file: String,
    #[serde(default = "first_page")]
    pub last_page: u32,
    /// `YYYY-MM-DD HH:MM`（WIB）で送られてくる
    #[serde(default, with = "timestamp::option")]
    pub date_last_read: Option<DateTime<FixedOffset>>,
}

impl EbookHistoryItem {
    pub fn cover_or_default(&self) -> &str {
        cover_or_default(&self.cover_file)
    }

    /// 削除前の確認文
    pub fn delete_prompt(&self) -> String {
        format!("Hapus riwayat baca \"{}\"?", self.title)
    }

    /// 書名の部分一致（大文字小文字を区別しない）
    pub fn matches_search(&self, query: &str) -> bool {
        self.title
            .to_lowercase()
            .contains(&query.trim().to_lowercase())
    }

    /// 続きから読むためのリンク（読書位置はサーバー側で保持）
    pub fn resume_href(&self) -> String {
        format!("/baca_buku?id={}", self.book_id)
    }
}

/// 読書位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingProgress {
    #[serde(default = "first_page")]
    pub page: u32,
}

impl Default for ReadingProgress {
    fn default() -> Self {
        Self { page: first_page() }
    }
}

/// 読書位置の保存要求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub book_id: BookId,
    pub page: u32,
}

fn first_page() -> u32 {
    1
}
