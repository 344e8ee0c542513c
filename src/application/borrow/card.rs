use chrono::{DateTime, FixedOffset};

use crate::domain::catalog::cover_or_default;
use crate::domain::report::format_timestamp;
use crate::domain::{AdminAction, BorrowId, BorrowRequest, BorrowStatus, ButtonTone, StatusBadge};

/// 操作ボタン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    pub action: AdminAction,
    pub label: &'static str,
    pub tone: ButtonTone,
}

impl From<AdminAction> for ActionButton {
    fn from(action: AdminAction) -> Self {
        Self {
            action,
            label: action.label(),
            tone: action.tone(),
        }
    }
}

/// タイムラインの1行（表示用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineLine {
    pub label: &'static str,
    pub at: String,
}

/// 返却期限の行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueLine {
    pub due: String,
    pub late_days: i64,
}

impl DueLine {
    pub fn text(&self) -> String {
        if self.late_days > 0 {
            format!("Batas: {} (Telat {} hari)", self.due, self.late_days)
        } else {
            format!("Batas: {}", self.due)
        }
    }
}

/// 貸出カード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowCard {
    pub id: BorrowId,
    pub title: String,
    pub user_name: Option<String>,
    pub cover: String,
    pub badge: StatusBadge,
    pub timeline: Vec<TimelineLine>,
    pub due: Option<DueLine>,
    /// 延滞料金がある場合のみ
    pub fine: Option<String>,
    /// 管理者の操作ボタン（会員カードでは常に空）
    pub actions: Vec<ActionButton>,
    pub note: Option<&'static str>,
    pub can_cancel: bool,
    pub can_print_invoice: bool,
}

impl BorrowCard {
    fn base(request: &BorrowRequest, now: DateTime<FixedOffset>) -> Self {
        let timeline = request
            .timeline()
            .into_iter()
            .map(|entry| TimelineLine {
                label: entry.label,
                at: format_timestamp(entry.at),
            })
            .collect();

        let due = request.due_date_info(now).map(|info| DueLine {
            due: format_timestamp(info.due),
            late_days: info.late_days,
        });

        Self {
            id: request.id,
            title: request.book_title.clone(),
            user_name: request.user_name.clone(),
            cover: cover_or_default(&request.cover_file).to_string(),
            badge: request.status.badge(),
            timeline,
            due,
            fine: request
                .fine_total
                .is_positive()
                .then(|| format!("Denda: {}", request.fine_total)),
            actions: Vec::new(),
            note: None,
            can_cancel: false,
            can_print_invoice: false,
        }
    }

    /// 管理者の貸出キュー用
    pub fn for_admin(request: &BorrowRequest, now: DateTime<FixedOffset>) -> Self {
        let mut card = Self::base(request, now);
        card.actions = request
            .status
            .admin_actions()
            .iter()
            .copied()
            .map(ActionButton::from)
            .collect();
        card.note = match request.status {
            BorrowStatus::Approved => Some("Member ambil buku"),
            _ if card.actions.is_empty() => Some("Transaksi Selesai"),
            _ => None,
        };
        card
    }

    /// 会員の貸出履歴用
    pub fn for_member(request: &BorrowRequest, now: DateTime<FixedOffset>) -> Self {
        let mut card = Self::base(request, now);
        card.can_cancel = request.status.member_can_cancel();
        card.can_print_invoice = request.invoice_available();
        card
    }
}
