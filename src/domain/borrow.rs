use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::{BookId, BorrowId, BorrowRecordError, Rupiah, TransitionError, timestamp};

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: i64 = 7;

/// 返却期限と貸出日のずれの許容範囲（秒）
///
/// バックエンドは dateBorrowed と dateDue を別々の時計で記録する。
const DUE_DATE_TOLERANCE_SECS: i64 = 60;

// ============================================================================
// 状態
// ============================================================================

/// 貸出申請の状態
///
/// 状態遷移の正はバックエンド側にあり、クライアントは表示と遷移要求のみを行う。
///
/// ```text
/// DIAJUKAN ──> DISETUJUI ──> DIPINJAM ──> DIKEMBALIKAN
///    │             │             └──────> HILANG
///    └──> DITOLAK  └──> DIBATALKAN
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BorrowStatus {
    /// 申請中（DIAJUKAN）
    Submitted,
    /// 承認済み（DISETUJUI）
    Approved,
    /// 貸出中（DIPINJAM）
    Borrowed,
    /// 返却済み（DIKEMBALIKAN）
    Returned,
    /// 紛失（HILANG）
    Lost,
    /// 却下（DITOLAK）
    Rejected,
    /// 取消（DIBATALKAN）
    Canceled,
    /// 未知の状態文字列（操作不可として扱う）
    Unknown(String),
}

impl BorrowStatus {
    /// 既知の全状態（フィルタ選択肢の並び順）
    pub const KNOWN: [BorrowStatus; 7] = [
        BorrowStatus::Submitted,
        BorrowStatus::Approved,
        BorrowStatus::Borrowed,
        BorrowStatus::Returned,
        BorrowStatus::Lost,
        BorrowStatus::Rejected,
        BorrowStatus::Canceled,
    ];

    /// ワイヤ表現
    pub fn as_str(&self) -> &str {
        match self {
            BorrowStatus::Submitted => "DIAJUKAN",
            BorrowStatus::Approved => "DISETUJUI",
            BorrowStatus::Borrowed => "DIPINJAM",
            BorrowStatus::Returned => "DIKEMBALIKAN",
            BorrowStatus::Lost => "HILANG",
            BorrowStatus::Rejected => "DITOLAK",
            BorrowStatus::Canceled => "DIBATALKAN",
            BorrowStatus::Unknown(raw) => raw.as_str(),
        }
    }

    /// 大文字小文字を区別せずに解釈する
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_uppercase();
        match normalized.as_str() {
            "DIAJUKAN" => BorrowStatus::Submitted,
            "DISETUJUI" => BorrowStatus::Approved,
            "DIPINJAM" => BorrowStatus::Borrowed,
            "DIKEMBALIKAN" => BorrowStatus::Returned,
            "HILANG" => BorrowStatus::Lost,
            "DITOLAK" => BorrowStatus::Rejected,
            "DIBATALKAN" => BorrowStatus::Canceled,
            _ => BorrowStatus::Unknown(normalized),
        }
    }

    /// 終端状態か（返却・紛失・却下・取消）
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BorrowStatus::Returned
                | BorrowStatus::Lost
                | BorrowStatus::Rejected
                | BorrowStatus::Canceled
        )
    }

    /// 管理者が実行できる操作
    pub fn admin_actions(&self) -> &'static [AdminAction] {
        match self {
            BorrowStatus::Submitted => &[AdminAction::Approve, AdminAction::Reject],
            BorrowStatus::Approved => &[AdminAction::HandOver, AdminAction::Cancel],
            BorrowStatus::Borrowed => &[AdminAction::AcceptReturn, AdminAction::MarkLost],
            BorrowStatus::Returned
            | BorrowStatus::Lost
            | BorrowStatus::Rejected
            | BorrowStatus::Canceled
            | BorrowStatus::Unknown(_) => &[],
        }
    }

    /// 会員が自分で取り消せるか（申請中のみ）
    pub fn member_can_cancel(&self) -> bool {
        matches!(self, BorrowStatus::Submitted)
    }

    /// 返却期限の行を表示する状態か
    pub fn shows_due_date(&self) -> bool {
        matches!(
            self,
            BorrowStatus::Borrowed | BorrowStatus::Returned | BorrowStatus::Lost
        )
    }

    /// 状態バッジ
    pub fn badge(&self) -> StatusBadge {
        let palette = match self {
            BorrowStatus::Submitted => BadgePalette::Yellow,
            BorrowStatus::Approved => BadgePalette::Blue,
            BorrowStatus::Borrowed => BadgePalette::Indigo,
            BorrowStatus::Returned => BadgePalette::Green,
            BorrowStatus::Rejected | BorrowStatus::Canceled => BadgePalette::Red,
            BorrowStatus::Lost => BadgePalette::Dark,
            BorrowStatus::Unknown(_) => BadgePalette::Gray,
        };
        StatusBadge {
            label: self.as_str().to_string(),
            palette,
        }
    }
}

impl fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BorrowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match BorrowStatus::parse(s) {
            BorrowStatus::Unknown(raw) => Err(format!("Invalid borrow status: {}", raw)),
            status => Ok(status),
        }
    }
}

impl Serialize for BorrowStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BorrowStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(BorrowStatus::parse(&raw))
    }
}

/// バッジの配色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgePalette {
    Yellow,
    Blue,
    Indigo,
    Green,
    Red,
    Dark,
    Gray,
}

impl BadgePalette {
    /// 描画用のクラス文字列
    pub fn css_classes(&self) -> &'static str {
        match self {
            BadgePalette::Yellow => "bg-yellow-100 text-yellow-800 border-yellow-300",
            BadgePalette::Blue => "bg-blue-100 text-blue-800 border-blue-300",
            BadgePalette::Indigo => "bg-indigo-100 text-indigo-800 border-indigo-300",
            BadgePalette::Green => "bg-green-100 text-green-800 border-green-300",
            BadgePalette::Red => "bg-red-50 text-red-600 border-red-200",
            BadgePalette::Dark => "bg-gray-800 text-white border-black",
            BadgePalette::Gray => "bg-gray-100 text-gray-600 border-gray-200",
        }
    }
}

/// 状態バッジ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub palette: BadgePalette,
}

// ============================================================================
// 操作
// ============================================================================

/// 管理者による状態変更操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminAction {
    /// 承認（Setujui）
    Approve,
    /// 却下（Tolak）
    Reject,
    /// 書籍の引き渡し（Serahkan Buku）、貸出期間が始まる
    HandOver,
    /// 取消（Batalkan）
    Cancel,
    /// 返却受付（Terima Kembali）
    AcceptReturn,
    /// 紛失（Buku Hilang）
    MarkLost,
}

impl AdminAction {
    pub fn label(&self) -> &'static str {
        match self {
            AdminAction::Approve => "Setujui",
            AdminAction::Reject => "Tolak",
            AdminAction::HandOver => "Serahkan Buku",
            AdminAction::Cancel => "Batalkan",
            AdminAction::AcceptReturn => "Terima Kembali",
            AdminAction::MarkLost => "Buku Hilang",
        }
    }

    /// 遷移先の状態
    pub fn target(&self) -> BorrowStatus {
        match self {
            AdminAction::Approve => BorrowStatus::Approved,
            AdminAction::Reject => BorrowStatus::Rejected,
            AdminAction::HandOver => BorrowStatus::Borrowed,
            AdminAction::Cancel => BorrowStatus::Canceled,
            AdminAction::AcceptReturn => BorrowStatus::Returned,
            AdminAction::MarkLost => BorrowStatus::Lost,
        }
    }

    pub fn tone(&self) -> ButtonTone {
        match self {
            AdminAction::Approve => ButtonTone::Blue,
            AdminAction::Reject => ButtonTone::Red,
            AdminAction::HandOver => ButtonTone::Indigo,
            AdminAction::Cancel => ButtonTone::Orange,
            AdminAction::AcceptReturn => ButtonTone::Green,
            AdminAction::MarkLost => ButtonTone::Dark,
        }
    }

    /// コマンドラインなどで使う短い名前
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_lowercase().as_str() {
            "approve" | "setujui" => Some(AdminAction::Approve),
            "reject" | "tolak" => Some(AdminAction::Reject),
            "handover" | "hand-over" | "serahkan" => Some(AdminAction::HandOver),
            "cancel" | "batalkan" => Some(AdminAction::Cancel),
            "return" | "accept-return" | "terima" => Some(AdminAction::AcceptReturn),
            "lost" | "hilang" => Some(AdminAction::MarkLost),
            _ => None,
        }
    }
}

/// ボタンの配色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTone {
    Blue,
    Red,
    Indigo,
    Orange,
    Green,
    Dark,
}

/// 状態変更要求（PATCH のボディ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: BorrowStatus,
}

/// 純粋関数：管理者操作が現在の状態から許可されているか検証する
///
/// 許可されている場合は送信すべき状態変更要求を返す。
pub fn plan_admin_transition(
    request: &BorrowRequest,
    action: AdminAction,
) -> Result<StatusUpdate, TransitionError> {
    if request.status.admin_actions().contains(&action) {
        return Ok(StatusUpdate {
            status: action.target(),
        });
    }

    if request.status.is_terminal() {
        return Err(TransitionError::AlreadyFinished {
            id: request.id,
            status: request.status.clone(),
        });
    }

    Err(TransitionError::NotAllowed {
        id: request.id,
        from: request.status.clone(),
        to: action.target(),
    })
}

/// 純粋関数：会員による取消が可能か検証する
pub fn plan_member_cancel(request: &BorrowRequest) -> Result<(), TransitionError> {
    if request.status.member_can_cancel() {
        return Ok(());
    }

    if request.status.is_terminal() {
        return Err(TransitionError::AlreadyFinished {
            id: request.id,
            status: request.status.clone(),
        });
    }

    Err(TransitionError::NotAllowed {
        id: request.id,
        from: request.status.clone(),
        to: BorrowStatus::Canceled,
    })
}

// ============================================================================
// 貸出申請
// ============================================================================

/// 貸出申請（取引）
///
/// 会員の一覧（/api/riwayat-pinjam）と管理者の一覧（/api/admin/daftar-pinjam/）の
/// 両方をこの型で受ける。管理者一覧にしかないフィールドは省略可能。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub id: BorrowId,
    #[serde(default)]
    pub book_id: Option<BookId>,
    #[serde(default)]
    pub book_title: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub cover_file: String,
    pub status: BorrowStatus,

    #[serde(with = "timestamp")]
    pub date_requested: DateTime<FixedOffset>,
    #[serde(default, with = "timestamp::option")]
    pub date_approved: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "timestamp::option")]
    pub date_borrowed: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "timestamp::option")]
    pub date_due: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "timestamp::option")]
    pub date_returned: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "timestamp::option")]
    pub date_lost: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "timestamp::option")]
    pub date_rejected: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "timestamp::option")]
    pub date_canceled: Option<DateTime<FixedOffset>>,

    #[serde(default)]
    pub fine_total: Rupiah,
    #[serde(default)]
    pub book_price: Rupiah,
    #[serde(default)]
    pub fine_per_day: Option<Rupiah>,
}

/// 終端日付の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    Returned,
    Lost,
    Rejected,
    Canceled,
}

/// タイムラインの1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub label: &'static str,
    pub at: DateTime<FixedOffset>,
}

/// 返却期限の表示情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDateInfo {
    pub due: DateTime<FixedOffset>,
    /// 延滞日数（期限内なら0）
    pub late_days: i64,
}

/// 紛失時の支払額の内訳
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LostBookSettlement {
    pub late_fine: Rupiah,
    pub replacement_cost: Rupiah,
    pub total: Rupiah,
}

impl BorrowRequest {
    /// 設定されている終端日付（返却 > 紛失 > 却下 > 取消 の優先順）
    pub fn terminal_date(&self) -> Option<(TerminalKind, DateTime<FixedOffset>)> {
        self.date_returned
            .map(|d| (TerminalKind::Returned, d))
            .or_else(|| self.date_lost.map(|d| (TerminalKind::Lost, d)))
            .or_else(|| self.date_rejected.map(|d| (TerminalKind::Rejected, d)))
            .or_else(|| self.date_canceled.map(|d| (TerminalKind::Canceled, d)))
    }

    /// 不変条件を検査する
    ///
    /// - 終端日付は高々1つ、かつ終端状態のときのみ
    /// - 終端状態なら終端日付がちょうど1つ
    /// - 返却期限は貸出日がある場合のみ、貸出日 + 7日
    pub fn check_invariants(&self) -> Result<(), BorrowRecordError> {
        let terminal_dates = [
            self.date_returned,
            self.date_lost,
            self.date_rejected,
            self.date_canceled,
        ]
        .iter()
        .filter(|d| d.is_some())
        .count();

        if terminal_dates > 1 {
            return Err(BorrowRecordError::MultipleTerminalDates(self.id));
        }
        if terminal_dates == 1 && !self.status.is_terminal() {
            return Err(BorrowRecordError::TerminalDateOnOpenRequest(self.id));
        }
        if terminal_dates == 0 && self.status.is_terminal() {
            return Err(BorrowRecordError::MissingTerminalDate(self.id));
        }

        match (self.date_borrowed, self.date_due) {
            (None, Some(_)) => Err(BorrowRecordError::DueDateWithoutBorrowDate(self.id)),
            (Some(borrowed), Some(due)) => {
                let expected = borrowed + Duration::days(LOAN_PERIOD_DAYS);
                if (due - expected).num_seconds().abs() > DUE_DATE_TOLERANCE_SECS {
                    Err(BorrowRecordError::DueDateMismatch(self.id))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// 経過のタイムライン（申請 → 承認 → 貸出 → 終端）
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        let mut entries = vec![TimelineEntry {
            label: "Diajukan",
            at: self.date_requested,
        }];
        if let Some(at) = self.date_approved {
            entries.push(TimelineEntry {
                label: "Disetujui",
                at,
            });
        }
        if let Some(at) = self.date_borrowed {
            entries.push(TimelineEntry {
                label: "Dipinjam",
                at,
            });
        }
        if let Some((kind, at)) = self.terminal_date() {
            let label = match kind {
                TerminalKind::Returned => "Dikembalikan",
                TerminalKind::Lost => "Hilang",
                TerminalKind::Rejected => "Ditolak",
                TerminalKind::Canceled => "Dibatalkan",
            };
            entries.push(TimelineEntry { label, at });
        }
        entries
    }

    /// 返却期限と延滞日数
    ///
    /// 貸出中・返却済み・紛失のときのみ。基準日は返却日、なければ紛失日、なければ `now`。
    /// 延滞日数は1日未満を切り上げる。
    pub fn due_date_info(&self, now: DateTime<FixedOffset>) -> Option<DueDateInfo> {
        if !self.status.shows_due_date() {
            return None;
        }
        let due = self.date_due?;
        let reference = self.date_returned.or(self.date_lost).unwrap_or(now);

        let late_days = if reference > due {
            let late_secs = (reference - due).num_seconds();
            let day_secs = Duration::days(1).num_seconds();
            (late_secs + day_secs - 1) / day_secs
        } else {
            0
        };

        Some(DueDateInfo { due, late_days })
    }

    /// 紛失確定前に提示する支払額（延滞料金 + 書籍代）
    pub fn lost_settlement(&self) -> LostBookSettlement {
        LostBookSettlement {
            late_fine: self.fine_total,
            replacement_cost: self.book_price,
            total: self.fine_total + self.book_price,
        }
    }

    /// 会員が請求書を出力できるか
    pub fn invoice_available(&self) -> bool {
        matches!(self.status, BorrowStatus::Returned | BorrowStatus::Lost)
            || self.fine_total.is_positive()
    }

    /// 管理者一覧の検索：ID または会員名（大文字小文字を区別しない）の部分一致
    pub fn matches_admin_search(&self, query: &str) -> bool {
        let query = query.trim();
        if self.id.value().to_string().contains(query) {
            return true;
        }
        let needle = query.to_lowercase();
        self.user_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&needle))
    }

    /// 会員の履歴検索：書名（大文字小文字を区別しない）または ID の部分一致
    pub fn matches_member_search(&self, query: &str) -> bool {
        let query = query.trim();
        self.book_title
            .to_lowercase()
            .contains(&query.to_lowercase())
            || self.id.value().to_string().contains(query)
    }
}

/// 純粋関数：状態変更前の確認文
pub fn confirmation_prompt(request: &BorrowRequest, action: AdminAction) -> String {
    match action {
        AdminAction::HandOver => format!(
            "Serahkan buku ke member? (Waktu pinjam {} hari dimulai dari sekarang).",
            LOAN_PERIOD_DAYS
        ),
        AdminAction::AcceptReturn => {
            let mut msg = String::from("Buku sudah diterima kembali fisik?");
            if request.fine_total.is_positive() {
                msg.push_str(&format!(
                    "\n\nPERHATIAN: Member memiliki denda keterlambatan {}. Pastikan sudah dibayar.",
                    request.fine_total
                ));
            }
            msg
        }
        AdminAction::MarkLost => {
            let s = request.lost_settlement();
            let rule = "==================================";
            format!(
                "Konfirmasi Buku HILANG?\n{rule}\n\
                 Denda Keterlambatan : {}\n\
                 Ganti Rugi Buku     : {}\n{rule}\n\
                 TOTAL DIBAYAR       : {}\n\n\
                 Lanjutkan status menjadi HILANG?",
                s.late_fine, s.replacement_cost, s.total
            )
        }
        AdminAction::Approve | AdminAction::Reject | AdminAction::Cancel => {
            format!("Ubah status menjadi {}?", action.target())
        }
    }
}

/// 状態による絞り込み
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BorrowStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: &BorrowStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    /// 空文字列は全件
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            StatusFilter::All
        } else {
            StatusFilter::Only(BorrowStatus::parse(raw))
        }
    }
}
