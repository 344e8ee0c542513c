use super::{BorrowId, BorrowStatus};

/// 状態遷移のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// 現在の状態からは許可されていない遷移
    NotAllowed {
        id: BorrowId,
        from: BorrowStatus,
        to: BorrowStatus,
    },
    /// 終端状態のため操作不可
    AlreadyFinished { id: BorrowId, status: BorrowStatus },
}

/// 貸出記録の不変条件違反
///
/// バックエンドが正とされるため、受信時には拒否せず検査結果としてのみ返す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorrowRecordError {
    /// 終端日付が複数設定されている
    MultipleTerminalDates(BorrowId),
    /// 終端日付があるのに状態が終端でない
    TerminalDateOnOpenRequest(BorrowId),
    /// 終端状態なのに終端日付がない
    MissingTerminalDate(BorrowId),
    /// 貸出日なしで返却期限が設定されている
    DueDateWithoutBorrowDate(BorrowId),
    /// 返却期限が貸出日 + 貸出期間と一致しない
    DueDateMismatch(BorrowId),
}

/// 絞り込み条件のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// 空のジャンル
    EmptyGenre,
    /// 既に選択済みのジャンル
    DuplicateGenre(String),
}

/// 帳票作成のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// 指定月に取引が1件もない
    NoActivity { month_name: String, year: i32 },
    /// 月の指定が範囲外（1〜12）
    InvalidMonth(u32),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::NoActivity { month_name, year } => write!(
                f,
                "Tidak ada data transaksi pada bulan {} {}",
                month_name, year
            ),
            ReportError::InvalidMonth(month) => write!(f, "Bulan tidak valid: {}", month),
        }
    }
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::NotAllowed { id, from, to } => write!(
                f,
                "Transaksi #{} tidak dapat diubah dari {} menjadi {}",
                id, from, to
            ),
            TransitionError::AlreadyFinished { id, status } => {
                write!(f, "Transaksi #{} sudah selesai ({})", id, status)
            }
        }
    }
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::EmptyGenre => write!(f, "Genre tidak boleh kosong"),
            FilterError::DuplicateGenre(genre) => write!(f, "Genre {} sudah dipilih", genre),
        }
    }
}
