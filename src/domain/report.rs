use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};

use super::{BorrowId, BorrowRequest, BorrowStatus, ReportError, Rupiah};

/// 月名（インドネシア語）
pub const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// 月の略称（画面表示用）
pub const SHORT_MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

pub const SYSTEM_NAME: &str = "Libra|Library Area System";

/// 1〜12 の月番号から月名を得る
pub fn month_name(month: u32) -> Result<&'static str, ReportError> {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .ok_or(ReportError::InvalidMonth(month))
}

/// `17 Agustus 2025`
pub fn format_long_date(date: NaiveDate) -> String {
    let month = MONTH_NAMES
        .get(date.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!("{} {} {}", date.day(), month, date.year())
}

/// `17/8/2025`
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// `17 Agu 2025 14:30`（タイムスタンプ自身のオフセットで表示）
pub fn format_timestamp(value: DateTime<FixedOffset>) -> String {
    let month = SHORT_MONTH_NAMES
        .get(value.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!(
        "{} {} {} {}",
        value.day(),
        month,
        value.year(),
        value.format("%H:%M")
    )
}

fn format_optional_date(value: Option<DateTime<FixedOffset>>) -> String {
    value
        .map(|dt| format_long_date(dt.date_naive()))
        .unwrap_or_else(|| "-".to_string())
}

/// 同じ日の項目に振る記号（a, b, …, z, aa, ab, …）
fn item_letter(index: usize) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'a' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

// ============================================================================
// 文書モデル
// ============================================================================

/// 描画エンジンに依存しない文書
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Heading(String),
    Text(String),
    /// 強調表示する行（金額など）
    Emphasis(String),
    Rule,
    Table(Table),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub head: Vec<String>,
    /// セル内の改行は `\n`
    pub rows: Vec<Vec<String>>,
}

// ============================================================================
// 月次報告
// ============================================================================

/// 報告の1行（活動のあった日）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub day: u32,
    /// 承認された貸出
    pub loans: Vec<String>,
    /// 返却と紛失（記号は共通の連番）
    pub settlements: Vec<String>,
}

/// 月次集計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSummary {
    pub loans: usize,
    pub returns: usize,
    pub lost: usize,
    pub total_fines: Rupiah,
}

/// 月次貸出報告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub rows: Vec<ReportRow>,
    pub summary: ReportSummary,
}

fn falls_on(value: Option<DateTime<FixedOffset>>, date: NaiveDate) -> bool {
    value.is_some_and(|dt| dt.date_naive() == date)
}

impl MonthlyReport {
    /// 純粋関数：取引一覧から指定月の報告を作る
    ///
    /// 日付の判定は各タイムスタンプ自身のオフセットでの暦日。
    /// 活動のない日は行を出さず、1行もなければ `NoActivity`。
    pub fn compose(
        records: &[BorrowRequest],
        year: i32,
        month: u32,
    ) -> Result<Self, ReportError> {
        let name = month_name(month)?;
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(ReportError::InvalidMonth(month))?;

        let mut rows = Vec::new();
        let mut summary = ReportSummary::default();

        for date in first.iter_days().take_while(|d| d.month() == month) {
            let mut loans = Vec::new();
            let mut settlements = Vec::new();

            for trx in records {
                let user = trx.user_name.as_deref().unwrap_or("-");

                if falls_on(trx.date_approved, date) {
                    loans.push(format!(
                        "{}. {} - {}",
                        item_letter(loans.len()),
                        user,
                        trx.book_title
                    ));
                    summary.loans += 1;
                }

                if trx.status == BorrowStatus::Returned && falls_on(trx.date_returned, date) {
                    let mut info = format!("{}. {} (Kembali)", item_letter(settlements.len()), user);
                    if trx.fine_total.is_positive() {
                        info.push_str(&format!(" [Denda: {}]", trx.fine_total));
                        summary.total_fines += trx.fine_total;
                    }
                    settlements.push(info);
                    summary.returns += 1;
                }

                if trx.status == BorrowStatus::Lost
                    && falls_on(trx.date_lost.or(trx.date_returned), date)
                {
                    settlements.push(format!(
                        "{}. {} - {} (HILANG)\n   [Total Ganti Rugi: {}]",
                        item_letter(settlements.len()),
                        user,
                        trx.book_title,
                        trx.fine_total
                    ));
                    summary.lost += 1;
                    summary.total_fines += trx.fine_total;
                }
            }

            if !loans.is_empty() || !settlements.is_empty() {
                rows.push(ReportRow {
                    day: date.day(),
                    loans,
                    settlements,
                });
            }
        }

        if rows.is_empty() {
            return Err(ReportError::NoActivity {
                month_name: name.to_string(),
                year,
            });
        }

        Ok(Self {
            year,
            month,
            month_name: name,
            rows,
            summary,
        })
    }

    pub fn title(&self) -> String {
        format!("Laporan Peminjaman - {} {}", self.month_name, self.year)
    }

    pub fn file_name(&self) -> String {
        format!("Laporan_Keuangan_{}_{}.pdf", self.month_name, self.year)
    }

    pub fn to_document(&self, printed_on: NaiveDate) -> Document {
        let join_or_dash = |items: &[String]| {
            if items.is_empty() {
                "-".to_string()
            } else {
                items.join("\n")
            }
        };

        let table = Table {
            head: vec![
                "Tgl".to_string(),
                "Peminjaman Buku".to_string(),
                "Pengembalian / Hilang & Denda".to_string(),
            ],
            rows: self
                .rows
                .iter()
                .map(|row| {
                    vec![
                        row.day.to_string(),
                        join_or_dash(&row.loans),
                        join_or_dash(&row.settlements),
                    ]
                })
                .collect(),
        };

        let s = &self.summary;
        Document {
            file_name: self.file_name(),
            blocks: vec![
                Block::Title(self.title()),
                Block::Text(SYSTEM_NAME.to_string()),
                Block::Text(format!("Dicetak pada: {}", format_short_date(printed_on))),
                Block::Rule,
                Block::Table(table),
                Block::Heading("Ringkasan Bulanan".to_string()),
                Block::Text(format!("Total Peminjaman: {} Buku", s.loans)),
                Block::Text(format!("Total Pengembalian: {} Buku", s.returns)),
                Block::Text(format!("Total Buku Hilang: {} Buku", s.lost)),
                Block::Emphasis(format!("Total Pendapatan Denda: {}", s.total_fines)),
            ],
        }
    }
}

// ============================================================================
// 請求書
// ============================================================================

/// 1件の取引の請求書
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub id: BorrowId,
    pub book_title: String,
    pub status: BorrowStatus,
    pub date_requested: DateTime<FixedOffset>,
    pub date_borrowed: Option<DateTime<FixedOffset>>,
    pub date_due: Option<DateTime<FixedOffset>>,
    pub date_returned: Option<DateTime<FixedOffset>>,
    pub date_lost: Option<DateTime<FixedOffset>>,
    pub fine_total: Rupiah,
}

impl Invoice {
    pub fn for_request(request: &BorrowRequest) -> Self {
        Self {
            id: request.id,
            book_title: request.book_title.clone(),
            status: request.status.clone(),
            date_requested: request.date_requested,
            date_borrowed: request.date_borrowed,
            date_due: request.date_due,
            date_returned: request.date_returned,
            date_lost: request.date_lost,
            fine_total: request.fine_total,
        }
    }

    pub fn file_name(&self) -> String {
        format!("Invoice_Libra_{}.pdf", self.id)
    }

    /// 返却日、なければ紛失日（"(Hilang)" 付き）
    fn closing_date(&self) -> String {
        match (self.date_returned, self.date_lost) {
            (Some(returned), _) => format_long_date(returned.date_naive()),
            (None, Some(lost)) => format!("{} (Hilang)", format_long_date(lost.date_naive())),
            (None, None) => "-".to_string(),
        }
    }

    pub fn metadata(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID Transaksi", format!("#{}", self.id)),
            ("Judul Buku", self.book_title.clone()),
            ("Status Akhir", self.status.to_string()),
            (
                "Tanggal Diajukan",
                format_long_date(self.date_requested.date_naive()),
            ),
            ("Tanggal Dipinjam", format_optional_date(self.date_borrowed)),
            ("Batas Pengembalian", format_optional_date(self.date_due)),
            ("Tanggal Dikembalikan", self.closing_date()),
        ]
    }

    pub fn to_document(&self, printed_on: NaiveDate) -> Document {
        let metadata = Table {
            head: Vec::new(),
            rows: self
                .metadata()
                .into_iter()
                .map(|(k, v)| vec![k.to_string(), v])
                .collect(),
        };
        let fees = Table {
            head: vec!["Deskripsi".to_string(), "Jumlah".to_string()],
            rows: vec![vec![
                "Total Denda Keterlambatan / Ganti Rugi".to_string(),
                self.fine_total.to_string(),
            ]],
        };

        Document {
            file_name: self.file_name(),
            blocks: vec![
                Block::Title("INVOICE PEMINJAMAN".to_string()),
                Block::Text("Libra | Library Area System".to_string()),
                Block::Text(format!("Dicetak: {}", format_long_date(printed_on))),
                Block::Heading("Detail Transaksi".to_string()),
                Block::Table(metadata),
                Block::Heading("Rincian Biaya".to_string()),
                Block::Table(fees),
                Block::Text("Terima kasih telah menggunakan layanan perpustakaan kami.".to_string()),
                Block::Text("Harap simpan dokumen ini sebagai bukti.".to_string()),
            ],
        }
    }
}
