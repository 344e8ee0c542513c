use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

use super::{BookId, FilterError, Rupiah};

/// 表紙がない場合の代替画像
pub const DEFAULT_COVER: &str = "uploads/default_book.png";

/// おすすめ欄のあらすじの最大文字数
pub const SYNOPSIS_PREVIEW_CHARS: usize = 150;

// ============================================================================
// 書籍
// ============================================================================

/// 書籍の種類
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BookType {
    /// 電子書籍のみ
    Ebook,
    /// 紙の書籍のみ（Buku Fisik）
    PhysicalBook,
    /// 紙と電子の両方（Fisik & Ebook）
    PhysicalAndEbook,
    /// 未知の種類
    Other(String),
}

impl BookType {
    pub fn as_str(&self) -> &str {
        match self {
            BookType::Ebook => "Ebook",
            BookType::PhysicalBook => "Buku Fisik",
            BookType::PhysicalAndEbook => "Fisik & Ebook",
            BookType::Other(raw) => raw.as_str(),
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Ebook" => BookType::Ebook,
            "Buku Fisik" => BookType::PhysicalBook,
            "Fisik & Ebook" => BookType::PhysicalAndEbook,
            other => BookType::Other(other.to_string()),
        }
    }

    /// 電子版を閲覧できるか
    pub fn is_readable(&self) -> bool {
        matches!(self, BookType::Ebook | BookType::PhysicalAndEbook)
    }

    /// 紙の書籍として貸出申請できるか
    pub fn is_borrowable(&self) -> bool {
        matches!(self, BookType::PhysicalBook | BookType::PhysicalAndEbook)
    }

    /// 在庫表示を行うか（電子書籍のみの場合は非表示）
    pub fn shows_stock(&self) -> bool {
        !matches!(self, BookType::Ebook)
    }
}

impl fmt::Display for BookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BookType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(BookType::parse(&raw))
    }
}

/// 書籍（/books の要素）
///
/// バックエンドは NULL の文字列列を空文字列として返す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub year: i32,
    /// カンマ区切りのジャンル
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type")]
    pub book_type: BookType,
    #[serde(default)]
    pub stock: i64,
    /// 書籍価格（紛失時の弁償額）
    #[serde(default)]
    pub fine_amount: Rupiah,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_file: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub ebook_file: String,
}

impl Book {
    pub fn genres(&self) -> Vec<String> {
        parse_genres(&self.genre)
    }

    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    /// 貸出申請を送れるか（在庫切れの紙の書籍は不可）
    pub fn can_request_borrow(&self) -> bool {
        self.book_type.is_borrowable() && self.is_available()
    }

    pub fn cover_or_default(&self) -> &str {
        cover_or_default(&self.cover_file)
    }
}

/// 純粋関数：カンマ区切りのジャンル文字列を分解する
pub fn parse_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn cover_or_default(cover: &str) -> &str {
    if cover.trim().is_empty() {
        DEFAULT_COVER
    } else {
        cover
    }
}

// ============================================================================
// 絞り込み条件
// ============================================================================

/// カタログの絞り込み条件
///
/// 種類とカテゴリは単一選択、ジャンルは複数選択（AND 条件としてサーバー側で評価）。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub book_type: Option<BookType>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub genres: BTreeSet<String>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// 同じ種類を再選択すると解除、それ以外は置き換え
    pub fn toggle_type(&mut self, book_type: BookType) {
        if self.book_type.as_ref() == Some(&book_type) {
            self.book_type = None;
        } else {
            self.book_type = Some(book_type);
        }
    }

    /// 同じカテゴリを再選択すると解除、それ以外は置き換え
    pub fn toggle_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        if self.category.as_deref() == Some(category.as_str()) {
            self.category = None;
        } else {
            self.category = Some(category);
        }
    }

    /// ジャンルの選択を反転する。選択状態になった場合 true
    pub fn toggle_genre(&mut self, genre: &str) -> bool {
        let genre = genre.trim();
        if genre.is_empty() {
            return false;
        }
        if self.genres.remove(genre) {
            false
        } else {
            self.genres.insert(genre.to_string())
        }
    }

    /// 任意のジャンルを追加する
    pub fn add_custom_genre(&mut self, input: &str) -> Result<(), FilterError> {
        let genre = input.trim();
        if genre.is_empty() {
            return Err(FilterError::EmptyGenre);
        }
        if self.genres.contains(genre) {
            return Err(FilterError::DuplicateGenre(genre.to_string()));
        }
        self.genres.insert(genre.to_string());
        Ok(())
    }

    /// 種類・カテゴリ・ジャンルを解除する（検索語は残す）
    pub fn reset(&mut self) {
        self.book_type = None;
        self.category = None;
        self.genres.clear();
    }

    pub fn is_type_selected(&self, book_type: &BookType) -> bool {
        self.book_type.as_ref() == Some(book_type)
    }

    pub fn is_category_selected(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }

    pub fn is_genre_selected(&self, genre: &str) -> bool {
        self.genres.contains(genre)
    }

    /// 純粋関数：クエリパラメータに変換する
    ///
    /// 空の値は省略し、ジャンルは1件ごとに `genre` を繰り返す。
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_string()));
        }
        if let Some(book_type) = self
            .book_type
            .as_ref()
            .map(BookType::as_str)
            .filter(|t| !t.is_empty())
        {
            pairs.push(("type", book_type.to_string()));
        }
        if let Some(category) = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            pairs.push(("category", category.to_string()));
        }
        for genre in &self.genres {
            pairs.push(("genre", genre.clone()));
        }

        pairs
    }
}

// ============================================================================
// 表示用モデル
// ============================================================================

/// 一覧を表示する利用者
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Member,
    Admin,
}

impl Audience {
    /// 詳細画面への遷移先
    pub fn detail_href(&self, id: BookId) -> String {
        match self {
            Audience::Member => format!("/buka_buku_member.html?id={}", id),
            Audience::Admin => format!("buka_buku_admin.html?id={}", id),
        }
    }
}

/// 在庫表示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Tersedia
    Available,
    /// Habis
    OutOfStock,
}

impl Availability {
    pub fn label(&self) -> &'static str {
        match self {
            Availability::Available => "Tersedia",
            Availability::OutOfStock => "Habis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreBadge {
    pub name: String,
    /// 現在の絞り込み条件に含まれているか
    pub active: bool,
}

/// 書籍カード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCard {
    pub id: BookId,
    pub cover: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub category: String,
    /// 電子書籍のみの場合は `None`
    pub availability: Option<Availability>,
    pub genres: Vec<GenreBadge>,
    pub href: String,
}

impl BookCard {
    /// 純粋関数：(書籍, 絞り込み条件) からカードを作る
    pub fn render(book: &Book, filter: &CatalogFilter, audience: Audience) -> Self {
        let availability = book.book_type.shows_stock().then(|| {
            if book.is_available() {
                Availability::Available
            } else {
                Availability::OutOfStock
            }
        });

        let genres = book
            .genres()
            .into_iter()
            .map(|name| GenreBadge {
                active: filter.is_genre_selected(&name),
                name,
            })
            .collect();

        Self {
            id: book.id,
            cover: book.cover_or_default().to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
            category: book.category.clone(),
            availability,
            genres,
            href: audience.detail_href(book.id),
        }
    }
}

// ============================================================================
// 書籍の登録・更新フォーム
// ============================================================================

/// アップロードするファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// 書籍の新規登録（multipart POST /add-book）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub category: String,
    pub book_type: BookType,
    pub location: String,
    pub stock_max: i64,
    pub fine_amount: Rupiah,
    pub description: String,
    pub cover: Option<Upload>,
    pub ebook: Option<Upload>,
}

impl NewBook {
    /// テキスト項目（ファイルを除く）
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("author", self.author.clone()),
            ("year", self.year.to_string()),
            ("genre", self.genre.clone()),
            ("category", self.category.clone()),
            ("type", self.book_type.to_string()),
            ("location", self.location.clone()),
            ("stockMax", self.stock_max.to_string()),
            ("fineAmount", self.fine_amount.value().to_string()),
            ("description", self.description.clone()),
        ]
    }
}

/// 書籍の更新（multipart POST /books/update）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookUpdate {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub category: String,
    pub book_type: BookType,
    pub location: String,
    pub stock: i64,
    pub fine_amount: Rupiah,
    pub description: String,
    pub cover: Option<Upload>,
}

impl BookUpdate {
    /// 既存の書籍を初期値とする
    pub fn from_book(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
            genre: book.genre.clone(),
            category: book.category.clone(),
            book_type: book.book_type.clone(),
            location: book.location.clone(),
            stock: book.stock,
            fine_amount: book.fine_amount,
            description: book.description.clone(),
            cover: None,
        }
    }

    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("title", self.title.clone()),
            ("author", self.author.clone()),
            ("year", self.year.to_string()),
            ("genre", self.genre.clone()),
            ("category", self.category.clone()),
            ("type", self.book_type.to_string()),
            ("location", self.location.clone()),
            ("stock", self.stock.to_string()),
            ("fineAmount", self.fine_amount.value().to_string()),
            ("description", self.description.clone()),
        ]
    }
}

// ============================================================================
// おすすめ
// ============================================================================

/// おすすめ書籍（/api/books/random の要素）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: BookId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub cover: String,
}

impl Recommendation {
    /// あらすじの抜粋（150文字を超える場合は "..." を付ける）
    pub fn synopsis_preview(&self) -> String {
        if self.synopsis.chars().count() > SYNOPSIS_PREVIEW_CHARS {
            let head: String = self.synopsis.chars().take(SYNOPSIS_PREVIEW_CHARS).collect();
            format!("{}...", head)
        } else {
            self.synopsis.clone()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::book;
    use super::*;

    #[test]
    fn test_query_pairs_omit_empty_values() {
        let filter = CatalogFilter::new();
        assert!(filter.to_query_pairs().is_empty());

        let mut filter = CatalogFilter::new();
        filter.set_search("  ");
        filter.category = Some(String::new());
        assert!(filter.to_query_pairs().is_empty());
    }

    #[test]
    fn test_query_pairs_repeat_genre() {
        let mut filter = CatalogFilter::new();
        filter.set_search("laskar");
        filter.toggle_type(BookType::PhysicalBook);
        filter.toggle_category("Novel");
        filter.toggle_genre("Horor");
        filter.toggle_genre("Komedi");

        let pairs = filter.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("search", "laskar".to_string()),
                ("type", "Buku Fisik".to_string()),
                ("category", "Novel".to_string()),
                ("genre", "Horor".to_string()),
                ("genre", "Komedi".to_string()),
            ]
        );
        assert_eq!(pairs.iter().filter(|(k, _)| *k == "search").count(), 1);
    }

    // TDD: ジャンルを2回切り替えると元に戻るテスト
    #[test]
    fn test_toggle_genre_twice_restores_filter() {
        let mut filter = CatalogFilter::new();
        filter.toggle_genre("Fantasi");
        let before = filter.clone();

        assert!(filter.toggle_genre("Horor"));
        assert!(!filter.toggle_genre("Horor"));
        assert_eq!(filter, before);
    }

    #[test]
    fn test_toggle_type_and_category_are_single_valued() {
        let mut filter = CatalogFilter::new();
        filter.toggle_type(BookType::Ebook);
        filter.toggle_type(BookType::PhysicalBook);
        assert_eq!(filter.book_type, Some(BookType::PhysicalBook));
        filter.toggle_type(BookType::PhysicalBook);
        assert_eq!(filter.book_type, None);

        filter.toggle_category("Novel");
        assert!(filter.is_category_selected("Novel"));
        filter.toggle_category("Sains");
        assert!(filter.is_category_selected("Sains"));
        filter.toggle_category("Sains");
        assert_eq!(filter.category, None);
    }

    #[test]
    fn test_add_custom_genre_rejects_empty_and_duplicates() {
        let mut filter = CatalogFilter::new();
        assert_eq!(filter.add_custom_genre("   "), Err(FilterError::EmptyGenre));
        assert_eq!(filter.add_custom_genre(" Misteri "), Ok(()));
        assert_eq!(
            filter.add_custom_genre("Misteri"),
            Err(FilterError::DuplicateGenre("Misteri".to_string()))
        );
        assert_eq!(filter.genres.len(), 1);
    }

    #[test]
    fn test_reset_keeps_search() {
        let mut filter = CatalogFilter::new();
        filter.set_search("bumi");
        filter.toggle_type(BookType::Ebook);
        filter.toggle_category("Novel");
        filter.toggle_genre("Drama");

        filter.reset();

        assert_eq!(filter.search, "bumi");
        assert_eq!(filter.book_type, None);
        assert_eq!(filter.category, None);
        assert!(filter.genres.is_empty());
    }

    #[test]
    fn test_book_type_capabilities() {
        assert!(BookType::Ebook.is_readable());
        assert!(!BookType::Ebook.is_borrowable());
        assert!(!BookType::Ebook.shows_stock());
        assert!(BookType::PhysicalAndEbook.is_readable());
        assert!(BookType::PhysicalAndEbook.is_borrowable());
        assert!(!BookType::PhysicalBook.is_readable());
        assert_eq!(BookType::parse("Majalah"), BookType::Other("Majalah".into()));
    }

    #[test]
    fn test_decode_book_with_nulls() {
        let json = r#"{
            "id": 3, "title": "Bumi", "author": "Tere Liye", "year": 2014,
            "genre": "Fantasi, Petualangan", "category": "Novel", "type": "Fisik & Ebook",
            "stock": 2, "fineAmount": 90000, "description": "", "coverFile": "",
            "location": "Rak B2", "ebookFile": "uploads/ebooks/bumi.pdf"
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.book_type, BookType::PhysicalAndEbook);
        assert_eq!(book.genres(), vec!["Fantasi", "Petualangan"]);
        assert_eq!(book.cover_or_default(), DEFAULT_COVER);

        let sparse: Book = serde_json::from_str(r#"{"id": 4, "type": null}"#).unwrap();
        assert_eq!(sparse.book_type, BookType::Other(String::new()));
        assert_eq!(sparse.title, "");
    }

    #[test]
    fn test_card_hides_stock_for_pure_ebooks() {
        let filter = CatalogFilter::new();
        let ebook = book(1, BookType::Ebook, 0, "");
        assert_eq!(BookCard::render(&ebook, &filter, Audience::Member).availability, None);

        let empty = book(2, BookType::PhysicalBook, 0, "");
        assert_eq!(
            BookCard::render(&empty, &filter, Audience::Member).availability,
            Some(Availability::OutOfStock)
        );

        let stocked = book(3, BookType::PhysicalAndEbook, 4, "");
        assert_eq!(
            BookCard::render(&stocked, &filter, Audience::Member).availability,
            Some(Availability::Available)
        );
    }

    #[test]
    fn test_card_highlights_active_genres() {
        let mut filter = CatalogFilter::new();
        filter.toggle_genre("Horor");
        let b = book(1, BookType::PhysicalBook, 1, "Horor, Komedi,");

        let card = BookCard::render(&b, &filter, Audience::Admin);
        assert_eq!(
            card.genres,
            vec![
                GenreBadge {
                    name: "Horor".into(),
                    active: true
                },
                GenreBadge {
                    name: "Komedi".into(),
                    active: false
                },
            ]
        );
        assert_eq!(card.href, "buka_buku_admin.html?id=1");
        assert_eq!(card.cover, DEFAULT_COVER);
    }

    #[test]
    fn test_book_form_fields() {
        let b = book(9, BookType::PhysicalBook, 3, "Drama");
        let update = BookUpdate::from_book(&b);
        let fields = update.text_fields();
        assert!(fields.contains(&("id", "9".to_string())));
        assert!(fields.contains(&("stock", "3".to_string())));
        assert!(fields.contains(&("fineAmount", "80000".to_string())));
        assert!(fields.contains(&("type", "Buku Fisik".to_string())));
    }

    #[test]
    fn test_synopsis_preview_truncates() {
        let mut rec = Recommendation {
            id: BookId::new(1),
            title: "Bumi".into(),
            author: "Tere Liye".into(),
            synopsis: "a".repeat(200),
            cover: String::new(),
        };
        let preview = rec.synopsis_preview();
        assert_eq!(preview.chars().count(), SYNOPSIS_PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));

        rec.synopsis = "pendek".into();
        assert_eq!(rec.synopsis_preview(), "pendek");
    }
}
