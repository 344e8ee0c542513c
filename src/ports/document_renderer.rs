use crate::domain::report::Document;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 文書の描画ポート
///
/// 帳票の内容はドメイン層で組み立て、描画形式（PDF など）は実装側に任せる。
pub trait DocumentRenderer: Send + Sync {
    /// 描画したバイト列を返す
    fn render(&self, document: &Document) -> Result<Vec<u8>>;

    /// 出力ファイルの拡張子（先頭のドットなし）
    fn extension(&self) -> &'static str;
}
