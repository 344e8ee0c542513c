use async_trait::async_trait;

/// 利用者への通知ポート
///
/// ブラウザの `alert` / `confirm` に相当する。
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 完了まで待つ通知
    async fn alert(&self, message: &str);

    /// 確認を求める。拒否された場合は false
    async fn confirm(&self, message: &str) -> bool;
}
