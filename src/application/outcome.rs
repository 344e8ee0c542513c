use super::{PageContext, PageError};

/// 利用者操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// リクエストを送信し成功した
    Applied,
    /// 確認で拒否された（リクエストは送信していない）
    Declined,
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

/// 失敗を利用者に伝える
///
/// 記録したうえで、401 ならログイン画面へ遷移し、それ以外は通知を出す。
/// 画面の状態には触れない。
pub async fn surface(ctx: &PageContext, error: PageError) -> PageError {
    if error.is_unauthorized() {
        tracing::warn!("Session expired, redirecting to {}", ctx.login_url);
        ctx.navigator.redirect(&ctx.login_url);
    } else {
        match &error {
            PageError::Api(api_error) => tracing::error!("API call failed: {:?}", api_error),
            other => tracing::warn!("Action refused: {}", other),
        }
        ctx.notifier.alert(&error.to_string()).await;
    }
    error
}

/// `Err` の場合は `surface` を通して返す
pub async fn guard<T, E>(ctx: &PageContext, result: std::result::Result<T, E>) -> super::Result<T>
where
    E: Into<PageError>,
{
    match result {
        Ok(value) => Ok(value),
        Err(e) => Err(surface(ctx, e.into()).await),
    }
}
