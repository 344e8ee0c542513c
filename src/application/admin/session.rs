use crate::application::{PageContext, PageError, Result};
use crate::ports::library_api::ApiError;

/// 管理画面に入る前のセッション確認
///
/// 未ログイン、または確認そのものが失敗した場合はログイン画面へ遷移する。
pub async fn require_admin_session(ctx: &PageContext) -> Result<()> {
    match ctx.api.check_session().await {
        Ok(true) => Ok(()),
        Ok(false) => {
            tracing::info!("No active session, redirecting to {}", ctx.login_url);
            ctx.navigator.redirect(&ctx.login_url);
            Err(PageError::Api(ApiError::Unauthorized))
        }
        Err(e) => {
            tracing::warn!("Session check failed: {}", e);
            ctx.navigator.redirect(&ctx.login_url);
            Err(e.into())
        }
    }
}
