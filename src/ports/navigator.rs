/// 画面遷移のポート
pub trait Navigator: Send + Sync {
    fn redirect(&self, location: &str);
}
