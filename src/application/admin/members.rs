use crate::application::{ActionOutcome, PageContext, PageError, Result, guard, surface};
use crate::domain::UserId;
use crate::domain::member::{Member, Role, RoleUpdate};

/// 会員管理画面（管理者）
pub struct MembersPage {
    ctx: PageContext,
    search: String,
    members: Vec<Member>,
}

impl MembersPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            search: String::new(),
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub async fn load(&mut self) -> Result<()> {
        let search = self.search.clone();
        self.fetch(search).await
    }

    /// 検索語はサーバー側で評価する
    pub async fn search(&mut self, query: &str) -> Result<()> {
        self.fetch(query.trim().to_string()).await
    }

    async fn fetch(&mut self, search: String) -> Result<()> {
        let query = (!search.is_empty()).then_some(search.as_str());
        let members = guard(&self.ctx, self.ctx.api.list_members(query).await).await?;
        self.members = members;
        self.search = search;
        Ok(())
    }

    fn find(&self, id: UserId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// 役割を変更する。空の入力はリクエストを送らずに拒否する
    pub async fn change_role(&mut self, id: UserId, role: &str) -> Result<()> {
        let role = Role::parse(role);
        if !role.is_assignable() {
            return Err(surface(&self.ctx, PageError::EmptyRole).await);
        }

        let update = RoleUpdate { role };
        let result = self.ctx.api.update_member_role(id, &update).await;
        if let Err(e) = result {
            tracing::error!("Role update for {} failed: {}", id, e);
            if e.is_unauthorized() {
                return Err(surface(&self.ctx, e.into()).await);
            }
            self.ctx.notifier.alert("Gagal mengubah role").await;
            return Err(e.into());
        }

        tracing::info!("Member {} role changed to {}", id, update.role);
        self.ctx.notifier.alert("Role berhasil diubah").await;
        self.load().await
    }

    /// 確認のうえ会員を削除する
    pub async fn delete(&mut self, id: UserId) -> Result<ActionOutcome> {
        let prompt = match self.find(id) {
            Some(member) => member.delete_prompt(),
            None => format!("Hapus akun #{}?", id),
        };
        if !self.ctx.notifier.confirm(&prompt).await {
            return Ok(ActionOutcome::Declined);
        }

        guard(&self.ctx, self.ctx.api.delete_member(id).await).await?;
        tracing::info!("Member deleted: {}", id);
        self.ctx.notifier.alert("Akun berhasil dihapus").await;
        self.load().await?;
        Ok(ActionOutcome::Applied)
    }
}
