use chrono::{DateTime, FixedOffset, NaiveDate};

use super::{BorrowCard, RenderedDocument, render_document};
use crate::application::{ActionOutcome, PageContext, PageError, Result, guard, surface};
use crate::domain::report::MonthlyReport;
use crate::domain::{
    AdminAction, BorrowId, BorrowRequest, StatusFilter, confirmation_prompt, plan_admin_transition,
};
use crate::ports::document_renderer::DocumentRenderer;

/// 管理者の貸出キュー画面
///
/// 一覧は一度取得して保持し、検索と状態の絞り込みはメモリ上で行う。
/// 状態変更に成功した場合のみ取得し直す。
pub struct BorrowQueuePage {
    ctx: PageContext,
    records: Vec<BorrowRequest>,
    search: String,
    status_filter: StatusFilter,
}

impl BorrowQueuePage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            records: Vec::new(),
            search: String::new(),
            status_filter: StatusFilter::All,
        }
    }

    pub fn records(&self) -> &[BorrowRequest] {
        &self.records
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn status_filter(&self) -> &StatusFilter {
        &self.status_filter
    }

    pub async fn load(&mut self) -> Result<()> {
        let records = guard(&self.ctx, self.ctx.api.borrow_queue().await).await?;
        for record in &records {
            if let Err(violation) = record.check_invariants() {
                tracing::warn!("Inconsistent borrow record: {:?}", violation);
            }
        }
        tracing::debug!("Loaded {} borrow records", records.len());
        self.records = records;
        Ok(())
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_string();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    /// 検索と状態で絞り込んだ一覧
    pub fn visible(&self) -> Vec<&BorrowRequest> {
        self.records
            .iter()
            .filter(|r| r.matches_admin_search(&self.search))
            .filter(|r| self.status_filter.matches(&r.status))
            .collect()
    }

    pub fn cards(&self, now: DateTime<FixedOffset>) -> Vec<BorrowCard> {
        self.visible()
            .into_iter()
            .map(|r| BorrowCard::for_admin(r, now))
            .collect()
    }

    /// 確認のうえ状態変更を要求する
    pub async fn perform(&mut self, id: BorrowId, action: AdminAction) -> Result<ActionOutcome> {
        let Some(record) = self.records.iter().find(|r| r.id == id) else {
            return Err(surface(&self.ctx, PageError::BorrowNotFound(id)).await);
        };

        let update = match plan_admin_transition(record, action) {
            Ok(update) => update,
            Err(e) => return Err(surface(&self.ctx, e.into()).await),
        };

        let prompt = confirmation_prompt(record, action);
        if !self.ctx.notifier.confirm(&prompt).await {
            tracing::debug!("Status change of {} declined", id);
            return Ok(ActionOutcome::Declined);
        }

        guard(
            &self.ctx,
            self.ctx.api.update_borrow_status(id, &update).await,
        )
        .await?;
        tracing::info!("Borrow {} moved to {}", id, update.status);
        self.ctx.notifier.alert("Status berhasil diperbarui!").await;

        self.load().await?;
        Ok(ActionOutcome::Applied)
    }

    /// 保持している一覧から月次報告を作る
    pub async fn monthly_report(&self, year: i32, month: u32) -> Result<MonthlyReport> {
        match MonthlyReport::compose(&self.records, year, month) {
            Ok(report) => Ok(report),
            Err(e) => Err(surface(&self.ctx, e.into()).await),
        }
    }

    pub async fn print_monthly_report(
        &self,
        renderer: &dyn DocumentRenderer,
        year: i32,
        month: u32,
        printed_on: NaiveDate,
    ) -> Result<RenderedDocument> {
        let report = self.monthly_report(year, month).await?;
        render_document(&self.ctx, renderer, &report.to_document(printed_on)).await
    }
}
