use chrono::{DateTime, FixedOffset, NaiveDate};

use super::{BorrowCard, RenderedDocument, render_document};
use crate::application::{ActionOutcome, PageContext, PageError, Result, guard, surface};
use crate::domain::report::Invoice;
use crate::domain::{BorrowId, BorrowRequest, StatusFilter, plan_member_cancel};
use crate::ports::document_renderer::DocumentRenderer;

/// 会員の貸出履歴画面
pub struct BorrowHistoryPage {
    ctx: PageContext,
    records: Vec<BorrowRequest>,
    search: String,
    status_filter: StatusFilter,
}

impl BorrowHistoryPage {
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

    pub async fn load(&mut self) -> Result<()> {
        self.records = guard(&self.ctx, self.ctx.api.borrow_history().await).await?;
        Ok(())
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_string();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    pub fn visible(&self) -> Vec<&BorrowRequest> {
        self.records
            .iter()
            .filter(|r| r.matches_member_search(&self.search))
            .filter(|r| self.status_filter.matches(&r.status))
            .collect()
    }

    pub fn cards(&self, now: DateTime<FixedOffset>) -> Vec<BorrowCard> {
        self.visible()
            .into_iter()
            .map(|r| BorrowCard::for_member(r, now))
            .collect()
    }

    async fn find(&self, id: BorrowId) -> Result<&BorrowRequest> {
        match self.records.iter().find(|r| r.id == id) {
            Some(record) => Ok(record),
            None => Err(surface(&self.ctx, PageError::BorrowNotFound(id)).await),
        }
    }

    /// 申請中の貸出を取り消す
    pub async fn cancel(&mut self, id: BorrowId) -> Result<ActionOutcome> {
        let record = self.find(id).await?;
        if let Err(e) = plan_member_cancel(record) {
            return Err(surface(&self.ctx, e.into()).await);
        }

        if !self.ctx.notifier.confirm("Batalkan pengajuan ini?").await {
            return Ok(ActionOutcome::Declined);
        }

        guard(&self.ctx, self.ctx.api.cancel_borrow(id).await).await?;
        tracing::info!("Borrow {} canceled by member", id);
        self.ctx.notifier.alert("Peminjaman dibatalkan").await;

        self.load().await?;
        Ok(ActionOutcome::Applied)
    }

    /// 返却済み・紛失、または延滞料金のある取引の請求書
    pub async fn invoice(&self, id: BorrowId) -> Result<Invoice> {
        let record = self.find(id).await?;
        if !record.invoice_available() {
            return Err(surface(&self.ctx, PageError::InvoiceUnavailable(id)).await);
        }
        Ok(Invoice::for_request(record))
    }

    pub async fn print_invoice(
        &self,
        renderer: &dyn DocumentRenderer,
        id: BorrowId,
        printed_on: NaiveDate,
    ) -> Result<RenderedDocument> {
        let invoice = self.invoice(id).await?;
        render_document(&self.ctx, renderer, &invoice.to_document(printed_on)).await
    }
}
