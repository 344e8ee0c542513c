use crate::application::{PageContext, Result, guard};
use crate::domain::catalog::{Recommendation, cover_or_default};

/// カルーセルの1枚
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub title: String,
    pub author: String,
    pub synopsis: String,
    pub cover: String,
    pub detail_href: String,
}

impl From<&Recommendation> for Slide {
    fn from(rec: &Recommendation) -> Self {
        Self {
            title: rec.title.clone(),
            author: rec.author.clone(),
            synopsis: rec.synopsis_preview(),
            cover: cover_or_default(&rec.cover).to_string(),
            detail_href: format!("/buka_buku_member.html?id={}", rec.id),
        }
    }
}

/// トップページのおすすめカルーセル
pub struct HomeCarousel {
    ctx: PageContext,
    items: Vec<Recommendation>,
    current: usize,
}

impl HomeCarousel {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            items: Vec::new(),
            current: 0,
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.items = guard(&self.ctx, self.ctx.api.random_books().await).await?;
        self.current = 0;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// 範囲外の番号は件数で折り返す（負の方向も含む）
    pub fn goto(&mut self, index: isize) {
        if self.items.is_empty() {
            self.current = 0;
            return;
        }
        let len = self.items.len() as isize;
        self.current = index.rem_euclid(len) as usize;
    }

    pub fn next(&mut self) {
        self.goto(self.current as isize + 1);
    }

    pub fn prev(&mut self) {
        self.goto(self.current as isize - 1);
    }

    pub fn current(&self) -> Option<Slide> {
        self.items.get(self.current).map(Slide::from)
    }

    pub fn slides(&self) -> Vec<Slide> {
        self.items.iter().map(Slide::from).collect()
    }
}
