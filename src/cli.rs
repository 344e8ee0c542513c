use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use libra_client::adapters::text::TextRenderer;
use libra_client::application::admin::{MembersPage, require_admin_session};
use libra_client::application::borrow::{
    BorrowCard, BorrowHistoryPage, BorrowQueuePage, RenderedDocument,
};
use libra_client::application::catalog::{BookDetailPage, CatalogPage};
use libra_client::application::home::HomeCarousel;
use libra_client::application::reading::{BookmarksPage, EbookHistoryPage, EbookShelfPage};
use libra_client::application::{ActionOutcome, PageContext, PageError, surface};
use libra_client::domain::catalog::{Audience, BookCard, BookType};
use libra_client::domain::report::format_timestamp;
use libra_client::domain::{AdminAction, BookId, BorrowId, HistoryId, StatusFilter, UserId};

#[derive(Parser, Debug)]
#[command(name = "libra", author, version, about = "Libra library client")]
pub struct Cli {
    /// Configuration file (defaults to config/libra.*)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Overrides the configured backend URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Session cookie value
    #[arg(long, global = true)]
    pub session: Option<String>,
    /// Answer yes to every confirmation
    #[arg(long, short = 'y', global = true, default_value_t = false)]
    pub yes: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse the catalog
    Books {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long = "type")]
        book_type: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long = "genre")]
        genres: Vec<String>,
    },
    /// Show one book
    Book { id: i64 },
    /// Request to borrow a book
    Borrow { id: i64 },
    /// Toggle the bookmark of a book
    Bookmark { id: i64 },
    /// Readable books
    Ebooks {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Borrow queue (admin)
    Queue {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        status: String,
    },
    /// Apply an admin action to a borrow request
    Act { id: i64, action: String },
    /// Own borrow history
    History {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        status: String,
    },
    /// Cancel a submitted borrow request
    Cancel { id: i64 },
    /// Monthly report (admin)
    Report {
        year: i32,
        month: u32,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Invoice of a finished borrow
    Invoice {
        id: i64,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Members (admin)
    Members {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Change a member role (admin)
    Role { id: i64, role: String },
    /// Delete a member account (admin)
    DeleteMember { id: i64 },
    /// Bookmarked books
    Bookmarks {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Remove a bookmark from the bookmark list
    Unbookmark { id: i64 },
    /// Ebook reading history
    EbookHistory {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Delete one reading history entry
    ForgetReading { id: i64 },
    /// Random recommendations
    Random,
    /// Check the admin session
    CheckSession,
}

fn now() -> DateTime<FixedOffset> {
    Local::now().into()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_book(card: &BookCard) {
    let availability = card.availability.as_ref().map(|a| a.label()).unwrap_or("Ebook");
    let genres: Vec<&str> = card.genres.iter().map(|g| g.name.as_str()).collect();
    println!(
        "#{:<4} {} - {} ({}) [{}] {}",
        card.id,
        card.title,
        card.author,
        card.year,
        availability,
        genres.join(", ")
    );
}

fn print_borrow(card: &BorrowCard) {
    let who = card.user_name.as_deref().unwrap_or("-");
    println!("#{:<4} {} ({}) [{}]", card.id, card.title, who, card.badge.label);
    for line in &card.timeline {
        println!("      {}: {}", line.label, line.at);
    }
    if let Some(due) = &card.due {
        println!("      {}", due.text());
    }
    if let Some(fine) = &card.fine {
        println!("      {}", fine);
    }
    if !card.actions.is_empty() {
        let labels: Vec<&str> = card.actions.iter().map(|a| a.label).collect();
        println!("      Aksi: {}", labels.join(" | "));
    }
    if let Some(note) = card.note {
        println!("      {}", note);
    }
}

fn write_document(dir: &Path, document: &RenderedDocument) -> Result<(), PageError> {
    let path = dir.join(&document.file_name);
    std::fs::write(&path, &document.bytes).map_err(|e| PageError::Render(Box::new(e)))?;
    println!("{}", path.display());
    Ok(())
}

fn report_outcome(outcome: ActionOutcome) {
    if !outcome.is_applied() {
        println!("Dibatalkan.");
    }
}

/// サブコマンドを対応する画面操作に振り分ける
pub async fn run(command: Command, ctx: PageContext, logged_in: bool) -> Result<(), PageError> {
    match command {
        Command::Books {
            search,
            book_type,
            category,
            genres,
        } => {
            let mut page = CatalogPage::new(ctx, Audience::Member);
            page.search(&search).await?;
            if let Some(raw) = book_type {
                page.toggle_type(BookType::parse(&raw)).await?;
            }
            if let Some(category) = category {
                page.toggle_category(&category).await?;
            }
            for genre in genres {
                page.add_custom_genre(&genre).await?;
            }
            page.cards().iter().for_each(print_book);
        }
        Command::Book { id } => {
            let mut page = BookDetailPage::new(ctx, BookId::new(id), logged_in);
            page.load().await?;
            if let Some(view) = page.view() {
                print_book(&view.card);
                println!("{}", view.type_label);
                println!("Genre: {}  Lokasi: {}", view.genre, view.location);
                if let Some(stock) = view.stock_line {
                    println!("{}", stock);
                }
                println!("{}", view.synopsis);
                if view.bookmarked {
                    println!("(Bookmark)");
                }
            }
        }
        Command::Borrow { id } => {
            let mut page = BookDetailPage::new(ctx, BookId::new(id), logged_in);
            page.load().await?;
            report_outcome(page.borrow().await?);
        }
        Command::Bookmark { id } => {
            let mut page = BookDetailPage::new(ctx, BookId::new(id), logged_in);
            page.load().await?;
            page.toggle_bookmark().await?;
        }
        Command::Ebooks { search } => {
            let mut page = EbookShelfPage::new(ctx);
            page.search(&search).await?;
            page.cards().iter().for_each(print_book);
        }
        Command::Queue { search, status } => {
            require_admin_session(&ctx).await?;
            let mut page = BorrowQueuePage::new(ctx);
            page.load().await?;
            page.set_search(&search);
            page.set_status_filter(StatusFilter::parse(&status));
            page.cards(now()).iter().for_each(print_borrow);
        }
        Command::Act { id, action } => {
            let action = match parse_action(&action) {
                Ok(action) => action,
                Err(e) => return Err(surface(&ctx, e).await),
            };
            require_admin_session(&ctx).await?;
            let mut page = BorrowQueuePage::new(ctx);
            page.load().await?;
            report_outcome(page.perform(BorrowId::new(id), action).await?);
        }
        Command::History { search, status } => {
            let mut page = BorrowHistoryPage::new(ctx);
            page.load().await?;
            page.set_search(&search);
            page.set_status_filter(StatusFilter::parse(&status));
            page.cards(now()).iter().for_each(print_borrow);
        }
        Command::Cancel { id } => {
            let mut page = BorrowHistoryPage::new(ctx);
            page.load().await?;
            report_outcome(page.cancel(BorrowId::new(id)).await?);
        }
        Command::Report { year, month, out } => {
            require_admin_session(&ctx).await?;
            let mut page = BorrowQueuePage::new(ctx);
            page.load().await?;
            let document = page
                .print_monthly_report(&TextRenderer::new(), year, month, today())
                .await?;
            write_document(&out, &document)?;
        }
        Command::Invoice { id, out } => {
            let mut page = BorrowHistoryPage::new(ctx);
            page.load().await?;
            let document = page
                .print_invoice(&TextRenderer::new(), BorrowId::new(id), today())
                .await?;
            write_document(&out, &document)?;
        }
        Command::Members { search } => {
            require_admin_session(&ctx).await?;
            let mut page = MembersPage::new(ctx);
            page.search(&search).await?;
            for member in page.members() {
                println!(
                    "#{:<4} {} <{}> {} [{}]",
                    member.id, member.username, member.email, member.fullname, member.role
                );
            }
        }
        Command::Role { id, role } => {
            require_admin_session(&ctx).await?;
            let mut page = MembersPage::new(ctx);
            page.load().await?;
            page.change_role(UserId::new(id), &role).await?;
        }
        Command::DeleteMember { id } => {
            require_admin_session(&ctx).await?;
            let mut page = MembersPage::new(ctx);
            page.load().await?;
            report_outcome(page.delete(UserId::new(id)).await?);
        }
        Command::Bookmarks { search } => {
            let mut page = BookmarksPage::new(ctx);
            page.load().await?;
            page.set_search(&search);
            println!("{}", page.total_label());
            page.cards().iter().for_each(print_book);
        }
        Command::Unbookmark { id } => {
            let mut page = BookmarksPage::new(ctx);
            page.load().await?;
            report_outcome(page.remove(BookId::new(id)).await?);
            println!("{}", page.total_label());
        }
        Command::EbookHistory { search } => {
            let mut page = EbookHistoryPage::new(ctx);
            page.load().await?;
            page.set_search(&search);
            for item in page.visible() {
                let last_read = item
                    .date_last_read
                    .map(format_timestamp)
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "#{:<4} {} (hal. {}, {}) {}",
                    item.id,
                    item.title,
                    item.last_page,
                    last_read,
                    item.resume_href()
                );
            }
        }
        Command::ForgetReading { id } => {
            let mut page = EbookHistoryPage::new(ctx);
            page.load().await?;
            report_outcome(page.remove(HistoryId::new(id)).await?);
        }
        Command::Random => {
            let mut carousel = HomeCarousel::new(ctx);
            carousel.load().await?;
            for slide in carousel.slides() {
                println!("{} - {}", slide.title, slide.author);
                println!("  {}", slide.synopsis);
                println!("  {}", slide.detail_href);
            }
        }
        Command::CheckSession => {
            require_admin_session(&ctx).await?;
            println!("Sesi aktif.");
        }
    }
    Ok(())
}

fn parse_action(keyword: &str) -> Result<AdminAction, PageError> {
    AdminAction::from_keyword(keyword)
        .ok_or_else(|| PageError::UnknownAction(keyword.to_string()))
}
