//! reqwest implementation of the `LibraryApi` port.

use crate::config::ClientConfig;
use crate::domain::{
    BookId, BorrowId, BorrowRequest, HistoryId, StatusUpdate, UserId,
    catalog::{Book, BookUpdate, CatalogFilter, NewBook, Recommendation, Upload},
    member::{Member, RoleUpdate},
    reading::{EbookHistoryItem, ProgressUpdate, ReadingProgress},
};
use crate::ports::library_api::{Ack, ApiError, ApiResult, LibraryApi};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, multipart};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building the HTTP client.
#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("Invalid API base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client")]
    Build(#[from] reqwest::Error),
}

/// Generic `{success, message}` envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BookmarkStatus {
    #[serde(default)]
    bookmarked: bool,
}

#[derive(Debug, Deserialize)]
struct SessionStatus {
    #[serde(default, rename = "loggedIn")]
    logged_in: bool,
}

/// HTTP client for the library backend.
///
/// The session cookie is seeded into the cookie jar at construction and
/// refreshed by the backend through `Set-Cookie`.
#[derive(Clone)]
pub struct HttpLibraryApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLibraryApi {
    pub fn new(config: &ClientConfig) -> Result<Self, HttpClientError> {
        let base_url = config.api_base_url().to_string();
        let parsed =
            reqwest::Url::parse(&base_url).map_err(|e| HttpClientError::InvalidBaseUrl {
                url: base_url.clone(),
                reason: e.to_string(),
            })?;

        let jar = reqwest::cookie::Jar::default();
        if let Some(session_id) = config.session_id() {
            jar.add_cookie_str(
                &format!("{}={}; Path=/", config.session_cookie_name(), session_id),
                &parsed,
            );
        }

        let mut builder = reqwest::Client::builder().cookie_provider(Arc::new(jar));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and returns the body of a 2xx response.
    ///
    /// Every call goes through here: 401 becomes `Unauthorized`, any other
    /// non-2xx status becomes `Transport` carrying the raw body.
    async fn send(&self, request: RequestBuilder) -> ApiResult<String> {
        let request = request
            .build()
            .map_err(|e| ApiError::transport(e.to_string()))?;
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "Sending request");

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::error!("Request {} {} failed: {}", method, url, e);
            ApiError::transport(format!("Terjadi kesalahan koneksi: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Reading body of {} {} failed: {}", method, url, e);
            ApiError::Transport {
                status: Some(status.as_u16()),
                body: e.to_string(),
            }
        })?;

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%method, %url, "Session expired");
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            tracing::error!("{} {} returned {}: {}", method, url, status, body.trim());
            return Err(ApiError::Transport {
                status: Some(status.as_u16()),
                body: body.trim().to_string(),
            });
        }

        Ok(body)
    }

    /// Decodes a read response, surfacing a `success:false` envelope as `Rejected`.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let body = self.send(request).await?;
        decode_body(&body)
    }

    /// Decodes a JSON array; the backend sends `null` for an empty result.
    async fn fetch_list<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<Vec<T>> {
        let list: Option<Vec<T>> = self.fetch(request).await?;
        Ok(list.unwrap_or_default())
    }

    async fn mutate(&self, request: RequestBuilder) -> ApiResult<Ack> {
        let body = self.send(request).await?;
        interpret_ack(&body)
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|e| match serde_json::from_str::<Envelope>(body) {
        Ok(Envelope {
            success: Some(false),
            message,
        }) => ApiError::Rejected(message.unwrap_or_else(|| body.to_string())),
        _ => ApiError::Decode(e.to_string()),
    })
}

/// Interprets the body of a successful mutation.
///
/// `{success:false}` is a rejection; JSON without the flag and plain text
/// bodies count as success.
fn interpret_ack(body: &str) -> ApiResult<Ack> {
    let trimmed = body.trim();
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(_)) => {
            let envelope: Envelope =
                serde_json::from_str(trimmed).map_err(|e| ApiError::Decode(e.to_string()))?;
            match envelope.success {
                Some(false) => Err(ApiError::Rejected(
                    envelope
                        .message
                        .unwrap_or_else(|| "Permintaan ditolak".to_string()),
                )),
                _ => Ok(Ack {
                    message: envelope.message,
                }),
            }
        }
        Ok(_) => Ok(Ack::default()),
        Err(_) if trimmed.is_empty() => Ok(Ack::default()),
        Err(_) => Ok(Ack::with_message(trimmed)),
    }
}

fn file_part(upload: &Upload) -> ApiResult<multipart::Part> {
    multipart::Part::bytes(upload.bytes.clone())
        .file_name(upload.file_name.clone())
        .mime_str(&upload.mime)
        .map_err(|e| ApiError::transport(format!("Berkas tidak valid: {}", e)))
}

fn text_form(fields: Vec<(&'static str, String)>) -> multipart::Form {
    fields
        .into_iter()
        .fold(multipart::Form::new(), |form, (name, value)| form.text(name, value))
}

#[async_trait]
impl LibraryApi for HttpLibraryApi {
    async fn list_books(&self, filter: &CatalogFilter) -> ApiResult<Vec<Book>> {
        let query = filter.to_query_pairs();
        self.fetch_list(self.client.get(self.url("/books")).query(&query))
            .await
    }

    async fn add_book(&self, book: &NewBook) -> ApiResult<Ack> {
        let mut form = text_form(book.text_fields());
        if let Some(cover) = &book.cover {
            form = form.part("cover", file_part(cover)?);
        }
        if let Some(ebook) = &book.ebook {
            form = form.part("ebook", file_part(ebook)?);
        }
        self.mutate(self.client.post(self.url("/add-book")).multipart(form))
            .await
    }

    async fn update_book(&self, book: &BookUpdate) -> ApiResult<Ack> {
        let mut form = text_form(book.text_fields());
        if let Some(cover) = &book.cover {
            form = form.part("cover", file_part(cover)?);
        }
        self.mutate(self.client.post(self.url("/books/update")).multipart(form))
            .await
    }

    async fn delete_book(&self, id: BookId) -> ApiResult<Ack> {
        self.mutate(self.client.delete(self.url(&format!("/books/{}", id))))
            .await
    }

    async fn random_books(&self) -> ApiResult<Vec<Recommendation>> {
        self.fetch_list(self.client.get(self.url("/api/books/random")))
            .await
    }

    async fn list_bookmarks(&self) -> ApiResult<Vec<Book>> {
        self.fetch_list(self.client.get(self.url("/api/bookmarks")))
            .await
    }

    async fn add_bookmark(&self, book_id: BookId) -> ApiResult<Ack> {
        self.mutate(
            self.client
                .post(self.url("/bookmark"))
                .json(&json!({ "bookId": book_id })),
        )
        .await
    }

    async fn remove_bookmark(&self, book_id: BookId) -> ApiResult<Ack> {
        self.mutate(
            self.client
                .delete(self.url("/bookmark"))
                .json(&json!({ "bookId": book_id })),
        )
        .await
    }

    async fn bookmark_status(&self, book_id: BookId) -> ApiResult<bool> {
        let status: BookmarkStatus = self
            .fetch(
                self.client
                    .get(self.url("/bookmark/status"))
                    .query(&[("bookId", book_id.value())]),
            )
            .await?;
        Ok(status.bookmarked)
    }

    async fn request_borrow(&self, book_id: BookId) -> ApiResult<Ack> {
        self.mutate(
            self.client
                .post(self.url("/pinjambuku"))
                .json(&json!({ "book_id": book_id })),
        )
        .await
    }

    async fn borrow_history(&self) -> ApiResult<Vec<BorrowRequest>> {
        self.fetch_list(self.client.get(self.url("/api/riwayat-pinjam")))
            .await
    }

    async fn cancel_borrow(&self, id: BorrowId) -> ApiResult<Ack> {
        self.mutate(
            self.client
                .patch(self.url(&format!("/api/member/riwayat-pinjam/{}", id)))
                .json(&json!({})),
        )
        .await
    }

    async fn borrow_queue(&self) -> ApiResult<Vec<BorrowRequest>> {
        self.fetch_list(self.client.get(self.url("/api/admin/daftar-pinjam/")))
            .await
    }

    async fn update_borrow_status(&self, id: BorrowId, update: &StatusUpdate) -> ApiResult<Ack> {
        self.mutate(
            self.client
                .patch(self.url(&format!("/api/admin/daftar-pinjam/{}", id)))
                .json(update),
        )
        .await
    }

    async fn list_members(&self, search: Option<&str>) -> ApiResult<Vec<Member>> {
        let mut request = self.client.get(self.url("/api/members"));
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            request = request.query(&[("search", search)]);
        }
        self.fetch_list(request).await
    }

    async fn update_member_role(&self, id: UserId, update: &RoleUpdate) -> ApiResult<Ack> {
        self.mutate(
            self.client
                .put(self.url(&format!("/api/members/{}/role", id)))
                .json(update),
        )
        .await
    }

    async fn delete_member(&self, id: UserId) -> ApiResult<Ack> {
        self.mutate(self.client.delete(self.url(&format!("/api/members/{}", id))))
            .await
    }

    async fn ebook_history(&self) -> ApiResult<Vec<EbookHistoryItem>> {
        self.fetch_list(self.client.get(self.url("/api/ebook/history")))
            .await
    }

    async fn delete_ebook_history(&self, id: HistoryId) -> ApiResult<Ack> {
        self.mutate(
            self.client
                .delete(self.url("/api/ebook/history"))
                .query(&[("id", id.value())]),
        )
        .await
    }

    async fn save_progress(&self, update: &ProgressUpdate) -> ApiResult<Ack> {
        self.mutate(self.client.post(self.url("/api/ebook/progress")).json(update))
            .await
    }

    async fn reading_progress(&self, book_id: BookId) -> ApiResult<ReadingProgress> {
        self.fetch(
            self.client
                .get(self.url("/api/ebook/progress"))
                .query(&[("bookId", book_id.value())]),
        )
        .await
    }

    async fn check_session(&self) -> ApiResult<bool> {
        let status: SessionStatus = self
            .fetch(self.client.get(self.url("/api/check-session")))
            .await?;
        Ok(status.logged_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_ack_envelope() {
        assert_eq!(
            interpret_ack(r#"{"success":true,"message":"Buku berhasil dipinjam"}"#),
            Ok(Ack::with_message("Buku berhasil dipinjam"))
        );
        assert_eq!(
            interpret_ack(r#"{"success":false,"message":"Stok habis"}"#),
            Err(ApiError::Rejected("Stok habis".to_string()))
        );
    }

    #[test]
    fn test_interpret_ack_plain_text_and_status_ok() {
        assert_eq!(
            interpret_ack("Status berhasil diubah\n"),
            Ok(Ack::with_message("Status berhasil diubah"))
        );
        assert_eq!(interpret_ack(r#"{"status":"ok"}"#), Ok(Ack::default()));
        assert_eq!(interpret_ack(""), Ok(Ack::default()));
    }

    #[test]
    fn test_decode_body_reports_rejection_envelope() {
        let result: ApiResult<Vec<Book>> =
            decode_body(r#"{"success":false,"message":"Harus login"}"#);
        assert_eq!(result, Err(ApiError::Rejected("Harus login".to_string())));

        let garbage: ApiResult<Vec<Book>> = decode_body("<html>");
        assert!(matches!(garbage, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let config = ClientConfig::new("bukan url");
        assert!(matches!(
            HttpLibraryApi::new(&config),
            Err(HttpClientError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_new_seeds_session_cookie() {
        let config = ClientConfig::new("http://localhost:8080").with_session_id("abc");
        let api = HttpLibraryApi::new(&config).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080");
    }
}
