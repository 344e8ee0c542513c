use crate::application::{PageContext, PageError, Result, surface};
use crate::domain::report::Document;
use crate::ports::document_renderer::DocumentRenderer;

/// 描画済みの文書
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 文書を描画し、拡張子を描画形式に合わせたファイル名を付ける
pub async fn render_document(
    ctx: &PageContext,
    renderer: &dyn DocumentRenderer,
    document: &Document,
) -> Result<RenderedDocument> {
    let bytes = match renderer.render(document) {
        Ok(bytes) => bytes,
        Err(e) => return Err(surface(ctx, PageError::Render(e)).await),
    };

    let stem = document
        .file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(&document.file_name);
    let file_name = format!("{}.{}", stem, renderer.extension());

    tracing::info!("Rendered {} ({} bytes)", file_name, bytes.len());
    Ok(RenderedDocument { file_name, bytes })
}
