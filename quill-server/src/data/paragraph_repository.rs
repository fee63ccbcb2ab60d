use async_trait::async_trait;
use uuid::Uuid;

use crate::data::post_repository::NewParagraph;
use crate::domain::error::DomainError;
use crate::domain::paragraph::Paragraph;

#[async_trait]
pub(crate) trait ParagraphRepository: Send + Sync {
    async fn append_paragraph(
        &self,
        post_id: i64,
        input: NewParagraph,
    ) -> Result<Paragraph, DomainError>;
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Paragraph>, DomainError>;
    /// Paragraphs of the post in creation order.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Paragraph>, DomainError>;
    async fn delete_paragraph(&self, id: i64) -> Result<bool, DomainError>;
}
