use super::{ApiClient, FileUpload};
use crate::types::{CreateHomeworkRequest, Homework, HomeworkTask, Result};

/// Homework generation, task uploads and submission.
pub struct HomeworkApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn homework(&self) -> HomeworkApi<'_> {
        HomeworkApi { client: self }
    }
}

impl HomeworkApi<'_> {
    /// Ask the backend to generate homework from a prompt and optional materials.
    pub async fn create(
        &self,
        session_id: &str,
        prompt: &str,
        material_ids: &[String],
    ) -> Result<Homework> {
        let path = format!("/api/sessions/{}/homework", urlencoding::encode(session_id));
        let body = CreateHomeworkRequest {
            prompt: prompt.to_string(),
            material_ids: material_ids.to_vec(),
        };
        self.client.post_json(&path, &body).await
    }

    pub async fn list(&self, session_id: &str) -> Result<Vec<Homework>> {
        let path = format!("/api/sessions/{}/homework", urlencoding::encode(session_id));
        self.client.get(&path).await
    }

    pub async fn get(&self, homework_id: &str) -> Result<Homework> {
        let path = format!("/api/homework/{}", urlencoding::encode(homework_id));
        self.client.get(&path).await
    }

    pub async fn upload_task_solution(
        &self,
        homework_id: &str,
        task_id: &str,
        file: FileUpload,
    ) -> Result<HomeworkTask> {
        let path = format!(
            "/api/homework/{}/tasks/{}/upload",
            urlencoding::encode(homework_id),
            urlencoding::encode(task_id)
        );
        self.client.post_multipart(&path, file.into_form()?).await
    }

    /// Move a pending homework to `submitted`.
    pub async fn submit(&self, homework_id: &str) -> Result<Homework> {
        let path = format!("/api/homework/{}/submit", urlencoding::encode(homework_id));
        self.client.post_empty(&path).await
    }
}
