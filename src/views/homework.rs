use super::{failure_message, GenerationForm, Notifier, ScreenState};
use crate::api::{ApiClient, FileUpload};
use crate::types::{Homework, HomeworkTask};
use tracing::{error, info};

/// Homework list of the selected session.
pub struct HomeworkListScreen {
    api: ApiClient,
    homeworks: Vec<Homework>,
}

impl HomeworkListScreen {
    pub const EMPTY_PROMPT: &'static str = "Select or create a session to view homework.";

    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            homeworks: Vec::new(),
        }
    }

    pub fn homeworks(&self) -> &[Homework] {
        &self.homeworks
    }

    pub async fn load(&mut self, session_id: Option<&str>) -> ScreenState {
        let Some(session_id) = session_id else {
            self.homeworks.clear();
            return ScreenState::NoSession;
        };

        match self.api.homework().list(session_id).await {
            Ok(homeworks) => {
                self.homeworks = homeworks;
                ScreenState::Ready
            }
            Err(e) => {
                error!("Failed to load homework: {}", e);
                ScreenState::Stale
            }
        }
    }

    /// Generate homework from the form, then reset the form and re-fetch.
    ///
    /// On failure the form keeps its input.
    pub async fn create(
        &mut self,
        session_id: Option<&str>,
        form: &mut GenerationForm,
        notifier: &dyn Notifier,
    ) -> Option<Homework> {
        let session_id = session_id?;
        let prompt = match form.prompt() {
            Ok(prompt) => prompt,
            Err(e) => {
                notifier.alert(&e.to_string());
                return None;
            }
        };

        let created = self
            .api
            .homework()
            .create(session_id, &prompt, form.selected_materials())
            .await;
        match created {
            Ok(homework) => {
                info!("Generated homework {} ({} tasks)", homework.id, homework.tasks.len());
                form.reset();
                self.load(Some(session_id)).await;
                Some(homework)
            }
            Err(e) => {
                error!("Failed to create homework: {}", e);
                notifier.alert(&failure_message("create homework", &e));
                None
            }
        }
    }
}

/// One homework with its tasks and reviews.
pub struct HomeworkDetailScreen {
    api: ApiClient,
    homework_id: String,
    homework: Option<Homework>,
}

impl HomeworkDetailScreen {
    pub fn new(api: ApiClient, homework_id: impl Into<String>) -> Self {
        Self {
            api,
            homework_id: homework_id.into(),
            homework: None,
        }
    }

    pub fn homework_id(&self) -> &str {
        &self.homework_id
    }

    pub fn homework(&self) -> Option<&Homework> {
        self.homework.as_ref()
    }

    pub async fn load(&mut self) -> ScreenState {
        match self.api.homework().get(&self.homework_id).await {
            Ok(homework) => {
                self.homework = Some(homework);
                ScreenState::Ready
            }
            Err(e) => {
                error!("Failed to load homework {}: {}", self.homework_id, e);
                ScreenState::Stale
            }
        }
    }

    /// Only pending homework can be submitted.
    pub fn can_submit(&self) -> bool {
        self.homework.as_ref().is_some_and(Homework::is_pending)
    }

    /// Upload a solution for one task, then reload.
    ///
    /// `task` is a task id or task number. Tasks that already carry a
    /// solution are not re-uploaded.
    pub async fn upload_task_solution(
        &mut self,
        task: &str,
        file: FileUpload,
        notifier: &dyn Notifier,
    ) -> Option<HomeworkTask> {
        let task_id = match self.homework.as_ref() {
            Some(homework) => match homework.find_task(task) {
                Some(found) if found.has_submission() => {
                    notifier.alert(&format!(
                        "Task {} already has an uploaded solution.",
                        found.task_number
                    ));
                    return None;
                }
                Some(found) => found.id.clone(),
                None => {
                    notifier.alert(&format!("No task '{}' in this homework.", task));
                    return None;
                }
            },
            None => task.to_string(),
        };
        let homework_id = self
            .homework
            .as_ref()
            .map(|h| h.id.clone())
            .unwrap_or_else(|| self.homework_id.clone());

        match self
            .api
            .homework()
            .upload_task_solution(&homework_id, &task_id, file)
            .await
        {
            Ok(updated) => {
                info!("Uploaded solution for task {}", updated.task_number);
                self.load().await;
                Some(updated)
            }
            Err(e) => {
                error!("Failed to upload solution: {}", e);
                notifier.alert(&failure_message("upload file", &e));
                None
            }
        }
    }

    /// Submit the homework for review, then reload.
    pub async fn submit(&mut self, notifier: &dyn Notifier) -> Option<Homework> {
        if self.homework.is_some() && !self.can_submit() {
            notifier.alert("Only pending homework can be submitted.");
            return None;
        }

        match self.api.homework().submit(&self.homework_id).await {
            Ok(submitted) => {
                info!("Submitted homework {}", submitted.id);
                self.load().await;
                notifier.alert("Homework submitted successfully!");
                Some(submitted)
            }
            Err(e) => {
                error!("Failed to submit homework: {}", e);
                notifier.alert("Failed to submit homework. Please try again.");
                None
            }
        }
    }
}
