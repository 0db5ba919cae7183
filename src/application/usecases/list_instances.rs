use std::sync::Arc;

use crate::domain::{models::MessagingInstance, repositories::MessagingInstanceRepository};

pub struct ListInstancesUseCase {
    repo: Arc<dyn MessagingInstanceRepository>,
}

impl ListInstancesUseCase {
    pub fn new(repo: Arc<dyn MessagingInstanceRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> anyhow::Result<Vec<MessagingInstance>> {
        self.repo.list().await
    }
}
