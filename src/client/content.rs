/**
 * Public Content Client
 * Unauthenticated reads of the content collections
 */
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::{error_message, ClientError};
use crate::db::models::{Project, Skill, Testimonial};

/// Fetches and deserializes public collections with no credentials
/// attached. An empty collection is an empty `Vec`; failures surface as
/// typed errors for the caller to render, with no automatic retry.
pub struct ContentClient {
    http: reqwest::Client,
    base_url: String,
}

impl ContentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        Ok(response.json().await?)
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.fetch("/api/projects").await
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Project, ClientError> {
        self.fetch(&format!("/api/projects/{}", id)).await
    }

    pub async fn list_skills(&self) -> Result<Vec<Skill>, ClientError> {
        self.fetch("/api/skills").await
    }

    pub async fn get_skill(&self, id: Uuid) -> Result<Skill, ClientError> {
        self.fetch(&format!("/api/skills/{}", id)).await
    }

    pub async fn list_testimonials(&self) -> Result<Vec<Testimonial>, ClientError> {
        self.fetch("/api/testimonials").await
    }

    pub async fn get_testimonial(&self, id: Uuid) -> Result<Testimonial, ClientError> {
        self.fetch(&format!("/api/testimonials/{}", id)).await
    }
}
