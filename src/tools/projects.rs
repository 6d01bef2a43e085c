use anyhow::{Context, Result};
use log::info;
use serde_json::Value;

use super::{Toolkit, format_projects};
use crate::auth::ToolContext;
use crate::http::{Params, path_segment};

impl<C: ToolContext> Toolkit<C> {
    /// Lists the user's projects, one `ID: .., Name: ..` line each.
    #[tracing::instrument(skip(self))]
    pub async fn list_projects(&self) -> Result<String> {
        let projects = self
            .client()?
            .get("/projects", None)
            .await
            .context("Failed to list projects")?;
        Ok(format_projects(&projects))
    }

    /// Creates a project and returns it. Use its `id` to add tasks to it.
    #[tracing::instrument(skip(self))]
    pub async fn create_project(&self, name: &str) -> Result<Value> {
        let body = Params::new().insert("name", name);
        let project = self
            .client()?
            .post_json("/projects", Some(&body))
            .await
            .with_context(|| format!("Failed to create project {:?}", name))?;

        info!("Created project {:?}", name);
        Ok(project)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_project(&self, project_id: &str) -> Result<bool> {
        let segment = path_segment(project_id)
            .with_context(|| format!("Invalid project ID {:?}", project_id))?;
        self.client()?
            .delete(&format!("/projects/{}", segment))
            .await
            .with_context(|| format!("Failed to delete project {}", project_id))?;

        info!("Deleted project {}", project_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::http::ApiError;
    use crate::tools::test_support::toolkit;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_projects() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/projects")
            .match_header("Authorization", "Bearer test_token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"1","name":"Inbox"},{"id":"2","name":"Barcelona Trip"}]"#)
            .create_async()
            .await;

        let result = toolkit(&server.url()).list_projects().await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, "ID: 1, Name: Inbox\nID: 2, Name: Barcelona Trip");
    }

    #[tokio::test]
    async fn test_list_projects_empty() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/projects")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let result = toolkit(&server.url()).list_projects().await.unwrap();
        assert_eq!(result, "No projects found.");
    }

    #[tokio::test]
    async fn test_create_project() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/projects")
            .match_body(Matcher::Json(json!({"name": "Barcelona Trip"})))
            .with_status(200)
            .with_body(r#"{"id":"2203306141","name":"Barcelona Trip","color":"charcoal"}"#)
            .create_async()
            .await;

        let project = toolkit(&server.url())
            .create_project("Barcelona Trip")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(project["id"], "2203306141");
        assert_eq!(project["color"], "charcoal");
    }

    #[tokio::test]
    async fn test_create_project_without_content_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/projects")
            .with_status(204)
            .create_async()
            .await;

        let err = toolkit(&server.url())
            .create_project("Ghost")
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_project() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/projects/123")
            .match_header("Authorization", "Bearer test_token")
            .with_status(204)
            .create_async()
            .await;

        assert!(toolkit(&server.url()).delete_project("123").await.unwrap());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_missing_project_keeps_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/projects/999")
            .with_status(404)
            .with_body("Project not found")
            .create_async()
            .await;

        let err = toolkit(&server.url())
            .delete_project("999")
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<ApiError>().unwrap().is_not_found());
        assert!(err.to_string().contains("999"));
    }

    #[tokio::test]
    async fn test_delete_project_encodes_query_characters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/projects/7%3Fforce%3Dtrue")
            .with_status(204)
            .create_async()
            .await;

        assert!(
            toolkit(&server.url())
                .delete_project("7?force=true")
                .await
                .unwrap()
        );
        mock.assert_async().await;
    }
}
