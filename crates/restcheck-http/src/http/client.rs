//! Thin reqwest wrapper over the remote API's fixed endpoint surface.

use reqwest::header::CONTENT_TYPE;
use restcheck::Resource;
use serde_json::Value;

use super::common::MUTATION_CONTENT_TYPE;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    // Raw ids are interpolated verbatim, never percent-encoded. Malformed
    // inputs like "1/1" or "/ff" must address the same malformed paths a
    // naive URL concatenation would produce.
    fn item_url(&self, resource: Resource, raw_id: &str) -> String {
        format!("{}/{}/{}", self.base_url, resource, raw_id)
    }

    fn nested_url(&self, parent: Resource, raw_id: &str, child: Resource) -> String {
        format!("{}/{}/{}/{}", self.base_url, parent, raw_id, child)
    }

    pub async fn list(&self, resource: Resource) -> reqwest::Result<reqwest::Response> {
        self.http.get(self.collection_url(resource)).send().await
    }

    pub async fn get_raw(
        &self,
        resource: Resource,
        raw_id: &str,
    ) -> reqwest::Result<reqwest::Response> {
        self.http.get(self.item_url(resource, raw_id)).send().await
    }

    pub async fn filtered(
        &self,
        resource: Resource,
        field: &str,
        value: &str,
    ) -> reqwest::Result<reqwest::Response> {
        self.http
            .get(self.collection_url(resource))
            .query(&[(field, value)])
            .send()
            .await
    }

    pub async fn nested(
        &self,
        parent: Resource,
        raw_id: &str,
        child: Resource,
    ) -> reqwest::Result<reqwest::Response> {
        self.http
            .get(self.nested_url(parent, raw_id, child))
            .send()
            .await
    }

    pub async fn create(
        &self,
        resource: Resource,
        body: &Value,
    ) -> reqwest::Result<reqwest::Response> {
        self.http
            .post(self.collection_url(resource))
            .header(CONTENT_TYPE, MUTATION_CONTENT_TYPE)
            .json(body)
            .send()
            .await
    }

    pub async fn replace(
        &self,
        resource: Resource,
        raw_id: &str,
        body: &Value,
    ) -> reqwest::Result<reqwest::Response> {
        self.http
            .put(self.item_url(resource, raw_id))
            .header(CONTENT_TYPE, MUTATION_CONTENT_TYPE)
            .json(body)
            .send()
            .await
    }

    pub async fn update(
        &self,
        resource: Resource,
        raw_id: &str,
        body: &Value,
    ) -> reqwest::Result<reqwest::Response> {
        self.http
            .patch(self.item_url(resource, raw_id))
            .header(CONTENT_TYPE, MUTATION_CONTENT_TYPE)
            .json(body)
            .send()
            .await
    }

    pub async fn delete(
        &self,
        resource: Resource,
        raw_id: &str,
    ) -> reqwest::Result<reqwest::Response> {
        self.http
            .delete(self.item_url(resource, raw_id))
            .send()
            .await
    }
}
