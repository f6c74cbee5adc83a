//! Lumina API Client

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// API Client for Lumina
pub struct LuminaClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Request/Response Types
// ============================================

#[derive(Debug, Default, Serialize)]
pub struct ProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_per_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    pub prefers_short: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_max: Option<u8>,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub age: u32,
    pub minutes_per_day: u32,
    pub goal: String,
    pub prefers_short: bool,
    pub difficulty_max: u8,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub pages: Option<u32>,
    pub difficulty: Option<u8>,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub author: String,
    pub pages: Option<u32>,
    pub difficulty: Option<u8>,
    pub why: String,
    pub score: i64,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Deserialize)]
pub struct UserRecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
    pub bonus_granted: bool,
    pub xp_gained: u64,
    pub character: Option<Character>,
}

#[derive(Debug, Deserialize)]
pub struct ReadingEntry {
    pub id: String,
    pub title: String,
    pub xp_gained: u64,
}

#[derive(Debug, Deserialize)]
pub struct Character {
    pub name: String,
    pub avatar: String,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    pub level_progress: f64,
    pub books_read_count: u32,
    #[serde(default)]
    pub books_history: Vec<ReadingEntry>,
    pub coins: u64,
    #[serde(default)]
    pub inventory: Vec<String>,
    #[serde(default)]
    pub equipped: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    pub code: Option<String>,
    pub character: Character,
}

#[derive(Debug, Deserialize)]
pub struct StoreItem {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub rarity: String,
    pub category: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct Badge {
    pub name: String,
    pub emoji: String,
    pub unlocked: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct MarkReadRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
}

impl LuminaClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn user_url(&self, user_id: &str, rest: &str) -> String {
        self.url(&format!(
            "/lumina/users/{}{}",
            urlencoding::encode(user_id),
            rest
        ))
    }

    /// Attach auth, send, and decode a JSON body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        };

        let resp = request
            .send()
            .await
            .context("Failed to connect to Lumina API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    /// List the book catalog
    pub async fn list_books(&self) -> Result<Vec<Book>> {
        self.send(self.client.get(self.url("/lumina/books"))).await
    }

    /// Recommendations for an ad-hoc profile
    pub async fn recommend(&self, profile: &ProfileRequest) -> Result<RecommendationsResponse> {
        self.send(self.client.post(self.url("/lumina/recommendations")).json(profile))
            .await
    }

    /// Recommendations for the user's stored profile (grants the daily bonus)
    pub async fn recommend_for_user(&self, user_id: &str) -> Result<UserRecommendationsResponse> {
        let today = chrono::Local::now().date_naive();
        let body = serde_json::json!({ "today": today });
        self.send(
            self.client
                .post(self.user_url(user_id, "/recommendations"))
                .json(&body),
        )
        .await
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<ProfileResponse> {
        self.send(self.client.get(self.user_url(user_id, "/profile")))
            .await
    }

    pub async fn put_profile(&self, user_id: &str, profile: &ProfileRequest) -> Result<ProfileResponse> {
        self.send(self.client.put(self.user_url(user_id, "/profile")).json(profile))
            .await
    }

    pub async fn get_character(&self, user_id: &str) -> Result<Character> {
        self.send(self.client.get(self.user_url(user_id, "/character")))
            .await
    }

    pub async fn create_character(&self, user_id: &str, name: &str, avatar: Option<&str>) -> Result<Character> {
        let body = serde_json::json!({ "name": name, "avatar": avatar });
        self.send(self.client.post(self.user_url(user_id, "/character")).json(&body))
            .await
    }

    pub async fn update_character(
        &self,
        user_id: &str,
        name: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<Character> {
        let body = serde_json::json!({ "name": name, "avatar": avatar });
        self.send(self.client.put(self.user_url(user_id, "/character")).json(&body))
            .await
    }

    pub async fn badges(&self, user_id: &str) -> Result<Vec<Badge>> {
        self.send(self.client.get(self.user_url(user_id, "/character/badges")))
            .await
    }

    /// Credit a finished book
    pub async fn mark_read(&self, user_id: &str, book_id: &str, meta: &MarkReadRequest) -> Result<ActionResponse> {
        let path = format!("/books/{}/read", urlencoding::encode(book_id));
        self.send(self.client.post(self.user_url(user_id, &path)).json(meta))
            .await
    }

    pub async fn list_store(&self) -> Result<Vec<StoreItem>> {
        self.send(self.client.get(self.url("/lumina/store"))).await
    }

    pub async fn purchase(&self, user_id: &str, item_id: &str) -> Result<ActionResponse> {
        let path = format!("/store/{}/purchase", urlencoding::encode(item_id));
        self.send(self.client.post(self.user_url(user_id, &path)))
            .await
    }

    /// Equip `item_id` in `slot`, or clear the slot with `None`
    pub async fn equip(&self, user_id: &str, slot: &str, item_id: Option<&str>) -> Result<ActionResponse> {
        let path = format!("/equipped/{}", urlencoding::encode(slot));
        let body = serde_json::json!({ "item_id": item_id });
        self.send(self.client.put(self.user_url(user_id, &path)).json(&body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_url_is_encoded() {
        let client = LuminaClient::new("http://localhost:8000/", None);
        assert_eq!(
            client.user_url("ada lovelace", "/character"),
            "http://localhost:8000/lumina/users/ada%20lovelace/character"
        );
    }

    #[test]
    fn test_profile_request_skips_unset_fields() {
        let req = ProfileRequest {
            tags: vec!["misterio".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "prefers_short": false, "tags": ["misterio"] }));
    }

    #[test]
    fn test_action_response_parses_rejection() {
        let json = r#"{
            "success": false,
            "message": "book b1 was already credited",
            "code": "already_read",
            "reason": "book b1 was already credited",
            "character": {
                "name": "Ada", "avatar": "🧙", "level": 1, "xp": 0,
                "xp_to_next_level": 100, "level_progress": 0.0,
                "books_read_count": 1, "coins": 60
            }
        }"#;
        let resp: ActionResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.code.as_deref(), Some("already_read"));
        assert!(resp.character.inventory.is_empty());
    }
}
