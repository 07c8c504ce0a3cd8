use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::models::{Dish, DishPayload, Restaurant, Tag, TagList, FIELD_IMAGE};

pub const DISHES_PATH: &str = "pratos/";
pub const TAGS_PATH: &str = "tags/";
pub const RESTAURANTS_PATH: &str = "restaurantes/";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Request to {path} failed: {source}")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} answered with HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("Unexpected response body from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Backend operations the dish form depends on.
#[async_trait]
pub trait DishApi: Send + Sync {
    async fn fetch_dish(&self, id: &str) -> Result<Dish, ApiError>;
    async fn fetch_tags(&self) -> Result<Vec<Tag>, ApiError>;
    async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, ApiError>;
    /// `POST pratos/`
    async fn create_dish(&self, payload: DishPayload) -> Result<(), ApiError>;
    /// `PUT pratos/`. The record id is not part of the path.
    async fn update_dish(&self, payload: DishPayload) -> Result<(), ApiError>;
}

pub fn dish_path(id: &str) -> String {
    format!("{}{}/", DISHES_PATH, id)
}

/// Parse the configured base URL, making sure relative joins land under it.
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|e| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// reqwest-backed implementation of [`DishApi`].
pub struct HttpDishApi {
    client: Client,
    base_url: Url,
}

impl HttpDishApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| ApiError::Http {
                path: base_url.to_string(),
                source,
            })?;
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(|e| ApiError::InvalidBaseUrl {
            url: format!("{}{}", self.base_url, path),
            reason: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Http {
                path: path.to_string(),
                source,
            })?;
        let response = check_status(path, response)?;
        response.json::<T>().await.map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn send_dish(&self, method: Method, payload: DishPayload) -> Result<(), ApiError> {
        let url = self.url(DISHES_PATH)?;
        let form = build_form(payload).await?;
        tracing::debug!(%url, %method, "sending dish form");
        let response = self
            .client
            .request(method, url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ApiError::Http {
                path: DISHES_PATH.to_string(),
                source,
            })?;
        check_status(DISHES_PATH, response)?;
        Ok(())
    }
}

fn check_status(path: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            path: path.to_string(),
            status: status.as_u16(),
        })
    }
}

/// Assemble the multipart body. The image part is only present when a file
/// was chosen.
async fn build_form(payload: DishPayload) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in payload.text_fields() {
        form = form.text(name, value.to_string());
    }

    if let Some(image) = payload.image {
        let bytes = tokio::fs::read(image.path())
            .await
            .map_err(|source| ApiError::Image {
                path: image.path.clone(),
                source,
            })?;
        let part = Part::bytes(bytes)
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type())
            .map_err(|source| ApiError::Http {
                path: DISHES_PATH.to_string(),
                source,
            })?;
        form = form.part(FIELD_IMAGE, part);
    }

    Ok(form)
}

#[async_trait]
impl DishApi for HttpDishApi {
    async fn fetch_dish(&self, id: &str) -> Result<Dish, ApiError> {
        self.get_json(&dish_path(id)).await
    }

    async fn fetch_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let list: TagList = self.get_json(TAGS_PATH).await?;
        Ok(list.tags)
    }

    async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        self.get_json(RESTAURANTS_PATH).await
    }

    async fn create_dish(&self, payload: DishPayload) -> Result<(), ApiError> {
        self.send_dish(Method::POST, payload).await
    }

    async fn update_dish(&self, payload: DishPayload) -> Result<(), ApiError> {
        self.send_dish(Method::PUT, payload).await
    }
}
