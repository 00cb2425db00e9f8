//! Product catalog REST client
//!
//! This crate talks to the catalog API's `/products` resource: listing,
//! multipart creation with image uploads, partial JSON updates and deletion.

pub mod models;

pub use models::{
    guess_image_type, is_accepted_image_type, parse_price, validate_price, ImageFile, NewProduct,
    Product, ProductDiff, ProductId, ACCEPTED_IMAGE_EXTENSIONS,
};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Result type
pub type Result<T> = std::result::Result<T, ProductsError>;

/// Error type
#[derive(Error, Debug)]
pub enum ProductsError {
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),
}

impl ProductsError {
    /// HTTP status of an API error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::NetworkError(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// The four calls the console needs from the product resource
#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>>;

    async fn create_product(&self, product: NewProduct) -> Result<Product>;

    /// Returns the fields the server echoed back; keys it left out stay `None`
    async fn update_product(&self, id: &ProductId, diff: &ProductDiff) -> Result<ProductDiff>;

    async fn delete_product(&self, id: &ProductId) -> Result<()>;
}

/// Product resource client
#[derive(Debug, Clone)]
pub struct ProductsClient {
    base_url: Url,
    http_client: Client,
    request_timeout: Option<Duration>,
}

impl ProductsClient {
    /// Create a new products client rooted at `base_url`
    pub fn new(base_url: &str, http_client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ProductsError::UrlParseError(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self {
            base_url,
            http_client,
            request_timeout: None,
        })
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, id: Option<&ProductId>) -> Url {
        let mut url = self.base_url.clone();
        // new() already rejected cannot-be-a-base URLs
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("products");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "sending products request");
        let request = self.http_client.request(method, url);
        match self.request_timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// 商品一覧を取得
    pub async fn list(&self) -> Result<Vec<Product>> {
        let response = self.request(Method::GET, self.url(None)).send().await?;
        decode(ensure_success(response).await?).await
    }

    /// 商品を作成
    pub async fn create(&self, product: NewProduct) -> Result<Product> {
        let form = build_form(product)?;

        let response = self
            .request(Method::POST, self.url(None))
            .multipart(form)
            .send()
            .await?;

        decode(ensure_success(response).await?).await
    }

    /// 変更されたフィールドのみを更新し、サーバーが返したフィールドを返す
    pub async fn update(&self, id: &ProductId, diff: &ProductDiff) -> Result<ProductDiff> {
        let response = self
            .request(Method::PUT, self.url(Some(id)))
            .json(diff)
            .send()
            .await?;

        decode(ensure_success(response).await?).await
    }

    /// 商品を削除
    pub async fn delete(&self, id: &ProductId) -> Result<()> {
        let response = self
            .request(Method::DELETE, self.url(Some(id)))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductApi for ProductsClient {
    async fn list_products(&self) -> Result<Vec<Product>> {
        self.list().await
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        self.create(product).await
    }

    async fn update_product(&self, id: &ProductId, diff: &ProductDiff) -> Result<ProductDiff> {
        self.update(id, diff).await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<()> {
        self.delete(id).await
    }
}

fn build_form(product: NewProduct) -> Result<Form> {
    let mut form = Form::new()
        .text("name", product.name)
        .text("sku", product.sku)
        .text("price", product.price.to_string());

    for image in product.images {
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name)
            .mime_str(image.content_type.as_ref())?;
        form = form.part("images", part);
    }

    Ok(form)
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await?;
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or(text);

    Err(ProductsError::ApiError {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
