//! Wire models for the product resource

use bytes::Bytes;
use mime::Mime;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::{ProductsError, Result};

/// Server-assigned product identifier.
///
/// Servers send it either as a JSON string or a number; both are kept as text
/// since the identifier only ever travels back in a URL path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Text(text) if text.is_empty() => Err(D::Error::custom("empty product id")),
            RawId::Text(text) => Ok(Self(text)),
            RawId::Number(number) => Ok(Self(number.to_string())),
        }
    }
}

/// A catalog product as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProductRecord")]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub images: Vec<String>,
}

/// Wire shape of a product. Document stores send `_id`, sometimes next to `id`.
#[derive(Deserialize)]
struct ProductRecord {
    #[serde(default)]
    id: Option<ProductId>,
    #[serde(default, rename = "_id")]
    object_id: Option<ProductId>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    sku: String,
    #[serde(default, deserialize_with = "price_format::deserialize")]
    price: f64,
    #[serde(default)]
    images: Vec<String>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id.or(record.object_id),
            name: record.name,
            sku: record.sku,
            price: record.price,
            images: record.images,
        }
    }
}

impl Product {
    pub fn new(name: &str, sku: &str, price: f64) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            sku: sku.to_string(),
            price,
            images: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ProductId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }
}

/// The changed subset of a product's fields, sent as a partial update.
///
/// Absent fields are left out of the JSON body entirely. The same shape
/// decodes an update response, so a key the server did not send stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDiff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "price_format::deserialize_option"
    )]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl ProductDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn sku(mut self, sku: &str) -> Self {
        self.sku = Some(sku.to_string());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.sku.is_none() && self.price.is_none() && self.images.is_none()
    }

    /// Names of the fields carried by this diff, in wire order
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.sku.is_some() {
            fields.push("sku");
        }
        if self.price.is_some() {
            fields.push("price");
        }
        if self.images.is_some() {
            fields.push("images");
        }
        fields
    }

    /// Writes the carried fields onto `product`, leaving every other field untouched
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(sku) = &self.sku {
            product.sku = sku.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(images) = &self.images {
            product.images = images.clone();
        }
    }

    /// Same keys as `self`, with the values the server reported for them.
    ///
    /// A key missing from the server's answer keeps the submitted value.
    pub fn confirmed_by(&self, server: &ProductDiff) -> ProductDiff {
        fn confirm<T: Clone>(sent: &Option<T>, echoed: &Option<T>) -> Option<T> {
            sent.as_ref().map(|sent| echoed.clone().unwrap_or_else(|| sent.clone()))
        }

        ProductDiff {
            name: confirm(&self.name, &server.name),
            sku: confirm(&self.sku, &server.sku),
            price: confirm(&self.price, &server.price),
            images: confirm(&self.images, &server.images),
        }
    }
}

/// A locally selected image waiting to be uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Mime,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(file_name: &str, content_type: Mime, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Builds an image file, inferring the content type from the extension
    pub fn from_name(file_name: &str, bytes: impl Into<Bytes>) -> Result<Self> {
        let content_type = guess_image_type(file_name).ok_or_else(|| {
            ProductsError::UnsupportedImage(format!(
                "{} (allowed formats: {})",
                file_name,
                ACCEPTED_IMAGE_EXTENSIONS.join(", ")
            ))
        })?;
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Full payload for creating a product
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub images: Vec<ImageFile>,
}

impl NewProduct {
    pub fn new(name: &str, sku: &str, price: f64) -> Self {
        Self {
            name: name.to_string(),
            sku: sku.to_string(),
            price,
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: ImageFile) -> Self {
        self.images.push(image);
        self
    }
}

pub const ACCEPTED_IMAGE_EXTENSIONS: [&str; 3] = ["jpeg", "png", "jpg"];

/// Maps an accepted image file name to its content type
pub fn guess_image_type(file_name: &str) -> Option<Mime> {
    let (_, extension) = file_name.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some(mime::IMAGE_JPEG),
        "png" => Some(mime::IMAGE_PNG),
        _ => None,
    }
}

pub fn is_accepted_image_type(content_type: &Mime) -> bool {
    *content_type == mime::IMAGE_JPEG || *content_type == mime::IMAGE_PNG
}

/// Parses user or wire input into a price
pub fn parse_price(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let price = trimmed
        .parse::<f64>()
        .map_err(|_| ProductsError::InvalidPrice(format!("`{}` is not a number", input)))?;
    validate_price(price)
}

pub fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() {
        return Err(ProductsError::InvalidPrice(format!("{} is not finite", price)));
    }
    if price < 0.0 {
        return Err(ProductsError::InvalidPrice(format!("{} is negative", price)));
    }
    Ok(price)
}

mod price_format {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPrice {
            Number(f64),
            Text(String),
        }

        let price = match RawPrice::deserialize(deserializer)? {
            RawPrice::Number(number) => validate_price(number),
            RawPrice::Text(text) => parse_price(&text),
        };
        price.map_err(D::Error::custom)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Price(#[serde(deserialize_with = "deserialize")] f64);

        Ok(Option::<Price>::deserialize(deserializer)?.map(|Price(price)| price))
    }
}
