//! One product in the grid, with its image carousel

use catalog_admin_products::{Product, ProductId};
use std::collections::HashSet;

/// Shown when a product has no images or its current image failed to load
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=No+Image";

/// What a card asks its list view to do. Cards never talk to the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardIntent {
    Edit(ProductId),
    Delete(ProductId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    product: Product,
    index: usize,
    failed: HashSet<usize>,
}

impl ProductCard {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            index: 0,
            failed: HashSet::new(),
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn id(&self) -> Option<&ProductId> {
        self.product.id.as_ref()
    }

    /// Replaces the shown product, keeping the carousel position when the
    /// image list is unchanged.
    pub fn set_product(&mut self, product: Product) {
        if product.images != self.product.images {
            self.index = 0;
            self.failed.clear();
        }
        self.product = product;
    }

    /// Number of carousel slots. Never zero.
    pub fn image_count(&self) -> usize {
        self.product.images.len().max(1)
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_image(&self) -> &str {
        if self.failed.contains(&self.index) {
            return PLACEHOLDER_IMAGE;
        }
        self.product
            .images
            .get(self.index)
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.image_count();
    }

    pub fn prev(&mut self) {
        let count = self.image_count();
        self.index = (self.index + count - 1) % count;
    }

    /// The current image could not be loaded; show the placeholder instead
    pub fn mark_image_failed(&mut self) {
        self.failed.insert(self.index);
    }

    pub fn price_label(&self) -> String {
        format!("${:.2}", self.product.price)
    }

    pub fn edit_intent(&self) -> Option<CardIntent> {
        self.id().cloned().map(CardIntent::Edit)
    }

    pub fn delete_intent(&self) -> Option<CardIntent> {
        self.id().cloned().map(CardIntent::Delete)
    }
}
