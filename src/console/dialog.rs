//! Create and edit dialogs
//!
//! Both dialogs hold raw text input. Nothing is parsed until `submit`, so a
//! half-typed price never reaches the list view.

use catalog_admin_products::{parse_price, ImageFile, NewProduct, Product, ProductDiff, ProductId};
use std::fmt;

use crate::console::images::{ImagePreview, ImageStaging};
use crate::error::{Error, Result};

/// Text fields a dialog can edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Sku,
    Price,
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProductField::Name => "name",
            ProductField::Sku => "sku",
            ProductField::Price => "price",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct FormFields {
    name: String,
    sku: String,
    price: String,
}

impl FormFields {
    fn get(&self, field: ProductField) -> &str {
        match field {
            ProductField::Name => &self.name,
            ProductField::Sku => &self.sku,
            ProductField::Price => &self.price,
        }
    }

    fn set(&mut self, field: ProductField, value: &str) {
        let slot = match field {
            ProductField::Name => &mut self.name,
            ProductField::Sku => &mut self.sku,
            ProductField::Price => &mut self.price,
        };
        *slot = value.to_string();
    }
}

fn require_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("name is required"));
    }
    Ok(name.to_string())
}

/// Form for a new product, including locally selected images
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCreateDialog {
    fields: FormFields,
    images: ImageStaging,
}

impl ProductCreateDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: ProductField) -> &str {
        self.fields.get(field)
    }

    pub fn set_field(&mut self, field: ProductField, value: &str) {
        self.fields.set(field, value);
    }

    pub fn add_file(&mut self, file: ImageFile) -> Result<()> {
        self.images.add_file(file)
    }

    /// Stages several files; stops at the first one that is refused
    pub fn add_files<I>(&mut self, files: I) -> Result<()>
    where
        I: IntoIterator<Item = ImageFile>,
    {
        for file in files {
            self.images.add_file(file)?;
        }
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) -> bool {
        self.images.remove(index).is_some()
    }

    pub fn images(&self) -> &ImageStaging {
        &self.images
    }

    pub fn previews(&self) -> Vec<ImagePreview> {
        self.images.previews()
    }

    /// Validates the form and builds the full create payload
    pub fn submit(&self) -> Result<NewProduct> {
        let name = require_name(&self.fields.name)?;
        let price = parse_price(&self.fields.price)?;

        Ok(NewProduct {
            name,
            sku: self.fields.sku.trim().to_string(),
            price,
            images: self.images.local_files(),
        })
    }
}

/// Form over an existing product that reports only what changed
#[derive(Debug, Clone, PartialEq)]
pub struct ProductEditDialog {
    id: ProductId,
    snapshot: Product,
    fields: FormFields,
    images: Vec<String>,
}

impl ProductEditDialog {
    pub fn new(id: ProductId, snapshot: Product) -> Self {
        let fields = FormFields {
            name: snapshot.name.clone(),
            sku: snapshot.sku.clone(),
            price: snapshot.price.to_string(),
        };
        let images = snapshot.images.clone();
        Self {
            id,
            snapshot,
            fields,
            images,
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.id
    }

    pub fn snapshot(&self) -> &Product {
        &self.snapshot
    }

    pub fn field(&self, field: ProductField) -> &str {
        self.fields.get(field)
    }

    pub fn set_field(&mut self, field: ProductField, value: &str) {
        self.fields.set(field, value);
    }

    pub fn remove_image(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.images.remove(index);
            true
        } else {
            false
        }
    }

    pub fn previews(&self) -> Vec<ImagePreview> {
        ImageStaging::from_remote(self.images.iter().cloned()).previews()
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.name.trim() != self.snapshot.name.trim()
            || self.fields.sku.trim() != self.snapshot.sku.trim()
            || self.fields.price.trim() != self.snapshot.price.to_string()
            || self.images != self.snapshot.images
    }

    /// Field-level diff against the snapshot, validating only changed fields.
    ///
    /// A field typed back to its original value is not part of the diff.
    pub fn submit(&self) -> Result<ProductDiff> {
        let mut diff = ProductDiff::new();

        let name = self.fields.name.trim();
        if name != self.snapshot.name.trim() {
            diff.name = Some(require_name(name)?);
        }

        let sku = self.fields.sku.trim();
        if sku != self.snapshot.sku.trim() {
            diff.sku = Some(sku.to_string());
        }

        let price = self.fields.price.trim();
        if price != self.snapshot.price.to_string() {
            let price = parse_price(price)?;
            if price != self.snapshot.price {
                diff.price = Some(price);
            }
        }

        if self.images != self.snapshot.images {
            diff.images = Some(self.images.clone());
        }

        Ok(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> Product {
        Product::new("Lamp", "L-1", 25.0)
            .with_id("l1")
            .with_images(["http://img/l1.png", "http://img/l2.png"])
    }

    #[test]
    fn test_create_submit_builds_payload() {
        let mut dialog = ProductCreateDialog::new();
        dialog.set_field(ProductField::Name, "  Desk ");
        dialog.set_field(ProductField::Sku, "D-1");
        dialog.set_field(ProductField::Price, "99.90");
        dialog
            .add_files([
                ImageFile::new("a.png", mime::IMAGE_PNG, vec![1u8]),
                ImageFile::new("b.jpg", mime::IMAGE_JPEG, vec![2u8]),
            ])
            .unwrap();
        assert!(dialog.remove_image(0));

        let payload = dialog.submit().unwrap();

        assert_eq!(payload.name, "Desk");
        assert_eq!(payload.sku, "D-1");
        assert_eq!(payload.price, 99.9);
        assert_eq!(payload.images.len(), 1);
        assert_eq!(payload.images[0].file_name, "b.jpg");
    }

    #[test]
    fn test_create_requires_name_and_price() {
        let mut dialog = ProductCreateDialog::new();
        dialog.set_field(ProductField::Price, "10");
        assert!(matches!(dialog.submit(), Err(Error::Validation(_))));

        dialog.set_field(ProductField::Name, "Desk");
        dialog.set_field(ProductField::Price, "ten");
        assert!(matches!(dialog.submit(), Err(Error::Products(_))));
    }

    #[test]
    fn test_create_previews_local_files() {
        let mut dialog = ProductCreateDialog::new();
        dialog
            .add_file(ImageFile::new("a.png", mime::IMAGE_PNG, vec![0u8]))
            .unwrap();

        let previews = dialog.previews();
        assert_eq!(previews[0].label, "a.png");
        assert_eq!(previews[0].src, "data:image/png;base64,AA==");
    }

    #[test]
    fn test_edit_diff_contains_only_changed_fields() {
        let mut dialog = ProductEditDialog::new(ProductId::from("l1"), lamp());
        dialog.set_field(ProductField::Sku, "L-2");

        let diff = dialog.submit().unwrap();

        assert_eq!(diff, ProductDiff::new().sku("L-2"));
    }

    #[test]
    fn test_edit_restored_field_drops_out() {
        let mut dialog = ProductEditDialog::new(ProductId::from("l1"), lamp());
        dialog.set_field(ProductField::Name, "Lantern");
        dialog.set_field(ProductField::Name, "Lamp");
        dialog.set_field(ProductField::Price, "25.00");

        assert!(dialog.submit().unwrap().is_empty());
    }

    #[test]
    fn test_edit_ignores_whitespace_around_server_values() {
        let padded = Product::new(" Lamp ", "L-1\n", 25.0).with_id("l1");
        let mut dialog = ProductEditDialog::new(ProductId::from("l1"), padded);

        assert!(!dialog.is_dirty());
        assert!(dialog.submit().unwrap().is_empty());

        dialog.set_field(ProductField::Name, "Lantern");
        assert_eq!(dialog.submit().unwrap(), ProductDiff::new().name("Lantern"));
    }

    #[test]
    fn test_edit_image_removal_and_validation() {
        let mut dialog = ProductEditDialog::new(ProductId::from("l1"), lamp());
        assert!(dialog.remove_image(0));
        assert!(!dialog.remove_image(3));
        assert!(dialog.is_dirty());
        assert_eq!(dialog.previews().len(), 1);

        let diff = dialog.submit().unwrap();
        assert_eq!(diff.images, Some(vec!["http://img/l2.png".to_string()]));

        dialog.set_field(ProductField::Name, "   ");
        assert!(matches!(dialog.submit(), Err(Error::Validation(_))));
    }
}
