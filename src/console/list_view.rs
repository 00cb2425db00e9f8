//! The product grid and the state that keeps it in sync with the API
//!
//! Every mutation is confirmed-first: the list changes only after the server
//! answered with success, and entries are matched by their server id. Each
//! network failure produces exactly one error notification and leaves the
//! list as it was.

use catalog_admin_products::{NewProduct, Product, ProductApi, ProductDiff, ProductId, ProductsError};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::console::card::{CardIntent, ProductCard};
use crate::console::dialog::{ProductCreateDialog, ProductEditDialog};
use crate::console::notification::Notifications;
use crate::error::{Error, Result};

/// Asks the user to confirm a destructive action
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Generation captured when a load starts.
///
/// A load result is applied only while its ticket is the newest one and the
/// view is still mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

/// The dialog currently open over the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveDialog<'a> {
    Create(&'a ProductCreateDialog),
    Edit(&'a ProductEditDialog),
}

enum Submission {
    Create(NewProduct),
    Update(ProductId, ProductDiff),
}

pub struct ProductListView<A: ProductApi + ?Sized> {
    api: Arc<A>,
    cards: Vec<ProductCard>,
    // at most one of the two dialogs is open
    create_dialog: Option<ProductCreateDialog>,
    edit_dialog: Option<ProductEditDialog>,
    notifications: Notifications,
    generation: u64,
    mounted: bool,
}

impl<A: ProductApi + ?Sized> ProductListView<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self::with_notifications(api, Notifications::default())
    }

    pub fn with_notifications(api: Arc<A>, notifications: Notifications) -> Self {
        Self {
            api,
            cards: Vec::new(),
            create_dialog: None,
            edit_dialog: None,
            notifications,
            generation: 0,
            mounted: true,
        }
    }

    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.cards.iter().map(ProductCard::product)
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.card(id).map(ProductCard::product)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[ProductCard] {
        &self.cards
    }

    pub fn card(&self, id: &ProductId) -> Option<&ProductCard> {
        self.cards.iter().find(|card| card.id() == Some(id))
    }

    /// Mutable access for carousel navigation
    pub fn card_mut(&mut self, id: &ProductId) -> Option<&mut ProductCard> {
        self.cards.iter_mut().find(|card| card.id() == Some(id))
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Tears the view down. Loads still in flight are discarded on arrival.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
        self.close_dialog();
    }

    /// Starts a load and invalidates every earlier ticket
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Applies a load result fetched under `ticket`.
    ///
    /// Returns `Ok(false)` when the result was stale and has been dropped.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: std::result::Result<Vec<Product>, ProductsError>,
    ) -> Result<bool> {
        if !self.mounted || ticket.generation != self.generation {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                mounted = self.mounted,
                "dropping stale product load"
            );
            return Ok(false);
        }

        match result {
            Ok(products) => {
                self.replace_all(products);
                debug!(count = self.cards.len(), "products loaded");
                Ok(true)
            }
            Err(err) => {
                error!(error = %err, "failed to load products");
                self.notifications.error("Failed to load products");
                Err(err.into())
            }
        }
    }

    /// Fetches the whole collection. No retry on failure.
    pub async fn load_products(&mut self) -> Result<()> {
        let ticket = self.begin_load();
        let result = self.api.list_products().await;
        self.finish_load(ticket, result).map(|_| ())
    }

    fn replace_all(&mut self, products: Vec<Product>) {
        let mut previous = std::mem::take(&mut self.cards);
        for product in products {
            let Some(id) = product.id.clone() else {
                warn!(name = %product.name, "skipping product without id");
                continue;
            };
            if self.cards.iter().any(|card| card.id() == Some(&id)) {
                warn!(%id, "skipping duplicate product id");
                continue;
            }
            // Keep carousel state for products that survived the reload
            let card = match previous.iter().position(|card| card.id() == Some(&id)) {
                Some(index) => {
                    let mut card = previous.swap_remove(index);
                    card.set_product(product);
                    card
                }
                None => ProductCard::new(product),
            };
            self.cards.push(card);
        }
    }

    /// Sends a new product and appends what the server returned.
    ///
    /// The create dialog is closed whether or not the request succeeded.
    pub async fn create_product(&mut self, product: NewProduct) -> Result<Product> {
        debug!(name = %product.name, images = product.images.len(), "creating product");
        let result = self.api.create_product(product).await;

        self.create_dialog = None;

        let created = match result {
            Ok(created) => created,
            Err(err) => return Err(self.report("Failed to create product", err.into())),
        };
        let Some(id) = created.id.clone() else {
            return Err(self.report(
                "Failed to create product",
                Error::invalid_response("created product has no id"),
            ));
        };

        match self.card_mut(&id) {
            Some(card) => {
                warn!(%id, "created product already listed, replacing it");
                card.set_product(created.clone());
            }
            None => self.cards.push(ProductCard::new(created.clone())),
        }

        info!(%id, "product created");
        self.notifications.success("Product created successfully!");
        Ok(created)
    }

    /// Sends only the changed fields and merges exactly those into the entry
    pub async fn update_product(&mut self, id: &ProductId, diff: ProductDiff) -> Result<()> {
        if diff.is_empty() {
            debug!(%id, "nothing changed, skipping update");
            self.close_edit_dialog(id);
            return Ok(());
        }

        let Some(current) = self.product(id).cloned() else {
            return Err(self.report_update(Error::not_found(id)));
        };

        debug!(%id, fields = ?diff.fields(), "updating product");
        let echoed = match self.api.update_product(id, &diff).await {
            Ok(echoed) => echoed,
            Err(err) => return Err(self.report_update(err.into())),
        };

        let mut updated = current;
        diff.confirmed_by(&echoed).apply_to(&mut updated);
        if let Some(card) = self.card_mut(id) {
            card.set_product(updated);
        }

        info!(%id, "product updated");
        self.notifications.success("Product updated successfully!");
        self.close_edit_dialog(id);
        Ok(())
    }

    /// Deletes after confirmation; the entry goes away only once the server agrees
    pub async fn delete_product<C>(&mut self, id: &ProductId, mut confirm: C) -> Result<DeleteOutcome>
    where
        C: ConfirmPrompt,
    {
        let Some(name) = self.product(id).map(|product| product.name.clone()) else {
            return Err(self.report("Failed to delete product", Error::not_found(id)));
        };

        if !confirm.confirm(&format!("Are you sure you want to delete {}?", name)) {
            debug!(%id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(err) = self.api.delete_product(id).await {
            return Err(self.report("Failed to delete product", err.into()));
        }

        self.cards.retain(|card| card.id() != Some(id));
        self.close_edit_dialog(id);

        info!(%id, "product deleted");
        self.notifications.success("Product deleted successfully!");
        Ok(DeleteOutcome::Deleted)
    }

    pub fn dialog(&self) -> Option<ActiveDialog<'_>> {
        match (&self.create_dialog, &self.edit_dialog) {
            (Some(dialog), _) => Some(ActiveDialog::Create(dialog)),
            (None, Some(dialog)) => Some(ActiveDialog::Edit(dialog)),
            (None, None) => None,
        }
    }

    /// Opens an empty create dialog, replacing whatever dialog was open
    pub fn open_create_dialog(&mut self) -> &mut ProductCreateDialog {
        self.edit_dialog = None;
        self.create_dialog.insert(ProductCreateDialog::new())
    }

    pub fn open_edit_dialog(&mut self, id: &ProductId) -> Result<&mut ProductEditDialog> {
        let snapshot = self.product(id).cloned().ok_or_else(|| Error::not_found(id))?;
        self.create_dialog = None;
        Ok(self
            .edit_dialog
            .insert(ProductEditDialog::new(id.clone(), snapshot)))
    }

    pub fn create_dialog_mut(&mut self) -> Option<&mut ProductCreateDialog> {
        self.create_dialog.as_mut()
    }

    pub fn edit_dialog_mut(&mut self) -> Option<&mut ProductEditDialog> {
        self.edit_dialog.as_mut()
    }

    pub fn close_dialog(&mut self) {
        self.create_dialog = None;
        self.edit_dialog = None;
    }

    fn close_edit_dialog(&mut self, id: &ProductId) {
        if self.edit_dialog.as_ref().map(ProductEditDialog::product_id) == Some(id) {
            self.edit_dialog = None;
        }
    }

    /// Validates the open dialog and dispatches its create or update.
    ///
    /// Invalid input keeps the dialog open and sends nothing.
    pub async fn submit_dialog(&mut self) -> Result<()> {
        let submission = match self.dialog() {
            None => return Err(Error::validation("no dialog is open")),
            Some(ActiveDialog::Create(dialog)) => dialog.submit().map(Submission::Create),
            Some(ActiveDialog::Edit(dialog)) => dialog
                .submit()
                .map(|diff| Submission::Update(dialog.product_id().clone(), diff)),
        };

        match submission {
            Ok(Submission::Create(product)) => self.create_product(product).await.map(|_| ()),
            Ok(Submission::Update(id, diff)) => self.update_product(&id, diff).await,
            Err(err) => {
                warn!(error = %err, "dialog input rejected");
                self.notifications.error(err.reason());
                Err(err)
            }
        }
    }

    /// Handles an edit or delete request coming from a card
    pub async fn handle_intent<C>(&mut self, intent: CardIntent, confirm: C) -> Result<()>
    where
        C: ConfirmPrompt,
    {
        match intent {
            CardIntent::Edit(id) => self.open_edit_dialog(&id).map(|_| ()),
            CardIntent::Delete(id) => self.delete_product(&id, confirm).await.map(|_| ()),
        }
    }

    fn report(&mut self, message: &str, err: Error) -> Error {
        error!(error = %err, "{}", message);
        self.notifications.error(message);
        err
    }

    fn report_update(&mut self, err: Error) -> Error {
        error!(error = %err, "failed to update product");
        self.notifications
            .error(format!("Failed to update product: {}", err.reason()));
        err
    }
}
