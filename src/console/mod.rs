//! Console state: the product grid, its cards, dialogs and notifications

pub mod card;
pub mod dialog;
pub mod images;
pub mod list_view;
pub mod notification;

pub use card::{CardIntent, ProductCard, PLACEHOLDER_IMAGE};
pub use dialog::{ProductCreateDialog, ProductEditDialog, ProductField};
pub use images::{data_url, load_image_file, ImagePreview, ImageStaging, StagedImage};
pub use list_view::{ActiveDialog, ConfirmPrompt, DeleteOutcome, LoadTicket, ProductListView};
pub use notification::{Notification, Notifications, Severity};
