use catalog_admin::config::ConsoleConfig;
use catalog_admin::console::{load_image_file, Notifications, ProductField, Severity};
use catalog_admin::products::{ProductId, ProductsClient};
use catalog_admin::{CatalogAdmin, console::ProductListView};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "catalog-admin", version, about = "Manage the product catalog")]
struct Cli {
    /// Base URL of the catalog API (overrides CATALOG_API_URL)
    #[clap(long, global = true)]
    api_url: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every product
    List,
    /// Create a product, uploading zero or more images
    Create {
        #[clap(long)]
        name: String,
        #[clap(long, default_value = "")]
        sku: String,
        #[clap(long)]
        price: String,
        /// jpeg or png file to upload; repeatable
        #[clap(long = "image", value_name = "PATH")]
        images: Vec<PathBuf>,
    },
    /// Change some fields of a product
    Update {
        id: String,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        sku: Option<String>,
        #[clap(long)]
        price: Option<String>,
    },
    /// Delete a product
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[clap(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let admin = match build_admin(cli.api_url.as_deref()) {
        Ok(admin) => admin,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut view = admin.product_list_view();
    let result = run(&mut view, cli.command).await;
    if let Err(err) = &result {
        // failures the view already reported surface through its notifications
        if view.notifications().count(Severity::Error) == 0 {
            eprintln!("error: {}", err);
        }
    }
    print_notifications(view.notifications_mut());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn build_admin(api_url: Option<&str>) -> catalog_admin::error::Result<CatalogAdmin> {
    let mut config = ConsoleConfig::from_env()?;
    if let Some(api_url) = api_url {
        config = config.with_api_url(api_url)?;
    }
    CatalogAdmin::new(config)
}

async fn run(
    view: &mut ProductListView<ProductsClient>,
    command: Command,
) -> catalog_admin::error::Result<()> {
    match command {
        Command::List => {
            view.load_products().await?;
            for card in view.cards() {
                let product = card.product();
                let id = product.id.as_ref().map(ProductId::as_str).unwrap_or("-");
                println!(
                    "{}\t{}\t{}\t{}\t{} image(s)",
                    id,
                    product.name,
                    product.sku,
                    card.price_label(),
                    product.images.len()
                );
            }
            Ok(())
        }
        Command::Create {
            name,
            sku,
            price,
            images,
        } => {
            let mut files = Vec::with_capacity(images.len());
            for path in &images {
                files.push(load_image_file(path).await?);
            }

            let dialog = view.open_create_dialog();
            dialog.set_field(ProductField::Name, &name);
            dialog.set_field(ProductField::Sku, &sku);
            dialog.set_field(ProductField::Price, &price);
            dialog.add_files(files)?;

            view.submit_dialog().await
        }
        Command::Update {
            id,
            name,
            sku,
            price,
        } => {
            view.load_products().await?;
            let dialog = view.open_edit_dialog(&ProductId::from(id))?;
            let edits = [
                (ProductField::Name, name),
                (ProductField::Sku, sku),
                (ProductField::Price, price),
            ];
            for (field, value) in edits {
                if let Some(value) = value {
                    dialog.set_field(field, &value);
                }
            }

            view.submit_dialog().await
        }
        Command::Delete { id, yes } => {
            view.load_products().await?;
            let id = ProductId::from(id);
            if yes {
                view.delete_product(&id, |_: &str| true).await?;
            } else {
                view.delete_product(&id, prompt_on_stdin).await?;
            }
            Ok(())
        }
    }
}

fn prompt_on_stdin(message: &str) -> bool {
    print!("{} [y/N] ", message);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn print_notifications(notifications: &mut Notifications) {
    for notification in notifications.drain() {
        match notification.severity {
            Severity::Error => eprintln!("error: {}", notification.message),
            severity => println!("{}: {}", severity, notification.message),
        }
    }
}
