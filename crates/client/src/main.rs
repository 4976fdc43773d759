use std::sync::Arc;

use anyhow::Context;

use yip_catalog::ProductId;
use yip_client::{App, ClientConfig, LogAlerter, ProductFields, SqliteStorage, TracingRenderer};

const USAGE: &str = "usage: yip list | add <name> <price> <image> | remove <id>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    yip_observability::init();

    let config = ClientConfig::from_env()?;
    let storage = SqliteStorage::open(&config.database_path())
        .await
        .context("failed to open client storage")?;

    let mut app = App::boot(
        &config,
        Arc::new(storage),
        Arc::new(TracingRenderer),
        Arc::new(LogAlerter),
    )
    .await;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["list"] => {
            print_catalog(&app);
            Ok(())
        }
        ["add", name, price, image] => app
            .add_product(ProductFields::from_form(name, price, Some(*image)))
            .map(|id| {
                println!("added {id}");
                print_catalog(&app);
            })
            .map_err(|err| anyhow::anyhow!(err.user_message())),
        ["remove", id] => {
            if app.remove_product(&ProductId::from(*id)) {
                println!("removed {id}");
            } else {
                println!("no product with id {id}");
            }
            print_catalog(&app);
            Ok(())
        }
        _ => Err(anyhow::anyhow!(USAGE)),
    };

    app.shutdown().await;
    outcome
}

fn print_catalog(app: &App) {
    let products = app.state().products();
    if products.is_empty() {
        println!("No products found");
        return;
    }

    for product in products {
        println!(
            "{}\t{}\t{:.2}\t{}",
            product.id_typed(),
            product.name(),
            product.price().value(),
            product.image()
        );
    }
}
