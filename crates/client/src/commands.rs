//! Command layer: user intents → validated actions.
//!
//! This is the only place that enforces field validation and the catalog
//! capacity. Reducers stay permissive; [`plan_add`] turns an intent into
//! either an action or a [`ValidationError`] without touching the store.

use std::sync::Arc;

use tokio::runtime::Handle;

use yip_catalog::{Catalog, CatalogAction, MAX_PRODUCTS, Price, Product, ProductId};
use yip_core::{Field, ValidationError, ValidationResult};
use yip_notifications::{Notification, NotificationAction, Position};
use yip_store::StateStore;

use crate::alerts::{SystemAlert, SystemAlerter};
use crate::config::ClientConfig;

/// Raw input of an "add product" intent, as captured by a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: Option<f64>,
    pub image: Option<String>,
}

impl ProductFields {
    pub fn new(name: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: Some(price),
            image: Some(image.into()),
        }
    }

    /// Build from text inputs. The price is read leniently: the longest leading
    /// numeric prefix counts (`"12.5 NGN"` is `12.5`); no digits means no price.
    pub fn from_form(name: &str, price_text: &str, image: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            price: parse_price(price_text),
            image: image.map(str::to_string),
        }
    }
}

fn parse_price(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// Validate an add intent against the current catalog.
///
/// Field checks come first, then capacity: a full catalog rejects the intent
/// (nothing is evicted to make room).
pub fn plan_add(
    catalog: &Catalog,
    fields: &ProductFields,
    id: ProductId,
    capacity: usize,
) -> ValidationResult<CatalogAction> {
    if fields.name.trim().is_empty() {
        return Err(ValidationError::missing(Field::Name));
    }
    let price = fields.price.ok_or(ValidationError::missing(Field::Price))?;
    let image = fields
        .image
        .as_deref()
        .filter(|uri| !uri.trim().is_empty())
        .ok_or(ValidationError::missing(Field::Image))?;

    let price = Price::new(price)?;

    if catalog.len() >= capacity {
        return Err(ValidationError::catalog_full(capacity));
    }

    Ok(CatalogAction::AddProduct(Product::new(id, fields.name.as_str(), price, image)))
}

/// Validates intents and dispatches the resulting actions.
pub struct CommandLayer {
    capacity: usize,
    notification_duration_ms: u64,
    alerter: Arc<dyn SystemAlerter>,
    runtime: Handle,
}

impl core::fmt::Debug for CommandLayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommandLayer")
            .field("capacity", &self.capacity)
            .field("notification_duration_ms", &self.notification_duration_ms)
            .finish()
    }
}

impl CommandLayer {
    pub fn new(config: &ClientConfig, alerter: Arc<dyn SystemAlerter>, runtime: Handle) -> Self {
        Self {
            capacity: MAX_PRODUCTS,
            notification_duration_ms: config.notification_duration_ms,
            alerter,
            runtime,
        }
    }

    /// Add a product built from `fields`.
    ///
    /// On success the product is prepended, a success notification is shown
    /// and a system alert is fired (not awaited). On failure an error
    /// notification is shown and the catalog is untouched.
    pub fn add_product(
        &self,
        store: &mut StateStore,
        fields: ProductFields,
    ) -> ValidationResult<ProductId> {
        let id = ProductId::generate();

        match plan_add(&store.state().catalog, &fields, id.clone(), self.capacity) {
            Ok(action) => {
                store.dispatch(action);
                tracing::info!(
                    product_id = %id,
                    products = store.state().product_count(),
                    "product added"
                );

                self.fire_alert(SystemAlert::product_added());
                store.dispatch(NotificationAction::Show(
                    self.notification(Notification::success("Product added successfully"))
                        .with_position(Position::Top),
                ));
                Ok(id)
            }
            Err(err) => {
                tracing::warn!(error = %err, "add product rejected");
                store.dispatch(NotificationAction::Show(
                    self.notification(Notification::error(err.user_message()))
                        .with_position(Position::Top),
                ));
                Err(err)
            }
        }
    }

    /// Remove every product with `id`. Absence is not an error.
    ///
    /// The confirmation notification is shown on every call; the return value
    /// says whether anything was actually removed.
    pub fn remove_product(&self, store: &mut StateStore, id: &ProductId) -> bool {
        let removed = store.dispatch(CatalogAction::RemoveProduct(id.clone()));

        if removed {
            tracing::info!(product_id = %id, "product removed");
        } else {
            tracing::debug!(product_id = %id, "remove matched nothing");
        }
        store.dispatch(NotificationAction::Show(
            self.notification(Notification::info("Product removed successfully")),
        ));
        removed
    }

    fn notification(&self, notification: Notification) -> Notification {
        notification.with_duration_ms(self.notification_duration_ms)
    }

    fn fire_alert(&self, alert: SystemAlert) {
        let alerter = Arc::clone(&self.alerter);
        self.runtime.spawn(async move {
            if let Err(err) = alerter.alert(&alert).await {
                tracing::warn!(error = %err, title = %alert.title, "system alert failed");
            }
        });
    }
}
