//! Order placement.
//!
//! There is no payment or fulfilment backend: an order is validated, given a
//! number, announced to the customer and the cart is emptied.

use amarine_core::shop::{
    CartLine, Clock, DurableStorage, Notification, NotificationSink, ShopState,
};
use amarine_core::{ContactError, Email, OrderNumber, OrderStatus, PaymentMethod, Phone, Price};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a generated order number.
pub const ORDER_NUMBER_LEN: usize = 9;

const ORDER_NUMBER_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Errors that reject a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0}")]
    InvalidContact(#[from] ContactError),
}

/// Checkout form as submitted by the customer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Validated contact and delivery details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub name: String,
    pub email: Email,
    pub phone: Phone,
    pub address: String,
    pub city: String,
}

impl CheckoutForm {
    /// Check the required fields and parse the contact details.
    ///
    /// # Errors
    ///
    /// Returns an error if name, email or phone is blank, or if the email
    /// or phone number is malformed.
    pub fn validate(&self) -> Result<Customer, CheckoutError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CheckoutError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(CheckoutError::MissingField("email"));
        }
        if self.phone.trim().is_empty() {
            return Err(CheckoutError::MissingField("phone"));
        }

        Ok(Customer {
            name: name.to_owned(),
            email: Email::parse(&self.email)?,
            phone: Phone::parse(&self.phone)?,
            address: self.address.trim().to_owned(),
            city: self.city.trim().to_owned(),
        })
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub number: OrderNumber,
    pub items: Vec<CartLine>,
    pub total: Price,
    pub count: u64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub customer: Customer,
    pub placed_at: DateTime<Utc>,
}

/// Generate a random uppercase base-36 order number.
pub fn generate_order_number<R: Rng + ?Sized>(rng: &mut R) -> OrderNumber {
    let number: String = (0..ORDER_NUMBER_LEN)
        .filter_map(|_| {
            let idx = rng.random_range(0..ORDER_NUMBER_CHARSET.len());
            ORDER_NUMBER_CHARSET.get(idx).copied().map(char::from)
        })
        .collect();
    OrderNumber::new(number)
}

/// Fail early if there is nothing to order.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] when the cart has no entries.
pub fn ensure_not_empty<S, N, C>(shop: &ShopState<S, N, C>) -> Result<(), CheckoutError>
where
    S: DurableStorage,
    N: NotificationSink,
    C: Clock,
{
    if shop.cart().is_empty() {
        Err(CheckoutError::EmptyCart)
    } else {
        Ok(())
    }
}

/// Turn the current cart into an order, announce it and empty the cart.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] when the cart has no entries.
pub fn place_order<S, N, C>(
    shop: &mut ShopState<S, N, C>,
    customer: Customer,
    payment_method: PaymentMethod,
    number: OrderNumber,
    placed_at: DateTime<Utc>,
) -> Result<Order, CheckoutError>
where
    S: DurableStorage,
    N: NotificationSink,
    C: Clock,
{
    ensure_not_empty(shop)?;

    let summary = shop.summary();
    let order = Order {
        number,
        items: summary.lines,
        total: summary.total,
        count: summary.count,
        status: OrderStatus::Pending,
        payment_method,
        customer,
        placed_at,
    };

    shop.sink_mut().notify(
        Notification::success("Order placed!")
            .with_description(format!("Order number: #{}", order.number)),
    );
    shop.clear_cart();

    tracing::info!(
        order_number = %order.number,
        total = %order.total,
        items = order.count,
        "Order placed"
    );
    Ok(order)
}
