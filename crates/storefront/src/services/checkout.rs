//! Checkout and order management.
//!
//! Orders are priced from the catalog at checkout time; prices sent by the
//! client are never trusted. The seller notification is handed to the
//! [`NotificationDispatcher`] and never delays or fails the checkout.

use chrono::Utc;
use thiserror::Error;

use arluxe_core::{
    Cart, InvalidOrderStatus, OrderId, OrderStatus, ProductId, ShippingAddress,
};

use crate::db::{OrderStore, ProductStore, RepositoryError};
use crate::models::{CheckoutItem, EmailDispatch, Order, OrderItem, User};
use crate::services::notify::NotificationDispatcher;

/// Errors from checkout and order operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Shipping address absent or with a blank field.
    #[error("shipping address is incomplete")]
    MissingShippingAddress,

    /// No items were submitted.
    #[error("cart is empty")]
    EmptyCart,

    /// An item refers to a product that is not in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// An item quantity is below one.
    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: ProductId, quantity: i64 },

    /// Line subtotals or their sum exceed the representable price range.
    #[error("order total is too large")]
    TotalOverflow,

    /// Order does not exist.
    #[error("order not found")]
    OrderNotFound,

    /// Status value is missing or not a known status.
    #[error(transparent)]
    InvalidStatus(#[from] InvalidOrderStatus),

    /// Status change would move the order backwards.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

pub struct CheckoutService<'a> {
    products: &'a dyn ProductStore,
    orders: &'a dyn OrderStore,
    dispatcher: &'a NotificationDispatcher,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(
        products: &'a dyn ProductStore,
        orders: &'a dyn OrderStore,
        dispatcher: &'a NotificationDispatcher,
    ) -> Self {
        Self {
            products,
            orders,
            dispatcher,
        }
    }

    /// Place an order for `buyer`.
    ///
    /// The shipping address is checked before anything else. Items are
    /// merged by product and priced at the current discounted catalog price.
    /// The returned order has `emailDispatch` pending; the notification
    /// outcome is written to the stored order later.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingShippingAddress`, `EmptyCart`,
    /// `InvalidQuantity`, `UnknownProduct` or `TotalOverflow` for invalid
    /// input. Nothing is stored in those cases.
    pub async fn create_order(
        &self,
        buyer: &User,
        items: &[CheckoutItem],
        shipping_address: Option<ShippingAddress>,
    ) -> Result<Order, CheckoutError> {
        let shipping_address = shipping_address
            .filter(ShippingAddress::is_complete)
            .ok_or(CheckoutError::MissingShippingAddress)?;

        let cart = self.price_cart(items).await?;
        let total = cart.total_price().ok_or(CheckoutError::TotalOverflow)?;

        let order = Order {
            id: OrderId::generate(),
            user_id: buyer.id.clone(),
            buyer_email: buyer.email.clone(),
            items: cart
                .lines()
                .iter()
                .map(|line| OrderItem {
                    id: line.product_id.clone(),
                    name: line.name.clone(),
                    price: line.unit_price(),
                    quantity: line.quantity,
                })
                .collect(),
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            shipping_address,
            email_dispatch: EmailDispatch::Pending,
        };

        let order = self.orders.insert_front(order).await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %buyer.id,
            items = cart.total_items(),
            total = %order.total,
            "Order placed"
        );

        // Detached: the outcome is recorded on the order.
        drop(self.dispatcher.dispatch(order.clone(), buyer.clone()));

        Ok(order)
    }

    /// Orders visible to `user`: every order for admins, own orders otherwise.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if the store fails.
    pub async fn list_orders(&self, user: &User) -> Result<Vec<Order>, CheckoutError> {
        let orders = if user.role.is_admin() {
            self.orders.list_all().await?
        } else {
            self.orders.list_for_user(&user.id).await?
        };
        Ok(orders)
    }

    /// Move an order to a new status.
    ///
    /// `status` is the raw value from the request; `None` means it was not
    /// supplied. Forward moves (including skips) and re-applying the current
    /// status are accepted.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::OrderNotFound` if the order does not exist,
    /// `InvalidStatus` if the status is missing or unknown, and
    /// `InvalidTransition` if the order would move backwards.
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: Option<&str>,
    ) -> Result<Order, CheckoutError> {
        let current = self
            .orders
            .get(id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)?;

        let next: OrderStatus = status.unwrap_or_default().parse()?;

        if !current.status.can_transition_to(next) {
            return Err(CheckoutError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }
        if current.status == next {
            return Ok(current);
        }

        let updated = self
            .orders
            .replace_status(id, current.status, next)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CheckoutError::OrderNotFound,
                RepositoryError::Conflict(_) => CheckoutError::InvalidTransition {
                    from: current.status,
                    to: next,
                },
            })?;

        tracing::info!(order_id = %id, from = %current.status, to = %next, "Order status updated");
        Ok(updated)
    }

    /// Aggregate the submitted items into a cart priced from the catalog.
    async fn price_cart(&self, items: &[CheckoutItem]) -> Result<Cart, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut cart = Cart::new();
        for item in items {
            let quantity = u32::try_from(item.quantity)
                .ok()
                .filter(|q| *q >= 1)
                .ok_or_else(|| CheckoutError::InvalidQuantity {
                    product_id: item.id.clone(),
                    quantity: item.quantity,
                })?;

            let product = self
                .products
                .get(&item.id)
                .await?
                .ok_or_else(|| CheckoutError::UnknownProduct(item.id.clone()))?;

            cart.add(
                product.id,
                product.name,
                product.price,
                product.discount_percent,
                quantity,
            );
        }

        Ok(cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use arluxe_core::{Email, Role, UserId};

    use super::*;
    use crate::config::NotificationConfig;
    use crate::db::{MemoryOrderStore, MemoryProductStore, seed};
    use crate::models::ProductPatch;
    use crate::services::notify::UnconfiguredNotifier;

    struct Fixture {
        products: MemoryProductStore,
        orders: MemoryOrderStore,
        dispatcher: NotificationDispatcher,
    }

    impl Fixture {
        fn new() -> Self {
            let orders = MemoryOrderStore::new();
            let dispatcher = NotificationDispatcher::new(
                Arc::new(UnconfiguredNotifier),
                Arc::new(orders.clone()),
                &NotificationConfig::default(),
            );
            Self {
                products: MemoryProductStore::with_products(seed::products()),
                orders,
                dispatcher,
            }
        }

        fn service(&self) -> CheckoutService<'_> {
            CheckoutService::new(&self.products, &self.orders, &self.dispatcher)
        }
    }

    fn user(id: &str, role: Role) -> User {
        User {
            id: UserId::new(id),
            name: id.to_owned(),
            email: Email::parse(&format!("{id}@arluxe.com")).unwrap(),
            password_hash: None,
            role,
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Ayesha Khan".to_owned(),
            phone: "+92 300 1234567".to_owned(),
            address_line: "House 12, Street 4".to_owned(),
            city: "Lahore".to_owned(),
            state: "Punjab".to_owned(),
            zip_code: "54000".to_owned(),
            country: "Pakistan".to_owned(),
        }
    }

    fn item(id: &str, quantity: i64) -> CheckoutItem {
        CheckoutItem {
            id: ProductId::new(id),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_incomplete_address_rejected_before_anything_else() {
        let fixture = Fixture::new();
        let buyer = user("u_customer", Role::Customer);

        let mut partial = address();
        partial.city = "  ".to_owned();

        for shipping in [None, Some(partial)] {
            let result = fixture.service().create_order(&buyer, &[], shipping).await;
            assert!(matches!(result, Err(CheckoutError::MissingShippingAddress)));
        }
        assert!(fixture.orders.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_priced_from_catalog() {
        let fixture = Fixture::new();
        fixture
            .products
            .update(
                &ProductId::new("reef-33"),
                ProductPatch {
                    discount_percent: Some(Decimal::from(10)),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap();
        let buyer = user("u_customer", Role::Customer);

        let order = fixture
            .service()
            .create_order(
                &buyer,
                &[item("reef-33", 1), item("officer-1", 2), item("reef-33", 1)],
                Some(address()),
            )
            .await
            .unwrap();

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].price, Decimal::from(3150));
        assert_eq!(order.items[0].quantity, 2);
        // 3150 * 2 + 1500 * 2
        assert_eq!(order.total, Decimal::from(9300));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.buyer_email, buyer.email);
        assert!(order.email_dispatch.is_pending());

        let stored = fixture.orders.list_all().await.unwrap();
        assert_eq!(stored[0].id, order.id);
    }

    #[tokio::test]
    async fn test_invalid_items_rejected() {
        let fixture = Fixture::new();
        let buyer = user("u_customer", Role::Customer);
        let service = fixture.service();

        assert!(matches!(
            service.create_order(&buyer, &[], Some(address())).await,
            Err(CheckoutError::EmptyCart)
        ));
        assert!(matches!(
            service
                .create_order(&buyer, &[item("ghost", 1)], Some(address()))
                .await,
            Err(CheckoutError::UnknownProduct(_))
        ));
        assert!(matches!(
            service
                .create_order(&buyer, &[item("reef-33", 0)], Some(address()))
                .await,
            Err(CheckoutError::InvalidQuantity { quantity: 0, .. })
        ));
        assert!(matches!(
            service
                .create_order(&buyer, &[item("reef-33", -3)], Some(address()))
                .await,
            Err(CheckoutError::InvalidQuantity { .. })
        ));
        assert!(fixture.orders.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_total_overflow_rejected() {
        let fixture = Fixture::new();
        fixture
            .products
            .update(
                &ProductId::new("reef-33"),
                ProductPatch {
                    price: Some(Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0)),
                    discount_percent: Some(Decimal::from(10)),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap();
        let buyer = user("u_customer", Role::Customer);

        let result = fixture
            .service()
            .create_order(&buyer, &[item("reef-33", 2)], Some(address()))
            .await;
        assert!(matches!(result, Err(CheckoutError::TotalOverflow)));

        let result = fixture
            .service()
            .create_order(
                &buyer,
                &[item("reef-33", 1), item("officer-1", 1)],
                Some(address()),
            )
            .await;
        assert!(result.is_ok());

        assert_eq!(fixture.orders.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_notification_outcome_recorded() {
        let fixture = Fixture::new();
        let buyer = user("u_customer", Role::Customer);

        let order = fixture
            .service()
            .create_order(&buyer, &[item("miranee-1", 1)], Some(address()))
            .await
            .unwrap();

        let mut dispatch = EmailDispatch::Pending;
        for _ in 0..50 {
            dispatch = fixture
                .orders
                .get(&order.id)
                .await
                .unwrap()
                .unwrap()
                .email_dispatch;
            if !dispatch.is_pending() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(matches!(dispatch, EmailDispatch::Failed { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn test_orders_scoped_by_role() {
        let fixture = Fixture::new();
        let alice = user("alice", Role::Customer);
        let bob = user("bob", Role::Customer);
        let admin = user("admin", Role::Admin);
        let service = fixture.service();

        service
            .create_order(&alice, &[item("braven-1-1", 1)], Some(address()))
            .await
            .unwrap();
        service
            .create_order(&bob, &[item("braven-1-1", 1)], Some(address()))
            .await
            .unwrap();

        let mine = service.list_orders(&alice).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id, alice.id);
        assert_eq!(service.list_orders(&admin).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let fixture = Fixture::new();
        let buyer = user("u_customer", Role::Customer);
        let service = fixture.service();
        let order = service
            .create_order(&buyer, &[item("evelle-4", 1)], Some(address()))
            .await
            .unwrap();

        let same = service.update_status(&order.id, Some("pending")).await.unwrap();
        assert_eq!(same.status, OrderStatus::Pending);

        let done = service
            .update_status(&order.id, Some("completed"))
            .await
            .unwrap();
        assert_eq!(done.status, OrderStatus::Completed);

        assert!(matches!(
            service.update_status(&order.id, Some("processing")).await,
            Err(CheckoutError::InvalidTransition { .. })
        ));
        assert!(matches!(
            service.update_status(&order.id, Some("shipped")).await,
            Err(CheckoutError::InvalidStatus(_))
        ));
        assert!(matches!(
            service.update_status(&order.id, None).await,
            Err(CheckoutError::InvalidStatus(_))
        ));
    }

    #[tokio::test]
    async fn test_status_update_unknown_order() {
        let fixture = Fixture::new();
        let result = fixture
            .service()
            .update_status(&OrderId::new("ghost"), Some("completed"))
            .await;
        assert!(matches!(result, Err(CheckoutError::OrderNotFound)));
        assert!(fixture.orders.list_all().await.unwrap().is_empty());
    }
}
