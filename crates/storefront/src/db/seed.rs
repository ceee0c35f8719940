//! Data loaded into the stores at startup.

use rust_decimal::Decimal;

use arluxe_core::{Email, ProductId, Role, UserId};

use crate::models::{Product, User};
use crate::services::auth::{AuthError, hash_password};

/// The two demo accounts: one admin, one customer.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing a seed password fails.
pub fn users() -> Result<Vec<User>, AuthError> {
    let accounts = [
        (
            "u_admin",
            "Admin User",
            "abdurrafayfarhan3@gmail.com",
            "admin123",
            Role::Admin,
        ),
        (
            "u_customer",
            "Luxury Customer",
            "user@arluxe.com",
            "user123",
            Role::Customer,
        ),
    ];

    accounts
        .into_iter()
        .map(|(id, name, email, password, role)| -> Result<User, AuthError> {
            Ok(User {
                id: UserId::new(id),
                name: name.to_owned(),
                email: Email::parse(email)?,
                password_hash: Some(hash_password(password)?),
                role,
            })
        })
        .collect()
}

/// The launch catalog.
#[must_use]
pub fn products() -> Vec<Product> {
    const PREMIUM: &str = "Premium Category";
    const NEW: &str = "New Category";

    let catalog: [(&str, &str, i64, &str, &str, &str); 10] = [
        ("reef-33", "REEF 33", 3500, "/reef-33-3-2.png", "Warm, Spicy, Amber", PREMIUM),
        ("elysium-3", "ELYSIUM", 3500, "/elysium-3.png", "Fresh, Citrus, Woody", PREMIUM),
        ("aventus-creed-4", "AVENTUS CREED", 4000, "/aventus-creed-4.png", "Fruity, Smoky, Woody", PREMIUM),
        ("oud-maracuja-2-1", "OUD MARACUJA", 4000, "/oud-maracuja-2-1.png", "Tropical, Oud, Amber", PREMIUM),
        ("blue-oud5-1", "BLUE OUD", 4000, "/blue-oud5-1.png", "Fresh, Oud, Marine", PREMIUM),
        ("officer-1", "OFFICER", 1500, "/officer-1.png", "Fresh, Aromatic, Elegant", NEW),
        ("urban-eclipse-1", "URBAN ECLIPSE", 1500, "/urban-eclipse-1.png", "Woody, Dark, Modern", NEW),
        ("miranee-1", "MIRANEE", 1500, "/miranee-1.png", "Soft, Musky, Floral", NEW),
        ("braven-1-1", "BRAVEN", 1500, "/braven-1-1.png", "Bold, Woody, Spicy", NEW),
        ("evelle-4", "EVELLE", 1500, "/evelle-4.jpg.jpeg", "Elegant, Floral, Smooth", NEW),
    ];

    catalog
        .into_iter()
        .map(|(id, name, price, image, scent, category)| Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: Decimal::from(price),
            discount_percent: Decimal::ZERO,
            image: image.to_owned(),
            scent: scent.to_owned(),
            category: category.to_owned(),
            is_new: true,
        })
        .collect()
}
